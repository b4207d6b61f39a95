use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::article;
use crate::errors;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHOR: &str = "author";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Articles,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Articles => Entity::has_many(article::Entity).into(),
        }
    }
}

impl Related<article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Articles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_role(role: &str) -> Result<(), errors::ModelError> {
    if role != ROLE_ADMIN && role != ROLE_AUTHOR {
        return Err(errors::ModelError::Validation(format!("unknown role: {role}")));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
    role: &str,
) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    validate_role(role)?;
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        name: Set(name.to_string()),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_must_contain_at_sign() {
        assert!(validate_email("bob@example.com").is_ok());
        assert!(validate_email("bob.example.com").is_err());
    }

    #[test]
    fn role_must_be_known() {
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role(ROLE_AUTHOR).is_ok());
        assert!(validate_role("superuser").is_err());
    }
}
