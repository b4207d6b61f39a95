use chrono::Utc;
use common::pagination::Pagination;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use models::{article, category};

use crate::errors::ServiceError;
use crate::validation::{messages, FieldErrors, ValidatedCategory};

async fn ensure_slug_free(
    db: &DatabaseConnection,
    slug: &str,
    exclude: Option<Uuid>,
) -> Result<(), ServiceError> {
    let mut query = category::Entity::find().filter(category::Column::Slug.eq(slug));
    if let Some(id) = exclude {
        query = query.filter(category::Column::Id.ne(id));
    }
    let taken = query.one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if taken.is_some() {
        let mut errs = FieldErrors::default();
        errs.add("slug", messages::SLUG_TAKEN);
        return Err(ServiceError::Invalid(errs));
    }
    Ok(())
}

/// Create a category.
pub async fn store_category(
    db: &DatabaseConnection,
    data: &ValidatedCategory,
) -> Result<category::Model, ServiceError> {
    ensure_slug_free(db, &data.slug, None).await?;
    let now = Utc::now().into();
    let am = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(data.name.clone()),
        slug: Set(data.slug.clone()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(category_id = %created.id, slug = %created.slug, "category_created");
    Ok(created)
}

/// Get category by id.
pub async fn get_category(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<category::Model>, ServiceError> {
    category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// List categories with pagination.
pub async fn list_categories_page(
    db: &DatabaseConnection,
    page: Pagination,
) -> Result<Vec<category::Model>, ServiceError> {
    let (page_idx, per_page) = page.normalize();
    category::Entity::find()
        .order_by_asc(category::Column::Name)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Overwrite name and slug, preserving the identifier.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    data: &ValidatedCategory,
) -> Result<category::Model, ServiceError> {
    ensure_slug_free(db, &data.slug, Some(id)).await?;
    let mut am: category::ActiveModel = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("category"))?
        .into();
    am.name = Set(data.name.clone());
    am.slug = Set(data.slug.clone());
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    info!(category_id = %updated.id, "category_updated");
    Ok(updated)
}

/// Delete a category. Refused while articles still reference it; deleting an
/// already-deleted id returns `false`.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let referencing = article::Entity::find()
        .filter(article::Column::CategoryId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if referencing > 0 {
        return Err(ServiceError::Validation(messages::CATEGORY_IN_USE.into()));
    }
    let res = category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_disabled, get_db};

    fn unique_category(prefix: &str) -> ValidatedCategory {
        let n = Uuid::new_v4();
        ValidatedCategory { name: format!("{prefix}-{n}"), slug: format!("{prefix}-{n}") }
    }

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        if db_tests_disabled() {
            return Ok(());
        }
        let db = get_db().await?;

        let data = unique_category("news");
        let created = store_category(&db, &data).await?;
        assert_eq!(created.name, data.name);
        assert_eq!(created.slug, data.slug);

        let found = get_category(&db, created.id).await?.unwrap();
        assert_eq!(found.id, created.id);

        let next = unique_category("updates");
        let updated = update_category(&db, created.id, &next).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, next.name);
        assert_eq!(updated.slug, next.slug);

        assert!(delete_category(&db, created.id).await?);
        assert!(get_category(&db, created.id).await?.is_none());
        // Deleting again is a clean no-op signal, not an error
        assert!(!delete_category(&db, created.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() -> Result<(), anyhow::Error> {
        if db_tests_disabled() {
            return Ok(());
        }
        let db = get_db().await?;

        let data = unique_category("dup");
        let created = store_category(&db, &data).await?;

        let clash = ValidatedCategory { name: "Autre".into(), slug: data.slug.clone() };
        let err = store_category(&db, &clash).await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));

        assert!(delete_category(&db, created.id).await?);
        Ok(())
    }
}
