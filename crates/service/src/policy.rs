//! Capability checks over articles.
//!
//! Pure `(actor, resource) -> bool` functions; the acting user is always an
//! explicit parameter. Edit and delete are gated the same way: the owner or
//! an admin.

use models::{article, user};

pub fn can_create(actor: &user::Model) -> bool {
    actor.role == user::ROLE_ADMIN || actor.role == user::ROLE_AUTHOR
}

pub fn can_edit(actor: &user::Model, article: &article::Model) -> bool {
    actor.is_admin() || article.user_id == actor.id
}

pub fn can_delete(actor: &user::Model, article: &article::Model) -> bool {
    can_edit(actor, article)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn actor(role: &str) -> user::Model {
        let now = Utc::now().into();
        user::Model {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            name: "A".into(),
            role: role.into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn article_owned_by(owner: Uuid) -> article::Model {
        let now = Utc::now().into();
        article::Model {
            id: Uuid::new_v4(),
            user_id: owner,
            category_id: Uuid::new_v4(),
            title: "T".into(),
            content: "C".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_may_edit_and_delete() {
        let a = actor(user::ROLE_AUTHOR);
        let art = article_owned_by(a.id);
        assert!(can_edit(&a, &art));
        assert!(can_delete(&a, &art));
    }

    #[test]
    fn stranger_may_not_edit() {
        let a = actor(user::ROLE_AUTHOR);
        let art = article_owned_by(Uuid::new_v4());
        assert!(!can_edit(&a, &art));
        assert!(!can_delete(&a, &art));
    }

    #[test]
    fn admin_may_edit_anything() {
        let a = actor(user::ROLE_ADMIN);
        let art = article_owned_by(Uuid::new_v4());
        assert!(can_edit(&a, &art));
    }

    #[test]
    fn known_roles_may_create() {
        assert!(can_create(&actor(user::ROLE_AUTHOR)));
        assert!(can_create(&actor(user::ROLE_ADMIN)));
        assert!(!can_create(&actor("banned")));
    }
}
