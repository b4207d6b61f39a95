use anyhow::Result;
use chrono::Utc;
use migration::MigratorTrait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::db::connect;
use crate::{article, article_tag, category, tag, user};

fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn seed_category(db: &DatabaseConnection, name: &str, slug: &str) -> Result<category::Model> {
    let now = Utc::now().into();
    let am = category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let email = format!("author_{}@example.com", Uuid::new_v4());
    let created = user::create(&db, &email, "Alice", user::ROLE_AUTHOR).await?;
    assert_eq!(created.email, email);
    assert!(!created.is_admin());

    let found = user::Entity::find_by_id(created.id).one(&db).await?;
    assert_eq!(found.as_ref().map(|u| u.id), Some(created.id));

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_article_with_tags_crud() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let owner = user::create(
        &db,
        &format!("owner_{}@example.com", Uuid::new_v4()),
        "Owner",
        user::ROLE_AUTHOR,
    )
    .await?;
    let cat = seed_category(&db, "News", &format!("news-{}", Uuid::new_v4())).await?;
    let t1 = tag::create(&db, &format!("rust-{}", Uuid::new_v4())).await?;
    let t2 = tag::create(&db, &format!("web-{}", Uuid::new_v4())).await?;

    let now = Utc::now().into();
    let art = article::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner.id),
        category_id: Set(cat.id),
        title: Set("Hello".into()),
        content: Set("Body".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    for tid in [t1.id, t2.id] {
        article_tag::ActiveModel { article_id: Set(art.id), tag_id: Set(tid) }
            .insert(&db)
            .await?;
    }

    // Many-to-many loading through the junction
    let loaded_tags = art.find_related(tag::Entity).all(&db).await?;
    assert_eq!(loaded_tags.len(), 2);

    // Deleting the article cascades the junction rows away
    article::Entity::delete_by_id(art.id).exec(&db).await?;
    let leftover = article_tag::Entity::find()
        .filter(article_tag::Column::ArticleId.eq(art.id))
        .all(&db)
        .await?;
    assert!(leftover.is_empty());

    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    tag::Entity::delete_by_id(t1.id).exec(&db).await?;
    tag::Entity::delete_by_id(t2.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_category_delete_restricted_while_referenced() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let owner = user::create(
        &db,
        &format!("owner_{}@example.com", Uuid::new_v4()),
        "Owner",
        user::ROLE_AUTHOR,
    )
    .await?;
    let cat = seed_category(&db, "Pinned", &format!("pinned-{}", Uuid::new_v4())).await?;

    let now = Utc::now().into();
    let art = article::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner.id),
        category_id: Set(cat.id),
        title: Set("Pinned post".into()),
        content: Set("Body".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    // FK is RESTRICT: the delete must fail while an article references it
    let res = category::Entity::delete_by_id(cat.id).exec(&db).await;
    assert!(res.is_err());

    article::Entity::delete_by_id(art.id).exec(&db).await?;
    category::Entity::delete_by_id(cat.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}
