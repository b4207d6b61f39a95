//! Tag association management on the `article_tag` junction.
//!
//! Generic over `ConnectionTrait` so the same functions run inside the
//! transactions opened by the repository.

use std::collections::HashSet;

use models::article_tag;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Current tag ids of an article.
pub async fn current<C: ConnectionTrait>(
    conn: &C,
    article_id: Uuid,
) -> Result<Vec<Uuid>, ServiceError> {
    let rows = article_tag::Entity::find()
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .all(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|r| r.tag_id).collect())
}

/// Attach every tag in `tag_ids` to the article.
pub async fn attach<C: ConnectionTrait>(
    conn: &C,
    article_id: Uuid,
    tag_ids: &[Uuid],
) -> Result<(), ServiceError> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let rows: Vec<article_tag::ActiveModel> = tag_ids
        .iter()
        .map(|tid| article_tag::ActiveModel { article_id: Set(article_id), tag_id: Set(*tid) })
        .collect();
    article_tag::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

/// Replace the article's tag set with `target`: removes tags no longer
/// present, adds new ones, leaves unchanged ones alone.
pub async fn sync<C: ConnectionTrait>(
    conn: &C,
    article_id: Uuid,
    target: &[Uuid],
) -> Result<(), ServiceError> {
    let current: HashSet<Uuid> = current(conn, article_id).await?.into_iter().collect();
    let wanted: HashSet<Uuid> = target.iter().copied().collect();

    let to_remove: Vec<Uuid> = current.difference(&wanted).copied().collect();
    if !to_remove.is_empty() {
        article_tag::Entity::delete_many()
            .filter(article_tag::Column::ArticleId.eq(article_id))
            .filter(article_tag::Column::TagId.is_in(to_remove))
            .exec(conn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
    }

    let to_add: Vec<Uuid> = wanted.difference(&current).copied().collect();
    attach(conn, article_id, &to_add).await
}

/// Remove every tag association of the article.
pub async fn detach<C: ConnectionTrait>(conn: &C, article_id: Uuid) -> Result<(), ServiceError> {
    article_tag::Entity::delete_many()
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .exec(conn)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}
