use std::sync::Arc;

use common::pagination::Pagination;
use models::{article, user};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::article::repository::ArticleRepository;
use crate::errors::ServiceError;
use crate::policy;
use crate::validation::{self, ArticleInput};

/// Application service for articles: authorize, validate, then persist.
/// The acting user is always an explicit parameter.
pub struct ArticleService<R: ArticleRepository> {
    repo: Arc<R>,
}

impl<R: ArticleRepository> ArticleService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<article::Model>, ServiceError> {
        self.repo.list_page(page).await
    }

    /// Article plus its tag ids, or `None` when the id is unknown.
    pub async fn show(
        &self,
        id: Uuid,
    ) -> Result<Option<(article::Model, Vec<Uuid>)>, ServiceError> {
        match self.repo.find_by_id(id).await? {
            Some(a) => {
                let tags = self.repo.tag_ids_of(a.id).await?;
                Ok(Some((a, tags)))
            }
            None => Ok(None),
        }
    }

    /// Create an article owned by `actor` and attach its tag set.
    /// Any owner hint in the input is ignored; the actor is the owner.
    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id))]
    pub async fn store(
        &self,
        actor: &user::Model,
        input: &ArticleInput,
    ) -> Result<article::Model, ServiceError> {
        if !policy::can_create(actor) {
            return Err(ServiceError::forbidden());
        }
        let catalog = self.repo.catalog().await?;
        let data = validation::validate_article(input, &catalog).map_err(ServiceError::Invalid)?;
        let created = self.repo.create(actor.id, &data).await?;
        info!(article_id = %created.id, owner_id = %actor.id, tags = data.tags.len(), "article_created");
        Ok(created)
    }

    /// Overwrite title/content/category and sync the tag set.
    /// Concurrent updates race on the tag set; last sync wins.
    #[instrument(skip(self, actor, input), fields(actor_id = %actor.id, article_id = %id))]
    pub async fn update(
        &self,
        actor: &user::Model,
        id: Uuid,
        input: &ArticleInput,
    ) -> Result<article::Model, ServiceError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("article"))?;
        if !policy::can_edit(actor, &existing) {
            return Err(ServiceError::forbidden());
        }
        let catalog = self.repo.catalog().await?;
        let data = validation::validate_article(input, &catalog).map_err(ServiceError::Invalid)?;
        let updated = self.repo.update(id, &data).await?;
        info!(article_id = %updated.id, "article_updated");
        Ok(updated)
    }

    /// Delete the article; its tag associations cascade away with it.
    /// A second destroy on the same id reports not-found.
    #[instrument(skip(self, actor), fields(actor_id = %actor.id, article_id = %id))]
    pub async fn destroy(&self, actor: &user::Model, id: Uuid) -> Result<(), ServiceError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("article"))?;
        if !policy::can_delete(actor, &existing) {
            return Err(ServiceError::forbidden());
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("article"));
        }
        info!(article_id = %id, "article_deleted");
        Ok(())
    }
}
