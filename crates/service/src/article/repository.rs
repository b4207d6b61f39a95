use async_trait::async_trait;
use chrono::Utc;
use common::pagination::Pagination;
use models::{article, category, tag};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::article::tags;
use crate::errors::ServiceError;
use crate::validation::{ReferenceCatalog, ValidatedArticle};

/// Persistence seam for articles. `create` and `update` must leave the
/// article row and its tag set consistent: all or nothing.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<article::Model>, ServiceError>;
    async fn list_page(&self, page: Pagination) -> Result<Vec<article::Model>, ServiceError>;
    /// Snapshot of existing category/tag ids for reference validation.
    async fn catalog(&self) -> Result<ReferenceCatalog, ServiceError>;
    async fn create(
        &self,
        owner_id: Uuid,
        data: &ValidatedArticle,
    ) -> Result<article::Model, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        data: &ValidatedArticle,
    ) -> Result<article::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    async fn tag_ids_of(&self, id: Uuid) -> Result<Vec<Uuid>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmArticleRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<article::Model>, ServiceError> {
        article::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list_page(&self, page: Pagination) -> Result<Vec<article::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        article::Entity::find()
            .order_by_desc(article::Column::CreatedAt)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn catalog(&self) -> Result<ReferenceCatalog, ServiceError> {
        let categories = category::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let tags = tag::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .into_iter()
            .map(|t| t.id)
            .collect();
        Ok(ReferenceCatalog { categories, tags })
    }

    async fn create(
        &self,
        owner_id: Uuid,
        data: &ValidatedArticle,
    ) -> Result<article::Model, ServiceError> {
        // One transaction around insert + attach; dropping the txn on any
        // error path rolls both back.
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let now = Utc::now().into();
        let am = article::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            category_id: Set(data.category_id),
            title: Set(data.title.clone()),
            content: Set(data.content.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        tags::attach(&txn, created.id, &data.tags).await?;
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(created)
    }

    async fn update(
        &self,
        id: Uuid,
        data: &ValidatedArticle,
    ) -> Result<article::Model, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let mut am: article::ActiveModel = article::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("article"))?
            .into();
        am.title = Set(data.title.clone());
        am.content = Set(data.content.clone());
        am.category_id = Set(data.category_id);
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        tags::sync(&txn, updated.id, &data.tags).await?;
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        // Junction rows cascade away with the article row
        let res = article::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }

    async fn tag_ids_of(&self, id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
        tags::current(&self.db, id).await
    }
}


/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockArticleRepository {
        pub catalog: ReferenceCatalog,
        articles: Mutex<HashMap<Uuid, article::Model>>,
        tag_sets: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    }

    impl MockArticleRepository {
        pub fn with_catalog(categories: &[Uuid], tags: &[Uuid]) -> Self {
            Self {
                catalog: ReferenceCatalog {
                    categories: categories.iter().copied().collect(),
                    tags: tags.iter().copied().collect(),
                },
                ..Default::default()
            }
        }

        pub fn article_count(&self) -> usize {
            self.articles.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ArticleRepository for MockArticleRepository {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<article::Model>, ServiceError> {
            Ok(self.articles.lock().unwrap().get(&id).cloned())
        }

        async fn list_page(&self, page: Pagination) -> Result<Vec<article::Model>, ServiceError> {
            let (page_idx, per_page) = page.normalize();
            let mut all: Vec<article::Model> =
                self.articles.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(all
                .into_iter()
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .collect())
        }

        async fn catalog(&self) -> Result<ReferenceCatalog, ServiceError> {
            Ok(self.catalog.clone())
        }

        async fn create(
            &self,
            owner_id: Uuid,
            data: &ValidatedArticle,
        ) -> Result<article::Model, ServiceError> {
            let now = Utc::now().into();
            let model = article::Model {
                id: Uuid::new_v4(),
                user_id: owner_id,
                category_id: data.category_id,
                title: data.title.clone(),
                content: data.content.clone(),
                created_at: now,
                updated_at: now,
            };
            self.articles.lock().unwrap().insert(model.id, model.clone());
            self.tag_sets.lock().unwrap().insert(model.id, data.tags.clone());
            Ok(model)
        }

        async fn update(
            &self,
            id: Uuid,
            data: &ValidatedArticle,
        ) -> Result<article::Model, ServiceError> {
            let mut articles = self.articles.lock().unwrap();
            let model = articles.get_mut(&id).ok_or_else(|| ServiceError::not_found("article"))?;
            model.title = data.title.clone();
            model.content = data.content.clone();
            model.category_id = data.category_id;
            model.updated_at = Utc::now().into();
            self.tag_sets.lock().unwrap().insert(id, data.tags.clone());
            Ok(model.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            self.tag_sets.lock().unwrap().remove(&id);
            Ok(self.articles.lock().unwrap().remove(&id).is_some())
        }

        async fn tag_ids_of(&self, id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
            Ok(self.tag_sets.lock().unwrap().get(&id).cloned().unwrap_or_default())
        }
    }
}
