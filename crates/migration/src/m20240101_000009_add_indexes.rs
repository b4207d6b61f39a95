use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Category: unique slug
        manager
            .create_index(
                Index::create()
                    .name("uniq_category_slug")
                    .table(Category::Table)
                    .col(Category::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Article: index on category_id and user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_article_category")
                    .table(Article::Table)
                    .col(Article::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_article_user")
                    .table(Article::Table)
                    .col(Article::UserId)
                    .to_owned(),
            )
            .await?;

        // ArticleTag: lookup by tag side (article side is the PK prefix)
        manager
            .create_index(
                Index::create()
                    .name("idx_article_tag_tag")
                    .table(ArticleTag::Table)
                    .col(ArticleTag::TagId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_category_slug").table(Category::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_article_category").table(Article::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_article_user").table(Article::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_article_tag_tag").table(ArticleTag::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Category { Table, Slug }

#[derive(DeriveIden)]
enum Article { Table, CategoryId, UserId }

#[derive(DeriveIden)]
enum ArticleTag { Table, TagId }
