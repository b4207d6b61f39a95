//! Create `article` table with FKs to `user` (owner) and `category`.
//!
//! Category deletion is restricted while articles still reference it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(uuid(Article::Id).primary_key())
                    .col(uuid(Article::UserId).not_null())
                    .col(uuid(Article::CategoryId).not_null())
                    .col(string_len(Article::Title, 255).not_null())
                    .col(text(Article::Content).not_null())
                    .col(timestamp_with_time_zone(Article::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Article::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_user")
                            .from(Article::Table, Article::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_category")
                            .from(Article::Table, Article::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Article::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Article { Table, Id, UserId, CategoryId, Title, Content, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
