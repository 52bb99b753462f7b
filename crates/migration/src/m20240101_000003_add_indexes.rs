use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Comment: lookups by owning question
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_question")
                    .table(Comment::Table)
                    .col(Comment::QuestionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_comment_question").table(Comment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Comment { Table, QuestionId }
