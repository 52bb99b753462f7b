//! Create `comment` table with FK to `question`.
//!
//! Comments are owned by their question; the FK cascades on delete.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(pk_auto(Comment::CommentId))
                    .col(integer(Comment::QuestionId).not_null())
                    .col(string_len(Comment::UserId, 128).not_null())
                    .col(text(Comment::Content).not_null())
                    .col(boolean(Comment::IsAnonymous).not_null())
                    .col(string_len(Comment::Source, 128).not_null())
                    .col(timestamp_with_time_zone(Comment::DateCreated).not_null())
                    .col(timestamp_with_time_zone(Comment::DateUpdated).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_question")
                            .from(Comment::Table, Comment::QuestionId)
                            .to(Question::Table, Question::QuestionId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comment {
    Table,
    CommentId,
    QuestionId,
    UserId,
    Content,
    IsAnonymous,
    Source,
    DateCreated,
    DateUpdated,
}

#[derive(DeriveIden)]
enum Question { Table, QuestionId }
