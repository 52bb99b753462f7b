//! Create `question` table.
//!
//! `content` doubles as the natural key: two questions may not share it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(pk_auto(Question::QuestionId))
                    .col(string_len(Question::UserId, 128).not_null())
                    .col(string_len_null(Question::Title, 255))
                    .col(text(Question::Content).unique_key().not_null())
                    .col(boolean(Question::IsAnonymous).not_null())
                    .col(string_len(Question::Source, 128).not_null())
                    .col(integer(Question::NumComments).not_null().default(0))
                    .col(timestamp_with_time_zone(Question::DateCreated).not_null())
                    .col(timestamp_with_time_zone(Question::DateUpdated).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Question::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Question {
    Table,
    QuestionId,
    UserId,
    Title,
    Content,
    IsAnonymous,
    Source,
    NumComments,
    DateCreated,
    DateUpdated,
}
