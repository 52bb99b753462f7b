#![cfg(test)]
use migration::MigratorTrait;
use models::db::connect_in_memory;
use sea_orm::DatabaseConnection;

use crate::domain::{NewComment, NewQuestion};

/// Fresh in-memory database with the schema applied; isolated per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn new_question(content: &str) -> NewQuestion {
    NewQuestion {
        user_id: "u1".into(),
        title: Some("Side effects".into()),
        content: content.into(),
        is_anonymous: false,
        source: configs::DEFAULT_SOURCE.into(),
    }
}

pub fn new_comment(question_id: i32, content: &str) -> NewComment {
    NewComment {
        question_id,
        user_id: "u2".into(),
        content: content.into(),
        is_anonymous: true,
        source: configs::DEFAULT_SOURCE.into(),
    }
}
