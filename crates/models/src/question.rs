use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{comment, errors};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub question_id: i32,
    pub user_id: String,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", unique)]
    pub content: String,
    pub is_anonymous: bool,
    pub source: String,
    pub num_comments: i32,
    pub date_created: DateTimeWithTimeZone,
    pub date_updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Comments }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Comments => Entity::has_many(comment::Entity).into() }
    }
}

impl Related<comment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Comments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_TITLE_LEN: usize = 255;

pub fn validate_user_id(user_id: &str) -> Result<(), errors::ModelError> {
    if user_id.trim().is_empty() { return Err(errors::ModelError::Validation("user_id required".into())); }
    if user_id.len() > crate::MAX_TAG_LEN { return Err(errors::ModelError::Validation("user_id too long".into())); }
    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), errors::ModelError> {
    if content.trim().is_empty() { return Err(errors::ModelError::Validation("content required".into())); }
    Ok(())
}

pub fn validate_title(title: Option<&str>) -> Result<(), errors::ModelError> {
    match title {
        Some(t) if t.chars().count() > MAX_TITLE_LEN => Err(errors::ModelError::Validation("title too long".into())),
        _ => Ok(()),
    }
}

/// Insert a new question with a zero comment counter and both timestamps set to now.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    title: Option<&str>,
    content: &str,
    is_anonymous: bool,
    source: &str,
) -> Result<Model, errors::ModelError> {
    validate_user_id(user_id)?;
    validate_title(title)?;
    validate_content(content)?;
    crate::validate_source(source)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        user_id: Set(user_id.to_string()),
        title: Set(title.map(str::to_string)),
        content: Set(content.to_string()),
        is_anonymous: Set(is_anonymous),
        source: Set(source.to_string()),
        num_comments: Set(0),
        date_created: Set(now),
        date_updated: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}

/// First question carrying exactly this content, if any.
pub async fn find_by_content<C: ConnectionTrait>(db: &C, content: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Content.eq(content))
        .one(db)
        .await
        .map_err(errors::ModelError::from_db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_content_rejected() {
        assert!(validate_content("   ").is_err());
        assert!(validate_content("Is ibuprofen safe?").is_ok());
    }

    #[test]
    fn user_id_bounds() {
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id(&"u".repeat(129)).is_err());
        assert!(validate_user_id("42").is_ok());
    }

    #[test]
    fn title_is_optional_but_bounded() {
        assert!(validate_title(None).is_ok());
        assert!(validate_title(Some("Dosage")).is_ok());
        assert!(validate_title(Some(&"t".repeat(256))).is_err());
    }
}
