use sea_orm::{entity::prelude::*, Set, ConnectionTrait, QueryOrder};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, question};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub comment_id: i32,
    pub question_id: i32,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_anonymous: bool,
    pub source: String,
    pub date_created: DateTimeWithTimeZone,
    pub date_updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Question }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Question => Entity::belongs_to(question::Entity)
                .from(Column::QuestionId)
                .to(question::Column::QuestionId)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<question::Entity> for Entity {
    fn to() -> RelationDef { Relation::Question.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_content(content: &str) -> Result<(), errors::ModelError> {
    if content.trim().is_empty() { return Err(errors::ModelError::Validation("content required".into())); }
    Ok(())
}

/// Insert a comment row. Does not touch the parent's counter.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
    user_id: &str,
    content: &str,
    is_anonymous: bool,
    source: &str,
) -> Result<Model, errors::ModelError> {
    question::validate_user_id(user_id)?;
    validate_content(content)?;
    crate::validate_source(source)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        question_id: Set(question_id),
        user_id: Set(user_id.to_string()),
        content: Set(content.to_string()),
        is_anonymous: Set(is_anonymous),
        source: Set(source.to_string()),
        date_created: Set(now),
        date_updated: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from_db)
}

pub async fn list_by_question<C: ConnectionTrait>(db: &C, question_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::QuestionId.eq(question_id))
        .order_by_asc(Column::CommentId)
        .all(db)
        .await
        .map_err(errors::ModelError::from_db)
}
