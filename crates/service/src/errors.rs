use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("consistency error: {0}")]
    Consistency(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn missing(param: &str) -> Self { Self::Validation(format!("missing required parameter `{}`", param)) }

    pub fn duplicate_content() -> Self { Self::Duplicate("a question with this content already exists".into()) }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::Unique(msg) => ServiceError::Duplicate(msg),
            ModelError::ForeignKey(msg) => ServiceError::NotFound(format!("referenced row not found: {}", msg)),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self { ModelError::from_db(e).into() }
}
