use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::StatusMessage;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

pub fn status_of(e: &ServiceError) -> StatusCode {
    match e {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Duplicate(_) | ServiceError::Consistency(_) => StatusCode::CONFLICT,
        ServiceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing text; storage details stay in the logs.
fn client_message(e: &ServiceError) -> String {
    match e {
        ServiceError::Validation(m)
        | ServiceError::NotFound(m)
        | ServiceError::Duplicate(m)
        | ServiceError::Consistency(m) => m.clone(),
        ServiceError::Db(_) => "internal server error".to_string(),
    }
}

/// Error response in one of the three body shapes the endpoints use.
#[derive(Debug)]
pub enum ApiError {
    /// Plain text body.
    Text(StatusCode, String),
    /// `{message, success:false}`
    Envelope(StatusCode, String),
    /// `{message}`
    Message(StatusCode, String),
}

impl ApiError {
    fn logged(e: &ServiceError) -> (StatusCode, String) {
        let status = status_of(e);
        if status.is_server_error() {
            error!(error = %e, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %e, "request rejected");
        }
        (status, client_message(e))
    }

    pub fn text(e: ServiceError) -> Self {
        let (status, msg) = Self::logged(&e);
        ApiError::Text(status, msg)
    }

    pub fn envelope(e: ServiceError) -> Self {
        let (status, msg) = Self::logged(&e);
        ApiError::Envelope(status, msg)
    }

    pub fn message(e: ServiceError) -> Self {
        let (status, msg) = Self::logged(&e);
        ApiError::Message(status, msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Text(status, msg) => (status, msg).into_response(),
            ApiError::Envelope(status, msg) => (status, Json(StatusMessage::failed(msg))).into_response(),
            ApiError::Message(status, msg) => (status, Json(serde_json::json!({ "message": msg }))).into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("migration failed: {0}")]
    Migration(String),
}
