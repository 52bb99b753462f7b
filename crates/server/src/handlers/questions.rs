use axum::{
    extract::{Query, State},
    Json,
};
use common::types::StatusMessage;
use serde::Serialize;
use service::{domain::FaqEntry, errors::ServiceError, question_service};
use tracing::info;

use crate::errors::ApiError;
use crate::params::{AddQuestionParams, QuestionIdParams, UpdateQuestionParams};
use crate::state::AppState;

/// A question's columns plus the status fields clients branch on.
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    #[serde(flatten)]
    pub question: models::question::Model,
    pub message: &'static str,
    pub success: bool,
}

#[utoipa::path(
    post, path = "/add_question", tag = "questions",
    params(AddQuestionParams),
    responses(
        (status = 200, description = "Question successfully created", body = crate::openapi::StatusMessageDoc),
        (status = 400, description = "Missing information", body = crate::openapi::StatusMessageDoc),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "This question already exists", body = crate::openapi::StatusMessageDoc)
    )
)]
pub async fn add_question(
    State(state): State<AppState>,
    Query(params): Query<AddQuestionParams>,
) -> Result<Json<StatusMessage>, ApiError> {
    let input = params
        .into_input(&state.default_source)
        .map_err(ApiError::envelope)?;
    let created = question_service::create_question(&state.db, input)
        .await
        .map_err(ApiError::envelope)?;
    info!(question_id = created.question_id, "add_question");
    Ok(Json(StatusMessage::ok("Question successfully created!")))
}

#[utoipa::path(
    get, path = "/get_question", tag = "questions",
    params(QuestionIdParams),
    responses(
        (status = 200, description = "Question fields with message and success flag"),
        (status = 400, description = "Missing or malformed question_id"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn get_question(
    State(state): State<AppState>,
    Query(params): Query<QuestionIdParams>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question_id = params.question_id().map_err(ApiError::message)?;
    match question_service::get_question(&state.db, question_id).await {
        Ok(Some(question)) => Ok(Json(QuestionResponse {
            question,
            message: "Successfully retrieved question.",
            success: true,
        })),
        Ok(None) => Err(ApiError::message(ServiceError::not_found("question"))),
        Err(e) => Err(ApiError::message(e)),
    }
}

#[utoipa::path(
    get, path = "/get_faqs", tag = "questions",
    responses(
        (status = 200, description = "Up to ten questions by ascending id, each with its comments"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_faqs(State(state): State<AppState>) -> Result<Json<Vec<FaqEntry>>, ApiError> {
    let faqs = question_service::get_faqs(&state.db)
        .await
        .map_err(ApiError::message)?;
    Ok(Json(faqs))
}

#[utoipa::path(
    put, path = "/update_question", tag = "questions",
    params(UpdateQuestionParams),
    responses(
        (status = 200, description = "Question successfully updated"),
        (status = 400, description = "Missing information"),
        (status = 404, description = "No question with this id"),
        (status = 409, description = "Content already used by another question")
    )
)]
pub async fn update_question(
    State(state): State<AppState>,
    Query(params): Query<UpdateQuestionParams>,
) -> Result<&'static str, ApiError> {
    let (question_id, changes) = params.into_input().map_err(ApiError::text)?;
    question_service::update_question(&state.db, question_id, changes)
        .await
        .map_err(ApiError::text)?;
    Ok("Question successfully updated!")
}

#[utoipa::path(
    delete, path = "/delete_question", tag = "questions",
    params(QuestionIdParams),
    responses(
        (status = 200, description = "Question and its comments deleted"),
        (status = 400, description = "Missing information"),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn delete_question(
    State(state): State<AppState>,
    Query(params): Query<QuestionIdParams>,
) -> Result<String, ApiError> {
    let question_id = params.question_id().map_err(ApiError::text)?;
    let removed = question_service::delete_question(&state.db, question_id)
        .await
        .map_err(ApiError::text)?;
    Ok(format!("Question successfully deleted! ({} comments removed)", removed))
}
