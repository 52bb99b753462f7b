use axum::{
    extract::{Query, State},
    Json,
};
use service::comment_service;
use tracing::info;

use crate::errors::ApiError;
use crate::params::{AddCommentParams, CommentRefParams, QuestionIdParams, UpdateCommentParams};
use crate::state::AppState;

#[utoipa::path(
    post, path = "/add_comment", tag = "comments",
    params(AddCommentParams),
    responses(
        (status = 200, description = "Comment successfully created"),
        (status = 400, description = "Missing information"),
        (status = 404, description = "No question with this id")
    )
)]
pub async fn add_comment(
    State(state): State<AppState>,
    Query(params): Query<AddCommentParams>,
) -> Result<&'static str, ApiError> {
    let input = params
        .into_input(&state.default_source)
        .map_err(ApiError::text)?;
    let created = comment_service::add_comment(&state.db, input)
        .await
        .map_err(ApiError::text)?;
    info!(comment_id = created.comment_id, question_id = created.question_id, "add_comment");
    Ok("Comment successfully created!")
}

#[utoipa::path(
    get, path = "/get_comments", tag = "comments",
    params(QuestionIdParams),
    responses(
        (status = 200, description = "Comments of the question, oldest first"),
        (status = 400, description = "Missing question_id")
    )
)]
pub async fn get_comments(
    State(state): State<AppState>,
    Query(params): Query<QuestionIdParams>,
) -> Result<Json<Vec<models::comment::Model>>, ApiError> {
    let question_id = params.question_id().map_err(ApiError::text)?;
    let comments = comment_service::get_comments(&state.db, question_id)
        .await
        .map_err(ApiError::text)?;
    Ok(Json(comments))
}

#[utoipa::path(
    put, path = "/update_comment", tag = "comments",
    params(UpdateCommentParams),
    responses(
        (status = 200, description = "Comment successfully updated"),
        (status = 400, description = "Missing information"),
        (status = 404, description = "No such comment"),
        (status = 409, description = "Comment belongs to another question")
    )
)]
pub async fn update_comment(
    State(state): State<AppState>,
    Query(params): Query<UpdateCommentParams>,
) -> Result<&'static str, ApiError> {
    let changes = params.into_input().map_err(ApiError::text)?;
    comment_service::update_comment(&state.db, changes)
        .await
        .map_err(ApiError::text)?;
    Ok("Comment successfully updated!")
}

#[utoipa::path(
    delete, path = "/delete_comment", tag = "comments",
    params(CommentRefParams),
    responses(
        (status = 200, description = "Comment successfully deleted"),
        (status = 400, description = "Missing information"),
        (status = 404, description = "No such comment"),
        (status = 409, description = "Ownership or counter mismatch")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Query(params): Query<CommentRefParams>,
) -> Result<&'static str, ApiError> {
    let (question_id, comment_id) = params.ids().map_err(ApiError::text)?;
    comment_service::delete_comment(&state.db, question_id, comment_id)
        .await
        .map_err(ApiError::text)?;
    Ok("Comment successfully deleted!")
}
