//! Query-string parameters of each endpoint.
//!
//! Every field is an optional string so that a missing or malformed value
//! surfaces as a validation error with a readable message instead of an
//! extractor rejection.

use serde::Deserialize;
use service::domain::{
    parse_flag, parse_id, parse_timestamp, require, resolve_source, CommentChanges, NewComment, NewQuestion,
    QuestionChanges,
};
use service::errors::ServiceError;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddQuestionParams {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// `0`, `1`, `true` or `false`
    pub is_anonymous: Option<String>,
    pub source: Option<String>,
}

impl AddQuestionParams {
    pub fn into_input(self, default_source: &str) -> Result<NewQuestion, ServiceError> {
        Ok(NewQuestion {
            user_id: require("user_id", self.user_id)?,
            content: require("content", self.content)?,
            is_anonymous: parse_flag("is_anonymous", self.is_anonymous)?,
            title: self.title,
            source: resolve_source(self.source, default_source),
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionIdParams {
    pub question_id: Option<String>,
}

impl QuestionIdParams {
    pub fn question_id(self) -> Result<i32, ServiceError> {
        parse_id("question_id", self.question_id)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateQuestionParams {
    pub question_id: Option<String>,
    /// Omitted keeps the stored title.
    pub title: Option<String>,
    pub content: Option<String>,
    /// RFC 3339; omitted means now.
    pub date_updated: Option<String>,
    pub is_anonymous: Option<String>,
}

impl UpdateQuestionParams {
    pub fn into_input(self) -> Result<(i32, QuestionChanges), ServiceError> {
        let question_id = parse_id("question_id", self.question_id)?;
        let changes = QuestionChanges {
            content: require("content", self.content)?,
            is_anonymous: parse_flag("is_anonymous", self.is_anonymous)?,
            date_updated: parse_timestamp("date_updated", self.date_updated)?,
            title: self.title,
        };
        Ok((question_id, changes))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddCommentParams {
    pub user_id: Option<String>,
    pub question_id: Option<String>,
    pub content: Option<String>,
    pub is_anonymous: Option<String>,
    pub source: Option<String>,
}

impl AddCommentParams {
    pub fn into_input(self, default_source: &str) -> Result<NewComment, ServiceError> {
        Ok(NewComment {
            user_id: require("user_id", self.user_id)?,
            question_id: parse_id("question_id", self.question_id)?,
            content: require("content", self.content)?,
            is_anonymous: parse_flag("is_anonymous", self.is_anonymous)?,
            source: resolve_source(self.source, default_source),
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateCommentParams {
    pub question_id: Option<String>,
    pub comment_id: Option<String>,
    pub content: Option<String>,
    pub is_anonymous: Option<String>,
}

impl UpdateCommentParams {
    pub fn into_input(self) -> Result<CommentChanges, ServiceError> {
        Ok(CommentChanges {
            question_id: parse_id("question_id", self.question_id)?,
            comment_id: parse_id("comment_id", self.comment_id)?,
            content: require("content", self.content)?,
            is_anonymous: parse_flag("is_anonymous", self.is_anonymous)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentRefParams {
    pub question_id: Option<String>,
    pub comment_id: Option<String>,
}

impl CommentRefParams {
    pub fn ids(self) -> Result<(i32, i32), ServiceError> {
        Ok((parse_id("question_id", self.question_id)?, parse_id("comment_id", self.comment_id)?))
    }
}
