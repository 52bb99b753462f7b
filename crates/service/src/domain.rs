//! Framework-independent inputs and outputs of the question and comment services,
//! plus the parameter parsing rules shared by every transport.

use chrono::{DateTime, FixedOffset};
use models::{comment, question};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub is_anonymous: bool,
    pub source: String,
}

/// Replacement values for an existing question. `title: None` keeps the stored title;
/// `date_updated: None` stamps the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionChanges {
    pub title: Option<String>,
    pub content: String,
    pub is_anonymous: bool,
    pub date_updated: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub question_id: i32,
    pub user_id: String,
    pub content: String,
    pub is_anonymous: bool,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentChanges {
    pub question_id: i32,
    pub comment_id: i32,
    pub content: String,
    pub is_anonymous: bool,
}

/// One FAQ entry: the question plus its comments as labelled records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaqEntry {
    #[serde(flatten)]
    pub question: question::Model,
    pub comments: Vec<comment::Model>,
}

pub fn require(name: &str, value: Option<String>) -> Result<String, ServiceError> {
    value.ok_or_else(|| ServiceError::missing(name))
}

pub fn parse_id(name: &str, value: Option<String>) -> Result<i32, ServiceError> {
    let raw = require(name, value)?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::Validation(format!("`{}` must be an integer id, got `{}`", name, raw)))
}

/// Accepts `0`/`1` as sent by the mobile client, and `true`/`false`.
pub fn parse_flag(name: &str, value: Option<String>) -> Result<bool, ServiceError> {
    let raw = require(name, value)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ServiceError::Validation(format!("`{}` must be 0, 1, true or false, got `{}`", name, raw))),
    }
}

pub fn parse_timestamp(name: &str, value: Option<String>) -> Result<Option<DateTime<FixedOffset>>, ServiceError> {
    match value {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(Some)
            .map_err(|_| ServiceError::Validation(format!("`{}` must be an RFC 3339 timestamp", name))),
    }
}

/// Omitted or blank source falls back to the configured tag.
pub fn resolve_source(source: Option<String>, default_source: &str) -> String {
    match source {
        Some(s) if !s.trim().is_empty() => s,
        _ => default_source.to_string(),
    }
}
