//! sea-orm entities for the Q&A store: `question` owns many `comment` rows.

pub mod errors;
pub mod db;
pub mod question;
pub mod comment;

#[cfg(test)]
mod tests;

/// Column width shared by `user_id` and `source`.
pub const MAX_TAG_LEN: usize = 128;

pub fn validate_source(source: &str) -> Result<(), errors::ModelError> {
    if source.trim().is_empty() { return Err(errors::ModelError::Validation("source must not be blank".into())); }
    if source.len() > MAX_TAG_LEN { return Err(errors::ModelError::Validation("source too long".into())); }
    Ok(())
}
