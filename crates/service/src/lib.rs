//! Service layer providing the question and comment operations on top of models.
//! - Every multi-row mutation runs inside one transaction.
//! - The `num_comments` counter is only ever changed by single atomic UPDATE statements.
//! - Fetch-by-id operations return `Option` and callers branch on it.

pub mod errors;
pub mod domain;
pub mod question_service;
pub mod comment_service;
#[cfg(test)]
pub mod test_support;
