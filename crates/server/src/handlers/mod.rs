pub mod comments;
pub mod questions;
