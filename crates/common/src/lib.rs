//! Shared building blocks for the Q&A service crates: logging setup,
//! response types and the process-wide metrics registry.

pub mod types;
pub mod utils;
pub mod metrics;
