use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Envelope used by endpoints that report an explicit success flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub message: String,
    pub success: bool,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { message: message.into(), success: true }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { message: message.into(), success: false }
    }
}
