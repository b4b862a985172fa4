//! The caller-visible result of one relayed webhook.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Warning,
    Error,
}

impl OutcomeStatus {
    /// HTTP status the relay answers with for this outcome.
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::Warning => StatusCode::ACCEPTED,
            Self::Error => StatusCode::BAD_REQUEST,
        }
    }
}

/// Also the body of every JSON error the relay produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub status: OutcomeStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<u16>,
}

impl Outcome {
    #[must_use]
    pub fn success(code: u16) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: "Webhook forwarded successfully".into(),
            response_code: Some(code),
        }
    }

    #[must_use]
    pub fn upstream_status(code: u16) -> Self {
        Self {
            status: OutcomeStatus::Warning,
            message: format!("Target server returned status {code}"),
            response_code: Some(code),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Error,
            message: message.into(),
            response_code: None,
        }
    }
}
