use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a Session API payload does not carry what the game needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("response is not valid JSON: {0}")]
    Decode(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("scenario has {count} options, expected between {min} and {max}")]
    OptionCount { count: usize, min: usize, max: usize },
    #[error("duplicate option label `{0}`")]
    DuplicateOption(String),
    #[error("correct answer `{0}` matches no option")]
    UnknownCorrectAnswer(String),
}

impl ProtocolError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Error body returned by the backend on non-success statuses (`{"detail": ...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    /// Best-effort human readable detail; falls back to the raw body.
    pub fn describe(raw: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(raw) {
            Ok(ApiErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(body) => body.detail.to_string(),
            Err(_) => raw.trim().to_string(),
        }
    }
}
