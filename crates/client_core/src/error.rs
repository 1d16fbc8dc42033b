use shared::error::ProtocolError;
use thiserror::Error;

use crate::GamePhase;

/// Failure talking to the Session API. Every variant is absorbed by the
/// controller into local fallback behaviour.
#[derive(Debug, Error)]
pub enum SessionApiError {
    #[error("session api transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("session api returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed session api response: {0}")]
    MalformedResponse(#[from] ProtocolError),
    #[error("session api is unavailable")]
    Unavailable,
}

impl SessionApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionApiError::Transport(err) if err.is_timeout())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error("cannot {operation} while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("option `{0}` is not offered by the current scenario")]
    UnknownOption(String),
    #[error("no scenario available for position {index}")]
    ScenarioUnavailable { index: usize },
}
