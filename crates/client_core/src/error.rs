use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failure talking to the records backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend responded with status {status}")]
    Status { status: u16 },
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("records backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("draft is invalid: {0}")]
    Validation(ValidationErrors),
}

impl WorkspaceError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            WorkspaceError::Validation(errors) => Some(errors),
            WorkspaceError::Transport(_) => None,
        }
    }
}

#[derive(Debug, Error)]
#[error("workspace store is no longer running")]
pub struct StoreClosed;
