use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body returned by the records gateway when the upstream call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayError {
    pub error: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown employee field: {name}")]
pub struct ParseFieldError {
    pub name: String,
}

impl ParseFieldError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
