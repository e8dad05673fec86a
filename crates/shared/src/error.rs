use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    CallbackFailed,
    CallbackTimeout,
    InvalidAction,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CallbackFailed => "CALLBACK_FAILED",
            Self::CallbackTimeout => "CALLBACK_TIMEOUT",
            Self::InvalidAction => "INVALID_ACTION",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct RpcFailure {
    pub code: String,
    pub message: String,
}

impl RpcFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<ErrorCode> for RpcFailure {
    fn from(value: ErrorCode) -> Self {
        Self::new(value.as_str(), value.as_str())
    }
}
