//! Application error types.
//!
//! Internal failures use the `thiserror`-derived [`Error`]. At the tool
//! boundary every [`Error`] is folded into a [`ToolError`], the only error
//! shape a caller ever sees.

use rmcp::model::ErrorCode;
use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the astro tool server.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested resource is unavailable or the input was rejected
    /// (maps to [`ToolErrorKind::InvalidInput`]).
    #[error("{0}")]
    InvalidInput(String),

    /// Internal errors (maps to [`ToolErrorKind::Internal`]).
    #[error("{0}")]
    Internal(String),

    /// An upstream request exceeded the configured timeout.
    #[error("{0}")]
    Timeout(String),

    /// Invalid or incomplete configuration, reported at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport errors. The request URL is stripped on conversion
    /// because it carries the upstream API key.
    #[error("{0}")]
    Http(reqwest::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout("upstream request timed out".to_string())
        } else {
            Error::Http(err.without_url())
        }
    }
}

// Convenience constructors
impl Error {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl Error {
    /// Tool-level classification of this error.
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            Error::InvalidInput(_) => ToolErrorKind::InvalidInput,
            _ => ToolErrorKind::Internal,
        }
    }

    /// Fold into a [`ToolError`] whose message is `prefix` followed by this
    /// error's message. The kind is kept, so an invalid-input failure raised
    /// deep in the fetch path still surfaces as invalid input.
    pub fn into_tool_error(self, prefix: &str) -> ToolError {
        ToolError {
            kind: self.kind(),
            message: format!("{prefix}{self}"),
        }
    }
}

// =============================================================================
// Tool errors
// =============================================================================

/// Classification of a failed tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidInput,
    Internal,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::InvalidInput => "invalid_input",
            ToolErrorKind::Internal => "internal",
        }
    }

    /// JSON-RPC error code reported over MCP.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ToolErrorKind::InvalidInput => ErrorCode::INVALID_PARAMS,
            ToolErrorKind::Internal => ErrorCode::INTERNAL_ERROR,
        }
    }
}

/// The single structured error a tool call can end with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::InvalidInput,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            kind: ToolErrorKind::Internal,
            message: msg.into(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ToolError {}

// Implement From<ToolError> for McpError to enable ? in tool handlers
impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        McpError::new(
            err.kind.error_code(),
            err.message,
            Some(serde_json::json!({ "kind": err.kind.as_str() })),
        )
    }
}
