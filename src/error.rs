//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (unknown id, bad args, bad dates, bad config)
//! - 4: Operation failed (io, serialization, timeout)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // Domain errors (exit code 2)
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config file already exists: {0}")]
    ConfigExists(PathBuf),

    // Operation failures (exit code 4)
    #[error("Store operation timed out after {timeout_ms}ms: {op}")]
    Timeout { op: &'static str, timeout_ms: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::TaskNotFound(_)
            | Error::CategoryNotFound(_)
            | Error::InvalidCategory(_)
            | Error::InvalidDate(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::ConfigExists(_) => exit_codes::USER_ERROR,

            Error::Timeout { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// True for lookups of an id that no live record has.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TaskNotFound(_) | Error::CategoryNotFound(_))
    }

    /// Stable machine-readable kind, used by the JSON envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::TaskNotFound(_) | Error::CategoryNotFound(_) => "not_found",
            Error::InvalidCategory(_) => "invalid_category",
            Error::InvalidDate(_) => "invalid_date",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::InvalidConfig(_) | Error::ConfigExists(_) => "invalid_config",
            Error::Timeout { .. } => "timeout",
            Error::Io(_) | Error::Json(_) | Error::TomlParse(_) | Error::TomlSerialize(_) => {
                "operation_failed"
            }
        }
    }

    /// Structured details for JSON output, when the variant carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) | Error::CategoryNotFound(id) => {
                Some(serde_json::json!({ "id": id }))
            }
            Error::InvalidCategory(name) => Some(serde_json::json!({ "category": name })),
            Error::Timeout { op, timeout_ms } => Some(serde_json::json!({
                "op": op,
                "timeout_ms": timeout_ms,
            })),
            Error::ConfigExists(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub kind: &'static str,
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            kind: err.kind(),
            code: err.exit_code(),
            details: err.details(),
        }
    }
}
