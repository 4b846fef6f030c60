//! Error types for org-reports
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Database, Report, Archive)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for org-reports operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for org-reports
///
/// Each variant includes enough context to diagnose the failure and to map it
/// onto an HTTP response.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "bind_address")
        key: Option<String>,
    },

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Report rendering error
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// Archive assembly error
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Constraint violation (e.g., duplicate key)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Report rendering errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested export format is not one of the supported formats
    #[error("unsupported report format '{format}' (expected csv or pdf)")]
    UnsupportedFormat {
        /// The format string supplied by the caller
        format: String,
    },

    /// Encoding the report body failed
    #[error("failed to render {report} report: {reason}")]
    RenderFailed {
        /// Report name (e.g., "member")
        report: String,
        /// The reason rendering failed
        reason: String,
    },
}

/// Archive assembly errors
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Adding an entry to the archive failed
    #[error("failed to add {entry} to archive: {reason}")]
    EntryFailed {
        /// Name of the entry being written
        entry: String,
        /// The reason the write failed
        reason: String,
    },

    /// Finishing the archive (central directory) failed
    #[error("failed to finalize archive: {0}")]
    FinalizeFailed(String),
}

/// API error response format
///
/// Returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "unsupported_format",
///     "message": "report error: unsupported report format 'xls' (expected csv or pdf)",
///     "details": {
///       "format": "xls"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "unsupported_format")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::Report(ReportError::UnsupportedFormat { .. }) => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 500 Internal Server Error - Server-side issues
            Error::Report(ReportError::RenderFailed { .. }) => 500,
            Error::Archive(_) => 500,
            Error::Database(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Database(_) => "database_error",
            Error::Sqlx(_) => "database_error",
            Error::Report(e) => match e {
                ReportError::UnsupportedFormat { .. } => "unsupported_format",
                ReportError::RenderFailed { .. } => "render_failed",
            },
            Error::Archive(e) => match e {
                ArchiveError::EntryFailed { .. } => "archive_entry_failed",
                ArchiveError::FinalizeFailed(_) => "archive_finalize_failed",
            },
            Error::Io(_) => "io_error",
            Error::NotFound(_) => "not_found",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Report(ReportError::UnsupportedFormat { format }) => Some(serde_json::json!({
                "format": format,
            })),
            Error::Report(ReportError::RenderFailed { report, .. }) => Some(serde_json::json!({
                "report": report,
            })),
            Error::Archive(ArchiveError::EntryFailed { entry, .. }) => Some(serde_json::json!({
                "entry": entry,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
