//! Error types and HTTP response conversion
//!
//! Handlers never write error responses themselves. They return [`Error`],
//! and the [`IntoResponse`] impl below is the one place where the
//! classification is inspected and turned into a status code and body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Structured Database Errors
// ============================================================================

/// Database operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseOperation {
    /// Establishing a database connection
    Connect,
    /// Liveness check on a freshly established connection
    Ping,
    /// Executing a query
    Query,
    /// Inserting records
    Insert,
}

impl fmt::Display for DatabaseOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Ping => write!(f, "ping"),
            Self::Query => write!(f, "query"),
            Self::Insert => write!(f, "insert"),
        }
    }
}

/// Category of database error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseErrorKind {
    /// Failed to establish connection
    ConnectionFailed,
    /// Record not found
    NotFound,
    /// Query execution failed
    QueryFailed,
    /// Operation timed out
    Timeout,
    /// Other/unknown error
    Other,
}

impl fmt::Display for DatabaseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::NotFound => write!(f, "not_found"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured database error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseError {
    /// The operation being performed when the error occurred
    pub operation: DatabaseOperation,
    /// The category of error
    pub kind: DatabaseErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl DatabaseError {
    /// Create a new database error
    pub fn new(
        operation: DatabaseOperation,
        kind: DatabaseErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(
            DatabaseOperation::Connect,
            DatabaseErrorKind::ConnectionFailed,
            message,
        )
    }

    /// Classify a driver error raised while performing `operation`
    pub fn from_sqlx(operation: DatabaseOperation, err: &sqlx::Error) -> Self {
        let kind = match err {
            sqlx::Error::RowNotFound => DatabaseErrorKind::NotFound,
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) => {
                DatabaseErrorKind::ConnectionFailed
            }
            sqlx::Error::PoolTimedOut => DatabaseErrorKind::Timeout,
            sqlx::Error::Database(_) | sqlx::Error::ColumnDecode { .. } => {
                DatabaseErrorKind::QueryFailed
            }
            _ => DatabaseErrorKind::Other,
        };
        Self::new(operation, kind, err.to_string())
    }
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Database {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for DatabaseError {}

// ============================================================================
// Startup Errors
// ============================================================================

/// Fatal failure while establishing the database connection at startup
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No attempt succeeded before the time budget ran out
    #[error("database connection failed after {timeout:?} timeout")]
    TimedOut {
        /// The configured time budget
        timeout: Duration,
    },

    /// A connection was established but did not answer the liveness check
    #[error("database liveness check failed: {0}")]
    LivenessCheck(DatabaseError),
}

/// Result type alias using the service error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or invalid request input
    #[error("{0}")]
    BadRequest(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Too Many Requests")]
    RateLimitExceeded,

    /// Structured database error with operation context
    #[error("{0}")]
    Database(DatabaseError),

    /// Database connection could not be established at startup
    #[error("{0}")]
    Bootstrap(#[from] BootstrapError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Configuration loaded but holds an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Status code this error was classified with at the point of detection
    ///
    /// `None` means the error is unclassified and must be answered with a
    /// generic 500.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadRequest(_) | Error::NotFound(_) => Some(StatusCode::BAD_REQUEST),
            Error::RateLimitExceeded => Some(StatusCode::TOO_MANY_REQUESTS),
            Error::Database(_)
            | Error::Bootstrap(_)
            | Error::Config(_)
            | Error::InvalidConfig(_)
            | Error::Io(_)
            | Error::Internal(_) => None,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "BAD_REQUEST",
            Error::NotFound(_) => "NOT_FOUND",
            Error::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Bootstrap(_) => "BOOTSTRAP_ERROR",
            Error::Config(_) | Error::InvalidConfig(_) => "CONFIG_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error code
    pub code: &'static str,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.status() {
            Some(StatusCode::TOO_MANY_REQUESTS) => {
                tracing::warn!(status = 429, "Rate limit exceeded");
                let status = StatusCode::TOO_MANY_REQUESTS;
                let text = status.canonical_reason().unwrap_or("Too Many Requests");
                (status, text).into_response()
            }
            Some(status) => {
                tracing::warn!(status = status.as_u16(), "HTTP {} - {}", status.as_u16(), self);
                let body = ErrorResponse::new(status, self.code(), self.to_string());
                (status, Json(body)).into_response()
            }
            None => {
                if let Error::Database(ref e) = self {
                    tracing::error!(
                        operation = %e.operation,
                        kind = %e.kind,
                        "Database error: {}", e.message
                    );
                } else {
                    tracing::error!("Unclassified error: {}", self);
                }
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ErrorResponse::new(status, self.code(), "Internal server error");
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<DatabaseError> for Error {
    fn from(err: DatabaseError) -> Self {
        Error::Database(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("record not found".to_string()),
            other => Error::Database(DatabaseError::from_sqlx(DatabaseOperation::Query, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_errors_are_classified_as_bad_request() {
        assert_eq!(
            Error::BadRequest("bad".to_string()).status(),
            Some(StatusCode::BAD_REQUEST)
        );
        // Missing adverts are a client error, not a 404
        assert_eq!(
            Error::NotFound("advert 1 not found".to_string()).status(),
            Some(StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn test_rate_limit_is_classified() {
        assert_eq!(
            Error::RateLimitExceeded.status(),
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
    }

    #[test]
    fn test_persistence_failures_are_unclassified() {
        let err = Error::Database(DatabaseError::connection_failed("refused"));
        assert_eq!(err.status(), None);
        assert_eq!(Error::Internal("boom".to_string()).status(), None);
    }

    #[test]
    fn test_classified_error_response_keeps_message() {
        let response = Error::BadRequest("there is no sort like title".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unclassified_error_response_is_generic_500() {
        let err = DatabaseError::new(DatabaseOperation::Query, DatabaseErrorKind::Timeout, "slow");
        let response = Error::Database(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bootstrap_timeout_names_duration() {
        let err = Error::from(BootstrapError::TimedOut {
            timeout: Duration::from_secs(30),
        });
        assert_eq!(err.to_string(), "database connection failed after 30s timeout");
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let err = DatabaseError::from_sqlx(DatabaseOperation::Query, &sqlx::Error::RowNotFound);
        assert_eq!(err.kind, DatabaseErrorKind::NotFound);
        assert_eq!(err.operation, DatabaseOperation::Query);
    }

    #[test]
    fn test_missing_row_is_not_found() {
        let err = Error::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let err = DatabaseError::from_sqlx(DatabaseOperation::Connect, &sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, DatabaseErrorKind::Timeout);
    }

    #[test]
    fn test_display_formatting() {
        let err = DatabaseError::new(
            DatabaseOperation::Insert,
            DatabaseErrorKind::QueryFailed,
            "value too long",
        );
        let display = format!("{}", err);
        assert!(display.contains("query_failed"));
        assert!(display.contains("insert"));
        assert!(display.contains("value too long"));
    }
}
