//! Error types and HTTP response conversion

use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::repository::{RepositoryError, RepositoryErrorKind};

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Service error
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Repository error that no action recovered from
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request could not be read
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Page rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "Service is misconfigured",
                    ),
                )
            }

            Error::Repository(ref e) => {
                // Log with structured context
                tracing::error!(
                    operation = %e.operation,
                    kind = %e.kind,
                    entity_type = ?e.entity_type,
                    entity_id = ?e.entity_id,
                    retriable = e.is_retriable(),
                    "Repository error: {}", e.message
                );

                let status = match e.kind {
                    RepositoryErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    RepositoryErrorKind::ConnectionFailed => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                let code = format!("REPOSITORY_{}", e.kind.to_string().to_uppercase());

                // User-facing message (don't expose internal details)
                let user_message = match e.kind {
                    RepositoryErrorKind::Timeout => "Database operation timed out",
                    RepositoryErrorKind::ConnectionFailed => "Database unavailable",
                    _ => "Database operation failed",
                };

                (status, ErrorResponse::with_code(status, code, user_message))
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "I/O operation failed",
                    ),
                )
            }

            Error::BadRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_code(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
                )
            }

            Error::Template(msg) => {
                tracing::error!("Template rendering error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "TEMPLATE_ERROR",
                        "Page could not be rendered",
                    ),
                )
            }

            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<FormRejection> for Error {
    fn from(rejection: FormRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        Error::Template(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::migrate::MigrateError> for Error {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Error::Internal(format!("Database migration failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryOperation;

    #[test]
    fn test_error_response_serialization() {
        let response =
            ErrorResponse::with_code(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Invalid input");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Invalid input\""));
        assert!(json.contains("\"code\":\"BAD_REQUEST\""));
        assert!(json.contains("\"status\":400"));
    }

    #[test]
    fn test_repository_error_status() {
        let timeout: Error =
            RepositoryError::timeout(RepositoryOperation::Fetch, "pool timed out").into();
        assert_eq!(timeout.into_response().status(), StatusCode::GATEWAY_TIMEOUT);

        let failed: Error =
            RepositoryError::database_error(RepositoryOperation::Count, "syntax error").into();
        assert_eq!(failed.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_status() {
        let response = Error::BadRequest("Failed to deserialize form".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_connection_failure_is_unavailable() {
        let failed: Error = RepositoryError::connection_failed("refused").into();
        assert_eq!(failed.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
