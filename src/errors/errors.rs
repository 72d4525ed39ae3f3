use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use std::fmt;

use crate::controllayer::envelope::ApiResponse;
use crate::errors::dberrors::DbError;

/// The bottle operation an error was raised from.
///
/// Used to label business failures the same way on every endpoint
/// (`"On Add Error"`, `"On Fetch Error"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
    Fetch,
}

impl Operation {
    /// Short label carried in the `error` field of business failures
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Add => "On Add Error",
            Operation::Update => "On Update Error",
            Operation::Delete => "On Delete Error",
            Operation::Fetch => "On Fetch Error",
        }
    }

    /// Metric / log name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Fetch => "fetch",
        }
    }
}

/// Main error type for the bottle service
#[derive(Debug)]
pub enum ServiceError {
    // Validation Errors
    ValidationError(validator::ValidationErrors),
    InvalidInput(String),

    // Business Errors
    RecordNotFound(Operation),
    OperationFailed(Operation),

    // Database Errors
    DatabaseError { operation: Operation, reason: String },
    DatabaseConnectionError,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ValidationError(errors) => write!(f, "Validation error: {}", errors),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),

            ServiceError::RecordNotFound(_) => write!(f, "Record not found."),
            ServiceError::OperationFailed(Operation::Add) => {
                write!(f, "An error occured while adding new record.")
            }
            ServiceError::OperationFailed(Operation::Update) => {
                write!(f, "An error occured while updating record.")
            }
            ServiceError::OperationFailed(Operation::Delete) => {
                write!(f, "An error occured while deleting record.")
            }
            ServiceError::OperationFailed(Operation::Fetch) => {
                write!(f, "An error occured while fetching record.")
            }

            ServiceError::DatabaseError { .. } => write!(f, "Internal server error"),
            ServiceError::DatabaseConnectionError => write!(f, "Failed to connect to database"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ServiceError {
    /// Wrap a storage fault raised while running `operation`
    pub fn database(operation: Operation, err: DbError) -> Self {
        ServiceError::DatabaseError {
            operation,
            reason: err.to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ServiceError::ValidationError(_)
            | ServiceError::InvalidInput(_)
            | ServiceError::RecordNotFound(_)
            | ServiceError::OperationFailed(_) => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            ServiceError::DatabaseConnectionError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ServiceError::DatabaseError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for logs and metrics
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::ValidationError(_) => "VALIDATION_ERROR",
            ServiceError::InvalidInput(_) => "INVALID_INPUT",
            ServiceError::RecordNotFound(_) => "RECORD_NOT_FOUND",
            ServiceError::OperationFailed(_) => "OPERATION_FAILED",
            ServiceError::DatabaseError { .. } => "DATABASE_ERROR",
            ServiceError::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",
        }
    }

    /// Convert error to the `errors` payload of the response envelope
    ///
    /// Validation failures expose every failing field with its constraints.
    /// Everything else is reported as `{message, error}`; storage fault
    /// reasons never leave the process.
    pub fn to_details(&self) -> serde_json::Value {
        match self {
            ServiceError::ValidationError(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| serde_json::json!({}))
            }
            ServiceError::InvalidInput(msg) => serde_json::json!({
                "message": msg,
                "error": "Invalid Input",
            }),
            ServiceError::RecordNotFound(op)
            | ServiceError::OperationFailed(op)
            | ServiceError::DatabaseError { operation: op, .. } => serde_json::json!({
                "message": self.to_string(),
                "error": op.label(),
            }),
            ServiceError::DatabaseConnectionError => serde_json::json!({
                "message": self.to_string(),
                "error": "Connection Error",
            }),
        }
    }
}

/// Implement IntoResponse for Axum integration
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::failure(status, self.to_details()).into_response()
    }
}

/// Conversion from validation errors
impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err)
    }
}

/// Type alias for Results using ServiceError
pub type ServiceResult<T> = Result<T, ServiceError>;
