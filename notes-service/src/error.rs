use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for notes-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
///
/// Errors are converted to JSON HTTP responses for API clients. Moderation
/// preconditions get their own variants so callers can react to them without
/// string matching.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("You have already reported this file")]
    AlreadyReported,

    #[error("Invalid report reason: {0}")]
    InvalidReason(String),

    #[error("Report details must be at most {max} characters")]
    DetailsTooLong { max: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Note is not hidden: {0}")]
    NotHidden(String),

    #[error("Report is not pending: {0}")]
    NotPending(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyReported => "ALREADY_REPORTED",
            AppError::InvalidReason(_) => "INVALID_REASON",
            AppError::DetailsTooLong { .. } => "DETAILS_TOO_LONG",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::NotHidden(_) => "NOT_HIDDEN",
            AppError::NotPending(_) => "NOT_PENDING",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AlreadyReported => StatusCode::CONFLICT,
            AppError::InvalidReason(_) => StatusCode::BAD_REQUEST,
            AppError::DetailsTooLong { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotHidden(_) => StatusCode::CONFLICT,
            AppError::NotPending(_) => StatusCode::CONFLICT,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
