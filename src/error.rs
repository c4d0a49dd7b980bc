/// Unified error types for the retail API
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Bad credentials, or a missing/invalid/expired token
    #[error("{0}")]
    Unauthorized(String),

    /// Lookup miss
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique field (e.g. login identifier)
    #[error("{0}")]
    Conflict(String),

    /// Request body failed validation
    #[error("{0}")]
    Validation(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT encoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Request body rejected");
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                AppError::validation("expected a JSON request body")
            }
            _ => AppError::validation("invalid request body"),
        }
    }
}

/// Error body returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message) = match &self {
            AppError::Unauthorized(msg) => ("Unauthorized", msg.clone()),
            AppError::NotFound(msg) => ("NotFound", msg.clone()),
            AppError::Conflict(msg) => ("Conflict", msg.clone()),
            AppError::Validation(msg) => ("InvalidRequest", msg.clone()),
            _ => {
                // Details stay in the logs
                tracing::error!(error = %self, "request failed with internal error");
                ("InternalServerError", "internal server error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for service operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_domain_errors_keep_their_message() {
        let response = AppError::not_found("account not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "account not found");

        let response = AppError::unauthorized("incorrect credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "incorrect credentials");
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak_details() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "InternalServerError");
        assert_eq!(body["message"], "internal server error");

        let response = AppError::internal("table users is locked").into_response();
        let body = body_json(response).await;
        assert!(!body.to_string().contains("users"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let err = AppError::Conflict("account already exists".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
