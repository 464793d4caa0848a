use axum::{Json, extract::multipart::MultipartError, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

/// Failure half of the response envelope: `{ success: false, error, details? }`
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Self::not_found("Referenced resource not found")
            }

            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::conflict("Resource already exists")
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                error!("Database pool unavailable: {}", err);
                Self::service_unavailable("Database unavailable")
            }

            other => {
                error!("Storage failure: {:?}", other);
                Self::internal_server_error("Storage failure")
            }
        }
    }
}

impl From<axum::Error> for AppError {
    fn from(err: axum::Error) -> Self {
        error!("Internal error: {:?}", err);
        Self::internal_server_error("Internal server error")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::bad_request("File too large").with_details(err.body_text());
        }
        Self::bad_request("Invalid multipart body").with_details(err.body_text())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        error!("File storage failure: {:?}", err);
        Self::internal_server_error("Failed to store file")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            success: false,
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axum_errors_do_not_leak_their_text() {
        let inner = std::io::Error::other("socket /var/run/internal.sock closed");
        let err = AppError::from(axum::Error::new(inner));

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal server error");
        assert!(err.details.is_none());
    }

    #[test]
    fn validation_errors_keep_their_details() {
        let err = AppError::from(validator::ValidationErrors::new());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.details.is_some());
    }
}
