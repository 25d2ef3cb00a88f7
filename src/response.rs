//! HTTP error contract for handlers built on top of [`WordStore`].
//!
//! [`WordStore`]: crate::db::WordStore

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            is_operational: false,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    fn operational(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            is_operational: true,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => Self::validation(message),
            StoreError::NotFound(_) => Self::not_found(err.to_string()),
            StoreError::Conflict(_) => Self::conflict(err.to_string()),
            StoreError::Init(_) | StoreError::Storage(_) => {
                tracing::error!(error = %err, "word store failure");
                Self::internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            "internal server error".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}
