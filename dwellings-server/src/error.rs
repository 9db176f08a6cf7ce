//! API error type
//!
//! Every failure leaves the server as `{ "error": ..., "details": ... }` with
//! a matching status code.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use shared::response::ErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Server-side failure; `details` carries the underlying cause
    #[error("{message}")]
    Internal {
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl AppError {
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: Some(serde_json::Value::String(cause.to_string())),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<shared::ModelError> for AppError {
    fn from(e: shared::ModelError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, details) = match self {
            Self::Internal { message, details } => {
                tracing::error!(message = %message, details = ?details, "Internal error");
                (message, details)
            }
            other => (other.to_string(), None),
        };
        (status, Json(ErrorBody { error, details })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
