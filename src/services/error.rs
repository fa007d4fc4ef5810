// Service-level error taxonomy
//
// Every failure a handler can surface maps onto one of these variants,
// which in turn map onto a status code and a structured `{code, details}`
// body. Storage errors are logged where they occur and become Internal
// here; nothing is retried.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(details: impl Into<String>) -> Self {
        Self::Validation(details.into())
    }

    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::Unauthorized(details.into())
    }

    pub fn forbidden(details: impl Into<String>) -> Self {
        Self::Forbidden(details.into())
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::NotFound(details.into())
    }

    pub fn conflict(details: impl Into<String>) -> Self {
        Self::Conflict(details.into())
    }

    /// Machine-readable code included in the response body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured failure body returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable details about the failure
    pub details: String,
    /// Debug representation of the error chain; only present in debug builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {:#}", self);
        }

        // Error chains leak internals; expose them in debug builds only
        let stack = if cfg!(debug_assertions) {
            Some(format!("{self:?}"))
        } else {
            None
        };

        let body = ErrorBody {
            code: self.code().to_string(),
            details: self.to_string(),
            stack,
        };

        (status, Json(body)).into_response()
    }
}
