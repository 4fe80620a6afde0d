//! Error responses for the demo surface.
//!
//! Handlers return `ApiError`; the response status and plain-text body
//! come from the error kind. Store failures collapse to a bare 500 so
//! internal detail never reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::WicketError;

/// Error type returned by the demo handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A record with the same key already exists (409).
    #[error("{0} already exists")]
    Conflict(String),

    /// The requested record is missing (404).
    #[error("{0} not found")]
    NotFound(String),

    /// The caller is not authenticated (401).
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// The caller lacks the required rights (403).
    #[error("not allowed: {0}")]
    Forbidden(String),

    /// The submitted input failed validation (422).
    #[error("invalid input: {0}")]
    Unprocessable(String),

    /// Anything the client cannot act on (500).
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<WicketError> for ApiError {
    fn from(err: WicketError) -> Self {
        match err {
            WicketError::AlreadyExists(what) => ApiError::Conflict(what),
            WicketError::NotFound(what) => ApiError::NotFound(what),
            WicketError::Auth(msg) => ApiError::Unauthorized(msg),
            WicketError::Permission(msg) => ApiError::Forbidden(msg),
            WicketError::Validation(e) => ApiError::Unprocessable(e.to_string()),
            WicketError::Password(e) => ApiError::Unprocessable(e.to_string()),
            other => {
                tracing::error!("Internal error: {other}");
                ApiError::Internal
            }
        }
    }
}
