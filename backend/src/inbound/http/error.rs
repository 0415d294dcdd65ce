//! HTTP adapter error type.
//!
//! Purpose: give handlers one `Result` error that Actix turns into the
//! service's fixed set of JSON error shapes via [`ResponseError`].

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use super::response::{
    write_bad_request, write_conflict, write_internal_server_error, write_not_found,
    write_unprocessable_entities,
};
use super::validation::ValidationError;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures a handler can end a request with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Malformed or empty request body.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// The addressed user does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The user to create already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    /// One or more fields failed validation.
    #[error("request failed validation on {} field(s)", .0.len())]
    UnprocessableEntity(Vec<ValidationError>),
    /// Infrastructure failure; the detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Convenience constructor for [`ApiError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Convenience constructor for [`ApiError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Convenience constructor for [`ApiError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Convenience constructor for [`ApiError::Internal`].
    pub fn internal(detail: impl ToString) -> Self {
        Self::Internal(detail.to_string())
    }
}

impl From<Vec<ValidationError>> for ApiError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::UnprocessableEntity(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::BadRequest(message) => write_bad_request(message),
            Self::NotFound(message) => write_not_found(message),
            Self::Conflict(message) => write_conflict(message),
            Self::UnprocessableEntity(errors) => write_unprocessable_entities(errors),
            Self::Internal(detail) => write_internal_server_error(detail),
        }
    }
}

#[cfg(test)]
mod tests;
