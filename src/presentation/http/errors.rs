//! HTTP error handling and response conversion.
//!
//! Domain failures are raised as typed errors at the point of detection and
//! converted here, at the request boundary, to a structured JSON body with a
//! stable string code plus the matching HTTP status.

use crate::domain::review::errors::ReviewError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Typed review-domain failure; carries its own taxonomy.
    Review(ReviewError),

    /// Request shape failed validation (400).
    BadRequest(String),

    /// Capability check denied the request (403).
    Forbidden(String),

    /// Unclassified internal error (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Review(err) => write!(f, "{}", err),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Review(err) => match err {
                ReviewError::NotFound | ReviewError::ProductInvalid => StatusCode::NOT_FOUND,
                ReviewError::ContentInvalid
                | ReviewError::FieldTooLong { .. }
                | ReviewError::CannotCreateExisting => StatusCode::BAD_REQUEST,
                ReviewError::DuplicateReview => StatusCode::CONFLICT,
                // Flood control answers 400, not 429; clients key off the
                // review_flood code.
                ReviewError::TooManyRequests => StatusCode::BAD_REQUEST,
                ReviewError::TrashUnsupported => StatusCode::NOT_IMPLEMENTED,
                ReviewError::AlreadyTrashed => StatusCode::GONE,
                ReviewError::DeleteFailed | ReviewError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code carried in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Review(err) => err.code(),
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden(_) => "forbidden",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Get a user-safe error message (without implementation details).
    fn user_message(&self) -> String {
        match self {
            Self::Review(ReviewError::Storage(_)) => "Storage operation failed".into(),
            Self::Review(err) => err.to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Forbidden(_) => "Access denied".into(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "code": self.code(), "message": self.user_message() });

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::NOT_IMPLEMENTED => {
                tracing::error!("error={}", self);
            }
            StatusCode::BAD_REQUEST
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
            | StatusCode::CONFLICT
            | StatusCode::GONE => {
                tracing::warn!("error={}", self);
            }
            _ => {
                tracing::info!("error={}", self);
            }
        }

        (status, Json(body)).into_response()
    }
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        AppError::Review(err)
    }
}
