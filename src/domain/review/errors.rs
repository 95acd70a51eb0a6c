use thiserror::Error;

/// Typed failures raised by the review domain.
///
/// Each variant carries a stable string code surfaced in error responses so
/// callers can branch without parsing messages.
#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("Invalid review ID")]
    NotFound,
    #[error("Invalid review content")]
    ContentInvalid,
    #[error("Invalid product ID")]
    ProductInvalid,
    #[error("Review field exceeds maximum length: {field}")]
    FieldTooLong { field: String },
    #[error("Duplicate review detected; it looks as though you have already said that")]
    DuplicateReview,
    #[error("You are submitting reviews too quickly, slow down")]
    TooManyRequests,
    #[error("The review does not support trashing")]
    TrashUnsupported,
    #[error("The review has already been trashed")]
    AlreadyTrashed,
    #[error("The review cannot be deleted")]
    DeleteFailed,
    #[error("Cannot create an existing review")]
    CannotCreateExisting,
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ReviewError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::NotFound => "review_invalid_id",
            ReviewError::ContentInvalid => "review_content_invalid",
            ReviewError::ProductInvalid => "product_invalid_id",
            ReviewError::FieldTooLong { .. } => "review_field_length_limit_exceeded",
            ReviewError::DuplicateReview => "review_duplicate",
            ReviewError::TooManyRequests => "review_flood",
            ReviewError::TrashUnsupported => "trash_not_supported",
            ReviewError::AlreadyTrashed => "review_already_trashed",
            ReviewError::DeleteFailed => "review_cannot_delete",
            ReviewError::CannotCreateExisting => "review_exists",
            ReviewError::Storage(_) => "storage_error",
        }
    }
}
