//! Pre-persistence validation for review writes.
//!
//! Checks run in a fixed order: content presence, product association,
//! field length limits, then (on create only) the moderation decision.

use super::entity::CommentPatch;
use super::errors::ReviewError;
use super::store::{CommentStore, ModerationDecision};

/// Maximum stored lengths for author, email and body fields.
///
/// Defaults follow the comment field maxima of the backing storage schema.
#[derive(Debug, Clone)]
pub struct FieldLimits {
    pub author: usize,
    pub author_email: usize,
    pub content: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            author: 245,
            author_email: 100,
            content: 65525,
        }
    }
}

pub struct ReviewValidator {
    limits: FieldLimits,
}

impl ReviewValidator {
    pub fn new(limits: FieldLimits) -> Self {
        Self { limits }
    }

    /// Validate a partial record before it is written.
    ///
    /// On create, returns the initial approval state chosen by the
    /// moderation decision; on update, returns `None`.
    pub async fn validate(
        &self,
        patch: &CommentPatch,
        is_create: bool,
        store: &dyn CommentStore,
    ) -> Result<Option<&'static str>, ReviewError> {
        match &patch.content {
            Some(content) if content.trim().is_empty() => return Err(ReviewError::ContentInvalid),
            None if is_create => return Err(ReviewError::ContentInvalid),
            _ => {}
        }

        if let Some(post_id) = patch.post_id {
            match store.entity_kind(post_id).await? {
                Some(kind) if kind == "product" => {}
                _ => return Err(ReviewError::ProductInvalid),
            }
        }

        self.check_length(patch.author.as_deref(), self.limits.author, "reviewer")?;
        self.check_length(
            patch.author_email.as_deref(),
            self.limits.author_email,
            "reviewer_email",
        )?;
        self.check_length(patch.content.as_deref(), self.limits.content, "review_content")?;

        if !is_create {
            return Ok(None);
        }

        match store.moderate(patch).await? {
            ModerationDecision::Allow(outcome) => Ok(Some(outcome.as_internal())),
            ModerationDecision::Duplicate => Err(ReviewError::DuplicateReview),
            ModerationDecision::Flood => Err(ReviewError::TooManyRequests),
        }
    }

    fn check_length(
        &self,
        value: Option<&str>,
        max: usize,
        field: &str,
    ) -> Result<(), ReviewError> {
        match value {
            Some(v) if v.chars().count() > max => Err(ReviewError::FieldTooLong {
                field: field.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
