//! Status transitions and the delete path.
//!
//! A requested status resolves to one of six storage operations. Requests
//! that already match the current state are no-ops, and unrecognized
//! literals are ignored (logged, not rejected).

use super::entity::StoredComment;
use super::errors::ReviewError;
use super::store::CommentStore;

/// Storage operation realizing a requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Approve,
    Hold,
    Spam,
    Unspam,
    Trash,
    Untrash,
}

impl StatusAction {
    /// Resolve a requested status literal, accepting the synonym spellings
    /// ("approved"/"approve"/"1", "hold"/"0").
    pub fn parse(requested: &str) -> Option<Self> {
        match requested {
            "approved" | "approve" | "1" => Some(StatusAction::Approve),
            "hold" | "0" => Some(StatusAction::Hold),
            "spam" => Some(StatusAction::Spam),
            "unspam" => Some(StatusAction::Unspam),
            "trash" => Some(StatusAction::Trash),
            "untrash" => Some(StatusAction::Untrash),
            _ => None,
        }
    }

    /// Internal state this action lands in, when that is statically known.
    /// Unspam and untrash restore a remembered prior state instead.
    fn target_state(&self) -> Option<&'static str> {
        match self {
            StatusAction::Approve => Some("approve"),
            StatusAction::Hold => Some("hold"),
            StatusAction::Spam => Some("spam"),
            StatusAction::Trash => Some("trash"),
            StatusAction::Unspam | StatusAction::Untrash => None,
        }
    }
}

/// Apply a requested status change, returning whether anything mutated.
///
/// Idempotent: a request matching the current state returns false without
/// touching the store. Unknown literals are ignored rather than rejected,
/// with a warn-level event so the cases are at least visible.
pub async fn apply(
    store: &dyn CommentStore,
    id: i64,
    requested: &str,
    current: &str,
) -> Result<bool, ReviewError> {
    let Some(action) = StatusAction::parse(requested) else {
        tracing::warn!(review_id = id, status = requested, "ignoring unrecognized review status");
        return Ok(false);
    };

    if action.target_state() == Some(current) {
        return Ok(false);
    }

    match action {
        StatusAction::Approve => {
            store.set_approved(id).await?;
            Ok(true)
        }
        StatusAction::Hold => {
            store.set_hold(id).await?;
            Ok(true)
        }
        StatusAction::Spam => {
            store.mark_spam(id).await?;
            Ok(true)
        }
        StatusAction::Unspam => {
            if current != "spam" {
                return Ok(false);
            }
            store.unmark_spam(id).await?;
            Ok(true)
        }
        StatusAction::Trash => {
            Ok(store.trash(id).await?)
        }
        StatusAction::Untrash => {
            if current != "trash" {
                return Ok(false);
            }
            store.untrash(id).await?;
            Ok(true)
        }
    }
}

/// Result of the delete path.
#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Permanent removal; carries a snapshot of the pre-deletion record.
    Deleted(StoredComment),
    /// Reversible move to trash.
    Trashed,
}

/// Delete a review, permanently when `force` is set, otherwise by moving it
/// to trash.
pub async fn delete(
    store: &dyn CommentStore,
    existing: &StoredComment,
    force: bool,
    trash_enabled: bool,
) -> Result<DeleteOutcome, ReviewError> {
    if force {
        let snapshot = existing.clone();
        store.delete(existing.comment_id).await?;
        return Ok(DeleteOutcome::Deleted(snapshot));
    }

    if !trash_enabled {
        return Err(ReviewError::TrashUnsupported);
    }
    if existing.approved == "trash" {
        return Err(ReviewError::AlreadyTrashed);
    }
    if !store.trash(existing.comment_id).await? {
        return Err(ReviewError::DeleteFailed);
    }
    Ok(DeleteOutcome::Trashed)
}
