use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// External representation of a product review as exposed over the REST
/// surface.
///
/// A review is backed by a generic comment record attached to a product
/// entity. The rating lives in per-record metadata rather than a first-class
/// column, and `verified` reflects the verified-purchase metadata flag.
///
/// # Lifecycle
/// 1. **Created** - submitted via POST, initial status decided by moderation
/// 2. **Updated** - mutated field-by-field, absent fields left untouched
/// 3. **Trashed** - reversible soft-delete
/// 4. **Deleted** - irreversible removal with `force=true`
///
/// # Invariants
/// - `product_id` must reference an entity of kind "product"
/// - `review` is non-empty
/// - `rating` is within 0..=5
/// - `id`, `verified` and the creation timestamps are read-only
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Review {
    /// Unique identifier of the underlying comment record
    pub id: i64,

    /// Product this review is attached to
    pub product_id: i64,

    /// Moderation status in the external vocabulary
    pub status: ReviewStatus,

    /// Display name of the reviewer
    pub reviewer: String,

    /// Email address of the reviewer
    pub reviewer_email: String,

    /// Review body text
    pub review: String,

    /// Star rating, 0 to 5 (0 means unrated)
    pub rating: i32,

    /// Whether the reviewer is a verified purchaser (read-only)
    pub verified: bool,

    /// Creation timestamp in site-local time
    pub date_created: NaiveDateTime,

    /// Creation timestamp in UTC
    pub date_created_gmt: NaiveDateTime,
}

/// Review status in the external vocabulary.
///
/// The storage layer uses "approve" where the REST surface emits "approved";
/// the two are synonyms and the translation happens in the field mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ReviewStatus {
    Approved,
    Hold,
    Spam,
    Trash,
}

impl ReviewStatus {
    /// Translate an internal approval state into the external vocabulary.
    ///
    /// "approve" and the legacy "1" both map to `Approved`; "0" and anything
    /// unrecognized fall back to `Hold`.
    pub fn from_internal(state: &str) -> Self {
        match state {
            "approve" | "approved" | "1" => ReviewStatus::Approved,
            "spam" => ReviewStatus::Spam,
            "trash" => ReviewStatus::Trash,
            _ => ReviewStatus::Hold,
        }
    }

    /// The state literal used by the storage layer.
    pub fn as_internal(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approve",
            ReviewStatus::Hold => "hold",
            ReviewStatus::Spam => "spam",
            ReviewStatus::Trash => "trash",
        }
    }
}

/// Internal storage record, shaped like the generic comment row it lives in.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredComment {
    pub comment_id: i64,
    pub post_id: i64,
    pub author: String,
    pub author_email: String,
    pub author_ip: Option<String>,
    pub author_user_agent: Option<String>,
    pub content: String,
    /// Internal approval state: approve, hold, spam or trash
    pub approved: String,
    /// Site-local creation timestamp
    pub date: NaiveDateTime,
    /// UTC creation timestamp
    pub date_gmt: NaiveDateTime,
}

/// Partial internal record produced by the field mapper.
///
/// Every field is optional: only fields present in the external input are
/// copied, and absent is distinct from present-and-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPatch {
    pub post_id: Option<i64>,
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub author_ip: Option<String>,
    pub author_user_agent: Option<String>,
    pub content: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub date_gmt: Option<NaiveDateTime>,
}

impl CommentPatch {
    /// True when at least one storable field is set.
    pub fn has_changes(&self) -> bool {
        self.post_id.is_some()
            || self.author.is_some()
            || self.author_email.is_some()
            || self.content.is_some()
            || self.date.is_some()
            || self.date_gmt.is_some()
    }
}

/// External review fields as they arrive in a write request, before any
/// mapping. Dates stay raw strings so the mapper can silently drop malformed
/// input.
#[derive(Debug, Clone, Default)]
pub struct ReviewFields {
    pub product_id: Option<i64>,
    pub review: Option<String>,
    pub reviewer: Option<String>,
    pub reviewer_email: Option<String>,
    pub date_created: Option<String>,
    pub date_created_gmt: Option<String>,
}

/// Request-scoped client details recorded alongside a new review.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
