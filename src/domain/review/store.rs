use super::entity::{CommentPatch, StoredComment};
use super::errors::ReviewError;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Sort key for review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Date,
    DateGmt,
    Id,
    Product,
}

/// Filter set understood by the record-query interface.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    pub reviewer: Option<String>,
    pub reviewer_email: Option<String>,
    pub reviewer_exclude: Vec<String>,
    pub include: Vec<i64>,
    pub exclude: Vec<i64>,
    pub product: Option<i64>,
    pub search: Option<String>,
    /// Internal-vocabulary status filter: all, approve, hold, spam or trash
    pub status: String,
    pub before: Option<NaiveDateTime>,
    pub after: Option<NaiveDateTime>,
    pub per_page: i64,
    pub page: i64,
    /// Overrides the page-derived offset when set
    pub offset: Option<i64>,
    pub order_desc: bool,
    pub orderby: OrderBy,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            reviewer: None,
            reviewer_email: None,
            reviewer_exclude: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            product: None,
            search: None,
            status: "approve".to_string(),
            before: None,
            after: None,
            per_page: 10,
            page: 1,
            offset: None,
            order_desc: true,
            orderby: OrderBy::Date,
        }
    }
}

impl ReviewQuery {
    /// Effective row offset: explicit offset wins over page arithmetic.
    pub fn effective_offset(&self) -> i64 {
        self.offset
            .unwrap_or_else(|| (self.page.max(1) - 1) * self.per_page)
            .max(0)
    }
}

/// One page of matching records plus totals.
#[derive(Debug, Clone)]
pub struct CommentPage {
    pub items: Vec<StoredComment>,
    pub total: i64,
    pub total_pages: i64,
}

/// Initial approval state chosen by the moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationOutcome {
    Approve,
    Hold,
    Spam,
}

impl ModerationOutcome {
    pub fn as_internal(&self) -> &'static str {
        match self {
            ModerationOutcome::Approve => "approve",
            ModerationOutcome::Hold => "hold",
            ModerationOutcome::Spam => "spam",
        }
    }
}

/// Result of the pre-persistence moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationDecision {
    Allow(ModerationOutcome),
    Duplicate,
    Flood,
}

/// Single-record store over the comment-shaped backing table.
///
/// Trash and spam transitions remember the prior approval state so that
/// unspam/untrash can restore it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<StoredComment>, ReviewError>;
    async fn insert(
        &self,
        patch: &CommentPatch,
        approved: &str,
    ) -> Result<StoredComment, ReviewError>;
    async fn update(&self, id: i64, patch: &CommentPatch) -> Result<StoredComment, ReviewError>;
    async fn query(&self, filter: &ReviewQuery) -> Result<CommentPage, ReviewError>;

    async fn set_approved(&self, id: i64) -> Result<(), ReviewError>;
    async fn set_hold(&self, id: i64) -> Result<(), ReviewError>;
    async fn mark_spam(&self, id: i64) -> Result<(), ReviewError>;
    async fn unmark_spam(&self, id: i64) -> Result<(), ReviewError>;
    /// Returns false when the store refuses the move.
    async fn trash(&self, id: i64) -> Result<bool, ReviewError>;
    async fn untrash(&self, id: i64) -> Result<(), ReviewError>;
    async fn delete(&self, id: i64) -> Result<(), ReviewError>;
    async fn approval_status(&self, id: i64) -> Result<Option<String>, ReviewError>;

    /// Kind of the referenced parent entity, e.g. "product".
    async fn entity_kind(&self, post_id: i64) -> Result<Option<String>, ReviewError>;

    /// Duplicate/flood classification applied before the initial insert.
    async fn moderate(&self, patch: &CommentPatch) -> Result<ModerationDecision, ReviewError>;
}

/// Auxiliary key-value metadata keyed by record id (rating, verified flag,
/// remembered pre-trash status).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_meta(&self, id: i64, key: &str) -> Result<Option<String>, ReviewError>;
    async fn set_meta(&self, id: i64, key: &str, value: &str) -> Result<(), ReviewError>;
}
