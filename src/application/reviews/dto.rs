use crate::domain::review::entity::{Review, ReviewFields};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

/// Body of `POST /reviews`.
///
/// `id` is only present so that supplying one can be rejected; reviews
/// cannot be created with a pre-assigned id.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct CreateReviewRequest {
    pub id: Option<i64>,
    pub product_id: Option<i64>,
    pub review: Option<String>,
    pub reviewer: Option<String>,
    #[validate(email)]
    pub reviewer_email: Option<String>,
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i32>,
    pub date_created: Option<String>,
    pub date_created_gmt: Option<String>,
}

/// Body of `PUT/PATCH /reviews/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export)]
pub struct UpdateReviewRequest {
    pub product_id: Option<i64>,
    pub review: Option<String>,
    pub reviewer: Option<String>,
    #[validate(email)]
    pub reviewer_email: Option<String>,
    #[validate(range(min = 0, max = 5))]
    pub rating: Option<i32>,
    pub status: Option<String>,
    pub date_created: Option<String>,
    pub date_created_gmt: Option<String>,
}

impl CreateReviewRequest {
    pub fn fields(&self) -> ReviewFields {
        ReviewFields {
            product_id: self.product_id,
            review: self.review.clone(),
            reviewer: self.reviewer.clone(),
            reviewer_email: self.reviewer_email.clone(),
            date_created: self.date_created.clone(),
            date_created_gmt: self.date_created_gmt.clone(),
        }
    }
}

impl UpdateReviewRequest {
    pub fn fields(&self) -> ReviewFields {
        ReviewFields {
            product_id: self.product_id,
            review: self.review.clone(),
            reviewer: self.reviewer.clone(),
            reviewer_email: self.reviewer_email.clone(),
            date_created: self.date_created.clone(),
            date_created_gmt: self.date_created_gmt.clone(),
        }
    }
}

/// Query string of `GET /reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListReviewsQuery {
    pub reviewer: Option<String>,
    pub reviewer_email: Option<String>,
    /// Comma-separated reviewer names to exclude
    pub reviewer_exclude: Option<String>,
    /// Comma-separated review ids to exclude
    pub exclude: Option<String>,
    /// Comma-separated review ids to restrict the result to
    pub include: Option<String>,
    pub offset: Option<i64>,
    #[serde(default = "default_order")]
    pub order: String,
    #[serde(default = "default_orderby")]
    pub orderby: String,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default = "default_page")]
    pub page: i64,
    pub product: Option<i64>,
    pub search: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

fn default_order() -> String {
    "desc".to_string()
}

fn default_orderby() -> String {
    "date".to_string()
}

fn default_per_page() -> i64 {
    10
}

fn default_page() -> i64 {
    1
}

fn default_status() -> String {
    "approved".to_string()
}

/// Response of a forced delete: the removal is irreversible, so the body
/// carries a snapshot of the record as it was.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct DeletedReviewResponse {
    pub deleted: bool,
    pub previous: Review,
}
