//! Bidirectional translation between the external review representation and
//! the internal comment record.
//!
//! `to_internal` copies only the fields present in the input; nothing is
//! defaulted at this layer. `to_external` always produces a complete review.

use super::entity::{ClientMeta, CommentPatch, Review, ReviewFields, ReviewStatus, StoredComment};
use chrono::{Duration, NaiveDateTime};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Map external review fields onto a partial comment record.
///
/// Date handling: a supplied local timestamp derives its UTC pair through the
/// site offset, and vice versa. Malformed date input drops both fields
/// silently so the storage layer applies its own defaults.
pub fn to_internal(
    fields: &ReviewFields,
    client: Option<&ClientMeta>,
    site_offset_minutes: i32,
) -> CommentPatch {
    let offset = Duration::minutes(site_offset_minutes as i64);

    let (date, date_gmt) = match (&fields.date_created, &fields.date_created_gmt) {
        (Some(local), _) => match parse_datetime(local) {
            Some(local) => (Some(local), Some(local - offset)),
            None => (None, None),
        },
        (None, Some(utc)) => match parse_datetime(utc) {
            Some(utc) => (Some(utc + offset), Some(utc)),
            None => (None, None),
        },
        (None, None) => (None, None),
    };

    CommentPatch {
        post_id: fields.product_id,
        author: fields.reviewer.clone(),
        author_email: fields.reviewer_email.clone(),
        author_ip: client.and_then(|c| c.ip.clone()),
        author_user_agent: client.and_then(|c| c.user_agent.clone()),
        content: fields.review.clone(),
        date,
        date_gmt,
    }
}

/// Map a stored comment back to the external review representation.
pub fn to_external(comment: &StoredComment, rating: i32, verified: bool) -> Review {
    Review {
        id: comment.comment_id,
        product_id: comment.post_id,
        status: ReviewStatus::from_internal(&comment.approved),
        reviewer: comment.author.clone(),
        reviewer_email: comment.author_email.clone(),
        review: comment.content.clone(),
        rating,
        verified,
        date_created: comment.date,
        date_created_gmt: comment.date_gmt,
    }
}
