use crate::application::reviews::dto::{
    CreateReviewRequest, DeletedReviewResponse, ListReviewsQuery, UpdateReviewRequest,
};
use crate::domain::review::entity::{ClientMeta, Review};
use crate::domain::review::errors::ReviewError;
use crate::domain::review::store::{OrderBy, ReviewQuery};
use crate::domain::shared::pagination::PaginatedResponse;
use crate::presentation::http::{
    errors::AppError,
    middleware::user::{MODERATE_REVIEWS, require_capability},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

fn extract_client_meta(headers: &HeaderMap) -> ClientMeta {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ClientMeta { ip, user_agent }
}

fn parse_id_list(raw: &Option<String>) -> Result<Vec<i64>, AppError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| AppError::BadRequest(format!("invalid id in list: {}", s)))
        })
        .collect()
}

fn parse_name_list(raw: &Option<String>) -> Vec<String> {
    raw.as_deref()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_bound(raw: &Option<String>, name: &str) -> Result<Option<NaiveDateTime>, AppError> {
    let Some(raw) = raw else { return Ok(None) };
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{} must be an ISO8601 datetime", name)))
}

fn external_status_filter(status: &str) -> Result<String, AppError> {
    match status {
        "all" => Ok("all".to_string()),
        "approved" | "approve" | "1" => Ok("approve".to_string()),
        "hold" | "0" => Ok("hold".to_string()),
        "spam" => Ok("spam".to_string()),
        "trash" => Ok("trash".to_string()),
        _ => Err(AppError::BadRequest(
            "status must be one of all, approved, hold, spam, trash".to_string(),
        )),
    }
}

pub async fn list_reviews(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListReviewsQuery>,
) -> Result<Json<PaginatedResponse<Review>>, AppError> {
    let status = external_status_filter(&params.status)?;
    if status != "approve" {
        require_capability(&headers, &state.config.jwt_secret, MODERATE_REVIEWS)?;
    }

    let order_desc = match params.order.as_str() {
        "desc" => true,
        "asc" => false,
        _ => {
            return Err(AppError::BadRequest(
                "order must be one of asc, desc".to_string(),
            ));
        }
    };
    let orderby = match params.orderby.as_str() {
        "date" => OrderBy::Date,
        "date_gmt" => OrderBy::DateGmt,
        "id" => OrderBy::Id,
        "product" => OrderBy::Product,
        _ => {
            return Err(AppError::BadRequest(
                "orderby must be one of date, date_gmt, id, product".to_string(),
            ));
        }
    };

    let query = ReviewQuery {
        reviewer: params.reviewer.clone(),
        reviewer_email: params.reviewer_email.clone(),
        reviewer_exclude: parse_name_list(&params.reviewer_exclude),
        include: parse_id_list(&params.include)?,
        exclude: parse_id_list(&params.exclude)?,
        product: params.product,
        search: params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        status,
        before: parse_bound(&params.before, "before")?,
        after: parse_bound(&params.after, "after")?,
        per_page: params.per_page.clamp(1, 100),
        page: params.page.max(1),
        offset: params.offset,
        order_desc,
        orderby,
    };

    let page = state.reviews.list(query).await?;
    Ok(Json(page))
}

pub async fn create_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if body.id.is_some() {
        return Err(ReviewError::CannotCreateExisting.into());
    }
    for (name, missing) in [
        ("product_id", body.product_id.is_none()),
        ("review", body.review.is_none()),
        ("reviewer", body.reviewer.is_none()),
        ("reviewer_email", body.reviewer_email.is_none()),
    ] {
        if missing {
            return Err(AppError::BadRequest(format!(
                "missing required field: {}",
                name
            )));
        }
    }

    let client = extract_client_meta(&headers);
    let review = state
        .reviews
        .create(body.fields(), body.rating, client)
        .await?;

    let location = format!("/api/v1/reviews/{}", review.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(review),
    ))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>, AppError> {
    let review = state.reviews.get(id).await?;
    Ok(Json(review))
}

pub async fn update_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    require_capability(&headers, &state.config.jwt_secret, MODERATE_REVIEWS)?;
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let review = state
        .reviews
        .update(id, body.fields(), body.rating, body.status.clone())
        .await?;
    Ok(Json(review))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub force: bool,
}

pub async fn delete_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(params): Query<DeleteQuery>,
) -> Result<impl IntoResponse, AppError> {
    require_capability(&headers, &state.config.jwt_secret, MODERATE_REVIEWS)?;

    use crate::application::reviews::use_case::ReviewDeletion;
    let body = match state.reviews.delete(id, params.force).await? {
        ReviewDeletion::Deleted(previous) => serde_json::to_value(DeletedReviewResponse {
            deleted: true,
            previous,
        }),
        ReviewDeletion::Trashed(review) => serde_json::to_value(review),
    }
    .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(body))
}
