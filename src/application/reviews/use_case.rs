use super::hooks::ReviewHooks;
use crate::domain::review::entity::{ClientMeta, Review, ReviewFields, StoredComment};
use crate::domain::review::errors::ReviewError;
use crate::domain::review::mapper;
use crate::domain::review::status::{self, DeleteOutcome};
use crate::domain::review::store::{CommentStore, MetadataStore, ReviewQuery};
use crate::domain::review::validator::ReviewValidator;
use crate::domain::shared::pagination::{PaginatedResponse, total_pages};
use std::sync::Arc;

const RATING_META_KEY: &str = "rating";
const VERIFIED_META_KEY: &str = "verified";

/// Outcome of a delete request, in external representation.
#[derive(Debug, Clone)]
pub enum ReviewDeletion {
    /// Irreversible removal with a snapshot of the prior state.
    Deleted(Review),
    /// Reversible move to trash; carries the trashed record.
    Trashed(Review),
}

/// Orchestrates the review CRUD flow: map, hook, validate, persist,
/// transition, map back.
pub struct ReviewService {
    store: Arc<dyn CommentStore>,
    meta: Arc<dyn MetadataStore>,
    validator: ReviewValidator,
    hooks: Arc<ReviewHooks>,
    site_offset_minutes: i32,
    trash_enabled: bool,
}

impl ReviewService {
    pub fn new(
        store: Arc<dyn CommentStore>,
        meta: Arc<dyn MetadataStore>,
        validator: ReviewValidator,
        hooks: Arc<ReviewHooks>,
        site_offset_minutes: i32,
        trash_enabled: bool,
    ) -> Self {
        Self {
            store,
            meta,
            validator,
            hooks,
            site_offset_minutes,
            trash_enabled,
        }
    }

    pub async fn create(
        &self,
        fields: ReviewFields,
        rating: Option<i32>,
        client: ClientMeta,
    ) -> Result<Review, ReviewError> {
        let patch = mapper::to_internal(&fields, Some(&client), self.site_offset_minutes);
        let patch = self.hooks.run_pre_write(patch)?;

        let approved = self
            .validator
            .validate(&patch, true, self.store.as_ref())
            .await?
            .unwrap_or("hold");

        let stored = self.store.insert(&patch, approved).await?;

        // Rating metadata defaults to "0" when omitted.
        let rating = rating.unwrap_or(0);
        self.meta
            .set_meta(stored.comment_id, RATING_META_KEY, &rating.to_string())
            .await?;
        self.meta
            .set_meta(stored.comment_id, VERIFIED_META_KEY, "0")
            .await?;

        let review = mapper::to_external(&stored, rating, false);
        Ok(self.hooks.run_response(review))
    }

    pub async fn get(&self, id: i64) -> Result<Review, ReviewError> {
        let stored = self.fetch_product_review(id).await?;
        self.render(&stored).await
    }

    pub async fn list(
        &self,
        query: ReviewQuery,
    ) -> Result<PaginatedResponse<Review>, ReviewError> {
        let per_page = query.per_page;
        let page = query.page;
        let page_data = self.store.query(&query).await?;

        let mut items = Vec::with_capacity(page_data.items.len());
        for stored in &page_data.items {
            items.push(self.render(stored).await?);
        }

        Ok(PaginatedResponse {
            items,
            total: page_data.total,
            total_pages: total_pages(page_data.total, per_page),
            page,
            per_page,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        fields: ReviewFields,
        rating: Option<i32>,
        requested_status: Option<String>,
    ) -> Result<Review, ReviewError> {
        let existing = self.fetch_product_review(id).await?;

        let patch = mapper::to_internal(&fields, None, self.site_offset_minutes);
        let patch = self.hooks.run_pre_write(patch)?;
        self.validator
            .validate(&patch, false, self.store.as_ref())
            .await?;

        if patch.has_changes() {
            self.store.update(id, &patch).await?;
        }

        if let Some(requested) = requested_status {
            status::apply(self.store.as_ref(), id, &requested, &existing.approved).await?;
        }

        if let Some(rating) = rating {
            self.meta
                .set_meta(id, RATING_META_KEY, &rating.to_string())
                .await?;
        }

        let refreshed = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound)?;
        self.render(&refreshed).await
    }

    pub async fn delete(&self, id: i64, force: bool) -> Result<ReviewDeletion, ReviewError> {
        let existing = self.fetch_product_review(id).await?;

        // Metadata rows go away with the record, so snapshot them first.
        let rating = self.rating(existing.comment_id).await?;
        let verified = self.verified(existing.comment_id).await?;

        match status::delete(self.store.as_ref(), &existing, force, self.trash_enabled).await? {
            DeleteOutcome::Deleted(snapshot) => {
                let review = mapper::to_external(&snapshot, rating, verified);
                Ok(ReviewDeletion::Deleted(self.hooks.run_response(review)))
            }
            DeleteOutcome::Trashed => {
                let trashed = self
                    .store
                    .find_by_id(id)
                    .await?
                    .ok_or(ReviewError::NotFound)?;
                Ok(ReviewDeletion::Trashed(self.render(&trashed).await?))
            }
        }
    }

    /// Fetch a record and reject ids not attached to a product entity.
    async fn fetch_product_review(&self, id: i64) -> Result<StoredComment, ReviewError> {
        let stored = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(ReviewError::NotFound)?;
        match self.store.entity_kind(stored.post_id).await? {
            Some(kind) if kind == "product" => Ok(stored),
            _ => Err(ReviewError::NotFound),
        }
    }

    async fn render(&self, stored: &StoredComment) -> Result<Review, ReviewError> {
        let rating = self.rating(stored.comment_id).await?;
        let verified = self.verified(stored.comment_id).await?;
        let review = mapper::to_external(stored, rating, verified);
        Ok(self.hooks.run_response(review))
    }

    async fn rating(&self, id: i64) -> Result<i32, ReviewError> {
        Ok(self
            .meta
            .get_meta(id, RATING_META_KEY)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    async fn verified(&self, id: i64) -> Result<bool, ReviewError> {
        Ok(self
            .meta
            .get_meta(id, VERIFIED_META_KEY)
            .await?
            .map(|v| v == "1")
            .unwrap_or(false))
    }
}
