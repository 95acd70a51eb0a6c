use crate::domain::review::{
    entity::{CommentPatch, StoredComment},
    errors::ReviewError,
    store::{
        CommentPage, CommentStore, MetadataStore, ModerationDecision, ModerationOutcome, OrderBy,
        ReviewQuery,
    },
};
use crate::domain::shared::pagination::total_pages;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const SELECT_COLUMNS: &str = "comment_id, post_id, author, author_email, author_ip, \
     author_user_agent, content, approved, date, date_gmt";

const TRASH_STATUS_META_KEY: &str = "_trash_previous_status";
const SPAM_STATUS_META_KEY: &str = "_spam_previous_status";

/// Content with this many links or more is held for moderation.
const LINK_HOLD_THRESHOLD: usize = 2;

pub struct SqlxCommentStore {
    pool: PgPool,
    flood_interval_seconds: i64,
}

impl SqlxCommentStore {
    pub fn new(pool: PgPool, flood_interval_seconds: i64) -> Self {
        Self {
            pool,
            flood_interval_seconds,
        }
    }

    fn storage(e: sqlx::Error) -> ReviewError {
        ReviewError::Storage(e.to_string())
    }

    async fn set_state(&self, id: i64, state: &str) -> Result<(), ReviewError> {
        sqlx::query("UPDATE comments SET approved = $2 WHERE comment_id = $1")
            .bind(id)
            .bind(state)
            .execute(&self.pool)
            .await
            .map_err(Self::storage)?;
        Ok(())
    }

    async fn remember_state(&self, id: i64, key: &str) -> Result<(), ReviewError> {
        sqlx::query(
            "INSERT INTO comment_meta (comment_id, meta_key, meta_value)
             SELECT comment_id, $2, approved FROM comments WHERE comment_id = $1
             ON CONFLICT (comment_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value",
        )
        .bind(id)
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(Self::storage)?;
        Ok(())
    }

    async fn restore_state(&self, id: i64, key: &str) -> Result<(), ReviewError> {
        let previous: Option<String> = sqlx::query_scalar(
            "SELECT meta_value FROM comment_meta WHERE comment_id = $1 AND meta_key = $2",
        )
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::storage)?;

        self.set_state(id, previous.as_deref().unwrap_or("hold"))
            .await?;

        sqlx::query("DELETE FROM comment_meta WHERE comment_id = $1 AND meta_key = $2")
            .bind(id)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(Self::storage)?;
        Ok(())
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ReviewQuery) {
        if filter.status != "all" {
            qb.push(" AND approved = ").push_bind(filter.status.clone());
        }
        if let Some(reviewer) = &filter.reviewer {
            qb.push(" AND author = ").push_bind(reviewer.clone());
        }
        if let Some(email) = &filter.reviewer_email {
            qb.push(" AND author_email = ").push_bind(email.clone());
        }
        if !filter.reviewer_exclude.is_empty() {
            qb.push(" AND author <> ALL(")
                .push_bind(filter.reviewer_exclude.clone())
                .push(")");
        }
        if !filter.include.is_empty() {
            qb.push(" AND comment_id = ANY(")
                .push_bind(filter.include.clone())
                .push(")");
        }
        if !filter.exclude.is_empty() {
            qb.push(" AND comment_id <> ALL(")
                .push_bind(filter.exclude.clone())
                .push(")");
        }
        if let Some(product) = filter.product {
            qb.push(" AND post_id = ").push_bind(product);
        }
        if let Some(search) = &filter.search {
            let like = format!("%{}%", search);
            qb.push(" AND (content ILIKE ");
            qb.push_bind(like.clone());
            qb.push(" OR author ILIKE ");
            qb.push_bind(like);
            qb.push(")");
        }
        if let Some(before) = filter.before {
            qb.push(" AND date_gmt < ").push_bind(before);
        }
        if let Some(after) = filter.after {
            qb.push(" AND date_gmt > ").push_bind(after);
        }
    }
}

#[async_trait]
impl CommentStore for SqlxCommentStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<StoredComment>, ReviewError> {
        sqlx::query_as::<_, StoredComment>(&format!(
            "SELECT {SELECT_COLUMNS} FROM comments WHERE comment_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::storage)
    }

    async fn insert(
        &self,
        patch: &CommentPatch,
        approved: &str,
    ) -> Result<StoredComment, ReviewError> {
        sqlx::query_as::<_, StoredComment>(&format!(
            "INSERT INTO comments (
                post_id, author, author_email, author_ip, author_user_agent,
                content, approved, date, date_gmt
             ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                COALESCE($8, (NOW() AT TIME ZONE 'utc')),
                COALESCE($9, (NOW() AT TIME ZONE 'utc'))
             )
             RETURNING {SELECT_COLUMNS}"
        ))
        .bind(patch.post_id.unwrap_or_default())
        .bind(patch.author.clone().unwrap_or_default())
        .bind(patch.author_email.clone().unwrap_or_default())
        .bind(patch.author_ip.clone())
        .bind(patch.author_user_agent.clone())
        .bind(patch.content.clone().unwrap_or_default())
        .bind(approved)
        .bind(patch.date)
        .bind(patch.date_gmt)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::storage)
    }

    async fn update(&self, id: i64, patch: &CommentPatch) -> Result<StoredComment, ReviewError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE comments SET comment_id = comment_id");
        if let Some(post_id) = patch.post_id {
            qb.push(", post_id = ").push_bind(post_id);
        }
        if let Some(author) = &patch.author {
            qb.push(", author = ").push_bind(author.clone());
        }
        if let Some(email) = &patch.author_email {
            qb.push(", author_email = ").push_bind(email.clone());
        }
        if let Some(content) = &patch.content {
            qb.push(", content = ").push_bind(content.clone());
        }
        if let Some(date) = patch.date {
            qb.push(", date = ").push_bind(date);
        }
        if let Some(date_gmt) = patch.date_gmt {
            qb.push(", date_gmt = ").push_bind(date_gmt);
        }
        qb.push(" WHERE comment_id = ").push_bind(id);
        qb.push(format!(" RETURNING {SELECT_COLUMNS}"));

        qb.build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::storage)?
            .ok_or(ReviewError::NotFound)
    }

    async fn query(&self, filter: &ReviewQuery) -> Result<CommentPage, ReviewError> {
        let mut items_qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SELECT_COLUMNS} FROM comments WHERE 1=1"
        ));
        Self::push_filters(&mut items_qb, filter);

        let direction = if filter.order_desc { "DESC" } else { "ASC" };
        let order_column = match filter.orderby {
            OrderBy::Date => "date",
            OrderBy::DateGmt => "date_gmt",
            OrderBy::Id => "comment_id",
            OrderBy::Product => "post_id",
        };
        items_qb.push(format!(
            " ORDER BY {order_column} {direction}, comment_id {direction}"
        ));
        items_qb
            .push(" LIMIT ")
            .push_bind(filter.per_page.clamp(1, 100))
            .push(" OFFSET ")
            .push_bind(filter.effective_offset());

        let items: Vec<StoredComment> = items_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(Self::storage)?;

        let mut count_qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*)::bigint FROM comments WHERE 1=1",
        );
        Self::push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(Self::storage)?;

        Ok(CommentPage {
            items,
            total,
            total_pages: total_pages(total, filter.per_page),
        })
    }

    async fn set_approved(&self, id: i64) -> Result<(), ReviewError> {
        self.set_state(id, "approve").await
    }

    async fn set_hold(&self, id: i64) -> Result<(), ReviewError> {
        self.set_state(id, "hold").await
    }

    async fn mark_spam(&self, id: i64) -> Result<(), ReviewError> {
        self.remember_state(id, SPAM_STATUS_META_KEY).await?;
        self.set_state(id, "spam").await
    }

    async fn unmark_spam(&self, id: i64) -> Result<(), ReviewError> {
        self.restore_state(id, SPAM_STATUS_META_KEY).await
    }

    async fn trash(&self, id: i64) -> Result<bool, ReviewError> {
        self.remember_state(id, TRASH_STATUS_META_KEY).await?;
        let result = sqlx::query(
            "UPDATE comments SET approved = 'trash' WHERE comment_id = $1 AND approved <> 'trash'",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Self::storage)?;
        Ok(result.rows_affected() == 1)
    }

    async fn untrash(&self, id: i64) -> Result<(), ReviewError> {
        self.restore_state(id, TRASH_STATUS_META_KEY).await
    }

    async fn delete(&self, id: i64) -> Result<(), ReviewError> {
        sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Self::storage)?;
        Ok(())
    }

    async fn approval_status(&self, id: i64) -> Result<Option<String>, ReviewError> {
        sqlx::query_scalar("SELECT approved FROM comments WHERE comment_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::storage)
    }

    async fn entity_kind(&self, post_id: i64) -> Result<Option<String>, ReviewError> {
        sqlx::query_scalar("SELECT kind FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::storage)
    }

    async fn moderate(&self, patch: &CommentPatch) -> Result<ModerationDecision, ReviewError> {
        let email = patch.author_email.clone().unwrap_or_default();

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM comments
                WHERE post_id = $1 AND author_email = $2 AND content = $3
                  AND approved <> 'trash'
             )",
        )
        .bind(patch.post_id.unwrap_or_default())
        .bind(&email)
        .bind(patch.content.clone().unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::storage)?;
        if duplicate {
            return Ok(ModerationDecision::Duplicate);
        }

        let flooding: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM comments
                WHERE (author_email = $1 OR ($2::text IS NOT NULL AND author_ip = $2))
                  AND date_gmt > (NOW() AT TIME ZONE 'utc') - ($3 * INTERVAL '1 second')
             )",
        )
        .bind(&email)
        .bind(patch.author_ip.clone())
        .bind(self.flood_interval_seconds as f64)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::storage)?;
        if flooding {
            return Ok(ModerationDecision::Flood);
        }

        let link_count = patch
            .content
            .as_deref()
            .map(|c| c.matches("http").count())
            .unwrap_or(0);
        if link_count >= LINK_HOLD_THRESHOLD {
            return Ok(ModerationDecision::Allow(ModerationOutcome::Hold));
        }

        Ok(ModerationDecision::Allow(ModerationOutcome::Approve))
    }
}

#[async_trait]
impl MetadataStore for SqlxCommentStore {
    async fn get_meta(&self, id: i64, key: &str) -> Result<Option<String>, ReviewError> {
        sqlx::query_scalar(
            "SELECT meta_value FROM comment_meta WHERE comment_id = $1 AND meta_key = $2",
        )
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::storage)
    }

    async fn set_meta(&self, id: i64, key: &str, value: &str) -> Result<(), ReviewError> {
        sqlx::query(
            "INSERT INTO comment_meta (comment_id, meta_key, meta_value) VALUES ($1, $2, $3)
             ON CONFLICT (comment_id, meta_key) DO UPDATE SET meta_value = EXCLUDED.meta_value",
        )
        .bind(id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(Self::storage)?;
        Ok(())
    }
}
