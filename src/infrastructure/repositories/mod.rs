pub mod sqlx_comment_store;
