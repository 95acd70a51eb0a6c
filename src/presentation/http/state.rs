use crate::{application::reviews::use_case::ReviewService, config::Config};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub reviews: Arc<ReviewService>,
}
