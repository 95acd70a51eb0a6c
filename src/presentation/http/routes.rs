use super::{
    handlers::{health, reviews},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{Router, middleware, routing::get};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Reviews CRUD
        .route(
            "/api/v1/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/api/v1/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
