use reviews_api::{
    application::reviews::{hooks::ReviewHooks, use_case::ReviewService},
    config::Config,
    domain::review::validator::{FieldLimits, ReviewValidator},
    infrastructure::{
        database::pool::create_pool, repositories::sqlx_comment_store::SqlxCommentStore,
    },
    presentation::http::{routes::create_router, state::AppState},
};
use http::{HeaderValue, Method, header};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging with safe environment filter
    // Uses RUST_LOG if set, otherwise uses sensible defaults
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new("info,reviews_api=debug,tower_http=debug")
        })
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env()?;
    let db = create_pool(&config.database_url, config.database_max_connections).await?;
    let mut migrator = sqlx::migrate!("./migrations");
    migrator.set_ignore_missing(config.ignore_missing_migrations);
    migrator.run(&db).await?;

    let store = Arc::new(SqlxCommentStore::new(
        db.clone(),
        config.flood_interval_seconds,
    ));
    let validator = ReviewValidator::new(FieldLimits {
        author: config.max_reviewer_length,
        author_email: config.max_reviewer_email_length,
        content: config.max_content_length,
    });
    let service = Arc::new(ReviewService::new(
        store.clone(),
        store,
        validator,
        Arc::new(ReviewHooks::new()),
        config.site_utc_offset_minutes,
        config.trash_enabled,
    ));

    let state = AppState {
        db,
        config: config.clone(),
        reviews: service,
    };

    // Configure CORS with security in mind
    // In production, specify explicit allowed origins from config
    let cors = if cfg!(debug_assertions) {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(vec![]))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    };

    let app = create_router(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("reviews api listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, initiating graceful shutdown");
        }
    }
}
