mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::storage::{BlobArea, StorageManager};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub storage: Arc<StorageManager>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medivault=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting medivault...");

    // Load configuration
    let config = Arc::new(Config::load()?);
    tracing::info!("Configuration loaded");

    // Initialize database
    let db = Database::new(&config.database.path).await?;
    db.run_migrations().await?;
    tracing::info!("Database initialized");

    let storage = Arc::new(StorageManager::new(&config.storage.root_path()));

    let state = AppState {
        db,
        config: config.clone(),
        storage,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.server.cors_allow_any {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/upload", post(handlers::file::upload_file))
        .route("/upload-metadata", post(handlers::file::save_metadata))
        .route("/files/:email", get(handlers::file::files_by_email))
        .route("/file/:id", delete(handlers::file::delete_file))
        .route("/update-profile", put(handlers::user::update_profile))
        .route("/get-user/:email", get(handlers::user::get_user));

    // Blob areas are served as static content
    let root = config.storage.root_path();
    let uploads = ServeDir::new(root.join(BlobArea::Uploads.dir_name()));
    let profiles = ServeDir::new(root.join(BlobArea::Profiles.dir_name()));

    Router::new()
        .nest("/api/auth", api_routes)
        .nest_service(&BlobArea::Uploads.route(), uploads)
        .nest_service(&BlobArea::Profiles.route(), profiles)
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
