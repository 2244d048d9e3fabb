//! Inclusion Hub Backend
//!
//! REST backend for the disability-inclusion resource hub: catalog listings
//! with filtering and sorting, content management, notification preferences
//! and Tantivy full-text search over a swappable record store.

mod api;
mod catalog;
mod config;
mod db;
mod errors;
mod forms;
mod models;
mod search;
mod seed;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, StoreKind};
use db::{CatalogStore, MemoryStore, SqliteStore};
use search::SearchIndex;
use seed::Seed;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting Inclusion Hub Backend");
    tracing::info!("Store: {:?}", config.store);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(
        "Simulated form latency: {} ms",
        config.simulated_latency.as_millis()
    );

    // Initialize the record store
    let seed = Seed::load()?;
    let store: Arc<dyn CatalogStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new(seed)),
        StoreKind::Sqlite => {
            tracing::info!("Database path: {:?}", config.db_path);
            let pool = db::init_database(&config.db_path).await?;
            Arc::new(SqliteStore::open(pool, seed).await?)
        }
    };

    // Initialize search index
    let search = Arc::new(match &config.index_path {
        Some(path) => SearchIndex::open(path)?,
        None => SearchIndex::in_memory()?,
    });

    // Build initial search index from the store
    tracing::info!("Building search index...");
    let resources = store.list_resources().await?;
    let training = store.list_training().await?;
    search.rebuild(&resources, &training).await?;

    // Create application state
    let state = AppState {
        store,
        search,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    // API routes
    let api_routes = Router::new()
        // Catalog
        .route("/catalog", get(api::get_catalog))
        .route("/catalog/revision", get(api::get_revision))
        // Resources
        .route("/resources", get(api::list_resources))
        .route("/resources", post(api::create_resource))
        .route(
            "/resources/upload",
            post(api::upload_resource).layer(upload_limit),
        )
        .route("/resources/{id}", get(api::get_resource))
        .route("/resources/{id}", put(api::update_resource))
        .route("/resources/{id}", delete(api::delete_resource))
        .route("/resources/{id}/status", put(api::set_resource_status))
        .route("/resources/{id}/feature", post(api::toggle_featured))
        // Training
        .route("/training", get(api::list_training))
        .route("/training/{id}", get(api::get_training))
        .route("/training/{id}/progress", put(api::set_training_progress))
        // Members
        .route("/members", get(api::list_members))
        .route("/members/{id}", get(api::get_member))
        .route("/members/{id}", put(api::update_member))
        .route("/members/{id}", delete(api::delete_member))
        // Notifications
        .route("/notifications", get(api::list_notifications))
        .route(
            "/notifications/read-all",
            post(api::mark_all_notifications_read),
        )
        .route(
            "/notifications/{id}/read",
            post(api::mark_notification_read),
        )
        .route("/notifications/{id}", delete(api::delete_notification))
        // Preferences and account
        .route("/users/{user_id}/preferences", get(api::get_preferences))
        .route("/users/{user_id}/preferences", put(api::put_preferences))
        .route("/account/password", post(api::change_password))
        // Dashboard, search and admin
        .route("/dashboard", get(api::get_dashboard))
        .route("/search", get(api::search_catalog))
        .route("/admin/reset", post(api::reset_catalog));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
