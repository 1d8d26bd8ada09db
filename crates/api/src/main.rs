use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use duft_core::{Catalog, Config, SearchEngine};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod routes;
mod search;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub engine: SearchEngine,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let engine = SearchEngine::from_store(catalog.clone());

        Self {
            config,
            catalog,
            engine,
        }
    }
}

/// Build the router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/search", post(routes::search::search))
        .route("/effects/suggest", get(routes::effects::suggest))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!(catalog_path = ?config.catalog_path, "Loading catalog");
    let catalog = Catalog::load(&config.catalog_path)?;

    let state = Arc::new(AppState::new(config.clone(), catalog));
    let app = app(state);

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!(address = addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
