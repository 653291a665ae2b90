pub mod routes;
pub mod models;
pub mod errors;

use std::sync::Arc;
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use crate::config::{KeyResolver, MuxConfig};
use crate::errors::MuxError;
use crate::llm::FallbackRouter;

/// Shared, read-only state. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<FallbackRouter>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(router: FallbackRouter) -> Self {
        Self {
            router: Arc::new(router),
            started_at: Utc::now(),
        }
    }
}

pub fn create_app_state(config: &MuxConfig) -> Result<AppState, MuxError> {
    let resolver = KeyResolver::from_env(&config.providers, &config.fallback_key_env);
    let router = FallbackRouter::from_config(config, resolver)?;
    Ok(AppState::new(router))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", axum::routing::post(routes::ask::ask))
        .route("/api/ask", axum::routing::post(routes::ask::ask))
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/providers", axum::routing::get(routes::providers::list_providers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
