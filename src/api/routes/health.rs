use axum::{extract::State, Json};
use serde_json::{json, Value};
use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "llmux",
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": env!("GIT_HASH"),
        "built_at": env!("BUILD_TIMESTAMP"),
        "started_at": state.started_at.to_rfc3339(),
        "providers": state.router.providers().count(),
    }))
}
