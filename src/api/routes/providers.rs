use axum::{extract::State, Json};
use crate::api::models::ProviderSummary;
use crate::api::AppState;

/// The configured fallback chain in the order it is tried. Reports which
/// variable each provider reads, never its value.
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderSummary>> {
    let resolver = state.router.resolver();
    let chain = state
        .router
        .providers()
        .map(|p| ProviderSummary {
            name: p.name.clone(),
            kind: p.kind.to_string(),
            priority: p.priority,
            model: p.model().to_string(),
            endpoint: p.endpoint().to_string(),
            credential_env: p.credential_env(),
            credential_available: resolver.resolve(None, p).is_some(),
        })
        .collect();
    Json(chain)
}
