use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::api::models::{AskBody, AskResponse};
use crate::api::AppState;
use crate::config::credentials::extract_bearer_token;
use crate::errors::MuxError;
use crate::llm::AskRequest;

pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<AskBody>, JsonRejection>,
) -> Result<Json<AskResponse>, MuxError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("ask", %request_id);

    async move {
        let Json(body) = payload.map_err(|rejection| {
            warn!(reason = %rejection.body_text(), "Rejecting unreadable /ask body");
            MuxError::InvalidRequest(rejection.body_text())
        })?;

        let prompt = body
            .prompt
            .ok_or_else(|| MuxError::InvalidRequest("missing field `prompt`".into()))?;

        let credential = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .map(str::to_string);

        info!(
            prompt_chars = prompt.chars().count(),
            caller_credential = credential.is_some(),
            "Received /ask request"
        );

        let request = AskRequest { prompt, credential };
        let routed = state.router.route(&request).await?;

        info!(source = %routed.source, fallback = routed.fallback_occurred, "Answered /ask request");
        Ok::<_, MuxError>(Json(AskResponse::from(routed)))
    }
    .instrument(span)
    .await
}
