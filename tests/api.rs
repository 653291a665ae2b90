use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use llmux::api::{build_router, AppState};
use llmux::config::{KeyResolver, ProviderConfig, ProviderKind};
use llmux::errors::MuxError;
use llmux::llm::{FallbackRouter, LLMProvider, LLMResponse, ProviderSlot};

/// Stub adapter: replies with fixed text, or fails with a fixed error, and
/// counts calls.
struct StubProvider {
    reply: Result<String, fn() -> MuxError>,
    calls: AtomicUsize,
    last_credential: std::sync::Mutex<Option<String>>,
}

impl StubProvider {
    fn ok(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_credential: Default::default(),
        })
    }

    fn err(make: fn() -> MuxError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(make),
            calls: AtomicUsize::new(0),
            last_credential: Default::default(),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LLMProvider for StubProvider {
    async fn generate(&self, _prompt: &str, credential: &str) -> Result<LLMResponse, MuxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_credential.lock().unwrap() = Some(credential.to_string());
        match &self.reply {
            Ok(text) => Ok(LLMResponse {
                content: text.clone(),
                input_tokens: None,
                output_tokens: None,
                model: "stub".into(),
            }),
            Err(make) => Err(make()),
        }
    }

    fn provider_name(&self) -> &str { "stub" }
    fn model_name(&self) -> &str { "stub" }
}

fn create_test_state(providers: Vec<(&str, Arc<StubProvider>)>, keys: &[(&str, &str)]) -> AppState {
    let slots = providers
        .into_iter()
        .enumerate()
        .map(|(i, (name, stub))| {
            let kind = if name == "gemini" { ProviderKind::Gemini } else { ProviderKind::OpenRouter };
            let config = ProviderConfig::new(name, kind, i as u32);
            ProviderSlot::new(config, stub)
        })
        .collect();
    let vars: HashMap<String, String> = keys.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let router = FallbackRouter::new(slots, KeyResolver::from_vars(vars, "LLM_API_KEY")).unwrap();
    AppState::new(router)
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state(vec![("a", StubProvider::ok("x"))], &[]);
    let req = make_request("GET", "/api/health", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "llmux");
    assert_eq!(body["providers"], 1);
    assert!(body["built_at"].is_string());
    assert!(body["git_hash"].is_string());
}

#[tokio::test]
async fn test_ask_primary_success() {
    let state = create_test_state(
        vec![("gemini", StubProvider::ok("hello from gemini")), ("openrouter", StubProvider::ok("unused"))],
        &[("GEMINI_API_KEY", "g-key"), ("OPENROUTER_API_KEY", "o-key")],
    );
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body, json!({
        "response": "hello from gemini",
        "source": "gemini",
        "fallback_triggered": false,
    }));
}

#[tokio::test]
async fn test_ask_falls_back_on_rate_limit() {
    let state = create_test_state(
        vec![
            ("A", StubProvider::err(|| MuxError::RateLimit("429".into()))),
            ("B", StubProvider::ok("hello")),
        ],
        &[("LLM_API_KEY", "shared-key")],
    );
    let req = make_request("POST", "/api/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["response"], "hello");
    assert_eq!(body["source"], "B");
    assert_eq!(body["fallback_triggered"], true);
}

#[tokio::test]
async fn test_ask_all_failed_is_502_with_sanitized_attempts() {
    let state = create_test_state(
        vec![
            ("A", StubProvider::err(|| MuxError::Network("connect to 10.0.0.1 refused".into()))),
            ("B", StubProvider::err(|| MuxError::Authentication("key sk-secret-123 invalid".into()))),
        ],
        &[("LLM_API_KEY", "shared-key")],
    );
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["error"], "all providers failed");
    let attempts = body["attempts"].as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["provider"], "A");
    assert_eq!(attempts[0]["error_kind"], "unreachable");
    assert_eq!(attempts[1]["provider"], "B");
    assert_eq!(attempts[1]["error_kind"], "auth_error");

    let raw = body.to_string();
    assert!(!raw.contains("10.0.0.1"));
    assert!(!raw.contains("sk-secret-123"));
}

#[tokio::test]
async fn test_ask_missing_credential_skips_provider() {
    let primary = StubProvider::ok("never");
    let backup = StubProvider::ok("from backup");
    let state = create_test_state(
        vec![("primary", primary.clone()), ("backup", backup.clone())],
        &[("BACKUP_API_KEY", "b-key")],
    );
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["source"], "backup");
    assert_eq!(body["fallback_triggered"], true);
    assert_eq!(primary.calls(), 0);
    assert_eq!(backup.calls(), 1);
}

#[tokio::test]
async fn test_ask_bearer_token_overrides_environment() {
    let stub = StubProvider::ok("ok");
    let state = create_test_state(vec![("gemini", stub.clone())], &[("GEMINI_API_KEY", "env-key")]);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/json")
        .header("authorization", "Bearer caller-key")
        .body(Body::from(r#"{"prompt":"hi"}"#))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stub.last_credential.lock().unwrap().as_deref(), Some("caller-key"));
}

#[tokio::test]
async fn test_ask_no_credentials_at_all_is_502() {
    let stub = StubProvider::ok("never");
    let state = create_test_state(vec![("gemini", stub.clone())], &[]);
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["attempts"][0]["error_kind"], "missing_credential");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_ask_empty_prompt_is_400() {
    let stub = StubProvider::ok("never");
    let state = create_test_state(vec![("gemini", stub.clone())], &[("GEMINI_API_KEY", "k-123")]);

    for prompt in ["", "   \n"] {
        let req = make_request("POST", "/ask", Some(json!({ "prompt": prompt })));
        let response = app(&state).oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("prompt"));
    }
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_ask_missing_prompt_is_400() {
    let state = create_test_state(vec![("gemini", StubProvider::ok("never"))], &[]);
    let req = make_request("POST", "/ask", Some(json!({ "question": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ask_malformed_json_is_400() {
    let state = create_test_state(vec![("gemini", StubProvider::ok("never"))], &[]);
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_ask_empty_text_is_success() {
    let state = create_test_state(vec![("gemini", StubProvider::ok(""))], &[("GEMINI_API_KEY", "k-123")]);
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "say nothing" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["response"], "");
}

#[tokio::test]
async fn test_list_providers_hides_secrets() {
    let state = create_test_state(
        vec![("gemini", StubProvider::ok("x")), ("openrouter", StubProvider::ok("y"))],
        &[("GEMINI_API_KEY", "very-secret-gemini-key")],
    );
    let req = make_request("GET", "/api/providers", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let chain = body.as_array().unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0]["name"], "gemini");
    assert_eq!(chain[0]["credential_env"], "GEMINI_API_KEY");
    assert_eq!(chain[0]["credential_available"], true);
    assert_eq!(chain[1]["credential_available"], false);
    assert!(!body.to_string().contains("very-secret-gemini-key"));
}

#[tokio::test]
async fn test_ask_renamed_provider_reads_catalog_key() {
    let stub = StubProvider::ok("ok");
    let state = create_test_state(vec![("primary", stub.clone())], &[("OPENROUTER_API_KEY", "or-key")]);
    let req = make_request("POST", "/ask", Some(json!({ "prompt": "hi" })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(stub.last_credential.lock().unwrap().as_deref(), Some("or-key"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = create_test_state(vec![("gemini", StubProvider::ok("x"))], &[]);
    let req = make_request("GET", "/nope", None);
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
