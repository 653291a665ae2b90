//! Shared HTTP plumbing for provider adapters: client construction, status
//! classification and body decoding.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::errors::MuxError;

const MAX_DETAIL_CHARS: usize = 200;
/// Upper bound on an upstream reply body. Larger replies are malformed.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

pub fn build_client(timeout: Duration) -> Result<Client, MuxError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MuxError::Config(format!("HTTP client setup failed: {}", e)))
}

/// Send `request` and return the decoded JSON body of a successful reply.
/// Any non-success status, transport failure, or undecodable body comes
/// back as the matching `MuxError` variant.
pub async fn send_json(provider: &str, request: RequestBuilder) -> Result<Value, MuxError> {
    let resp = request
        .send()
        .await
        .map_err(|e| MuxError::from_transport(provider, e))?;

    let status = resp.status();
    let body = read_body(provider, resp).await?;
    debug!(provider, status = status.as_u16(), bytes = body.len(), "Upstream replied");

    if !status.is_success() {
        return Err(classify_status(provider, status, &body));
    }

    let data: Value = serde_json::from_str(&body)
        .map_err(|e| MuxError::MalformedResponse(format!("{} returned non-JSON body: {}", provider, e)))?;

    if let Some(error) = data.get("error") {
        return Err(MuxError::LLMApi(format!(
            "{}: {}",
            provider,
            truncate_detail(error_message(error).unwrap_or("unknown error"))
        )));
    }

    Ok(data)
}

/// Collect the reply body chunk by chunk, refusing anything over
/// `MAX_BODY_BYTES`.
async fn read_body(provider: &str, mut resp: Response) -> Result<String, MuxError> {
    let too_large = || {
        MuxError::MalformedResponse(format!("{} reply exceeds {} bytes", provider, MAX_BODY_BYTES))
    };
    if resp.content_length().is_some_and(|len| len > MAX_BODY_BYTES as u64) {
        return Err(too_large());
    }

    let mut buf = Vec::new();
    while let Some(chunk) = resp
        .chunk()
        .await
        .map_err(|e| MuxError::from_transport(provider, e))?
    {
        if buf.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(too_large());
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn classify_status(provider: &str, status: StatusCode, body: &str) -> MuxError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(error_message).map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    let detail = format!("{} ({}): {}", provider, status.as_u16(), truncate_detail(&detail));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MuxError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => MuxError::RateLimit(detail),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => MuxError::Timeout(detail),
        s if s.is_server_error() => MuxError::Network(detail),
        _ => MuxError::LLMApi(detail),
    }
}

/// `{"error": {"message": ..}}` and `{"error": ".."}` are both in the wild.
fn error_message(error: &Value) -> Option<&str> {
    error.get("message").and_then(Value::as_str).or_else(|| error.as_str())
}

pub fn truncate_detail(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{}...", cut)
    }
}
