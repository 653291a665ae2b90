use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::MuxError;
use super::provider::LLMProvider;
use super::types::LLMResponse;
use super::upstream;

pub struct GeminiProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self, MuxError> {
        Ok(Self {
            client: upstream::build_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, credential: &str) -> Result<LLMResponse, MuxError> {
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        });

        info!(provider = "gemini", model = %self.model, "Sending request to Gemini");

        // Key goes in a header so it never appears in a URL that reqwest
        // might echo back inside an error.
        let request = self.client.post(self.url())
            .header("x-goog-api-key", credential)
            .json(&body);
        let data = upstream::send_json("gemini", request).await?;

        let content = extract_text(&data)?;
        let input_tokens = data["usageMetadata"]["promptTokenCount"].as_u64();
        let output_tokens = data["usageMetadata"]["candidatesTokenCount"].as_u64();

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn provider_name(&self) -> &str { "gemini" }
    fn model_name(&self) -> &str { &self.model }
}

/// Concatenate the text parts of the first candidate. An empty string is a
/// valid answer; a missing candidate or text field is not.
fn extract_text(data: &Value) -> Result<String, MuxError> {
    let Some(candidate) = data["candidates"].get(0) else {
        if let Some(reason) = data["promptFeedback"]["blockReason"].as_str() {
            return Err(MuxError::LLMApi(format!("gemini blocked the prompt: {}", reason)));
        }
        return Err(MuxError::MalformedResponse("gemini response has no candidates".into()));
    };

    let parts = candidate["content"]["parts"]
        .as_array()
        .ok_or_else(|| MuxError::MalformedResponse("gemini candidate has no content parts".into()))?;

    let texts: Vec<&str> = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if texts.is_empty() {
        return Err(MuxError::MalformedResponse("gemini candidate has no text part".into()));
    }
    Ok(texts.concat())
}
