use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;

use crate::errors::MuxError;
use super::provider::LLMProvider;
use super::types::LLMResponse;
use super::upstream;

/// OpenRouter, or any endpoint speaking the OpenAI chat-completions shape.
pub struct OpenRouterProvider {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenRouterProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Result<Self, MuxError> {
        Ok(Self {
            client: upstream::build_client(timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl LLMProvider for OpenRouterProvider {
    async fn generate(&self, prompt: &str, credential: &str) -> Result<LLMResponse, MuxError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        info!(provider = "openrouter", model = %self.model, "Sending request to OpenRouter");

        let request = self.client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(credential)
            .header("X-Title", "llmux")
            .json(&body);
        let data = upstream::send_json("openrouter", request).await?;

        let content = extract_text(&data)?;
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        Ok(LLMResponse { content, input_tokens, output_tokens, model: self.model.clone() })
    }

    fn provider_name(&self) -> &str { "openrouter" }
    fn model_name(&self) -> &str { &self.model }
}

fn extract_text(data: &Value) -> Result<String, MuxError> {
    data["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| MuxError::MalformedResponse("No content in OpenRouter response".into()))
}
