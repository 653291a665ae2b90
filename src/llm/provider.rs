use async_trait::async_trait;
use crate::errors::MuxError;
use super::types::LLMResponse;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Single prompt completion. One upstream call, no retries.
    async fn generate(
        &self,
        prompt: &str,
        credential: &str,
    ) -> Result<LLMResponse, MuxError>;

    /// Provider kind for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}
