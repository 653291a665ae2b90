use std::sync::Arc;
use std::time::Duration;

use crate::config::{ProviderConfig, ProviderKind};
use crate::errors::MuxError;
use super::provider::LLMProvider;
use super::gemini::GeminiProvider;
use super::openrouter::OpenRouterProvider;

pub fn create_provider(
    config: &ProviderConfig,
    default_timeout_secs: u64,
) -> Result<Arc<dyn LLMProvider>, MuxError> {
    let timeout = Duration::from_secs(config.timeout_secs(default_timeout_secs));
    let endpoint = config.endpoint();
    let model = config.model();

    match config.kind {
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(endpoint, model, timeout)?)),
        ProviderKind::OpenRouter => Ok(Arc::new(OpenRouterProvider::new(endpoint, model, timeout)?)),
    }
}
