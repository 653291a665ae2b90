use thiserror::Error;

use crate::llm::types::ProviderResult;

#[derive(Debug, Error)]
pub enum MuxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Provider unreachable: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("All {} providers failed", .attempts.len())]
    AllProvidersFailed { attempts: Vec<ProviderResult> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MuxError {
    /// Map a transport-level reqwest failure onto the provider taxonomy.
    pub fn from_transport(provider: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MuxError::Timeout(format!("{} request timed out", provider))
        } else if err.is_connect() {
            MuxError::Network(format!("{} connection failed", provider))
        } else {
            MuxError::Network(format!("{} request failed: {}", provider, err.without_url()))
        }
    }
}
