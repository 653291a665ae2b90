use serde::Serialize;

use crate::errors::ErrorKind;

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub model: String,
}

/// One inbound prompt plus the caller's own credential, if any.
#[derive(Debug, Clone)]
pub struct AskRequest {
    pub prompt: String,
    pub credential: Option<String>,
}

impl AskRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), credential: None }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

/// Result of a single provider attempt. The router only records failures;
/// a success ends routing and is reported as a `RoutedResponse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderResult {
    Success {
        provider: String,
        text: String,
    },
    Failure {
        provider: String,
        kind: ErrorKind,
        detail: String,
    },
}

impl ProviderResult {
    pub fn provider(&self) -> &str {
        match self {
            Self::Success { provider, .. } | Self::Failure { provider, .. } => provider,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Successful routing outcome. `attempts` holds the failures that preceded
/// the winning provider, in the order they were tried.
#[derive(Debug, Clone)]
pub struct RoutedResponse {
    pub text: String,
    pub source: String,
    pub model: String,
    pub fallback_occurred: bool,
    pub attempts: Vec<ProviderResult>,
}
