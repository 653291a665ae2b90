use serde::{Deserialize, Serialize};

use crate::errors::ErrorKind;
use crate::llm::{ProviderResult, RoutedResponse};

#[derive(Deserialize)]
pub struct AskBody {
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct AskResponse {
    pub response: String,
    pub source: String,
    pub fallback_triggered: bool,
}

impl From<RoutedResponse> for AskResponse {
    fn from(routed: RoutedResponse) -> Self {
        Self {
            response: routed.text,
            source: routed.source,
            fallback_triggered: routed.fallback_occurred,
        }
    }
}

/// Caller-facing view of a failed attempt. Carries the kind and a fixed
/// description, never the upstream detail.
#[derive(Serialize)]
pub struct AttemptSummary {
    pub provider: String,
    pub error_kind: ErrorKind,
    pub message: &'static str,
}

impl AttemptSummary {
    pub fn from_result(result: &ProviderResult) -> Option<Self> {
        let kind = result.kind()?;
        Some(Self {
            provider: result.provider().to_string(),
            error_kind: kind,
            message: kind.describe(),
        })
    }
}

#[derive(Serialize)]
pub struct FailureResponse {
    pub error: String,
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct ProviderSummary {
    pub name: String,
    pub kind: String,
    pub priority: u32,
    pub model: String,
    pub endpoint: String,
    pub credential_env: String,
    /// Whether an environment credential exists (caller tokens aside).
    pub credential_available: bool,
}
