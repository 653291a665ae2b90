use serde::Serialize;

use super::types::MuxError;

/// Failure kinds recorded per provider attempt and surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    MissingCredential,
    AuthError,
    RateLimited,
    Unreachable,
    MalformedResponse,
    Timeout,
    Unknown,
    AllProvidersFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::MissingCredential => "missing_credential",
            Self::AuthError => "auth_error",
            Self::RateLimited => "rate_limited",
            Self::Unreachable => "unreachable",
            Self::MalformedResponse => "malformed_response",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
            Self::AllProvidersFailed => "all_providers_failed",
        }
    }

    /// Fixed, caller-safe description. Never carries upstream text.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "request was rejected before routing",
            Self::MissingCredential => "no credential configured for provider",
            Self::AuthError => "provider rejected the credential",
            Self::RateLimited => "provider rate limit reached",
            Self::Unreachable => "provider could not be reached",
            Self::MalformedResponse => "provider returned an unreadable response",
            Self::Timeout => "provider did not answer in time",
            Self::Unknown => "provider failed for an unknown reason",
            Self::AllProvidersFailed => "every provider in the chain failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MuxError {
    /// Classify this error into the kind recorded for a provider attempt.
    pub fn classify(&self) -> ErrorKind {
        match self {
            MuxError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            MuxError::MissingCredential(_) => ErrorKind::MissingCredential,
            MuxError::Authentication(_) => ErrorKind::AuthError,
            MuxError::RateLimit(_) => ErrorKind::RateLimited,
            MuxError::Network(_) => ErrorKind::Unreachable,
            MuxError::Timeout(_) => ErrorKind::Timeout,
            MuxError::MalformedResponse(_) | MuxError::Json(_) => ErrorKind::MalformedResponse,
            MuxError::AllProvidersFailed { .. } => ErrorKind::AllProvidersFailed,
            MuxError::LLMApi(_)
            | MuxError::Config(_)
            | MuxError::Io(_)
            | MuxError::Yaml(_)
            | MuxError::Internal(_) => ErrorKind::Unknown,
        }
    }
}
