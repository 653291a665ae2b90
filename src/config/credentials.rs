use std::collections::HashMap;

use tracing::debug;

use super::types::ProviderConfig;

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Caller,
    ServiceEnv,
    FallbackEnv,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Caller => "caller",
            Self::ServiceEnv => "service_env",
            Self::FallbackEnv => "fallback_env",
        }
    }
}

#[derive(Clone)]
pub struct Credential {
    secret: String,
    pub source: CredentialSource,
}

impl Credential {
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Layered credential lookup: caller token, then the provider's own
/// variable, then the shared fallback variable.
///
/// Environment values are captured once at construction; `resolve` never
/// touches the process environment.
#[derive(Clone, Default)]
pub struct KeyResolver {
    vars: HashMap<String, String>,
    fallback_var: String,
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.vars.keys().collect();
        names.sort();
        f.debug_struct("KeyResolver")
            .field("captured", &names)
            .field("fallback_var", &self.fallback_var)
            .finish()
    }
}

impl KeyResolver {
    pub fn from_vars(vars: HashMap<String, String>, fallback_var: &str) -> Self {
        Self {
            vars,
            fallback_var: fallback_var.to_string(),
        }
    }

    /// Snapshot the credential variables of every provider plus the shared
    /// fallback variable.
    pub fn from_env(providers: &[ProviderConfig], fallback_var: &str) -> Self {
        let mut vars = HashMap::new();
        let names = providers
            .iter()
            .flat_map(|p| p.credential_envs())
            .chain(std::iter::once(fallback_var.to_string()));
        for name in names {
            if let Ok(value) = std::env::var(&name) {
                vars.insert(name, value);
            }
        }
        debug!(captured = vars.len(), "Captured credential variables");
        Self::from_vars(vars, fallback_var)
    }

    pub fn resolve(&self, caller: Option<&str>, provider: &ProviderConfig) -> Option<Credential> {
        if let Some(token) = non_empty(caller) {
            return Some(Credential { secret: token.to_string(), source: CredentialSource::Caller });
        }
        for service_var in provider.credential_envs() {
            if let Some(value) = non_empty(self.vars.get(&service_var).map(String::as_str)) {
                return Some(Credential { secret: value.to_string(), source: CredentialSource::ServiceEnv });
            }
        }
        non_empty(self.vars.get(&self.fallback_var).map(String::as_str))
            .map(|value| Credential { secret: value.to_string(), source: CredentialSource::FallbackEnv })
    }

    pub fn fallback_var(&self) -> &str {
        &self.fallback_var
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let trimmed = header_value.trim();
    let (scheme, token) = trimmed.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Redact sensitive values in a string. Replaces each secret with
/// [REDACTED].
pub fn redact_credentials(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets {
        if !secret.is_empty() && secret.len() >= 4 {
            result = result.replace(secret, "[REDACTED]");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn gemini() -> ProviderConfig {
        ProviderConfig::new("gemini", ProviderKind::Gemini, 0)
    }

    fn resolver(pairs: &[(&str, &str)]) -> KeyResolver {
        let vars = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        KeyResolver::from_vars(vars, "LLM_API_KEY")
    }

    #[test]
    fn test_caller_token_wins() {
        let r = resolver(&[("GEMINI_API_KEY", "env-key"), ("LLM_API_KEY", "shared")]);
        let cred = r.resolve(Some("caller-key"), &gemini()).unwrap();
        assert_eq!(cred.secret(), "caller-key");
        assert_eq!(cred.source, CredentialSource::Caller);
    }

    #[test]
    fn test_service_env_before_fallback() {
        let r = resolver(&[("GEMINI_API_KEY", "env-key"), ("LLM_API_KEY", "shared")]);
        let cred = r.resolve(None, &gemini()).unwrap();
        assert_eq!(cred.secret(), "env-key");
        assert_eq!(cred.source, CredentialSource::ServiceEnv);
    }

    #[test]
    fn test_fallback_env_used_last() {
        let r = resolver(&[("LLM_API_KEY", "shared")]);
        let cred = r.resolve(None, &gemini()).unwrap();
        assert_eq!(cred.secret(), "shared");
        assert_eq!(cred.source, CredentialSource::FallbackEnv);
    }

    #[test]
    fn test_renamed_provider_reads_catalog_variable() {
        let primary = ProviderConfig::new("primary", ProviderKind::Gemini, 0);
        let r = resolver(&[("GEMINI_API_KEY", "g-key"), ("LLM_API_KEY", "shared")]);
        let cred = r.resolve(None, &primary).unwrap();
        assert_eq!(cred.secret(), "g-key");
        assert_eq!(cred.source, CredentialSource::ServiceEnv);

        // The name-derived variable still wins when both are set
        let r = resolver(&[("PRIMARY_API_KEY", "p-key"), ("GEMINI_API_KEY", "g-key")]);
        assert_eq!(r.resolve(None, &primary).unwrap().secret(), "p-key");
    }

    #[test]
    fn test_explicit_variable_skips_catalog_variable() {
        let mut primary = ProviderConfig::new("primary", ProviderKind::Gemini, 0);
        primary.api_key_env = Some("GOOGLE_KEY".into());
        let r = resolver(&[("GEMINI_API_KEY", "g-key")]);
        assert!(r.resolve(None, &primary).is_none());
    }

    #[test]
    fn test_not_found() {
        let r = resolver(&[("OPENROUTER_API_KEY", "other")]);
        assert!(r.resolve(None, &gemini()).is_none());
    }

    #[test]
    fn test_blank_values_are_absent() {
        let r = resolver(&[("GEMINI_API_KEY", "   "), ("LLM_API_KEY", "shared")]);
        let cred = r.resolve(Some(""), &gemini()).unwrap();
        assert_eq!(cred.source, CredentialSource::FallbackEnv);
    }

    #[test]
    fn test_debug_hides_secret() {
        let r = resolver(&[("GEMINI_API_KEY", "super-secret-value")]);
        let cred = r.resolve(None, &gemini()).unwrap();
        let shown = format!("{:?}", cred);
        assert!(!shown.contains("super-secret-value"));
        assert!(shown.contains("[REDACTED]"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer  abc123 "), Some("abc123"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }

    #[test]
    fn test_redact_credentials() {
        let text = "upstream said: key S3cret123 is invalid, token=abc";
        let redacted = redact_credentials(text, &["S3cret123", "abc"]);
        assert!(redacted.contains("[REDACTED]"));
        assert!(!redacted.contains("S3cret123"));
        // "abc" is too short (< 4 chars), not redacted
        assert!(redacted.contains("token=abc"));
    }
}
