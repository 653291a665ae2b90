use serde::{Deserialize, Serialize};

use crate::llm::catalog;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FALLBACK_KEY_ENV: &str = "LLM_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MuxConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,
    /// Shared variable consulted when a provider's own variable is unset.
    #[serde(default = "default_fallback_key_env")]
    pub fallback_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            providers: default_providers(),
            fallback_key_env: default_fallback_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl MuxConfig {
    /// Providers sorted by ascending priority. Equal priorities keep
    /// declaration order.
    pub fn ordered_providers(&self) -> Vec<ProviderConfig> {
        let mut providers = self.providers.clone();
        providers.sort_by_key(|p| p.priority);
        providers
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenRouter,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenRouter => "openrouter",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    #[serde(default)]
    pub priority: u32,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ProviderConfig {
    pub fn new(name: &str, kind: ProviderKind, priority: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            priority,
            endpoint: None,
            model: None,
            api_key_env: None,
            timeout_secs: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| catalog::provider_info(self.kind).default_endpoint)
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| catalog::default_model(self.kind))
    }

    /// Name of the primary service-specific credential variable: explicit
    /// `api_key_env`, else `<NAME>_API_KEY`.
    pub fn credential_env(&self) -> String {
        if let Some(var) = &self.api_key_env {
            return var.clone();
        }
        let stem: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}_API_KEY", stem)
    }

    /// Service-specific credential variables in lookup order. An explicit
    /// `api_key_env` is the only candidate; otherwise `<NAME>_API_KEY` is
    /// followed by the catalog variable for the provider kind.
    pub fn credential_envs(&self) -> Vec<String> {
        let primary = self.credential_env();
        if self.api_key_env.is_some() {
            return vec![primary];
        }
        let catalog_var = catalog::provider_info(self.kind).env_var;
        if primary == catalog_var {
            vec![primary]
        } else {
            vec![primary, catalog_var.to_string()]
        }
    }

    pub fn timeout_secs(&self, global: u64) -> u64 {
        self.timeout_secs.unwrap_or(global)
    }
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig::new("gemini", ProviderKind::Gemini, 0),
        ProviderConfig::new("openrouter", ProviderKind::OpenRouter, 1),
    ]
}

fn default_fallback_key_env() -> String {
    DEFAULT_FALLBACK_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}
