//! Ordered provider fallback.
//!
//! Providers are tried strictly in priority order. Moving on to the next
//! provider is the only retry mechanism; a provider is never called twice
//! for one request.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::credentials::redact_credentials;
use crate::config::{KeyResolver, MuxConfig, ProviderConfig};
use crate::errors::{ErrorKind, MuxError};
use super::factory::create_provider;
use super::provider::LLMProvider;
use super::types::{AskRequest, ProviderResult, RoutedResponse};

/// A configured provider paired with the adapter that talks to it.
#[derive(Clone)]
pub struct ProviderSlot {
    pub config: ProviderConfig,
    pub adapter: Arc<dyn LLMProvider>,
}

impl ProviderSlot {
    pub fn new(config: ProviderConfig, adapter: Arc<dyn LLMProvider>) -> Self {
        Self { config, adapter }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}

pub struct FallbackRouter {
    slots: Vec<ProviderSlot>,
    resolver: KeyResolver,
}

impl FallbackRouter {
    /// Build a router over `slots`, sorted by ascending priority (stable, so
    /// ties keep the given order).
    pub fn new(mut slots: Vec<ProviderSlot>, resolver: KeyResolver) -> Result<Self, MuxError> {
        if slots.is_empty() {
            return Err(MuxError::Config("Fallback router requires at least one provider".into()));
        }
        slots.sort_by_key(|s| s.config.priority);
        Ok(Self { slots, resolver })
    }

    pub fn from_config(config: &MuxConfig, resolver: KeyResolver) -> Result<Self, MuxError> {
        let slots = config
            .ordered_providers()
            .into_iter()
            .map(|p| {
                let adapter = create_provider(&p, config.timeout_secs)?;
                Ok(ProviderSlot::new(p, adapter))
            })
            .collect::<Result<Vec<_>, MuxError>>()?;
        Self::new(slots, resolver)
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.slots.iter().map(|s| &s.config)
    }

    pub fn resolver(&self) -> &KeyResolver {
        &self.resolver
    }

    pub async fn route(&self, request: &AskRequest) -> Result<RoutedResponse, MuxError> {
        if request.prompt.trim().is_empty() {
            return Err(MuxError::InvalidRequest("prompt cannot be empty".into()));
        }

        let mut attempts = Vec::new();

        for (idx, slot) in self.slots.iter().enumerate() {
            let name = slot.name();

            let Some(credential) = self.resolver.resolve(request.credential.as_deref(), &slot.config) else {
                let searched = slot.config.credential_envs().join(", ");
                warn!(provider = name, env_vars = %searched, "No credential available, skipping provider");
                attempts.push(ProviderResult::Failure {
                    provider: name.to_string(),
                    kind: ErrorKind::MissingCredential,
                    detail: format!("none of {}, {} is set", searched, self.resolver.fallback_var()),
                });
                continue;
            };

            debug!(
                provider = name,
                adapter = slot.adapter.provider_name(),
                model = slot.adapter.model_name(),
                credential_source = credential.source.as_str(),
                position = idx + 1,
                of = self.slots.len(),
                "Trying provider"
            );

            match slot.adapter.generate(&request.prompt, credential.secret()).await {
                Ok(response) => {
                    let fallback_occurred = idx > 0;
                    if fallback_occurred {
                        info!(provider = name, failed_before = attempts.len(), "Request succeeded on fallback provider");
                    } else {
                        info!(provider = name, "Request succeeded on primary provider");
                    }
                    return Ok(RoutedResponse {
                        text: response.content,
                        source: name.to_string(),
                        model: response.model,
                        fallback_occurred,
                        attempts,
                    });
                }
                Err(e) => {
                    let kind = e.classify();
                    let detail = redact_credentials(&e.to_string(), &[credential.secret()]);
                    warn!(provider = name, error_kind = %kind, error = %detail, "Provider failed");
                    attempts.push(ProviderResult::Failure {
                        provider: name.to_string(),
                        kind,
                        detail,
                    });

                    if let Some(next) = self.slots.get(idx + 1) {
                        info!(from = name, to = next.name(), "Falling back to next provider");
                    }
                }
            }
        }

        warn!(attempts = attempts.len(), "All providers failed");
        Err(MuxError::AllProvidersFailed { attempts })
    }
}
