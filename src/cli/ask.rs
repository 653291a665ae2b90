use std::path::Path;

use serde_json::json;

use crate::cli::commands::AskArgs;
use crate::config::{self, KeyResolver};
use crate::errors::MuxError;
use crate::llm::{AskRequest, FallbackRouter, ProviderResult};

pub async fn handle_ask(args: AskArgs) -> Result<(), MuxError> {
    let mut config = config::load_config(args.config.as_deref().map(Path::new)).await?;
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
        config::parser::validate_conflicts(&config)?;
    }

    let resolver = KeyResolver::from_env(&config.providers, &config.fallback_key_env);
    let router = FallbackRouter::from_config(&config, resolver)?;

    let request = AskRequest { prompt: args.prompt, credential: args.api_key };

    match router.route(&request).await {
        Ok(routed) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&json!({
                    "response": routed.text,
                    "source": routed.source,
                    "model": routed.model,
                    "fallback_triggered": routed.fallback_occurred,
                    "attempts": routed.attempts,
                }))?);
            } else {
                if routed.fallback_occurred {
                    eprintln!("(answered by {} after {} failed attempt(s))", routed.source, routed.attempts.len());
                }
                println!("{}", routed.text);
            }
            Ok(())
        }
        Err(MuxError::AllProvidersFailed { attempts }) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&json!({
                    "error": "all providers failed",
                    "attempts": attempts,
                }))?);
            } else {
                for line in describe_attempts(&attempts) {
                    eprintln!("{}", line);
                }
            }
            Err(MuxError::AllProvidersFailed { attempts })
        }
        Err(e) => Err(e),
    }
}

/// One line per failed attempt. The local operator sees the redacted
/// detail, unlike HTTP callers.
fn describe_attempts(attempts: &[ProviderResult]) -> Vec<String> {
    attempts
        .iter()
        .enumerate()
        .filter_map(|(i, attempt)| match attempt {
            ProviderResult::Failure { provider, kind, detail } => {
                Some(format!("  {}. {} [{}] {}", i + 1, provider, kind, detail))
            }
            ProviderResult::Success { .. } => None,
        })
        .collect()
}
