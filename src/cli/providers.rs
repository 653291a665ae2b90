use std::path::Path;

use serde_json::json;

use crate::cli::commands::ProvidersArgs;
use crate::config::{self, KeyResolver};
use crate::errors::MuxError;

pub async fn handle_providers(args: ProvidersArgs) -> Result<(), MuxError> {
    let config = config::load_config(args.config.as_deref().map(Path::new)).await?;
    let resolver = KeyResolver::from_env(&config.providers, &config.fallback_key_env);

    let chain: Vec<_> = config
        .ordered_providers()
        .into_iter()
        .map(|p| {
            let source = resolver.resolve(None, &p).map(|c| c.source.as_str());
            (p, source)
        })
        .collect();

    if args.json {
        let items: Vec<_> = chain
            .iter()
            .map(|(p, source)| json!({
                "name": p.name,
                "kind": p.kind.as_str(),
                "priority": p.priority,
                "model": p.model(),
                "endpoint": p.endpoint(),
                "credential_env": p.credential_env(),
                "credential_source": source,
                "timeout_secs": p.timeout_secs(config.timeout_secs),
            }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("Fallback chain (fallback key: {}):", config.fallback_key_env);
    for (i, (p, source)) in chain.iter().enumerate() {
        println!(
            "  {}. {:<14} {:<11} {:<28} key: {} ({})",
            i + 1,
            p.name,
            p.kind.as_str(),
            p.model(),
            p.credential_env(),
            source.unwrap_or("missing"),
        );
    }
    Ok(())
}
