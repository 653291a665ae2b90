use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::MuxError;
use super::types::MuxConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;

/// Load the config at `path`, or the built-in Gemini → OpenRouter chain
/// when no path is given.
pub async fn load_config(path: Option<&Path>) -> Result<MuxConfig, MuxError> {
    match path {
        Some(path) => parse_config(path).await,
        None => {
            info!("No config file given, using default provider chain");
            let config = MuxConfig::default();
            validate_conflicts(&config)?;
            Ok(config)
        }
    }
}

pub async fn parse_config(path: &Path) -> Result<MuxConfig, MuxError> {
    if !path.exists() {
        return Err(MuxError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(MuxError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<MuxConfig, MuxError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty document means "all defaults"
    let yaml = if yaml.is_null() {
        serde_yaml::Value::Mapping(Default::default())
    } else {
        yaml
    };

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: MuxConfig = serde_yaml::from_value(yaml)?;

    validate_conflicts(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), MuxError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| MuxError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| MuxError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| MuxError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: serde and validate_conflicts reject what actually matters
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Detect semantic problems serde cannot express.
pub fn validate_conflicts(config: &MuxConfig) -> Result<(), MuxError> {
    if config.providers.is_empty() {
        return Err(MuxError::Config("At least one provider must be configured".into()));
    }

    if config.timeout_secs == 0 {
        return Err(MuxError::Config("timeout_secs must be greater than zero".into()));
    }

    if config.fallback_key_env.trim().is_empty() {
        return Err(MuxError::Config("fallback_key_env must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(MuxError::Config("Provider name must not be empty".into()));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(MuxError::Config(format!(
                "Duplicate provider name '{}'",
                provider.name
            )));
        }
        if provider.timeout_secs == Some(0) {
            return Err(MuxError::Config(format!(
                "Provider '{}': timeout_secs must be greater than zero",
                provider.name
            )));
        }
        let endpoint = provider.endpoint();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(MuxError::Config(format!(
                "Provider '{}': endpoint must be an http(s) URL, got '{}'",
                provider.name, endpoint
            )));
        }
    }

    let mut priorities = HashSet::new();
    for provider in &config.providers {
        if !priorities.insert(provider.priority) {
            warn!(
                provider = %provider.name,
                priority = provider.priority,
                "Shared priority, declaration order decides"
            );
        }
    }

    Ok(())
}
