use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "server": {
                "type": "object",
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            },
            "providers": {
                "type": "array",
                "minItems": 1,
                "items": { "$ref": "#/$defs/provider" }
            },
            "fallback_key_env": { "type": "string", "pattern": "^[A-Za-z_][A-Za-z0-9_]*$" },
            "timeout_secs": { "type": "integer", "minimum": 1 }
        },
        "$defs": {
            "provider": {
                "type": "object",
                "required": ["name", "kind"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "kind": { "type": "string", "enum": ["gemini", "openrouter"] },
                    "priority": { "type": "integer", "minimum": 0 },
                    "endpoint": { "type": "string", "format": "uri" },
                    "model": { "type": "string" },
                    "api_key_env": { "type": "string", "pattern": "^[A-Za-z_][A-Za-z0-9_]*$" },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            }
        }
    })
});
