use crate::errors::MuxError;

const DANGEROUS_PATTERNS: &[&str] = &[
    "../",
    "..\\",
    "<script",
];

/// URI schemes that must never appear as a value. Matched only at the start
/// of the value, so hosts such as `profile:9000` stay valid.
const DANGEROUS_SCHEMES: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
];

/// Prefixes of provider keys. A config value starting with one of these is
/// an inlined secret; configs name variables, never values.
const KEY_PREFIXES: &[&str] = &["AIza", "sk-or-", "sk-"];

const SECRET_FIELDS: &[&str] = &["api_key", "key", "token", "secret"];

pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), MuxError> {
    check_value(value, &[])?;
    Ok(())
}

fn path_label(path: &[String]) -> String {
    if path.is_empty() { "root".to_string() } else { path.join(".") }
}

fn check_value(value: &serde_yaml::Value, path: &[String]) -> Result<(), MuxError> {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.trim_start().to_lowercase();
            let hit = DANGEROUS_PATTERNS
                .iter()
                .find(|p| lower.contains(*p))
                .or_else(|| DANGEROUS_SCHEMES.iter().find(|p| lower.starts_with(*p)));
            if let Some(pattern) = hit {
                return Err(MuxError::Config(
                    format!("Dangerous pattern '{}' found at config path: {}", pattern, path_label(path))
                ));
            }
            if KEY_PREFIXES.iter().any(|p| s.starts_with(p)) {
                return Err(MuxError::Config(format!(
                    "Inline credential found at config path: {} (reference an environment variable instead)",
                    path_label(path)
                )));
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = k.as_str().unwrap_or("unknown").to_string();
                if SECRET_FIELDS.contains(&key.as_str()) {
                    let mut field_path = path.to_vec();
                    field_path.push(key);
                    return Err(MuxError::Config(format!(
                        "Credential field not allowed at config path: {} (use api_key_env)",
                        path_label(&field_path)
                    )));
                }
                let mut new_path = path.to_vec();
                new_path.push(key);
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let mut new_path = path.to_vec();
                new_path.push(format!("[{}]", i));
                check_value(v, &new_path)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_safe_config_passes() {
        let value = yaml("providers:\n  - name: gemini\n    kind: gemini\n    api_key_env: GEMINI_API_KEY");
        assert!(validate_security_patterns(&value).is_ok());
    }

    #[test]
    fn test_file_endpoint_blocked() {
        let value = yaml("providers:\n  - name: x\n    endpoint: 'file:///etc/passwd'");
        let err = validate_security_patterns(&value).unwrap_err();
        assert!(err.to_string().contains("providers.[0].endpoint"));
    }

    #[test]
    fn test_endpoint_host_resembling_scheme_passes() {
        for endpoint in ["http://profile:9000/v1", "http://metadata:8080", "https://bigdata:443/api"] {
            let value = yaml(&format!("providers:\n  - name: x\n    endpoint: '{}'", endpoint));
            assert!(validate_security_patterns(&value).is_ok(), "{} rejected", endpoint);
        }
    }

    #[test]
    fn test_uppercase_scheme_blocked() {
        assert!(validate_security_patterns(&yaml("endpoint: ' FILE:///etc/passwd'")).is_err());
    }

    #[test]
    fn test_javascript_uri_blocked() {
        assert!(validate_security_patterns(&yaml("endpoint: 'javascript:void(0)'")).is_err());
    }

    #[test]
    fn test_traversal_blocked() {
        assert!(validate_security_patterns(&yaml("path: ../../etc/passwd")).is_err());
    }

    #[test]
    fn test_inline_google_key_blocked() {
        let value = yaml("providers:\n  - name: gemini\n    model: AIzaSyExampleExample");
        let err = validate_security_patterns(&value).unwrap_err();
        assert!(err.to_string().contains("Inline credential"));
    }

    #[test]
    fn test_api_key_field_blocked() {
        let value = yaml("providers:\n  - name: openrouter\n    api_key: whatever");
        let err = validate_security_patterns(&value).unwrap_err();
        assert!(err.to_string().contains("providers.[0].api_key"));
    }

    #[test]
    fn test_numeric_values_pass() {
        assert!(validate_security_patterns(&yaml("timeout_secs: 30\nserver:\n  port: 8080")).is_ok());
    }
}
