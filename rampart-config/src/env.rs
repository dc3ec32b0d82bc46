// Environment variable loading

use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Separator marking a nested key, e.g. `COOKIE__NAME` -> `cookie.name`.
pub const NESTING_SEPARATOR: &str = "__";

/// Environment variable loader
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load all matching variables, keyed by their lowercased name with the
    /// prefix stripped.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.collect(env::vars()))
    }

    fn collect(&self, vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
        let mut config = HashMap::new();

        for (key, value) in vars {
            match self.prefix {
                Some(ref prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str()) {
                        let Some(trimmed) = rest.strip_prefix('_') else {
                            continue;
                        };
                        if !trimmed.is_empty() {
                            config.insert(trimmed.to_lowercase(), value);
                        }
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value);
                }
            }
        }

        config
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = match self.prefix {
            Some(ref prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        };

        Ok(env::var(&full_key)?)
    }

    /// Load with default value
    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Give an environment string the most specific JSON type it can carry.
///
/// `true`/`false` become booleans, integers become numbers, values holding a
/// comma become string arrays, anything else stays a string.
pub fn typed_value(raw: &str) -> Value {
    let trimmed = raw.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(number) = trimmed.parse::<i64>() {
        return Value::from(number);
    }

    if trimmed.contains(',') {
        return Value::Array(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }

    Value::String(raw.to_string())
}
