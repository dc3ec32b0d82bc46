//! Configuration management for Rampart.
//!
//! Values are gathered from files (TOML, JSON, `.env`), the process
//! environment and explicit overrides into one JSON document, then
//! deserialized and validated into a typed settings struct.
//!
//! ```
//! use rampart_config::{ConfigManager, FileFormat};
//!
//! let manager = ConfigManager::new();
//! manager.merge_str("salt_byte_length = 12", FileFormat::Toml).unwrap();
//! assert_eq!(manager.get::<u64>("salt_byte_length").unwrap(), 12);
//! ```

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::{EnvLoader, NESTING_SEPARATOR, typed_value};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

/// Layered configuration store
#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<Map<String, Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(Map::new())),
            env_prefix: None,
        }
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(Map::new())),
            env_prefix: Some(prefix.into()),
        }
    }

    /// Merge environment variables over the current values.
    ///
    /// `PREFIX_COOKIE__NAME=x` sets the nested key `cookie.name`.
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        let env_vars = loader.load()?;

        let mut config = self.config.write();
        for (key, value) in env_vars {
            let path: Vec<&str> = key.split(NESTING_SEPARATOR).collect();
            insert_path(&mut config, &path, typed_value(&value));
        }

        Ok(())
    }

    /// Load a `.env` file into the process environment, then merge it.
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::Dotenv(e.to_string()))?;
            }
            None => {
                // A missing .env is not an error
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Merge a configuration file, format picked from the extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let loader = ConfigLoader::auto(path.as_ref())?;
        let data = loader.load_file(path)?;
        self.merge_value(data)
    }

    /// Merge configuration text in the given format.
    pub fn merge_str(&self, content: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).parse(content)?;
        self.merge_value(data)
    }

    fn merge_value(&self, data: Value) -> Result<()> {
        let Value::Object(map) = data else {
            return Err(ConfigError::Shape {
                key: "<root>".to_string(),
                message: "top-level configuration must be a table".to_string(),
            });
        };

        let mut config = self.config.write();
        for (key, value) in map {
            merge_into(&mut config, key, value);
        }
        Ok(())
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| ConfigError::Shape {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        self.config.write().insert(key.to_string(), json_value);
        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let config = self.config.read();

        let value = config
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone()).map_err(|e| ConfigError::Shape {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn has(&self, key: &str) -> bool {
        self.config.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.config.read().keys().cloned().collect()
    }

    /// Deserialize the whole document and validate it.
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let document = Value::Object(self.config.read().clone());

        let validated: T = serde_json::from_value(document).map_err(|e| ConfigError::Shape {
            key: "<root>".to_string(),
            message: e.to_string(),
        })?;

        validated.validate()?;

        Ok(validated)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge `value` under `key`, recursing into tables so a later layer only
/// replaces the leaves it names.
fn merge_into(target: &mut Map<String, Value>, key: String, value: Value) {
    let Value::Object(incoming) = value else {
        target.insert(key, value);
        return;
    };

    if let Some(Value::Object(existing)) = target.get_mut(&key) {
        for (k, v) in incoming {
            merge_into(existing, k, v);
        }
        return;
    }

    target.insert(key, Value::Object(incoming));
}

fn insert_path(target: &mut Map<String, Value>, path: &[&str], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            target.insert((*leaf).to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = target
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_path(child, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        limit: u32,
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<()> {
            ConfigValidator::not_empty(&self.name, "name")?;
            ConfigValidator::at_least(self.limit, 1, "limit")
        }
    }

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("test_key", "test_value").unwrap();

        let value: String = manager.get("test_key").unwrap();
        assert_eq!(value, "test_value");
        assert!(manager.has("test_key"));
        assert!(!manager.has("missing_key"));
    }

    #[test]
    fn test_get_or_default() {
        let manager = ConfigManager::new();
        let value: String = manager.get_or("missing_key", "default_value".to_string());
        assert_eq!(value, "default_value");
    }

    #[test]
    fn test_nested_merge_keeps_siblings() {
        let manager = ConfigManager::new();
        manager
            .merge_str("[cookie]\nname = \"a\"\npath = \"/\"", FileFormat::Toml)
            .unwrap();
        manager
            .merge_str(r#"{"cookie": {"name": "b"}}"#, FileFormat::Json)
            .unwrap();

        let cookie: Value = manager.get("cookie").unwrap();
        assert_eq!(cookie["name"], "b");
        assert_eq!(cookie["path"], "/");
    }

    #[test]
    fn test_insert_path() {
        let mut map = Map::new();
        insert_path(&mut map, &["cookie", "name"], Value::from("x"));
        insert_path(&mut map, &["cookie", "secure"], Value::from(false));
        assert_eq!(map["cookie"]["name"], "x");
        assert_eq!(map["cookie"]["secure"], false);
    }

    #[test]
    fn test_load_validated() {
        let manager = ConfigManager::new();
        manager.set("name", "csrf").unwrap();
        manager.set("limit", 3).unwrap();
        let sample: Sample = manager.load_validated().unwrap();
        assert_eq!(sample.name, "csrf");
        assert_eq!(sample.limit, 3);

        manager.set("limit", 0).unwrap();
        assert!(matches!(
            manager.load_validated::<Sample>(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_non_table_document_rejected() {
        let manager = ConfigManager::new();
        assert!(manager.merge_str("[1, 2]", FileFormat::Json).is_err());
    }
}
