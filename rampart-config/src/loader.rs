// Configuration file loaders

use crate::env::typed_value;
use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    /// `KEY=value` lines, as in a `.env` file
    Env,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("json") {
            Some(FileFormat::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(FileFormat::Toml)
        } else if ext.eq_ignore_ascii_case("env") {
            Some(FileFormat::Env)
        } else {
            None
        }
    }

    /// Format of `path`. A bare `.env` file name counts as [`FileFormat::Env`].
    pub fn detect(path: &Path) -> Option<Self> {
        if path.file_name().is_some_and(|name| name == ".env") {
            return Some(FileFormat::Env);
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Toml => "TOML",
            FileFormat::Env => "env",
        }
    }
}

/// Reads one configuration source into a JSON table
pub struct ConfigLoader {
    format: FileFormat,
}

impl ConfigLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Loader for whatever format `path` is written in
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        FileFormat::detect(path)
            .map(Self::new)
            .ok_or_else(|| ConfigError::UnknownFormat(path.to_path_buf()))
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse(&content)
    }

    /// Parse configuration text into a JSON value
    pub fn parse(&self, content: &str) -> Result<Value> {
        let parse_error = |message: String| ConfigError::Parse {
            format: self.format.name(),
            message,
        };

        match self.format {
            FileFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            FileFormat::Toml => {
                let table: toml::Table =
                    toml::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                serde_json::to_value(table).map_err(|e| parse_error(e.to_string()))
            }
            FileFormat::Env => Ok(Value::Object(parse_env_lines(content))),
        }
    }
}

fn parse_env_lines(content: &str) -> Map<String, Value> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            line.split_once('=')
        })
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim().to_lowercase(), typed_value(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json() {
        let loader = ConfigLoader::new(FileFormat::Json);
        let result = loader.parse(r#"{"salt_byte_length": 8}"#).unwrap();
        assert_eq!(result["salt_byte_length"], 8);
    }

    #[test]
    fn test_parse_toml_nested() {
        let loader = ConfigLoader::new(FileFormat::Toml);
        let toml = r#"
            secret_byte_length = 24

            [cookie]
            name = "__Host-csrf"
        "#;

        let result = loader.parse(toml).unwrap();
        assert_eq!(result["secret_byte_length"], 24);
        assert_eq!(result["cookie"]["name"], "__Host-csrf");
    }

    #[test]
    fn test_parse_env_lines() {
        let loader = ConfigLoader::new(FileFormat::Env);
        let env = r#"
            SALT_BYTE_LENGTH=16
            # Comment
            export TOKEN_FIELD="authenticity_token"
            not a pair
        "#;

        let result = loader.parse(env).unwrap();
        assert_eq!(result["salt_byte_length"], 16);
        assert_eq!(result["token_field"], "authenticity_token");
        assert_eq!(result.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = ConfigLoader::new(FileFormat::Json)
            .parse("{not json")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "JSON", .. }));

        let err = ConfigLoader::new(FileFormat::Toml)
            .parse("= broken")
            .unwrap_err();
        assert!(err.to_string().starts_with("malformed TOML configuration"));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("yaml"), None);
        assert_eq!(FileFormat::detect(Path::new(".env")), Some(FileFormat::Env));
        assert_eq!(
            ConfigLoader::auto("conf/csrf.toml").unwrap().format(),
            FileFormat::Toml
        );
        assert!(matches!(
            ConfigLoader::auto("csrf"),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new(FileFormat::Toml)
            .load_file("/nonexistent/rampart.toml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
