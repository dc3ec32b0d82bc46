// Error types for configuration management

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration key `{0}` is not set")]
    KeyNotFound(String),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot tell the format of {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("malformed {format} configuration: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("invalid `{key}`: {reason}")]
    Invalid { key: String, reason: String },

    #[error("`{key}` has the wrong shape: {message}")]
    Shape { key: String, message: String },

    #[error("dotenv: {0}")]
    Dotenv(String),

    #[error(transparent)]
    Env(#[from] std::env::VarError),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Key the error is about, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            ConfigError::KeyNotFound(key)
            | ConfigError::Invalid { key, .. }
            | ConfigError::Shape { key, .. } => Some(key),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
