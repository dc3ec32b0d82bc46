// Configuration validation

use crate::{ConfigError, Result};
use std::fmt::Display;

/// Settings that can check their own invariants after loading
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Field checks shared by `Validate` impls.
///
/// Every check names the offending key in the returned
/// [`ConfigError::Invalid`].
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject blank strings
    pub fn not_empty(value: &str, key: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::invalid(key, "must not be empty"));
        }
        Ok(())
    }

    pub fn at_least<T: PartialOrd + Display>(value: T, min: T, key: &str) -> Result<()> {
        if value < min {
            return Err(ConfigError::invalid(
                key,
                format!("must be at least {min} (got {value})"),
            ));
        }
        Ok(())
    }

    /// Inclusive bounds
    pub fn in_range<T: PartialOrd + Display>(value: T, min: T, max: T, key: &str) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::invalid(
                key,
                format!("must be within {min}..={max} (got {value})"),
            ));
        }
        Ok(())
    }

    /// Two settings that must not share a value, e.g. two cookie names.
    pub fn distinct(value: &str, other: &str, key: &str, other_key: &str) -> Result<()> {
        if value == other {
            return Err(ConfigError::invalid(
                key,
                format!("must differ from `{other_key}` (both are \"{value}\")"),
            ));
        }
        Ok(())
    }

    /// Fail with `reason` unless `condition` holds.
    pub fn require(condition: bool, key: &str, reason: &str) -> Result<()> {
        if !condition {
            return Err(ConfigError::invalid(key, reason));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("", "field").is_err());
        assert!(ConfigValidator::not_empty("   ", "field").is_err());
    }

    #[test]
    fn test_at_least() {
        assert!(ConfigValidator::at_least(1usize, 1, "salt").is_ok());
        let err = ConfigValidator::at_least(0usize, 1, "salt").unwrap_err();
        assert_eq!(err.to_string(), "invalid `salt`: must be at least 1 (got 0)");
    }

    #[test]
    fn test_in_range() {
        assert!(ConfigValidator::in_range(5, 1, 10, "field").is_ok());
        assert!(ConfigValidator::in_range(10, 1, 10, "field").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 10, "field").is_err());
        assert!(ConfigValidator::in_range(11, 1, 10, "field").is_err());
    }

    #[test]
    fn test_distinct() {
        assert!(ConfigValidator::distinct("a", "b", "x", "y").is_ok());
        let err = ConfigValidator::distinct("a", "a", "x", "y").unwrap_err();
        assert_eq!(err.key(), Some("x"));
    }

    #[test]
    fn test_require() {
        assert!(ConfigValidator::require(true, "k", "never").is_ok());
        let err = ConfigValidator::require(false, "cookie.secure", "needed").unwrap_err();
        assert_eq!(err.to_string(), "invalid `cookie.secure`: needed");
    }
}
