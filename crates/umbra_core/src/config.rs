//! # Runtime Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file at all) yields a working world.
//!
//! ```toml
//! initial_entity_capacity = 4096
//! max_delta_time = 0.25
//! trace_ticks = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Entity slots reserved up front in the type index.
    pub initial_entity_capacity: usize,
    /// Upper bound for one tick's delta in seconds. Larger deltas are
    /// clamped. `None` disables clamping.
    pub max_delta_time: Option<f32>,
    /// Emit a `trace` event per system per tick.
    pub trace_ticks: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            initial_entity_capacity: 1024,
            max_delta_time: None,
            trace_ticks: false,
        }
    }
}

impl RuntimeConfig {
    /// Parses a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`RuntimeConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `max_delta_time` is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(max) = self.max_delta_time {
            if !max.is_finite() || max <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_delta_time must be positive and finite, got {max}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let config = RuntimeConfig::from_toml_str(
            "initial_entity_capacity = 16\nmax_delta_time = 0.5\ntrace_ticks = true\n",
        )
        .unwrap();
        assert_eq!(config.initial_entity_capacity, 16);
        assert_eq!(config.max_delta_time, Some(0.5));
        assert!(config.trace_ticks);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = RuntimeConfig::from_toml_str("tick_rate = 60").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_non_positive_max_delta() {
        let err = RuntimeConfig::from_toml_str("max_delta_time = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RuntimeConfig::load("/definitely/not/here/umbra.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
