//! # Harness Configuration
//!
//! ```toml
//! ticks = 600
//! delta_time = 0.016666
//! actors = 32
//! snapshot_path = "umbra_snapshot.json"
//!
//! [runtime]
//! max_delta_time = 0.25
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use umbra_core::{ConfigError, RuntimeConfig};

/// Settings for a headless simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Number of fixed ticks to run.
    pub ticks: u64,
    /// Seconds per tick.
    pub delta_time: f32,
    /// Number of actors spawned before the first tick.
    pub actors: usize,
    /// Where to write a snapshot of every entity after the run.
    pub snapshot_path: Option<PathBuf>,
    /// World settings.
    pub runtime: RuntimeConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            delta_time: 1.0 / 60.0,
            actors: 16,
            snapshot_path: None,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl HarnessConfig {
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
    /// same errors as [`HarnessConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges, including the nested runtime section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `delta_time` is negative or not
    /// finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delta_time.is_finite() || self.delta_time < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "delta_time must be finite and non-negative, got {}",
                self.delta_time
            )));
        }
        self.runtime.validate()
    }
}
