//! # Simulation Error Types

use thiserror::Error;
use umbra_core::{ConfigError, RuntimeError};
use umbra_snapshot::SnapshotError;

/// Errors surfaced by the simulation harness.
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration could not be loaded.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// The runtime or a system failed.
    #[error("runtime: {0}")]
    Runtime(#[from] RuntimeError),

    /// Writing harness output failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Saving or loading entities failed.
    #[error("snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Result alias for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
