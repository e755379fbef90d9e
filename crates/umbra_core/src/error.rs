//! # Runtime Error Types
//!
//! All errors the entity/component/archetype runtime can raise.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in the runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// `get_component` on an entity that lacks the component.
    #[error("{entity} has no `{component}` component")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: Entity,
        /// `NAME` of the requested component type.
        component: &'static str,
    },

    /// The entity is not alive (destroyed, or never allocated here).
    #[error("{0} is not alive")]
    EntityNotFound(Entity),

    /// No archetype was registered under this name.
    #[error("archetype not found: {0}")]
    ArchetypeNotFound(String),

    /// A registration or call argument violated the runtime's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A system reported its own failure during `initialize` or `update`.
    #[error("system `{system}` failed: {reason}")]
    SystemFailure {
        /// Name of the failing system.
        system: String,
        /// What went wrong.
        reason: String,
    },
}

impl RuntimeError {
    /// Shorthand for building a [`RuntimeError::SystemFailure`].
    pub fn system_failure(system: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SystemFailure {
            system: system.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a lookup failure (missing component, entity, or
    /// archetype). These are always caller bugs and never retryable.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotFound { .. } | Self::EntityNotFound(_) | Self::ArchetypeNotFound(_)
        )
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors raised while loading a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but a value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
