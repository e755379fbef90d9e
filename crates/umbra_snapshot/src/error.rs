//! # Snapshot Error Types

use thiserror::Error;
use umbra_core::RuntimeError;

/// Errors raised while capturing or restoring snapshots.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The runtime rejected an operation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A record failed to encode or decode.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// A record names a type the manifest does not know.
    #[error("unknown component type `{0}` (not in the manifest)")]
    UnknownType(String),

    /// A type tag was registered twice.
    #[error("component type `{0}` is already in the manifest")]
    DuplicateTag(String),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_core::Entity;

    #[test]
    fn test_runtime_errors_pass_through() {
        let err: SnapshotError = RuntimeError::EntityNotFound(Entity::from_raw(4)).into();
        assert!(matches!(err, SnapshotError::Runtime(RuntimeError::EntityNotFound(_))));
        assert_eq!(err.to_string(), RuntimeError::EntityNotFound(Entity::from_raw(4)).to_string());
    }

    #[test]
    fn test_messages_name_the_tag() {
        assert!(SnapshotError::UnknownType("Mana".into()).to_string().contains("Mana"));
        assert!(SnapshotError::DuplicateTag("Mana".into()).to_string().contains("Mana"));
    }
}
