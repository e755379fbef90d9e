//! # Capture and Restore
//!
//! Serialized form of one entity:
//!
//! ```json
//! { "id": 12, "components": [ { "type": "Transform", "data": { ... } } ] }
//! ```
//!
//! Ids are never reused by a world, so restore cannot bring an entity back
//! under its old id. It creates fresh entities and returns the mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use umbra_core::{Entity, RuntimeError, World};

use crate::error::{SnapshotError, SnapshotResult};
use crate::manifest::ComponentManifest;

/// One persisted component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// The component's `NAME` tag.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// The encoded value.
    pub data: Value,
}

/// One persisted entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Id the entity had in the world it was captured from.
    pub id: u64,
    /// Manifested components, in the world's kind order.
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

/// Captures `entities` from `world`.
///
/// Components whose type is not in `manifest` are skipped.
///
/// # Errors
///
/// Returns [`SnapshotError::Runtime`] if an entity is not alive, or
/// [`SnapshotError::Json`] if a component fails to encode.
pub fn capture(
    world: &World,
    manifest: &ComponentManifest,
    entities: impl IntoIterator<Item = Entity>,
) -> SnapshotResult<Vec<EntitySnapshot>> {
    let mut snapshots = Vec::new();
    for entity in entities {
        let mut components = Vec::new();
        for tag in world.component_names(entity)? {
            match manifest.encode(tag, world, entity) {
                Some(data) => components.push(ComponentRecord {
                    type_tag: tag.to_owned(),
                    data: data?,
                }),
                None => debug!(%entity, component = tag, "not in manifest; skipped"),
            }
        }
        snapshots.push(EntitySnapshot {
            id: entity.id(),
            components,
        });
    }
    Ok(snapshots)
}

/// Restores `snapshots` into `world` as fresh entities.
///
/// Either every snapshot is restored or none is: on failure the entities
/// created so far are destroyed again.
///
/// # Returns
///
/// `(captured id, new entity)` pairs, in input order.
///
/// # Errors
///
/// Returns [`SnapshotError::UnknownType`] for a record whose tag is not in
/// `manifest`, and [`SnapshotError::Json`] for a record that fails to decode.
pub fn restore(
    world: &mut World,
    manifest: &ComponentManifest,
    snapshots: &[EntitySnapshot],
) -> SnapshotResult<Vec<(u64, Entity)>> {
    if let Some(record) = snapshots
        .iter()
        .flat_map(|snapshot| &snapshot.components)
        .find(|record| !manifest.contains(&record.type_tag))
    {
        return Err(SnapshotError::UnknownType(record.type_tag.clone()));
    }

    let mut remap = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let entity = world.create_entity();
        remap.push((snapshot.id, entity));
        for record in &snapshot.components {
            if let Err(err) = manifest.decode(&record.type_tag, world, entity, &record.data) {
                for &(_, created) in &remap {
                    world.destroy_entity(created);
                }
                return Err(err);
            }
        }
    }
    debug!(entities = remap.len(), "snapshot restored");
    Ok(remap)
}

/// Serializes snapshots as a JSON array.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if serialization fails.
pub fn to_json(snapshots: &[EntitySnapshot]) -> SnapshotResult<String> {
    Ok(serde_json::to_string_pretty(snapshots)?)
}

/// Parses snapshots from a JSON array.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] for malformed input.
pub fn from_json(source: &str) -> SnapshotResult<Vec<EntitySnapshot>> {
    Ok(serde_json::from_str(source)?)
}

impl EntitySnapshot {
    /// Looks up a record by tag.
    #[must_use]
    pub fn component(&self, tag: &str) -> Option<&ComponentRecord> {
        self.components.iter().find(|record| record.type_tag == tag)
    }

    /// Resolves the captured id in `remap`, as returned by [`restore`].
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::EntityNotFound`] if the id was not restored.
    pub fn resolve(&self, remap: &[(u64, Entity)]) -> Result<Entity, RuntimeError> {
        remap
            .iter()
            .find(|(old, _)| *old == self.id)
            .map(|&(_, entity)| entity)
            .ok_or(RuntimeError::EntityNotFound(Entity::from_raw(self.id)))
    }
}
