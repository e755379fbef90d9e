//! # Tracker
//!
//! Remembers where placed entities were last seen. The cache is keyed by
//! entity handle; handles are checked for liveness before they are resolved,
//! and entries for destroyed entities are dropped every tick.
//!
//! Each sighting is also written back onto the entity as a
//! [`LastKnownPosition`], which outlives the entity's `Transform` and is
//! persisted with it.

use std::collections::HashMap;

use tracing::debug;
use umbra_core::{ComponentSet, Entity, RuntimeResult, System, World};

use super::{ensure_archetype, PLACED};
use crate::components::{LastKnownPosition, Transform};

/// Caches the last known position of every entity with a `Transform`.
#[derive(Debug, Default)]
pub struct TrackerSystem {
    cache: HashMap<Entity, LastKnownPosition>,
}

impl TrackerSystem {
    /// Execution priority.
    pub const PRIORITY: i32 = 400;

    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last sighting of `entity`, or `None` if it was never seen or is no
    /// longer alive.
    #[must_use]
    pub fn last_known(&self, world: &World, entity: Entity) -> Option<LastKnownPosition> {
        if !world.is_alive(entity) {
            return None;
        }
        self.cache.get(&entity).copied()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Checks if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl System for TrackerSystem {
    fn name(&self) -> &str {
        "tracker"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn initialize(&mut self, world: &mut World) -> RuntimeResult<()> {
        ensure_archetype(world, PLACED, ComponentSet::new().with::<Transform>())
    }

    fn update(&mut self, world: &mut World, _delta_time: f32) -> RuntimeResult<()> {
        let before = self.cache.len();
        self.cache.retain(|entity, _| world.is_alive(*entity));
        if self.cache.len() < before {
            debug!(dropped = before - self.cache.len(), "dropped stale tracker entries");
        }

        let tick = world.tick();
        for entity in world.archetype(PLACED)?.entities().to_vec() {
            let sighting = LastKnownPosition {
                position: world.get_component::<Transform>(entity)?.position,
                tick,
            };
            self.cache.insert(entity, sighting);
            world.add_component(entity, sighting)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec3;

    #[test]
    fn test_keeps_last_sighting_after_transform_removed() {
        let mut world = World::new();
        let mut tracker = TrackerSystem::new();
        tracker.initialize(&mut world).unwrap();

        let e = world.create_entity();
        world.add_component(e, Transform::at(Vec3::new(1.0, 2.0, 3.0))).unwrap();
        tracker.update(&mut world, 0.1).unwrap();

        let sighting = world.get_component::<LastKnownPosition>(e).unwrap();
        assert_eq!(sighting.position, Vec3::new(1.0, 2.0, 3.0));

        world.remove_component::<Transform>(e);
        tracker.update(&mut world, 0.1).unwrap();
        assert_eq!(
            tracker.last_known(&world, e).unwrap().position,
            Vec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(world.get_component::<LastKnownPosition>(e).unwrap(), sighting);
    }

    #[test]
    fn test_destroyed_entities_are_never_resolved() {
        let mut world = World::new();
        let mut tracker = TrackerSystem::new();
        tracker.initialize(&mut world).unwrap();

        let e = world.create_entity();
        world.add_component(e, Transform::default()).unwrap();
        tracker.update(&mut world, 0.1).unwrap();
        assert_eq!(tracker.len(), 1);

        world.destroy_entity(e);
        // Stale before the next update, but still not resolvable.
        assert!(tracker.last_known(&world, e).is_none());
        tracker.update(&mut world, 0.1).unwrap();
        assert!(tracker.is_empty());
    }
}
