//! # Simulation Assembly
//!
//! Builds a world with the gameplay systems registered, spawns actors, and
//! runs fixed ticks. Shared by the `sim_harness` binary and the tests.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};
use umbra_core::{Component, Entity, SharedSystem, World};
use umbra_snapshot::{capture, to_json, ComponentManifest};

use crate::components::{LastKnownPosition, NoiseEmitter, Transform, Vec3, Velocity};
use crate::config::HarnessConfig;
use crate::error::SimResult;
use crate::systems::{FootstepSystem, MovementSystem, SoundSystem, TrackerSystem};

/// A world with the gameplay systems registered.
pub struct Simulation {
    world: World,
    sound: Rc<RefCell<SoundSystem>>,
    tracker: Rc<RefCell<TrackerSystem>>,
    manifest: ComponentManifest,
}

impl Simulation {
    /// Builds the world and registers every gameplay system.
    ///
    /// # Errors
    ///
    /// Propagates a failing system registration.
    pub fn new(config: &HarnessConfig) -> SimResult<Self> {
        let mut world = World::with_config(config.runtime.clone());
        let manifest = gameplay_manifest()?;
        manifest.prepare(&mut world)?;

        let (sound_system, sound) = SharedSystem::new(SoundSystem::new());
        let (tracker_system, tracker) = SharedSystem::new(TrackerSystem::new());

        world.register_system(MovementSystem)?;
        world.register_system(FootstepSystem::new(Rc::clone(&sound)))?;
        world.register_system(sound_system)?;
        world.register_system(tracker_system)?;
        debug!(systems = ?world.system_names().collect::<Vec<_>>(), "simulation assembled");

        Ok(Self {
            world,
            sound,
            tracker,
            manifest,
        })
    }

    /// Spawns `count` actors laid out on a ring. Every other actor is noisy.
    ///
    /// # Errors
    ///
    /// Propagates component attachment failures.
    #[allow(clippy::cast_precision_loss)]
    pub fn spawn_actors(&mut self, count: usize) -> SimResult<Vec<Entity>> {
        let mut spawned = Vec::with_capacity(count);
        for i in 0..count {
            let angle = i as f32 / count.max(1) as f32 * std::f32::consts::TAU;
            let entity = self.world.create_entity();
            self.world.add_component(
                entity,
                Transform::at(Vec3::new(angle.cos() * 10.0, 0.0, angle.sin() * 10.0)),
            )?;
            self.world.add_component(
                entity,
                Velocity {
                    linear: Vec3::new(-angle.sin(), 0.0, angle.cos()) * (1.0 + (i % 3) as f32),
                    angular: 0.0,
                },
            )?;
            if i % 2 == 0 {
                self.world
                    .add_component(entity, NoiseEmitter::configured(|n| n.loudness = 2.0))?;
            }
            spawned.push(entity);
        }
        debug!(actors = count, "actors spawned");
        Ok(spawned)
    }

    /// Runs `ticks` fixed ticks of `delta_time` seconds.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failing tick.
    pub fn run(&mut self, ticks: u64, delta_time: f32) -> SimResult<()> {
        for _ in 0..ticks {
            self.world.update(delta_time)?;
        }
        info!(
            ticks = self.world.tick(),
            entities = self.world.entity_count(),
            sounds = self.sound.borrow().total(),
            tracked = self.tracker.borrow().len(),
            "simulation finished"
        );
        Ok(())
    }

    /// Serializes every live entity's gameplay components as JSON.
    ///
    /// # Errors
    ///
    /// Propagates snapshot failures.
    pub fn snapshot_json(&self) -> SimResult<String> {
        let snapshots = capture(&self.world, &self.manifest, self.world.entities())?;
        Ok(to_json(&snapshots)?)
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Handle to the sound system.
    #[must_use]
    pub fn sound(&self) -> Rc<RefCell<SoundSystem>> {
        Rc::clone(&self.sound)
    }

    /// Handle to the tracker.
    #[must_use]
    pub fn tracker(&self) -> Rc<RefCell<TrackerSystem>> {
        Rc::clone(&self.tracker)
    }

    /// The persisted component types.
    #[must_use]
    pub fn manifest(&self) -> &ComponentManifest {
        &self.manifest
    }
}

/// Manifest of every gameplay component.
///
/// # Errors
///
/// Returns [`SnapshotError::DuplicateTag`](umbra_snapshot::SnapshotError::DuplicateTag)
/// if two gameplay components share a `NAME`.
pub fn gameplay_manifest() -> SimResult<ComponentManifest> {
    let mut manifest = ComponentManifest::new();
    manifest
        .register::<Transform>()?
        .register::<Velocity>()?
        .register::<NoiseEmitter>()?
        .register::<LastKnownPosition>()?;
    Ok(manifest)
}
