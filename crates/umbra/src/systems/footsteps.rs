//! # Footsteps
//!
//! Turns distance travelled into sound events. Runs after movement so it
//! sees this tick's positions, and before the sound system so its events are
//! published in the same tick.

use std::cell::RefCell;
use std::rc::Rc;

use umbra_core::{Component, ComponentSet, RuntimeResult, System, World};

use super::sound::{SoundEvent, SoundSystem};
use super::{ensure_archetype, WALKERS};
use crate::components::{NoiseEmitter, Transform, Velocity};

/// Most footsteps one entity emits in a single tick. Distance beyond that is
/// walked silently.
pub const MAX_STEPS_PER_TICK: u16 = 4;

/// Emits a footstep every `stride` units an entity travels.
pub struct FootstepSystem {
    sound: Rc<RefCell<SoundSystem>>,
}

impl FootstepSystem {
    /// Execution priority.
    pub const PRIORITY: i32 = 200;

    /// Creates a footstep system that reports to `sound`.
    #[must_use]
    pub fn new(sound: Rc<RefCell<SoundSystem>>) -> Self {
        Self { sound }
    }
}

impl System for FootstepSystem {
    fn name(&self) -> &str {
        "footsteps"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn initialize(&mut self, world: &mut World) -> RuntimeResult<()> {
        ensure_archetype(
            world,
            WALKERS,
            ComponentSet::new()
                .with::<Transform>()
                .with::<Velocity>()
                .with::<NoiseEmitter>(),
        )
    }

    fn update(&mut self, world: &mut World, delta_time: f32) -> RuntimeResult<()> {
        for entity in world.archetype(WALKERS)?.entities().to_vec() {
            let speed = world.get_component::<Velocity>(entity)?.linear.length();
            if speed <= 0.0 {
                continue;
            }
            let position = world.get_component::<Transform>(entity)?.position;
            let mut emitter = world.get_component::<NoiseEmitter>(entity)?;

            emitter.travelled += speed * delta_time;
            if emitter.stride <= 0.0 {
                emitter.travelled = 0.0;
            } else if emitter.travelled >= emitter.stride {
                let steps = (emitter.travelled / emitter.stride).floor();
                emitter.travelled = if emitter.travelled.is_finite() {
                    emitter.travelled % emitter.stride
                } else {
                    0.0
                };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let steps = steps.min(f32::from(MAX_STEPS_PER_TICK)) as u16;

                let mut sound = self.sound.borrow_mut();
                for _ in 0..steps {
                    sound.emit(SoundEvent {
                        source: entity,
                        position,
                        loudness: emitter.loudness,
                    });
                }
            }
            world.add_component(entity, emitter)?;
        }
        Ok(())
    }
}
