//! # Gameplay Systems
//!
//! | System            | Priority | Archetype | Writes back         |
//! |-------------------|----------|-----------|---------------------|
//! | `MovementSystem`  | 100      | Movers    | `Transform`         |
//! | `FootstepSystem`  | 200      | Walkers   | `NoiseEmitter`      |
//! | `SoundSystem`     | 300      | -         | -                   |
//! | `TrackerSystem`   | 400      | Placed    | `LastKnownPosition` |

pub mod footsteps;
pub mod movement;
pub mod sound;
pub mod tracker;

pub use footsteps::FootstepSystem;
pub use movement::MovementSystem;
pub use sound::{SoundEvent, SoundSystem};
pub use tracker::TrackerSystem;

use umbra_core::{ComponentSet, RuntimeResult, World};

/// Entities with `Transform` and `Velocity`.
pub const MOVERS: &str = "Movers";
/// Entities with `Transform`, `Velocity` and `NoiseEmitter`.
pub const WALKERS: &str = "Walkers";
/// Entities with `Transform`.
pub const PLACED: &str = "Placed";

/// Registers `name` unless another system already did.
pub(crate) fn ensure_archetype(
    world: &mut World,
    name: &str,
    required: ComponentSet,
) -> RuntimeResult<()> {
    if world.archetype(name).is_err() {
        world.register_archetype(name, required)?;
    }
    Ok(())
}
