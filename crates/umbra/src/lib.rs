//! # UMBRA
//!
//! Gameplay layer on top of [`umbra_core`].
//!
//! ## Tick Order
//!
//! ```text
//! priority:  100           200              300           400
//!         [Movement] -> [Footsteps] --emit--> [Sound] -> [Tracker]
//!          writes         writes              drains       caches
//!          Transform      NoiseEmitter        events       positions
//! ```
//!
//! Footsteps reach the sound system through a shared handle handed over at
//! construction, not through the component model.
//!
//! ## Modules
//!
//! - `components`: gameplay component types
//! - `systems`: the four gameplay systems
//! - `config`: harness configuration
//! - `simulation`: world assembly used by the harness and tests

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod components;
pub mod config;
pub mod error;
pub mod simulation;
pub mod systems;

// Re-export the runtime
pub use umbra_core as core;
pub use umbra_snapshot as snapshot;

pub use components::{LastKnownPosition, NoiseEmitter, Transform, Vec3, Velocity};
pub use config::HarnessConfig;
pub use error::{SimError, SimResult};
pub use simulation::Simulation;
pub use systems::{FootstepSystem, MovementSystem, SoundEvent, SoundSystem, TrackerSystem};
