//! # UMBRA Core Runtime
//!
//! Entity/component/archetype runtime for the UMBRA simulation:
//! - entity identity allocation (monotonic, never reused)
//! - typed component storage, read by value and written back explicitly
//! - incremental archetype membership ("which entities have these types?")
//! - priority-ordered, single-threaded system scheduling
//!
//! ## Rules
//!
//! 1. **The world owns everything** - no component reference escapes storage
//! 2. **Copy, mutate, write back** - a mutation that is not added back is lost
//! 3. **Order is contract** - a system sees same-tick writes only from
//!    systems with a smaller priority number
//!
//! ## Example
//!
//! ```rust
//! use umbra_core::{Component, ComponentSet, RuntimeResult, System, World};
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct Position(f32);
//! impl Component for Position {
//!     const NAME: &'static str = "Position";
//! }
//!
//! struct Drift;
//! impl System for Drift {
//!     fn name(&self) -> &str {
//!         "Drift"
//!     }
//!     fn priority(&self) -> i32 {
//!         100
//!     }
//!     fn update(&mut self, world: &mut World, dt: f32) -> RuntimeResult<()> {
//!         let members = world.archetype("Drifters")?.entities().to_vec();
//!         for entity in members {
//!             let mut p = world.get_component::<Position>(entity)?;
//!             p.0 += dt;
//!             world.add_component(entity, p)?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut world = World::new();
//! world
//!     .register_archetype("Drifters", ComponentSet::new().with::<Position>())
//!     .unwrap();
//! let e = world.create_entity();
//! world.add_component(e, Position(0.0)).unwrap();
//! world.register_system(Drift).unwrap();
//! world.update(0.5).unwrap();
//! assert_eq!(world.get_component::<Position>(e).unwrap(), Position(0.5));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RuntimeConfig;
pub use ecs::{
    Archetype, ArchetypeRegistry, Component, ComponentDescriptor, ComponentInfo, ComponentKind,
    ComponentMask, ComponentRegistry, ComponentSet, ComponentStore, Entity, ErasedStore,
    RuntimePhase, SharedSystem, System, World,
};
pub use error::{ConfigError, RuntimeError, RuntimeResult};
