//! # Entity Component System
//!
//! The runtime every gameplay subsystem plugs into.
//!
//! ## Design Philosophy
//!
//! - Entity ids are monotonic and never reused
//! - Components live in per-type sparse sets and are accessed by value
//! - Archetypes are filters over a per-entity type bitset, kept current
//!   incrementally on every add/remove
//! - Systems run once per tick, single-threaded, in priority order

pub mod archetype;
mod component;
mod entity;
mod storage;
mod system;
mod world;

pub use archetype::{Archetype, ArchetypeRegistry};
pub use component::{
    Component, ComponentDescriptor, ComponentInfo, ComponentKind, ComponentMask,
    ComponentRegistry, ComponentSet,
};
pub use entity::Entity;
pub use storage::{ComponentStore, ErasedStore};
pub use system::{SharedSystem, System};
pub use world::{RuntimePhase, World};
