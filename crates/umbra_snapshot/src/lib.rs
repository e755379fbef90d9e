//! # UMBRA Snapshot
//!
//! Saves and loads entities of a [`World`](umbra_core::World).
//!
//! Component types are listed up front in a [`ComponentManifest`]; each entry
//! pairs a type tag (the component's `NAME`) with an encoder and a decoder.
//! Capture walks an entity's type set and encodes every manifested component;
//! restore creates fresh entities and decodes every record onto them.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use umbra_core::{Component, World};
//! use umbra_snapshot::{capture, from_json, restore, to_json, ComponentManifest};
//!
//! #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
//! struct Health(u32);
//! impl Component for Health {
//!     const NAME: &'static str = "Health";
//! }
//!
//! let mut manifest = ComponentManifest::new();
//! manifest.register::<Health>().unwrap();
//!
//! let mut world = World::new();
//! let e = world.create_entity();
//! world.add_component(e, Health(7)).unwrap();
//!
//! let json = to_json(&capture(&world, &manifest, [e]).unwrap()).unwrap();
//!
//! let mut fresh = World::new();
//! let remap = restore(&mut fresh, &manifest, &from_json(&json).unwrap()).unwrap();
//! let (_, restored) = remap[0];
//! assert_eq!(fresh.get_component::<Health>(restored).unwrap(), Health(7));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

mod error;
mod manifest;
mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use manifest::ComponentManifest;
pub use snapshot::{capture, from_json, restore, to_json, ComponentRecord, EntitySnapshot};
