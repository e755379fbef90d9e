//! # Component Manifest
//!
//! The explicit list of persistable component types. Each entry is built
//! from the concrete type at registration, so capture and restore never need
//! to inspect types at runtime.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use umbra_core::{Component, ComponentKind, Entity, RuntimeResult, World};

use crate::error::{SnapshotError, SnapshotResult};

/// Reads an entity's component and encodes it, if present.
type EncodeFn = Box<dyn Fn(&World, Entity) -> Option<serde_json::Result<Value>>>;

/// Decodes a record and attaches it to an entity.
type DecodeFn = Box<dyn Fn(&mut World, Entity, &Value) -> SnapshotResult<()>>;

/// Registers the type with a world.
type PrepareFn = fn(&mut World) -> RuntimeResult<ComponentKind>;

struct ManifestEntry {
    tag: &'static str,
    encode: EncodeFn,
    decode: DecodeFn,
    prepare: PrepareFn,
}

/// Registration-time list of `(type tag, encoder, decoder)` entries.
#[derive(Default)]
pub struct ComponentManifest {
    entries: Vec<ManifestEntry>,
    by_tag: HashMap<&'static str, usize>,
}

impl fmt::Debug for ComponentManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tags()).finish()
    }
}

impl ComponentManifest {
    /// Creates an empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T` under its `NAME` tag.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::DuplicateTag`] if the tag is already listed.
    pub fn register<T>(&mut self) -> SnapshotResult<&mut Self>
    where
        T: Component + Serialize + DeserializeOwned,
    {
        if self.by_tag.contains_key(T::NAME) {
            return Err(SnapshotError::DuplicateTag(T::NAME.to_owned()));
        }
        self.by_tag.insert(T::NAME, self.entries.len());
        self.entries.push(ManifestEntry {
            tag: T::NAME,
            encode: Box::new(|world, entity| {
                world
                    .try_get_component::<T>(entity)
                    .map(serde_json::to_value)
            }),
            decode: Box::new(|world, entity, data| {
                let value: T = serde_json::from_value(data.clone())?;
                world.add_component(entity, value)?;
                Ok(())
            }),
            prepare: World::register_component::<T>,
        });
        Ok(self)
    }

    /// Registers every listed type with `world`, so archetypes can refer to
    /// them by name before any entity carries them.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Runtime`] if a tag collides with a different
    /// type already registered in the world.
    pub fn prepare(&self, world: &mut World) -> SnapshotResult<()> {
        for entry in &self.entries {
            (entry.prepare)(world)?;
        }
        Ok(())
    }

    /// Checks whether `tag` is listed.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Listed tags, in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.tag)
    }

    /// Number of listed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if no type is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn encode(
        &self,
        tag: &str,
        world: &World,
        entity: Entity,
    ) -> Option<serde_json::Result<Value>> {
        let entry = &self.entries[*self.by_tag.get(tag)?];
        (entry.encode)(world, entity)
    }

    pub(crate) fn decode(
        &self,
        tag: &str,
        world: &mut World,
        entity: Entity,
        data: &Value,
    ) -> SnapshotResult<()> {
        let index = *self
            .by_tag
            .get(tag)
            .ok_or_else(|| SnapshotError::UnknownType(tag.to_owned()))?;
        (self.entries[index].decode)(world, entity, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Mana {
        current: u32,
        max: u32,
    }
    impl Component for Mana {
        const NAME: &'static str = "Mana";
    }

    /// Different type, same tag.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    struct FakeMana;
    impl Component for FakeMana {
        const NAME: &'static str = "Mana";
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut manifest = ComponentManifest::new();
        manifest.register::<Mana>().unwrap();
        let err = manifest.register::<FakeMana>().unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateTag(tag) if tag == "Mana"));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_prepare_registers_with_world() {
        let mut manifest = ComponentManifest::new();
        manifest.register::<Mana>().unwrap();
        let mut world = World::new();
        manifest.prepare(&mut world).unwrap();
        assert!(world.components().kind_by_name("Mana").is_some());
        world.register_archetype_by_names("Casters", &["Mana"]).unwrap();
    }

    #[test]
    fn test_encode_decode_through_entries() {
        let mut manifest = ComponentManifest::new();
        manifest.register::<Mana>().unwrap();
        let mut world = World::new();
        let e = world.create_entity();
        assert!(manifest.encode("Mana", &world, e).is_none());

        world.add_component(e, Mana { current: 3, max: 10 }).unwrap();
        let data = manifest.encode("Mana", &world, e).unwrap().unwrap();
        assert_eq!(data, serde_json::json!({ "current": 3, "max": 10 }));

        let other = world.create_entity();
        manifest.decode("Mana", &mut world, other, &data).unwrap();
        assert_eq!(world.get_component::<Mana>(other).unwrap(), Mana { current: 3, max: 10 });

        let err = manifest.decode("Stamina", &mut world, other, &data).unwrap_err();
        assert!(matches!(err, SnapshotError::UnknownType(_)));
    }
}
