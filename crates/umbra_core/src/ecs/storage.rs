//! # Component Storage
//!
//! One homogeneous store per concrete component type, mapping entity id to
//! component value.
//!
//! The store is a sparse set:
//! - `sparse` is indexed by entity id and points into the dense arrays
//! - `dense` and `data` are packed and stay parallel under swap-removal
//! - insert, lookup and removal are O(1)
//!
//! Stores are created lazily and held type-erased by the world behind
//! [`ErasedStore`].

use std::any::Any;

use super::component::Component;
use super::entity::Entity;

const EMPTY: u32 = u32::MAX;

/// Storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut store: ComponentStore<Transform> = ComponentStore::new();
/// store.insert(entity, Transform::default());
/// ```
#[derive(Debug)]
pub struct ComponentStore<C: Component> {
    /// Entity id -> dense index, `EMPTY` when absent.
    sparse: Vec<u32>,
    /// Owning entity of each dense slot.
    dense: Vec<Entity>,
    /// Component values, parallel to `dense`.
    data: Vec<C>,
}

impl<C: Component> Default for ComponentStore<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentStore<C> {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            data: Vec::new(),
        }
    }

    #[inline]
    fn dense_index(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity.slot()) {
            Some(&index) if index != EMPTY => Some(index as usize),
            _ => None,
        }
    }

    /// Number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the store is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets a component by entity.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.dense_index(entity).map(|index| &self.data[index])
    }

    /// Inserts or overwrites `entity`'s value.
    ///
    /// # Returns
    ///
    /// The previous value, if there was one.
    pub fn insert(&mut self, entity: Entity, component: C) -> Option<C> {
        if let Some(index) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.data[index], component));
        }

        let slot = entity.slot();
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, EMPTY);
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = self.dense.len() as u32;
        self.sparse[slot] = index;
        self.dense.push(entity);
        self.data.push(component);
        None
    }

    /// Removes `entity`'s value, keeping the dense arrays packed.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if the entity had no entry.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let index = self.dense_index(entity)?;
        self.sparse[entity.slot()] = EMPTY;

        let last = self.dense.len() - 1;
        if index != last {
            let moved = self.dense[last];
            #[allow(clippy::cast_possible_truncation)]
            let new_index = index as u32;
            self.sparse[moved.slot()] = new_index;
        }
        self.dense.swap_remove(index);
        Some(self.data.swap_remove(index))
    }

}

/// Type-erased view of a [`ComponentStore`].
///
/// Lets the world purge a destroyed entity from every store without knowing
/// the concrete types.
pub trait ErasedStore: Any {
    /// Removes `entity`'s entry. Returns `true` if one existed.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Checks if the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upcast for downcasting to the concrete store.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete store.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for ComponentStore<C> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Heat(f32);
    impl Component for Heat {
        const NAME: &'static str = "Heat";
    }

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_store_insert_get() {
        let mut store: ComponentStore<Heat> = ComponentStore::new();
        assert!(store.insert(e(50), Heat(1.5)).is_none());
        assert_eq!(store.get(e(50)), Some(&Heat(1.5)));
        assert!(store.get(e(49)).is_none());
        assert!(store.get(e(5000)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_returns_previous() {
        let mut store: ComponentStore<Heat> = ComponentStore::new();
        store.insert(e(0), Heat(1.0));
        assert_eq!(store.insert(e(0), Heat(2.0)), Some(Heat(1.0)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(e(0)), Some(&Heat(2.0)));
    }

    #[test]
    fn test_store_remove_keeps_others_reachable() {
        let mut store: ComponentStore<Heat> = ComponentStore::new();
        for id in 0..5 {
            store.insert(e(id), Heat(id as f32));
        }
        assert_eq!(store.remove(e(1)), Some(Heat(1.0)));
        assert!(store.remove(e(1)).is_none());

        for id in [0, 2, 3, 4] {
            assert_eq!(store.get(e(id)), Some(&Heat(id as f32)));
        }
        assert_eq!(store.len(), 4);
        assert!(store.get(e(1)).is_none());
    }

    #[test]
    fn test_erased_store_downcast() {
        let mut boxed: Box<dyn ErasedStore> = Box::new(ComponentStore::<Heat>::new());
        boxed
            .as_any_mut()
            .downcast_mut::<ComponentStore<Heat>>()
            .unwrap()
            .insert(e(3), Heat(9.0));
        assert_eq!(boxed.len(), 1);
        assert!(boxed.remove_entity(e(3)));
        assert!(!boxed.remove_entity(e(3)));
        assert!(boxed.is_empty());
    }
}
