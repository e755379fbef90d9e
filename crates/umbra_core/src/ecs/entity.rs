//! # Entity Management
//!
//! Entities are opaque integer handles. Ids are handed out monotonically and
//! are never recycled within one [`World`](super::World), so a handle kept
//! across ticks can never alias a different entity later on.
//!
//! The per-entity [`TypeIndex`] lives here as well: it records which
//! component kinds are attached to each live entity.

use std::fmt;

use super::component::{ComponentKind, ComponentMask};

/// Unique identifier for an entity.
///
/// Equality is by id. The handle carries no payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Null/invalid entity handle. Never returned by allocation.
    pub const NULL: Self = Self(u64::MAX);

    /// Wraps a raw id.
    ///
    /// Mostly useful for collaborators that persist ids externally. A handle
    /// built this way is only meaningful if the id was allocated by the same
    /// world.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Checks if this handle is the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Arena slot for this entity.
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(null)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

/// Monotonic id allocator.
#[derive(Debug, Default)]
pub(crate) struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    /// Hands out the next id. O(1), never reuses.
    #[inline]
    pub(crate) fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }

    /// Number of ids handed out so far.
    #[inline]
    pub(crate) const fn allocated(&self) -> u64 {
        self.next
    }
}

/// Per-entity record of attached component kinds.
///
/// Stored as an arena indexed by entity id. A `None` slot is either a
/// destroyed entity or an id that was never allocated.
#[derive(Debug, Default)]
pub(crate) struct TypeIndex {
    slots: Vec<Option<ComponentMask>>,
    live: usize,
}

impl TypeIndex {
    /// Creates an index with room for `capacity` entities.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    /// Allocates an empty entry for a freshly created entity.
    pub(crate) fn insert(&mut self, entity: Entity) {
        let slot = entity.slot();
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        debug_assert!(self.slots[slot].is_none(), "entity id allocated twice");
        self.slots[slot] = Some(ComponentMask::default());
        self.live += 1;
    }

    /// Deletes an entity's entry, returning its final type set.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<ComponentMask> {
        let mask = self.slots.get_mut(entity.slot())?.take()?;
        self.live -= 1;
        Some(mask)
    }

    #[inline]
    pub(crate) fn get(&self, entity: Entity) -> Option<&ComponentMask> {
        self.slots.get(entity.slot())?.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, entity: Entity) -> Option<&mut ComponentMask> {
        self.slots.get_mut(entity.slot())?.as_mut()
    }

    #[inline]
    pub(crate) fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Tests whether `entity` is alive and carries `kind`.
    #[inline]
    pub(crate) fn has(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.get(entity).is_some_and(|mask| mask.contains(kind))
    }

    /// Number of live entities.
    #[inline]
    pub(crate) const fn live(&self) -> usize {
        self.live
    }

    /// Iterates live entities with their type sets, ascending by id.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Entity, &ComponentMask)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, mask)| mask.as_ref().map(|m| (Entity(slot as u64), m)))
    }
}
