//! # Archetype Registry
//!
//! Archetypes are named filters over the per-entity type index. Each one
//! keeps an incrementally maintained list of the entities that currently
//! match it.
//!
//! ## Matching Rule
//!
//! An entity matches an archetype iff its attached type set is a **superset**
//! of the archetype's required set:
//!
//! ```text
//! Archetype "Movers" requires {Transform, Velocity}
//!
//! entity 1: {Transform, Velocity}           -> member
//! entity 2: {Transform, Velocity, Noise}    -> member
//! entity 3: {Transform}                     -> not a member
//! ```
//!
//! ## Membership Maintenance
//!
//! - Registration scans every live entity once: O(entities)
//! - A component add/remove re-tests only the mutated entity against every
//!   archetype: O(archetypes)
//! - Each archetype keeps an entity id -> slot arena so joining and leaving
//!   are O(1)

use std::collections::HashMap;

use super::component::ComponentMask;
use super::entity::Entity;
use crate::error::{RuntimeError, RuntimeResult};

const EMPTY: u32 = u32::MAX;

/// A named filter with live membership.
#[derive(Debug)]
pub struct Archetype {
    name: String,
    required: ComponentMask,
    required_names: Vec<&'static str>,
    /// Current members. Removal swaps the last member into the freed slot.
    members: Vec<Entity>,
    /// Entity id -> index into `members`, `EMPTY` when not a member.
    slots: Vec<u32>,
}

impl Archetype {
    fn new(name: String, required: ComponentMask, required_names: Vec<&'static str>) -> Self {
        Self {
            name,
            required,
            required_names,
            members: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// The archetype's registered name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The required component set.
    #[inline]
    #[must_use]
    pub fn required(&self) -> &ComponentMask {
        &self.required
    }

    /// `NAME` tags of the required component types, in declaration order.
    #[inline]
    #[must_use]
    pub fn required_names(&self) -> &[&'static str] {
        &self.required_names
    }

    /// Checks whether an entity with this type set belongs here.
    #[inline]
    #[must_use]
    pub fn matches(&self, mask: &ComponentMask) -> bool {
        mask.is_superset_of(&self.required)
    }

    /// Checks whether the archetype requires the component `NAME`.
    #[must_use]
    pub fn requires(&self, component: &str) -> bool {
        self.required_names.iter().any(|&name| name == component)
    }

    /// Current members as a read-only view.
    ///
    /// The order is deterministic: entities appear in the order they joined,
    /// except that a leaving entity's position is taken by the last member.
    /// Copy the slice (`to_vec()`) before mutating the world mid-iteration.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.members
    }

    /// Checks whether `entity` is currently a member.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        matches!(self.slots.get(entity.slot()), Some(&slot) if slot != EMPTY)
    }

    /// Number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Checks if there are no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds `entity` unless it is already a member. Returns `true` if added.
    fn join(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        let slot = entity.slot();
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, EMPTY);
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = self.members.len() as u32;
        self.slots[slot] = index;
        self.members.push(entity);
        true
    }

    /// Removes `entity` if it is a member. Returns `true` if removed.
    fn leave(&mut self, entity: Entity) -> bool {
        let index = match self.slots.get(entity.slot()) {
            Some(&index) if index != EMPTY => index as usize,
            _ => return false,
        };
        self.slots[entity.slot()] = EMPTY;

        let last = self.members.len() - 1;
        if index != last {
            let moved = self.members[last];
            #[allow(clippy::cast_possible_truncation)]
            let new_index = index as u32;
            self.slots[moved.slot()] = new_index;
        }
        self.members.swap_remove(index);
        true
    }

    /// Brings membership of `entity` in line with its current type set.
    fn sync(&mut self, entity: Entity, mask: &ComponentMask) {
        if self.matches(mask) {
            self.join(entity);
        } else {
            self.leave(entity);
        }
    }
}

/// All archetypes of a world, keyed by name.
#[derive(Debug, Default)]
pub struct ArchetypeRegistry {
    archetypes: Vec<Archetype>,
    by_name: HashMap<String, usize>,
}

impl ArchetypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter and seeds it from `live` entities.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if the name is taken.
    pub(crate) fn register<'a>(
        &mut self,
        name: &str,
        required: ComponentMask,
        required_names: Vec<&'static str>,
        live: impl Iterator<Item = (Entity, &'a ComponentMask)>,
    ) -> RuntimeResult<&Archetype> {
        if self.by_name.contains_key(name) {
            return Err(RuntimeError::InvalidArgument(format!(
                "archetype `{name}` is already registered"
            )));
        }

        let mut archetype = Archetype::new(name.to_owned(), required, required_names);
        for (entity, mask) in live {
            if archetype.matches(mask) {
                archetype.join(entity);
            }
        }

        let index = self.archetypes.len();
        self.archetypes.push(archetype);
        self.by_name.insert(name.to_owned(), index);
        Ok(&self.archetypes[index])
    }

    /// Looks up an archetype by name.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ArchetypeNotFound`] for unknown names.
    pub fn get(&self, name: &str) -> RuntimeResult<&Archetype> {
        self.by_name
            .get(name)
            .map(|&index| &self.archetypes[index])
            .ok_or_else(|| RuntimeError::ArchetypeNotFound(name.to_owned()))
    }

    /// Re-tests one entity against every archetype.
    pub(crate) fn sync_entity(&mut self, entity: Entity, mask: &ComponentMask) {
        for archetype in &mut self.archetypes {
            archetype.sync(entity, mask);
        }
    }

    /// Drops a destroyed entity from every archetype.
    pub(crate) fn remove_entity(&mut self, entity: Entity) {
        for archetype in &mut self.archetypes {
            archetype.leave(entity);
        }
    }

    /// Iterates archetypes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Archetype> {
        self.archetypes.iter()
    }

    /// Number of registered archetypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Checks if no archetype is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
