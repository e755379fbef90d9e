//! # ECS World
//!
//! The central container for all simulation state. The world is the sole
//! owner of:
//! - the entity id allocator
//! - every component store
//! - the per-entity type index
//! - the archetype registry
//! - the ordered system list
//!
//! Every mutation updates storage, the type index and archetype membership
//! together before returning, so callers never observe them out of step.

use std::fmt;

use tracing::{debug, trace, warn};

use super::archetype::{Archetype, ArchetypeRegistry};
use super::component::{
    Component, ComponentInfo, ComponentKind, ComponentMask, ComponentRegistry, ComponentSet,
};
use super::entity::{Entity, EntityAllocator, TypeIndex};
use super::storage::{ComponentStore, ErasedStore};
use super::system::{Schedule, System};
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};

/// The world's two macro-states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimePhase {
    /// No tick has run yet.
    Configuring,
    /// At least one tick has started.
    Running,
}

/// The ECS World - container for all simulation state.
///
/// # Example
///
/// ```rust
/// use umbra_core::{Component, ComponentSet, World};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Transform {
///     x: f32,
/// }
/// impl Component for Transform {
///     const NAME: &'static str = "Transform";
/// }
///
/// let mut world = World::new();
/// let e = world.create_entity();
/// world.add_component(e, Transform { x: 1.0 }).unwrap();
/// world
///     .register_archetype("Movers", ComponentSet::new().with::<Transform>())
///     .unwrap();
/// assert!(world.archetype("Movers").unwrap().contains(e));
///
/// // Read by value, mutate the copy, write it back.
/// let mut t = world.get_component::<Transform>(e).unwrap();
/// t.x += 1.0;
/// world.add_component(e, t).unwrap();
/// assert_eq!(world.get_component::<Transform>(e).unwrap().x, 2.0);
/// ```
pub struct World {
    config: RuntimeConfig,
    allocator: EntityAllocator,
    type_index: TypeIndex,
    components: ComponentRegistry,
    /// Type-erased stores indexed by component kind, created lazily.
    stores: Vec<Option<Box<dyn ErasedStore>>>,
    archetypes: ArchetypeRegistry,
    schedule: Schedule,
    phase: RuntimePhase,
    tick: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.type_index.live())
            .field("components", &self.components.len())
            .field("archetypes", &self.archetypes.len())
            .field("systems", &self.schedule.len())
            .field("phase", &self.phase)
            .field("tick", &self.tick)
            .finish()
    }
}

impl World {
    /// Creates a world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Creates a world with an explicit configuration.
    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            type_index: TypeIndex::with_capacity(config.initial_entity_capacity),
            config,
            allocator: EntityAllocator::default(),
            components: ComponentRegistry::new(),
            stores: Vec::new(),
            archetypes: ArchetypeRegistry::new(),
            schedule: Schedule::default(),
            phase: RuntimePhase::Configuring,
            tick: 0,
        }
    }

    /// The configuration this world was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Current macro-state.
    #[inline]
    #[must_use]
    pub const fn phase(&self) -> RuntimePhase {
        self.phase
    }

    /// Number of ticks that ran every system to completion.
    #[inline]
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates a new entity with no components. Never fails.
    ///
    /// The entity immediately joins archetypes with an empty required set.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.type_index.insert(entity);
        if let Some(mask) = self.type_index.get(entity) {
            self.archetypes.sync_entity(entity, mask);
        }
        trace!(%entity, "entity created");
        entity
    }

    /// Destroys an entity: every component, its archetype memberships and
    /// its type-index entry are removed before this returns.
    ///
    /// # Returns
    ///
    /// `true` if the entity was alive, `false` if it was already destroyed
    /// (the call is then a no-op).
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        let Some(mask) = self.type_index.remove(entity) else {
            return false;
        };
        for kind in mask.iter() {
            if let Some(Some(store)) = self.stores.get_mut(kind.index() as usize) {
                store.remove_entity(entity);
            }
        }
        self.archetypes.remove_entity(entity);
        trace!(%entity, components = mask.len(), "entity destroyed");
        true
    }

    /// Checks if an entity is alive.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.type_index.contains(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.type_index.live()
    }

    /// Total number of ids ever handed out by this world.
    #[inline]
    #[must_use]
    pub fn entities_created(&self) -> u64 {
        self.allocator.allocated()
    }

    /// Iterates live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.type_index.iter().map(|(entity, _)| entity)
    }

    /// The set of component kinds attached to `entity`.
    #[must_use]
    pub fn type_set(&self, entity: Entity) -> Option<&ComponentMask> {
        self.type_index.get(entity)
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Registers `T` ahead of its first use.
    ///
    /// Attaching a component registers its type implicitly; explicit
    /// registration is only needed to refer to a type by `NAME` (see
    /// [`World::register_archetype_by_names`]) before any entity carries it.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if another type already uses
    /// `T::NAME`.
    pub fn register_component<T: Component>(&mut self) -> RuntimeResult<ComponentKind> {
        self.components.register::<T>()
    }

    /// The component registry.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Every known component type, in kind order.
    #[must_use]
    pub fn registered_components(&self) -> &[ComponentInfo] {
        self.components.infos()
    }

    /// `NAME` tags of the components attached to `entity`, in kind order.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::EntityNotFound`] if the entity is not alive.
    pub fn component_names(&self, entity: Entity) -> RuntimeResult<Vec<&'static str>> {
        let mask = self
            .type_index
            .get(entity)
            .ok_or(RuntimeError::EntityNotFound(entity))?;
        Ok(mask
            .iter()
            .filter_map(|kind| self.components.info(kind).map(|info| info.name))
            .collect())
    }

    /// Attaches `value` to `entity`, overwriting any previous value of `T`.
    ///
    /// This is also the writeback path: a component read with
    /// [`World::get_component`] and mutated locally is only persisted once it
    /// is added back.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::EntityNotFound`] if the entity is not alive,
    /// or [`RuntimeError::InvalidArgument`] if `T::NAME` collides with
    /// another registered type.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> RuntimeResult<()> {
        if !self.type_index.contains(entity) {
            return Err(RuntimeError::EntityNotFound(entity));
        }
        let kind = self.components.register::<T>()?;
        self.store_mut::<T>(kind)?.insert(entity, value);

        let Some(mask) = self.type_index.get_mut(entity) else {
            return Err(RuntimeError::EntityNotFound(entity));
        };
        if mask.insert(kind) {
            self.archetypes.sync_entity(entity, mask);
        }
        Ok(())
    }

    /// Returns a copy of `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ComponentNotFound`] if the entity has no `T`
    /// (including when it is not alive). Guard with
    /// [`World::has_component`] or use [`World::try_get_component`].
    pub fn get_component<T: Component>(&self, entity: Entity) -> RuntimeResult<T> {
        self.try_get_component(entity)
            .ok_or(RuntimeError::ComponentNotFound {
                entity,
                component: T::NAME,
            })
    }

    /// Returns a copy of `entity`'s `T`, or `None`.
    #[must_use]
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Option<T> {
        self.store::<T>()?.get(entity).cloned()
    }

    /// Checks whether `entity` carries a `T`. O(1), never fails.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components
            .kind_of::<T>()
            .is_some_and(|kind| self.type_index.has(entity, kind))
    }

    /// Detaches `T` from `entity`. A no-op if it is absent.
    ///
    /// # Returns
    ///
    /// The removed value, if there was one.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let kind = self.components.kind_of::<T>()?;
        let removed = self
            .stores
            .get_mut(kind.index() as usize)
            .and_then(Option::as_mut)
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStore<T>>())
            .and_then(|store| store.remove(entity));

        if let Some(mask) = self.type_index.get_mut(entity) {
            if mask.remove(kind) {
                self.archetypes.sync_entity(entity, mask);
            }
        }
        removed
    }

    /// Reads `entity`'s `T`, applies `f` to the copy, and writes it back.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ComponentNotFound`] if the entity has no `T`;
    /// `f` is not called in that case.
    pub fn modify_component<T, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut T) -> R,
    ) -> RuntimeResult<R>
    where
        T: Component,
    {
        let mut value = self.get_component::<T>(entity)?;
        let result = f(&mut value);
        self.add_component(entity, value)?;
        Ok(result)
    }

    /// Number of entities carrying a `T`.
    #[must_use]
    pub fn component_count<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, ComponentStore::len)
    }

    fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        let kind = self.components.kind_of::<T>()?;
        self.stores
            .get(kind.index() as usize)?
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
    }

    fn store_mut<T: Component>(&mut self, kind: ComponentKind) -> RuntimeResult<&mut ComponentStore<T>> {
        let index = kind.index() as usize;
        if index >= self.stores.len() {
            self.stores.resize_with(index + 1, || None);
        }
        self.stores[index]
            .get_or_insert_with(|| Box::new(ComponentStore::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or_else(|| {
                RuntimeError::InvalidArgument(format!(
                    "store for kind {} does not hold `{}`",
                    kind.index(),
                    T::NAME
                ))
            })
    }

    // =========================================================================
    // Archetypes
    // =========================================================================

    /// Registers a named archetype and seeds it from every live entity.
    ///
    /// Cost is O(entities); treat this as a configuration-time operation.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if the name is already
    /// registered or a required type's `NAME` collides with another type.
    pub fn register_archetype(
        &mut self,
        name: &str,
        required: ComponentSet,
    ) -> RuntimeResult<&Archetype> {
        let mut mask = ComponentMask::new();
        let mut names = Vec::with_capacity(required.len());
        for descriptor in required.descriptors() {
            mask.insert(self.components.register_descriptor(*descriptor)?);
            names.push(descriptor.name());
        }
        self.register_archetype_mask(name, mask, names)
    }

    /// Registers a named archetype whose required types are given by their
    /// component `NAME` tags.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if any name does not belong
    /// to a registered component type, or the archetype name is taken.
    pub fn register_archetype_by_names(
        &mut self,
        name: &str,
        required: &[&str],
    ) -> RuntimeResult<&Archetype> {
        let mut mask = ComponentMask::new();
        let mut names = Vec::with_capacity(required.len());
        for component in required {
            let kind = self.components.kind_by_name(component).ok_or_else(|| {
                RuntimeError::InvalidArgument(format!(
                    "archetype `{name}` requires `{component}`, which is not a registered component"
                ))
            })?;
            if mask.insert(kind) {
                if let Some(info) = self.components.info(kind) {
                    names.push(info.name);
                }
            }
        }
        self.register_archetype_mask(name, mask, names)
    }

    fn register_archetype_mask(
        &mut self,
        name: &str,
        mask: ComponentMask,
        names: Vec<&'static str>,
    ) -> RuntimeResult<&Archetype> {
        if self.phase == RuntimePhase::Running {
            warn!(
                archetype = name,
                entities = self.type_index.live(),
                "archetype registered while running; scanning every live entity"
            );
        }
        let archetype = self
            .archetypes
            .register(name, mask, names, self.type_index.iter())?;
        debug!(
            archetype = name,
            required = ?archetype.required_names(),
            members = archetype.len(),
            "archetype registered"
        );
        Ok(archetype)
    }

    /// Looks up an archetype. O(1).
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ArchetypeNotFound`] if the name was never
    /// registered.
    pub fn archetype(&self, name: &str) -> RuntimeResult<&Archetype> {
        self.archetypes.get(name)
    }

    /// The archetype registry.
    #[inline]
    #[must_use]
    pub fn archetypes(&self) -> &ArchetypeRegistry {
        &self.archetypes
    }

    /// Names of every archetype, in registration order.
    pub fn archetype_names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.iter().map(Archetype::name)
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers a system: captures its name and priority, calls its
    /// `initialize` once, then slots it into the schedule.
    ///
    /// # Errors
    ///
    /// Propagates a failing `initialize`; the system is then not registered.
    pub fn register_system<S: System + 'static>(&mut self, system: S) -> RuntimeResult<()> {
        let mut entry = self.schedule.entry(Box::new(system));
        entry.system.initialize(self)?;
        debug!(
            system = %entry.name,
            priority = entry.priority,
            "system registered"
        );
        self.schedule.insert(entry);
        Ok(())
    }

    /// System names in execution order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.schedule.names()
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.schedule.len()
    }

    /// Runs one tick: every system's `update`, once, in priority order.
    ///
    /// # Arguments
    ///
    /// * `delta_time` - Seconds since the previous tick. Clamped to
    ///   `max_delta_time` when configured.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] for a negative or non-finite
    /// delta. Otherwise returns the first system failure unchanged; the
    /// systems after it do not run this tick.
    pub fn update(&mut self, delta_time: f32) -> RuntimeResult<()> {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return Err(RuntimeError::InvalidArgument(format!(
                "delta time must be finite and non-negative, got {delta_time}"
            )));
        }
        let delta_time = match self.config.max_delta_time {
            Some(max) if delta_time > max => {
                debug!(delta_time, max, "clamping tick delta");
                max
            }
            _ => delta_time,
        };
        self.phase = RuntimePhase::Running;

        let mut entries = self.schedule.take();
        let mut outcome = Ok(());
        for entry in &mut entries {
            if self.config.trace_ticks {
                trace!(tick = self.tick, system = %entry.name, priority = entry.priority, "running system");
            }
            if let Err(err) = entry.system.update(self, delta_time) {
                warn!(
                    tick = self.tick,
                    system = %entry.name,
                    error = %err,
                    "system failed; aborting remaining systems this tick"
                );
                outcome = Err(err);
                break;
            }
        }
        self.schedule.restore(entries);

        if outcome.is_ok() {
            self.tick += 1;
        }
        outcome
    }
}
