//! # Component System
//!
//! Components are pure data containers with no behavior. They are read by
//! value and written back explicitly; nothing outside the world ever holds a
//! reference into component storage.
//!
//! Every concrete component type gets a dense [`ComponentKind`] the first time
//! the world sees it. Kinds index into [`ComponentMask`], the per-entity
//! bitset that archetype matching runs on.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::error::{RuntimeError, RuntimeResult};

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Clone`: accessors hand out copies, never references
/// - `Default`: the zero-argument default-value factory
/// - `'static`: stored type-erased inside the world
///
/// # Example
///
/// ```rust
/// use umbra_core::Component;
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Health {
///     current: u32,
///     max: u32,
/// }
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
/// }
///
/// let full = Health::configured(|h| {
///     h.max = 100;
///     h.current = 100;
/// });
/// assert_eq!(full.current, 100);
/// ```
pub trait Component: Clone + Default + 'static {
    /// Stable tag for this component type.
    ///
    /// Used by name-based archetype declarations and by persistence
    /// collaborators. Must be unique across the component types of a world.
    const NAME: &'static str;

    /// Builds a value from [`Default`] and applies `configure` to it.
    #[must_use]
    fn configured(configure: impl FnOnce(&mut Self)) -> Self {
        let mut value = Self::default();
        configure(&mut value);
        value
    }
}

/// Dense runtime identifier for a registered component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentKind(u16);

impl ComponentKind {
    /// Wraps a raw kind index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u16) -> Self {
        Self(index)
    }

    /// Returns the raw kind index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    #[inline]
    const fn word(self) -> usize {
        self.0 as usize / 64
    }

    #[inline]
    const fn bit(self) -> u64 {
        1u64 << (self.0 % 64)
    }
}

/// Growable bitset of component kinds.
///
/// One bit per [`ComponentKind`], 64 kinds per word. Trailing zero words are
/// trimmed so that equal sets always compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ComponentMask {
    words: Vec<u64>,
}

impl ComponentMask {
    /// Creates an empty mask.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Checks whether `kind` is in the set.
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.words
            .get(kind.word())
            .is_some_and(|word| word & kind.bit() != 0)
    }

    /// Adds `kind`. Returns `true` if it was not already present.
    pub fn insert(&mut self, kind: ComponentKind) -> bool {
        let word = kind.word();
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let was_absent = self.words[word] & kind.bit() == 0;
        self.words[word] |= kind.bit();
        was_absent
    }

    /// Removes `kind`. Returns `true` if it was present.
    pub fn remove(&mut self, kind: ComponentKind) -> bool {
        let Some(word) = self.words.get_mut(kind.word()) else {
            return false;
        };
        let was_present = *word & kind.bit() != 0;
        *word &= !kind.bit();
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
        was_present
    }

    /// Checks whether every kind in `required` is also in `self`.
    #[must_use]
    pub fn is_superset_of(&self, required: &Self) -> bool {
        required.words.iter().enumerate().all(|(i, &need)| {
            let have = self.words.get(i).copied().unwrap_or(0);
            have & need == need
        })
    }

    /// Number of kinds in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Checks if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates the kinds in the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let bit = bits.trailing_zeros();
                bits &= bits - 1;
                #[allow(clippy::cast_possible_truncation)]
                let kind = ComponentKind((i * 64) as u16 + bit as u16);
                Some(kind)
            })
        })
    }
}

impl FromIterator<ComponentKind> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = ComponentKind>>(iter: I) -> Self {
        let mut mask = Self::new();
        for kind in iter {
            mask.insert(kind);
        }
        mask
    }
}

/// Static description of a component type, captured before registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentDescriptor {
    type_id: TypeId,
    name: &'static str,
    type_name: &'static str,
}

impl ComponentDescriptor {
    /// Describes `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::NAME,
            type_name: type_name::<T>(),
        }
    }

    /// The component's `NAME` tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The Rust type name, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A registered component type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Dense kind assigned at registration.
    pub kind: ComponentKind,
    /// The component's `NAME` tag.
    pub name: &'static str,
    /// The Rust type name.
    pub type_name: &'static str,
}

/// Maps component types and names to their kinds.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    infos: Vec<ComponentInfo>,
    by_type: HashMap<TypeId, ComponentKind>,
    by_name: HashMap<&'static str, ComponentKind>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, or returns its existing kind.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if a different type already
    /// claimed `T::NAME`.
    pub fn register<T: Component>(&mut self) -> RuntimeResult<ComponentKind> {
        self.register_descriptor(ComponentDescriptor::of::<T>())
    }

    /// Registers a described type, or returns its existing kind.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidArgument`] if a different type already
    /// claimed the descriptor's name, or the kind space is exhausted.
    pub fn register_descriptor(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> RuntimeResult<ComponentKind> {
        if let Some(&kind) = self.by_type.get(&descriptor.type_id) {
            return Ok(kind);
        }
        if let Some(&existing) = self.by_name.get(descriptor.name) {
            let other = self.infos[existing.0 as usize].type_name;
            return Err(RuntimeError::InvalidArgument(format!(
                "component name `{}` of {} is already used by {}",
                descriptor.name, descriptor.type_name, other
            )));
        }
        let index = u16::try_from(self.infos.len()).map_err(|_| {
            RuntimeError::InvalidArgument("too many component types registered".to_owned())
        })?;
        let kind = ComponentKind(index);
        self.infos.push(ComponentInfo {
            kind,
            name: descriptor.name,
            type_name: descriptor.type_name,
        });
        self.by_type.insert(descriptor.type_id, kind);
        self.by_name.insert(descriptor.name, kind);
        tracing::debug!(
            kind = index,
            name = descriptor.name,
            "registered component type {}",
            descriptor.type_name
        );
        Ok(kind)
    }

    /// Looks up the kind of `T` without registering it.
    #[inline]
    #[must_use]
    pub fn kind_of<T: Component>(&self) -> Option<ComponentKind> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Looks up a kind by `NAME` tag.
    #[must_use]
    pub fn kind_by_name(&self, name: &str) -> Option<ComponentKind> {
        self.by_name.get(name).copied()
    }

    /// Returns the registration record for `kind`.
    #[must_use]
    pub fn info(&self, kind: ComponentKind) -> Option<&ComponentInfo> {
        self.infos.get(kind.0 as usize)
    }

    /// Every registered component, in kind order.
    #[must_use]
    pub fn infos(&self) -> &[ComponentInfo] {
        &self.infos
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Checks if no component type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

/// The set of component types an archetype requires.
///
/// ```rust
/// use umbra_core::{Component, ComponentSet};
///
/// #[derive(Clone, Default)]
/// struct Transform;
/// impl Component for Transform {
///     const NAME: &'static str = "Transform";
/// }
///
/// let set = ComponentSet::new().with::<Transform>();
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ComponentSet {
    descriptors: Vec<ComponentDescriptor>,
}

impl ComponentSet {
    /// Creates an empty set. An archetype with no requirements matches every
    /// entity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Adds `T` to the set. Duplicates are ignored.
    #[must_use]
    pub fn with<T: Component>(mut self) -> Self {
        let descriptor = ComponentDescriptor::of::<T>();
        if !self.descriptors.contains(&descriptor) {
            self.descriptors.push(descriptor);
        }
        self
    }

    /// The described types, in insertion order.
    #[must_use]
    pub fn descriptors(&self) -> &[ComponentDescriptor] {
        &self.descriptors
    }

    /// Number of types in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Checks if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
