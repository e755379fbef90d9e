//! # Systems and Scheduling
//!
//! A system is a logic module the world invokes once per tick. Systems are
//! ordered by ascending priority; systems sharing a priority run in the order
//! they were registered.
//!
//! ## Tick Order
//!
//! ```text
//! priority:   50        100        100        300
//!           [Input] -> [Move A] -> [Move B] -> [Sound]
//!                      (first     (second
//!                      registered) registered)
//! ```
//!
//! Writes made by one system are visible to every system after it in the
//! same tick. A system that must observe another's output from the same tick
//! needs a strictly larger priority number.

use std::cell::RefCell;
use std::rc::Rc;

use super::world::World;
use crate::error::RuntimeResult;

/// A unit of per-tick logic.
///
/// Systems hold no references into component storage. Each update copies the
/// components it needs out of the world, computes, and writes every changed
/// value back with [`World::add_component`] (or [`World::modify_component`]).
/// A mutated copy that is never written back is silently lost.
pub trait System {
    /// Human-readable name, captured once at registration.
    fn name(&self) -> &str;

    /// Execution priority, captured once at registration. Lower runs earlier.
    fn priority(&self) -> i32;

    /// Called exactly once, when the system is registered.
    ///
    /// # Errors
    ///
    /// A failure here aborts registration and is returned to the caller.
    fn initialize(&mut self, _world: &mut World) -> RuntimeResult<()> {
        Ok(())
    }

    /// Called once per tick, in priority order.
    ///
    /// # Errors
    ///
    /// A failure aborts the remaining systems of the tick.
    fn update(&mut self, world: &mut World, delta_time: f32) -> RuntimeResult<()>;
}

/// Shared handle to a registered system.
///
/// Registering a `SharedSystem` lets other code keep a clone of the inner
/// `Rc<RefCell<S>>` and call the system's own public methods, e.g. to deliver
/// events between systems outside the component model.
///
/// A system must not borrow its own handle while it is updating.
pub struct SharedSystem<S: System> {
    name: String,
    priority: i32,
    inner: Rc<RefCell<S>>,
}

impl<S: System> SharedSystem<S> {
    /// Wraps `system`, returning the registrable wrapper and a handle to it.
    pub fn new(system: S) -> (Self, Rc<RefCell<S>>) {
        let handle = Rc::new(RefCell::new(system));
        (Self::from_handle(Rc::clone(&handle)), handle)
    }

    /// Wraps an existing handle.
    pub fn from_handle(inner: Rc<RefCell<S>>) -> Self {
        let (name, priority) = {
            let system = inner.borrow();
            (system.name().to_owned(), system.priority())
        };
        Self {
            name,
            priority,
            inner,
        }
    }

    /// Another handle to the wrapped system.
    #[must_use]
    pub fn handle(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.inner)
    }
}

impl<S: System> System for SharedSystem<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn initialize(&mut self, world: &mut World) -> RuntimeResult<()> {
        self.inner.borrow_mut().initialize(world)
    }

    fn update(&mut self, world: &mut World, delta_time: f32) -> RuntimeResult<()> {
        self.inner.borrow_mut().update(world, delta_time)
    }
}

/// A registered system with the metadata captured at registration.
pub(crate) struct SystemEntry {
    pub(crate) name: String,
    pub(crate) priority: i32,
    /// Registration sequence number, the tie-breaker for equal priorities.
    pub(crate) sequence: u64,
    pub(crate) system: Box<dyn System>,
}

/// The ordered system list.
#[derive(Default)]
pub(crate) struct Schedule {
    entries: Vec<SystemEntry>,
    next_sequence: u64,
}

impl Schedule {
    /// Creates the entry for a system about to be registered.
    pub(crate) fn entry(&mut self, system: Box<dyn System>) -> SystemEntry {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        SystemEntry {
            name: system.name().to_owned(),
            priority: system.priority(),
            sequence,
            system,
        }
    }

    /// Inserts an entry, keeping the list ordered.
    pub(crate) fn insert(&mut self, entry: SystemEntry) {
        self.entries.push(entry);
        self.sort();
    }

    /// Stable sort by `(priority, sequence)`.
    fn sort(&mut self) {
        self.entries
            .sort_by_key(|entry| (entry.priority, entry.sequence));
    }

    /// Moves the entries out for the duration of a tick.
    ///
    /// The sequence counter stays behind, so systems registered mid-tick
    /// still sort after every earlier registration.
    pub(crate) fn take(&mut self) -> Vec<SystemEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Puts entries moved out by [`Schedule::take`] back, merging in any
    /// registered meanwhile.
    pub(crate) fn restore(&mut self, mut taken: Vec<SystemEntry>) {
        if self.entries.is_empty() {
            self.entries = taken;
            return;
        }
        taken.append(&mut self.entries);
        self.entries = taken;
        self.sort();
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop {
        name: &'static str,
        priority: i32,
    }

    impl System for Noop {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn update(&mut self, _world: &mut World, _delta_time: f32) -> RuntimeResult<()> {
            Ok(())
        }
    }

    fn noop(name: &'static str, priority: i32) -> Box<dyn System> {
        Box::new(Noop { name, priority })
    }

    #[test]
    fn test_schedule_orders_by_priority_then_registration() {
        let mut schedule = Schedule::default();
        for (name, priority) in [("c", 300), ("a1", 100), ("first", 50), ("a2", 100)] {
            let entry = schedule.entry(noop(name, priority));
            schedule.insert(entry);
        }
        let names: Vec<&str> = schedule.names().collect();
        assert_eq!(names, vec!["first", "a1", "a2", "c"]);
    }

    #[test]
    fn test_restore_merges_late_registrations() {
        let mut schedule = Schedule::default();
        let entry = schedule.entry(noop("early", 10));
        schedule.insert(entry);

        let taken = schedule.take();
        assert_eq!(schedule.len(), 0);
        let late = schedule.entry(noop("late", 10));
        schedule.insert(late);
        schedule.restore(taken);

        let names: Vec<&str> = schedule.names().collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn test_shared_system_captures_metadata() {
        let (shared, handle) = SharedSystem::new(Noop {
            name: "shared",
            priority: 7,
        });
        assert_eq!(shared.name(), "shared");
        assert_eq!(shared.priority(), 7);
        assert_eq!(Rc::strong_count(&handle), 2);
        assert!(Rc::ptr_eq(&shared.handle(), &handle));
    }
}
