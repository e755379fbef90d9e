//! # Sound
//!
//! Other systems call [`SoundSystem::emit`] through a shared handle during
//! the tick. The sound system runs after them and drains what was emitted.

use tracing::trace;
use umbra_core::{Entity, RuntimeResult, System, World};

use crate::components::Vec3;

/// One emitted sound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundEvent {
    /// Entity that made the sound.
    pub source: Entity,
    /// Where it was made.
    pub position: Vec3,
    /// Loudness at the source.
    pub loudness: f32,
}

impl SoundEvent {
    /// Loudness heard at `listener`, with inverse-distance falloff.
    #[must_use]
    pub fn loudness_at(&self, listener: Vec3) -> f32 {
        self.loudness / (1.0 + self.position.distance(listener))
    }
}

/// Collects sound events and publishes them once per tick.
#[derive(Debug, Default)]
pub struct SoundSystem {
    pending: Vec<SoundEvent>,
    published: Vec<SoundEvent>,
    total: u64,
}

impl SoundSystem {
    /// Execution priority.
    pub const PRIORITY: i32 = 300;

    /// Creates an idle sound system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for this tick.
    pub fn emit(&mut self, event: SoundEvent) {
        self.pending.push(event);
    }

    /// Events published by the most recent tick.
    #[must_use]
    pub fn published(&self) -> &[SoundEvent] {
        &self.published
    }

    /// Events queued and not yet published.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Events published since creation.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Published events audible at `listener` above `threshold`.
    pub fn audible_at(&self, listener: Vec3, threshold: f32) -> impl Iterator<Item = &SoundEvent> {
        self.published
            .iter()
            .filter(move |event| event.loudness_at(listener) >= threshold)
    }
}

impl System for SoundSystem {
    fn name(&self) -> &str {
        "sound"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn update(&mut self, world: &mut World, _delta_time: f32) -> RuntimeResult<()> {
        self.published.clear();
        std::mem::swap(&mut self.published, &mut self.pending);
        self.total += self.published.len() as u64;
        if !self.published.is_empty() {
            trace!(tick = world.tick(), events = self.published.len(), "sounds published");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(x: f32, loudness: f32) -> SoundEvent {
        SoundEvent {
            source: Entity::from_raw(0),
            position: Vec3::new(x, 0.0, 0.0),
            loudness,
        }
    }

    #[test]
    fn test_update_publishes_and_clears() {
        let mut world = World::new();
        let mut sound = SoundSystem::new();
        sound.emit(event(0.0, 1.0));
        sound.emit(event(1.0, 1.0));
        sound.update(&mut world, 0.1).unwrap();
        assert_eq!(sound.published().len(), 2);
        assert_eq!(sound.pending(), 0);

        sound.update(&mut world, 0.1).unwrap();
        assert!(sound.published().is_empty());
        assert_eq!(sound.total(), 2);
    }

    #[test]
    fn test_falloff() {
        let mut world = World::new();
        let mut sound = SoundSystem::new();
        sound.emit(event(0.0, 4.0));
        sound.emit(event(10.0, 4.0));
        sound.update(&mut world, 0.1).unwrap();

        assert!((event(0.0, 4.0).loudness_at(Vec3::new(3.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        let heard: Vec<_> = sound.audible_at(Vec3::ZERO, 1.0).collect();
        assert_eq!(heard.len(), 1);
        assert_eq!(heard[0].position.x, 0.0);
    }
}
