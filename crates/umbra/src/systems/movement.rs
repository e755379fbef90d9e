//! # Movement
//!
//! Integrates velocity into transform once per tick.

use umbra_core::{ComponentSet, RuntimeResult, System, World};

use super::{ensure_archetype, MOVERS};
use crate::components::{Transform, Velocity};

/// Moves every entity with a `Transform` and a `Velocity`.
#[derive(Debug, Default)]
pub struct MovementSystem;

impl MovementSystem {
    /// Execution priority.
    pub const PRIORITY: i32 = 100;
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn initialize(&mut self, world: &mut World) -> RuntimeResult<()> {
        ensure_archetype(
            world,
            MOVERS,
            ComponentSet::new().with::<Transform>().with::<Velocity>(),
        )
    }

    fn update(&mut self, world: &mut World, delta_time: f32) -> RuntimeResult<()> {
        for entity in world.archetype(MOVERS)?.entities().to_vec() {
            let velocity = world.get_component::<Velocity>(entity)?;
            let mut transform = world.get_component::<Transform>(entity)?;
            transform.position = transform.position + velocity.linear * delta_time;
            transform.rotation += velocity.angular * delta_time;
            world.add_component(entity, transform)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec3;

    #[test]
    fn test_moves_only_movers() {
        let mut world = World::new();
        world.register_system(MovementSystem).unwrap();

        let mover = world.create_entity();
        world.add_component(mover, Transform::default()).unwrap();
        world
            .add_component(
                mover,
                Velocity {
                    linear: Vec3::new(2.0, 0.0, -1.0),
                    angular: 1.0,
                },
            )
            .unwrap();
        let statue = world.create_entity();
        world.add_component(statue, Transform::at(Vec3::new(5.0, 0.0, 0.0))).unwrap();

        world.update(0.5).unwrap();

        let moved = world.get_component::<Transform>(mover).unwrap();
        assert_eq!(moved.position, Vec3::new(1.0, 0.0, -0.5));
        assert_eq!(moved.rotation, 0.5);
        assert_eq!(
            world.get_component::<Transform>(statue).unwrap().position,
            Vec3::new(5.0, 0.0, 0.0)
        );
    }
}
