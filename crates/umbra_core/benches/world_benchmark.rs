//! # World Performance Benchmark
//!
//! Measures the per-operation costs the runtime promises:
//! - entity creation is O(1)
//! - component add/get/remove are O(1) per call
//! - a copy/mutate/writeback tick scales with archetype membership
//!
//! Run with: `cargo bench --package umbra_core`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use umbra_core::{Component, ComponentSet, Entity, RuntimeResult, System, World};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Position {
    const NAME: &'static str = "Position";
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}
impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

struct Integrate;
impl System for Integrate {
    fn name(&self) -> &str {
        "integrate"
    }
    fn priority(&self) -> i32 {
        100
    }
    fn update(&mut self, world: &mut World, dt: f32) -> RuntimeResult<()> {
        for entity in world.archetype("Movers")?.entities().to_vec() {
            let vel = world.get_component::<Velocity>(entity)?;
            let mut pos = world.get_component::<Position>(entity)?;
            pos.x += vel.x * dt;
            pos.y += vel.y * dt;
            pos.z += vel.z * dt;
            world.add_component(entity, pos)?;
        }
        Ok(())
    }
}

fn populated_world(count: usize) -> (World, Vec<Entity>) {
    let mut world = World::new();
    world
        .register_archetype(
            "Movers",
            ComponentSet::new().with::<Position>().with::<Velocity>(),
        )
        .unwrap();
    let entities = (0..count)
        .map(|i| {
            let e = world.create_entity();
            world.add_component(e, Position::default()).unwrap();
            if i % 2 == 0 {
                world
                    .add_component(e, Velocity { x: 1.0, y: 0.5, z: 0.0 })
                    .unwrap();
            }
            e
        })
        .collect();
    (world, entities)
}

/// Benchmark: create entities.
fn bench_create_entities(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_entities");
    for count in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut world = World::new();
                for _ in 0..count {
                    black_box(world.create_entity());
                }
                world.entity_count()
            });
        });
    }
    group.finish();
}

/// Benchmark: component read by value.
fn bench_component_access(c: &mut Criterion) {
    let (world, entities) = populated_world(100_000);
    c.bench_function("get_component_100K", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &e in &entities {
                if let Some(p) = world.try_get_component::<Position>(e) {
                    sum += p.x;
                }
            }
            black_box(sum)
        });
    });
}

/// Benchmark: add then remove a component, forcing membership churn.
fn bench_membership_churn(c: &mut Criterion) {
    let (mut world, entities) = populated_world(10_000);
    c.bench_function("velocity_toggle_10K", |b| {
        b.iter(|| {
            for &e in &entities {
                if world.remove_component::<Velocity>(e).is_none() {
                    world.add_component(e, Velocity::default()).unwrap();
                }
            }
            black_box(world.archetype("Movers").unwrap().len())
        });
    });
}

/// Benchmark: one full tick of a copy/mutate/writeback system.
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_tick");
    for count in [1_000, 10_000, 100_000] {
        let (mut world, _) = populated_world(count);
        world.register_system(Integrate).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| world.update(black_box(1.0 / 60.0)).unwrap());
        });
    }
    group.finish();
}

/// Benchmark: create/destroy cycle.
fn bench_create_destroy_cycle(c: &mut Criterion) {
    let (mut world, mut entities) = populated_world(20_000);
    c.bench_function("create_destroy_cycle_10K", |b| {
        b.iter(|| {
            for e in entities.iter_mut().take(10_000) {
                world.destroy_entity(*e);
                *e = world.create_entity();
                world.add_component(*e, Position::default()).unwrap();
            }
            black_box(world.entity_count())
        });
    });
}

criterion_group!(
    benches,
    bench_create_entities,
    bench_component_access,
    bench_membership_churn,
    bench_tick,
    bench_create_destroy_cycle,
);

criterion_main!(benches);
