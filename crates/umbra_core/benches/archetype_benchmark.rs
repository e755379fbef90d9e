//! # Archetype Membership Benchmark
//!
//! Two costs matter:
//! - late registration scans every live entity once: O(entities)
//! - a single add/remove re-tests one entity: O(archetypes), independent of
//!   how many entities exist
//!
//! Run with: `cargo bench --package umbra_core --bench archetype_benchmark`

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use umbra_core::{Component, ComponentSet, World};

macro_rules! tags {
    ($($name:ident),*) => {
        $(
            #[derive(Clone, Copy, Debug, Default)]
            struct $name;
            impl Component for $name {
                const NAME: &'static str = stringify!($name);
            }
        )*
    };
}

tags!(A, B, C, D);

fn world_with(count: usize) -> World {
    let mut world = World::new();
    for i in 0..count {
        let e = world.create_entity();
        world.add_component(e, A).unwrap();
        if i % 2 == 0 {
            world.add_component(e, B).unwrap();
        }
        if i % 3 == 0 {
            world.add_component(e, C).unwrap();
        }
    }
    world
}

/// Benchmark: registering an archetype over an existing population.
fn bench_late_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("late_registration");
    for count in [1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || world_with(count),
                |mut world| {
                    let archetype = world
                        .register_archetype("AB", ComponentSet::new().with::<A>().with::<B>())
                        .unwrap();
                    black_box(archetype.len())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

/// Benchmark: one membership flip, against worlds of growing size.
fn bench_single_mutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_mutation");
    for count in [1_000, 100_000] {
        let mut world = world_with(count);
        for (i, set) in [
            ComponentSet::new().with::<A>(),
            ComponentSet::new().with::<A>().with::<B>(),
            ComponentSet::new().with::<B>().with::<C>(),
            ComponentSet::new().with::<D>(),
        ]
        .into_iter()
        .enumerate()
        {
            world.register_archetype(&format!("arch_{i}"), set).unwrap();
        }
        let target = world.create_entity();
        world.add_component(target, A).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                world.add_component(target, D).unwrap();
                black_box(world.remove_component::<D>(target))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_late_registration, bench_single_mutation);
criterion_main!(benches);
