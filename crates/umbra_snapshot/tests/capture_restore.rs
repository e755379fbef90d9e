//! Integration tests for snapshot capture and restore.

use serde::{Deserialize, Serialize};
use umbra_core::{Component, ComponentSet, World};
use umbra_snapshot::{
    capture, from_json, restore, to_json, ComponentManifest, EntitySnapshot, SnapshotError,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {
    const NAME: &'static str = "Position";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Nameplate {
    text: String,
}
impl Component for Nameplate {
    const NAME: &'static str = "Nameplate";
}

/// Runtime-only state that is never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
struct PathCache(Vec<u32>);
impl Component for PathCache {
    const NAME: &'static str = "PathCache";
}

fn manifest() -> ComponentManifest {
    let mut manifest = ComponentManifest::new();
    manifest
        .register::<Position>()
        .unwrap()
        .register::<Nameplate>()
        .unwrap();
    manifest
}

#[test]
fn capture_then_restore_preserves_values() {
    let manifest = manifest();
    let mut world = World::new();
    let a = world.create_entity();
    world.add_component(a, Position { x: 1.5, y: -2.0 }).unwrap();
    world
        .add_component(a, Nameplate { text: "scout".into() })
        .unwrap();
    let b = world.create_entity();
    world.add_component(b, Position { x: 9.0, y: 0.0 }).unwrap();

    let json = to_json(&capture(&world, &manifest, [a, b]).unwrap()).unwrap();

    let mut fresh = World::new();
    manifest.prepare(&mut fresh).unwrap();
    fresh
        .register_archetype_by_names("Placed", &["Position"])
        .unwrap();
    // Burn an id so restored ids cannot coincide by accident.
    fresh.create_entity();

    let snapshots = from_json(&json).unwrap();
    let remap = restore(&mut fresh, &manifest, &snapshots).unwrap();
    assert_eq!(remap.len(), 2);
    assert_eq!(remap[0].0, a.id());
    assert_eq!(remap[1].0, b.id());

    let new_a = snapshots[0].resolve(&remap).unwrap();
    let new_b = snapshots[1].resolve(&remap).unwrap();
    assert_ne!(new_a.id(), a.id());
    assert_eq!(
        fresh.get_component::<Position>(new_a).unwrap(),
        Position { x: 1.5, y: -2.0 }
    );
    assert_eq!(fresh.get_component::<Nameplate>(new_a).unwrap().text, "scout");
    assert!(!fresh.has_component::<Nameplate>(new_b));

    // Restored entities take part in archetypes like any other.
    let placed = fresh.archetype("Placed").unwrap();
    assert!(placed.contains(new_a));
    assert!(placed.contains(new_b));
}

#[test]
fn unmanifested_components_are_skipped() {
    let manifest = manifest();
    let mut world = World::new();
    let e = world.create_entity();
    world.add_component(e, PathCache(vec![1, 2, 3])).unwrap();
    world.add_component(e, Position::default()).unwrap();

    let snapshots = capture(&world, &manifest, [e]).unwrap();
    assert_eq!(snapshots[0].components.len(), 1);
    assert!(snapshots[0].component("Position").is_some());
    assert!(snapshots[0].component("PathCache").is_none());
}

#[test]
fn capturing_a_dead_entity_fails() {
    let manifest = manifest();
    let mut world = World::new();
    let e = world.create_entity();
    world.destroy_entity(e);
    let err = capture(&world, &manifest, [e]).unwrap_err();
    assert!(matches!(err, SnapshotError::Runtime(ref inner) if inner.is_not_found()));
}

#[test]
fn unknown_type_restores_nothing() {
    let manifest = manifest();
    let snapshots = from_json(
        r#"[
            { "id": 0, "components": [{ "type": "Position", "data": { "x": 1.0, "y": 1.0 } }] },
            { "id": 1, "components": [{ "type": "Mystery", "data": 42 }] }
        ]"#,
    )
    .unwrap();

    let mut world = World::new();
    let err = restore(&mut world, &manifest, &snapshots).unwrap_err();
    assert!(matches!(err, SnapshotError::UnknownType(ref tag) if tag == "Mystery"));
    assert_eq!(world.entity_count(), 0);
}

#[test]
fn bad_record_rolls_back_created_entities() {
    let manifest = manifest();
    let snapshots = from_json(
        r#"[
            { "id": 0, "components": [{ "type": "Position", "data": { "x": 1.0, "y": 1.0 } }] },
            { "id": 1, "components": [{ "type": "Position", "data": "not a position" }] }
        ]"#,
    )
    .unwrap();

    let mut world = World::new();
    world
        .register_archetype("Placed", ComponentSet::new().with::<Position>())
        .unwrap();
    let err = restore(&mut world, &manifest, &snapshots).unwrap_err();
    assert!(matches!(err, SnapshotError::Json(_)));
    assert_eq!(world.entity_count(), 0);
    assert!(world.archetype("Placed").unwrap().is_empty());
    assert_eq!(world.component_count::<Position>(), 0);
}

#[test]
fn empty_snapshot_restores_bare_entity() {
    let manifest = manifest();
    let mut world = World::new();
    let remap = restore(
        &mut world,
        &manifest,
        &[EntitySnapshot {
            id: 77,
            components: Vec::new(),
        }],
    )
    .unwrap();
    let (old, entity) = remap[0];
    assert_eq!(old, 77);
    assert!(world.is_alive(entity));
    assert!(world.component_names(entity).unwrap().is_empty());
}
