//! Transform hierarchy and reparenting behaviour through the public API

use approx::assert_relative_eq;
use spark_engine::prelude::*;

const EPSILON: f32 = 1e-4;

/// Every entity is owned by exactly one of: the root list, one parent's child list
fn assert_single_ownership(scene: &Scene) {
    let mut all = Vec::new();
    scene.walk(|entity, _| all.push(entity.id()));
    assert_eq!(all.len(), scene.entity_count());

    for id in all {
        let in_roots = scene.roots().iter().filter(|root| **root == id).count();
        let mut in_children = 0;
        scene.walk(|entity, _| {
            in_children += entity.children().iter().filter(|child| **child == id).count();
        });
        assert_eq!(in_roots + in_children, 1, "entity {id:?} has {} owners", in_roots + in_children);

        match scene.parent(id) {
            Some(parent) => assert!(scene.is_child(parent, id)),
            None => assert!(scene.roots().contains(&id)),
        }
    }
}

#[test]
fn unparent_then_reparent_scenario() {
    let mut scene = Scene::new("scenario");
    let a = scene.emplace_entity("A");
    let b = scene.emplace_child(a, "B").unwrap();
    scene.set_local_position(b, Vec3::new(10.0, 0.0, 0.0));

    scene.set_parent(b, None, true).unwrap();

    assert_eq!(scene.parent(b), None);
    assert_relative_eq!(
        scene.transform(b).unwrap().local_position(),
        Vec3::new(10.0, 0.0, 0.0),
        epsilon = EPSILON
    );
    assert_relative_eq!(scene.world_position(b).unwrap(), Vec3::new(10.0, 0.0, 0.0), epsilon = EPSILON);

    let c = scene.emplace_entity("C");
    scene.set_local_position(c, Vec3::new(5.0, 0.0, 0.0));
    scene.set_parent(b, Some(c), true).unwrap();

    assert_eq!(scene.parent(b), Some(c));
    assert_relative_eq!(
        scene.transform(b).unwrap().local_position(),
        Vec3::new(5.0, 0.0, 0.0),
        epsilon = EPSILON
    );
    assert_relative_eq!(scene.world_position(b).unwrap(), Vec3::new(10.0, 0.0, 0.0), epsilon = EPSILON);
    assert_single_ownership(&scene);
}

#[test]
fn world_position_is_parent_plus_child() {
    let mut scene = Scene::new("sum");
    let p = Vec3::new(1.5, -2.0, 4.0);
    let q = Vec3::new(-3.0, 0.25, 8.0);
    let root = scene.emplace_entity("root");
    let child = scene.emplace_child(root, "child").unwrap();
    scene.set_local_position(root, p);
    scene.set_local_position(child, q);

    assert_relative_eq!(scene.world_position(child).unwrap(), p + q, epsilon = EPSILON);
}

#[test]
fn ancestor_move_reaches_untouched_descendants() {
    let mut scene = Scene::new("dirty");
    let a = scene.emplace_entity("a");
    let b = scene.emplace_child(a, "b").unwrap();
    let c = scene.emplace_child(b, "c").unwrap();
    let d = scene.emplace_child(c, "d").unwrap();
    scene.set_local_position(d, Vec3::new(0.0, 0.0, 1.0));

    // Warm every cache
    assert_relative_eq!(scene.world_position(d).unwrap(), Vec3::new(0.0, 0.0, 1.0), epsilon = EPSILON);

    scene.set_local_position(a, Vec3::new(100.0, 0.0, 0.0));

    assert_relative_eq!(scene.world_position(d).unwrap(), Vec3::new(100.0, 0.0, 1.0), epsilon = EPSILON);
    assert_relative_eq!(scene.world_position(b).unwrap(), Vec3::new(100.0, 0.0, 0.0), epsilon = EPSILON);
}

#[test]
fn world_rotation_and_scale_compose() {
    let mut scene = Scene::new("compose");
    let parent = scene.emplace_entity("parent");
    let child = scene.emplace_child(parent, "child").unwrap();
    let quarter = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
    scene.set_local_rotation(parent, quarter);
    scene.set_local_scale(parent, Vec3::new(2.0, 2.0, 2.0));
    scene.set_local_scale(child, Vec3::new(1.5, 1.5, 1.5));

    assert_relative_eq!(scene.world_scale(child).unwrap(), Vec3::new(3.0, 3.0, 3.0), epsilon = EPSILON);
    assert_relative_eq!(scene.world_rotation(child).unwrap(), quarter, epsilon = EPSILON);
}

#[test]
fn reparenting_never_creates_cycles() {
    let mut scene = Scene::new("cycles");
    let a = scene.emplace_entity("a");
    let b = scene.emplace_child(a, "b").unwrap();
    let c = scene.emplace_child(b, "c").unwrap();

    for target in [a, b, c] {
        assert!(scene.set_parent(a, Some(target), true).is_err());
    }
    assert!(matches!(
        scene.set_parent(b, Some(c), false),
        Err(SceneError::WouldCreateCycle { .. })
    ));

    assert_eq!(scene.roots(), &[a]);
    assert_eq!(scene.parent(c), Some(b));
    assert_single_ownership(&scene);
}

#[test]
fn ownership_stays_single_through_shuffles() {
    let mut scene = Scene::new("shuffle");
    let ids: Vec<EntityId> = (0..6).map(|i| scene.emplace_entity(&format!("e{i}"))).collect();

    scene.set_parent(ids[1], Some(ids[0]), true).unwrap();
    scene.set_parent(ids[2], Some(ids[1]), true).unwrap();
    scene.set_parent(ids[3], Some(ids[1]), false).unwrap();
    scene.set_parent(ids[4], Some(ids[3]), true).unwrap();
    assert_single_ownership(&scene);

    scene.set_parent(ids[1], Some(ids[5]), true).unwrap();
    scene.set_parent(ids[3], None, true).unwrap();
    scene.set_parent(ids[0], Some(ids[4]), true).unwrap();
    assert_single_ownership(&scene);

    assert_eq!(scene.roots(), &[ids[5], ids[3]]);
    assert_eq!(scene.children(ids[5]), &[ids[1]]);
    assert_eq!(scene.children(ids[4]), &[ids[0]]);
    assert!(scene.is_descendant(ids[3], ids[0]));
    assert!(!scene.is_child(ids[3], ids[0]));
}

#[test]
fn unknown_entities_are_rejected() {
    let mut scene = Scene::new("stale");
    let gone = scene.emplace_entity("gone");
    scene.remove_entity(gone);
    let local = scene.emplace_entity("local");

    assert_eq!(
        scene.set_parent(local, Some(gone), true),
        Err(SceneError::NoSuchEntity(gone))
    );
    assert_eq!(scene.set_parent(gone, None, true), Err(SceneError::NoSuchEntity(gone)));
    assert_eq!(scene.emplace_child(gone, "orphan"), Err(SceneError::NoSuchEntity(gone)));
    assert_eq!(scene.roots(), &[local]);
}
