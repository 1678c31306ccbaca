//! Pick lifecycle integration tests.
//!
//! These exercise the full CPU side of picking: ID allocation, the twin
//! ID-scene, highlight transitions, and click deletion. No GPU is needed;
//! the decoded pick ID is fed in directly, exactly as the renderer would
//! after reading back the 1x1 pick target.

use glance::*;

fn populated_viewer(count: u32) -> (Viewer, Vec<PickableObject>) {
    let mut viewer = Viewer::new(Options::default());
    let geometry = Geometry::cuboid(1.0, 1.0, 1.0);
    let objects = (0..count)
        .map(|i| {
            viewer
                .add_pickable(
                    geometry.clone(),
                    Material::standard(Color::from_hex(0x0000FF + i)),
                    Transform::at(Vec3::new(i as f32, 0.0, 0.0)),
                )
                .expect("allocation failed")
        })
        .collect();
    (viewer, objects)
}

#[test]
fn allocation_builds_parallel_scenes() {
    let (viewer, objects) = populated_viewer(50);

    assert_eq!(viewer.scene.len(), 50);
    assert_eq!(viewer.id_scene.len(), 50);
    assert_eq!(viewer.index.len(), 50);
    assert_eq!(viewer.allocator.allocated(), 50);

    // IDs are dense starting at 1, and each twin's flat color decodes back
    // to its object's ID.
    for (i, object) in objects.iter().enumerate() {
        assert_eq!(object.id.get(), i as u32 + 1);
        let twin = viewer.id_scene.get(object.twin).expect("twin missing");
        let Material::Flat(flat) = twin.material else {
            panic!("twin must be flat");
        };
        let quantize = |c: f32| (c * 255.0).round() as u8;
        let decoded = color_to_id(
            quantize(flat.color.r),
            quantize(flat.color.g),
            quantize(flat.color.b),
        );
        assert_eq!(decoded, object.id.get());
    }
}

#[test]
fn hover_switch_and_leave() {
    let (mut viewer, objects) = populated_viewer(50);
    let mut state = PickState::new();
    let policy = viewer.policy;

    let a = objects[22];
    let b = objects[40];

    // Hover object 23.
    let hit = state.resolve(a.id.get(), &viewer.index, &mut viewer.scene, &policy, 0.0);
    assert_eq!(hit, Some(a.id));
    let highlight = viewer.scene.get(a.visible).unwrap().material;
    assert_eq!(
        highlight.as_highlightable().unwrap().highlight_color(),
        policy.color_at(0.0)
    );

    // Re-resolving the same ID is idempotent aside from the animated color.
    for frame in 1..10 {
        let t = frame as f32 * 0.016;
        assert_eq!(
            state.resolve(a.id.get(), &viewer.index, &mut viewer.scene, &policy, t),
            Some(a.id)
        );
    }

    // Switch to another object: the first gets its color back.
    let hit = state.resolve(b.id.get(), &viewer.index, &mut viewer.scene, &policy, 0.5);
    assert_eq!(hit, Some(b.id));
    let restored = viewer.scene.get(a.visible).unwrap().material;
    assert_eq!(
        restored.as_highlightable().unwrap().highlight_color(),
        Color::BLACK
    );

    // Cursor leaves: background pick restores everything.
    let hit = state.resolve(0, &viewer.index, &mut viewer.scene, &policy, 1.0);
    assert_eq!(hit, None);
    let restored = viewer.scene.get(b.visible).unwrap().material;
    assert_eq!(
        restored.as_highlightable().unwrap().highlight_color(),
        Color::BLACK
    );
}

#[test]
fn click_deletes_both_representations() {
    let (mut viewer, objects) = populated_viewer(10);
    let mut state = PickState::new();
    let policy = viewer.policy;

    let target = objects[4];
    state.resolve(target.id.get(), &viewer.index, &mut viewer.scene, &policy, 0.0);
    assert_eq!(state.highlighted(), Some(target.id));

    let removed = remove_object(
        target.id,
        &mut viewer.index,
        &mut viewer.scene,
        &mut viewer.id_scene,
    );
    state.forget();

    assert_eq!(removed.map(|o| o.id), Some(target.id));
    assert!(viewer.scene.get(target.visible).is_none());
    assert!(viewer.id_scene.get(target.twin).is_none());
    assert_eq!(viewer.index.len(), 9);
    assert!(state.is_idle());

    // The stale ID now decodes to "nothing picked".
    let hit = state.resolve(target.id.get(), &viewer.index, &mut viewer.scene, &policy, 0.0);
    assert_eq!(hit, None);
}

#[test]
fn remove_pickable_by_id() {
    let (mut viewer, objects) = populated_viewer(3);

    let target = objects[1];
    let removed = viewer.remove_pickable(target.id).expect("removal failed");
    assert_eq!(removed.id, target.id);
    assert!(viewer.scene.get(target.visible).is_none());
    assert!(viewer.id_scene.get(target.twin).is_none());
    assert_eq!(viewer.index.len(), 2);

    // Removing the same ID again is a caller error, not a silent no-op.
    let err = viewer.remove_pickable(target.id).unwrap_err();
    assert!(matches!(err, GlanceError::ObjectNotFound(id) if id == target.id.get()));
}

#[test]
fn non_highlightable_materials_are_rejected() {
    let mut viewer = Viewer::new(Options::default());
    let geometry = Geometry::cuboid(1.0, 1.0, 1.0);

    let err = viewer
        .add_pickable(
            geometry.clone(),
            Material::flat(Color::WHITE),
            Transform::default(),
        )
        .unwrap_err();
    assert!(matches!(err, GlanceError::NotHighlightable));

    // Nothing was inserted anywhere.
    assert!(viewer.scene.is_empty());
    assert!(viewer.id_scene.is_empty());
    assert!(viewer.index.is_empty());
}

#[test]
fn compositor_advance_spins_registered_meshes() {
    let mut compositor = Compositor::new(512);
    let spun = compositor.scene.insert(Mesh::new(
        Geometry::cuboid(1.0, 1.0, 1.0),
        Material::standard(Color::WHITE),
        Transform::default(),
    ));
    let still = compositor.scene.insert(Mesh::new(
        Geometry::cuboid(1.0, 1.0, 1.0),
        Material::standard(Color::WHITE),
        Transform::default(),
    ));
    compositor.spin(spun, 2.0);

    compositor.advance(1.5);
    assert!((compositor.scene.get(spun).unwrap().transform.rotation.x - 3.0).abs() < 1e-6);
    assert_eq!(compositor.scene.get(still).unwrap().transform.rotation, Vec3::ZERO);

    assert_eq!(compositor.resolution(), 512);
}
