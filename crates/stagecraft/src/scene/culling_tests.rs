//! End-to-end scene tests: build a scene, update, render, inspect the queue

use crate::config::SceneConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::{Material, ReferenceRenderer, Technique, Viewport};
use crate::scene::bound::BoundShape;
use crate::scene::component::{ComponentDesc, ComponentKind};
use crate::scene::manager::{DefaultSceneManager, SceneManager};
use crate::scene::node::NodeKey;
use crate::scene::render_queue::groups;
use crate::scene::renderable::RenderableKind;
use crate::geometry::Obb;

/// Perspective camera at (0, 4, 8) looking at the origin, object mask 1;
/// matches the reference scene used across these tests.
fn camera_scene() -> (DefaultSceneManager, NodeKey) {
    let mut scene = DefaultSceneManager::new();
    let root = scene.root();

    let camera_node = scene
        .create_scene_node(root, "main camera")
        .expect("camera node");
    scene
        .add_component(camera_node, ComponentDesc::Camera)
        .expect("camera component");
    {
        let camera = scene.camera_mut(camera_node).expect("camera");
        camera.set_perspective_params(utils::deg_to_rad(90.0), 16.0 / 9.0, 0.5, 1000.0);
        camera.set_object_mask(1);
    }
    scene
        .look_at(camera_node, Vec3::new(0.0, 4.0, 8.0), Vec3::zeros(), Vec3::y())
        .expect("aim camera");

    (scene, camera_node)
}

fn attach_cube(scene: &mut DefaultSceneManager, name: &str) -> NodeKey {
    let root = scene.root();
    let cube = scene.create_scene_node(root, name).expect("cube node");
    scene
        .add_component(
            cube,
            ComponentDesc::Renderable {
                kind: RenderableKind::Cube {
                    extents: Vec3::new(1.0, 1.0, 1.0),
                },
                material: Material::with_technique(
                    "cube material",
                    Technique::new("solid", groups::SOLID),
                ),
                vertex_array: None,
            },
        )
        .expect("renderable");
    scene
        .add_component(
            cube,
            ComponentDesc::Bound {
                shape: BoundShape::Obb(Obb::axis_aligned(
                    Vec3::zeros(),
                    Vec3::new(1.0, 1.0, 1.0),
                )),
                group: 0,
                collision_source: false,
            },
        )
        .expect("bound");
    scene.set_camera_mask(cube, 1).expect("mask");
    cube
}

#[test]
fn cube_in_frustum_is_queued_exactly_once() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");

    let mut ctx = ReferenceRenderer::new();
    scene.update(&mut ctx).expect("update");

    let viewport = Viewport::full_target(camera_node, 1920, 1080);
    scene.render(&viewport, &mut ctx).expect("render");

    assert_eq!(scene.queue().packets_for_node(cube), 1);
    assert_eq!(scene.queue().group_len(groups::SOLID), 1);
    assert_eq!(ctx.drawn().len(), 1, "packet reached the backend");
    assert_eq!(ctx.clear_count(), 1, "surface cleared before the queue");
}

#[test]
fn cube_beyond_far_plane_is_culled() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");

    let mut ctx = ReferenceRenderer::new();
    let viewport = Viewport::full_target(camera_node, 1920, 1080);

    scene.update(&mut ctx).expect("first update");
    scene.render(&viewport, &mut ctx).expect("first render");
    assert_eq!(scene.queue().packets_for_node(cube), 1, "starts visible");

    // Far plane sits at 1000; -2000 is well past it.
    scene
        .set_position(cube, Vec3::new(0.0, 0.0, -2000.0))
        .expect("move cube");
    scene.update(&mut ctx).expect("second update");
    scene.render(&viewport, &mut ctx).expect("second render");

    assert_eq!(scene.queue().packets_for_node(cube), 0);
    assert!(scene.queue().is_empty());
    assert!(ctx.drawn().is_empty());
}

#[test]
fn node_without_bound_is_always_visible() {
    let (mut scene, camera_node) = camera_scene();
    let root = scene.root();
    let marker = scene.create_scene_node(root, "marker").expect("node");
    scene
        .add_component(
            marker,
            ComponentDesc::Renderable {
                kind: RenderableKind::Axis { length: 1.0 },
                material: Material::new("bare"),
                vertex_array: None,
            },
        )
        .expect("renderable");
    scene.set_camera_mask(marker, 1).expect("mask");
    // Far outside the frustum, but there is no bound to test.
    scene
        .set_position(marker, Vec3::new(0.0, 0.0, -5000.0))
        .expect("move");

    let mut ctx = ReferenceRenderer::new();
    scene.update(&mut ctx).expect("update");
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.render(&viewport, &mut ctx).expect("render");

    assert_eq!(scene.queue().packets_for_node(marker), 1);
    // No technique on the material: the configured fallback group applies.
    assert_eq!(scene.queue().group_len(groups::AUTOMATIC), 1);
}

#[test]
fn disabled_bound_counts_as_absent() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");
    scene
        .set_position(cube, Vec3::new(0.0, 0.0, -2000.0))
        .expect("move out of view");
    scene.collider_mut(cube).expect("bound").set_enabled(false);

    let mut ctx = ReferenceRenderer::new();
    scene.update(&mut ctx).expect("update");
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.render(&viewport, &mut ctx).expect("render");

    assert_eq!(
        scene.queue().packets_for_node(cube),
        1,
        "disabled collider never culls its node"
    );
}

#[test]
fn shared_group_with_camera_bound_skips_geometry() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");

    // Put the camera frustum and the cube bound in the same nonzero group:
    // the pair must report no intersection even though the cube is in view.
    scene.camera_mut(camera_node).expect("camera").bound_mut().set_group(9);
    scene.collider_mut(cube).expect("bound").set_group(9);

    let mut ctx = ReferenceRenderer::new();
    scene.update(&mut ctx).expect("update");
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.render(&viewport, &mut ctx).expect("render");

    assert_eq!(scene.queue().packets_for_node(cube), 0);
}

#[test]
fn transform_swap_keeps_collider_in_sync() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");

    let mut ctx = ReferenceRenderer::new();
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(cube), 1, "starts visible");

    // Swap the transform out and back in: the collider must subscribe to the
    // replacement, or it keeps testing a stale live shape.
    scene
        .remove_component(cube, ComponentKind::Transform3d)
        .expect("detach transform");
    scene
        .add_component(cube, ComponentDesc::Transform3d)
        .expect("re-attach transform");
    scene
        .set_position(cube, Vec3::new(0.0, 0.0, -2000.0))
        .expect("move out of view");

    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(cube), 0);
}

#[test]
fn camera_object_mask_selects_slots() {
    let (mut scene, camera_node) = camera_scene();
    let near = attach_cube(&mut scene, "near");
    let other = attach_cube(&mut scene, "other");
    // `other` moves to slot 2; the camera only looks at slot 1.
    scene.set_camera_mask(other, 2).expect("mask");

    let mut ctx = ReferenceRenderer::new();
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(near), 1);
    assert_eq!(scene.queue().packets_for_node(other), 0);

    // Widen the object mask to both slots.
    scene.camera_mut(camera_node).expect("camera").set_object_mask(0b11);
    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(near), 1);
    assert_eq!(scene.queue().packets_for_node(other), 1);
}

#[test]
fn moving_camera_invalidates_frustum_lazily() {
    let (mut scene, camera_node) = camera_scene();
    let cube = attach_cube(&mut scene, "cube");

    let mut ctx = ReferenceRenderer::new();
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(cube), 1);

    // Turn the camera around: the cube leaves the view without moving.
    scene
        .look_at(
            camera_node,
            Vec3::new(0.0, 4.0, 8.0),
            Vec3::new(0.0, 4.0, 100.0),
            Vec3::y(),
        )
        .expect("turn around");
    scene.update(&mut ctx).expect("update");
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(cube), 0);
}

#[test]
fn culling_disabled_config_keeps_everything() {
    let mut scene = DefaultSceneManager::with_config(SceneConfig {
        enable_culling: false,
        ..SceneConfig::default()
    });
    let root = scene.root();
    let camera_node = scene.create_scene_node(root, "camera").expect("camera");
    scene
        .add_component(camera_node, ComponentDesc::Camera)
        .expect("camera component");
    scene.camera_mut(camera_node).expect("camera").set_object_mask(1);

    let cube = attach_cube(&mut scene, "cube");
    scene
        .set_position(cube, Vec3::new(0.0, 0.0, -2000.0))
        .expect("move out of view");

    let mut ctx = ReferenceRenderer::new();
    scene.update(&mut ctx).expect("update");
    let viewport = Viewport::full_target(camera_node, 1280, 720);
    scene.render(&viewport, &mut ctx).expect("render");
    assert_eq!(scene.queue().packets_for_node(cube), 1);
}
