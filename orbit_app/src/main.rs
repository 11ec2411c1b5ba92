//! Orbit demo application
//!
//! Builds a scene with a perspective camera orbiting a ring of cubes and
//! steps it through a few frames with the reference renderer, logging how
//! many cubes survive culling from each camera position.

use stagecraft::config::{Config, SceneConfig};
use stagecraft::foundation::logging;
use stagecraft::foundation::math::{utils, Vec3};
use stagecraft::geometry::Obb;
use stagecraft::render::{Material, ReferenceRenderer, Technique, Viewport};
use stagecraft::scene::{
    groups, BoundShape, ComponentDesc, DefaultSceneManager, RenderableKind, SceneManager,
};
use stagecraft::SceneResult;

const CUBE_COUNT: usize = 12;
const RING_RADIUS: f32 = 20.0;
const FRAMES: usize = 8;

fn main() -> SceneResult<()> {
    logging::init();

    let config = SceneConfig::load_from_file("orbit_app/scene.toml").unwrap_or_else(|err| {
        log::warn!("falling back to default scene config: {err}");
        SceneConfig::default()
    });
    let mut scene = DefaultSceneManager::with_config(config);
    let root = scene.root();

    // Camera close to the ring plane: only part of the ring is in view at a
    // time, so each frame culls a different subset.
    let camera_node = scene.create_scene_node(root, "orbit camera")?;
    scene.add_component(camera_node, ComponentDesc::Camera)?;
    {
        let camera = scene.camera_mut(camera_node)?;
        camera.set_perspective_params(utils::deg_to_rad(60.0), 16.0 / 9.0, 0.5, 500.0);
        camera.set_object_mask(1);
    }

    let material = Material::with_technique("cube", Technique::new("solid", groups::SOLID));
    for i in 0..CUBE_COUNT {
        let angle = i as f32 / CUBE_COUNT as f32 * std::f32::consts::TAU;
        let cube = scene.create_scene_node(root, format!("cube {i}"))?;
        scene.add_component(
            cube,
            ComponentDesc::Renderable {
                kind: RenderableKind::Cube {
                    extents: Vec3::new(1.0, 1.0, 1.0),
                },
                material: material.clone(),
                vertex_array: None,
            },
        )?;
        scene.add_component(
            cube,
            ComponentDesc::Bound {
                shape: BoundShape::Obb(Obb::axis_aligned(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))),
                group: 0,
                collision_source: false,
            },
        )?;
        scene.set_camera_mask(cube, 1)?;
        scene.set_position(
            cube,
            Vec3::new(RING_RADIUS * angle.cos(), 0.0, RING_RADIUS * angle.sin()),
        )?;
    }
    log::info!("scene ready: {CUBE_COUNT} cubes on a ring of radius {RING_RADIUS}");

    let mut ctx = ReferenceRenderer::new();
    let viewport = Viewport::full_target(camera_node, 1920, 1080);

    for frame in 0..FRAMES {
        let angle = frame as f32 / FRAMES as f32 * std::f32::consts::TAU;
        let eye = Vec3::new(
            (RING_RADIUS - 5.0) * angle.cos(),
            2.0,
            (RING_RADIUS - 5.0) * angle.sin(),
        );
        scene.look_at(camera_node, eye, Vec3::zeros(), Vec3::y())?;

        scene.update(&mut ctx)?;
        scene.render(&viewport, &mut ctx)?;

        log::info!(
            "frame {frame}: camera at ({:5.1}, {:4.1}, {:5.1}) sees {}/{CUBE_COUNT} cubes",
            eye.x,
            eye.y,
            eye.z,
            ctx.drawn().len(),
        );
    }

    Ok(())
}
