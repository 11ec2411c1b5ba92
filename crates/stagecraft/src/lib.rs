//! # Stagecraft
//!
//! Scene-graph, transform-hierarchy, bounding-volume, and frustum-culling
//! core for a real-time 3D engine.
//!
//! ## Features
//!
//! - **Transform hierarchy**: lazy world-transform composition with
//!   dirty-flag invalidation and listener notification
//! - **Typed components**: a closed component set (transform, camera, bound,
//!   renderable) updated in deterministic execution order
//! - **Bounding volumes**: sphere / AABB / OBB / frustum bounds kept in sync
//!   with world transforms
//! - **Frustum culling**: camera-mask registration and per-frame culling into
//!   a material-batched render queue
//! - **Backend-agnostic**: renderers plug in behind a narrow trait; a
//!   CPU-only reference backend ships for tests and demos
//!
//! ## Quick Start
//!
//! ```rust
//! use stagecraft::render::{ReferenceRenderer, Viewport};
//! use stagecraft::scene::{ComponentDesc, DefaultSceneManager, SceneManager};
//!
//! let mut scene = DefaultSceneManager::new();
//! let root = scene.root();
//!
//! let camera = scene.create_scene_node(root, "camera")?;
//! scene.add_component(camera, ComponentDesc::Camera)?;
//! scene.camera_mut(camera)?.set_object_mask(1);
//!
//! let mut ctx = ReferenceRenderer::new();
//! scene.update(&mut ctx)?;
//! scene.render(&Viewport::full_target(camera, 1280, 720), &mut ctx)?;
//! # Ok::<(), stagecraft::SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

pub use config::{Config, ConfigError, SceneConfig};
pub use error::{SceneError, SceneResult};
