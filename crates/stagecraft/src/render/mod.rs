//! Rendering interface consumed by the scene graph
//!
//! The scene side of the renderer boundary: the [`RenderContext`] trait,
//! viewports, the material/technique surface used for queue bucketing, and a
//! recording reference backend for tests and demos.

pub mod context;
pub mod material;
pub mod reference;
pub mod viewport;

pub use context::{ClearFlags, Color, RenderContext};
pub use material::{Material, MaterialId, Technique, VertexArrayId};
pub use reference::ReferenceRenderer;
pub use viewport::Viewport;
