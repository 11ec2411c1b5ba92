//! Renderer abstraction consumed by the scene graph
//!
//! The scene subsystem never talks to a GPU: cameras push view/projection
//! matrices through this trait, ask it to build projection matrices (backends
//! own the clip-space conventions), and the render queue submits draw packets
//! through it. Backends implement this trait; tests and the demo use
//! [`crate::render::ReferenceRenderer`].

use bitflags::bitflags;

use crate::error::SceneResult;
use crate::foundation::math::Mat4;
use crate::geometry::Frustum;
use crate::scene::RenderPacket;

/// RGBA color in [0.0, 1.0] components
pub type Color = [f32; 4];

bitflags! {
    /// Which target surfaces a clear call touches
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        /// Clear the color buffer
        const COLOR = 1;
        /// Clear the depth buffer
        const DEPTH = 1 << 1;
        /// Clear the stencil buffer
        const STENCIL = 1 << 2;
    }
}

/// Interface between the scene graph and a renderer backend
pub trait RenderContext {
    /// Push the view transform for subsequent draws
    fn set_view_transform(&mut self, view: &Mat4);

    /// Push the projection transform for subsequent draws
    fn set_projection_transform(&mut self, projection: &Mat4);

    /// Push the world transform for the next draw packet
    fn set_world_transform(&mut self, world: &Mat4);

    /// Build a perspective projection matrix in the backend's clip conventions
    fn perspective(&self, fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Build an orthographic projection matrix in the backend's clip conventions
    fn orthographic(&self, width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Rebuild a frustum's planes from a combined view-projection matrix.
    ///
    /// The default extraction matches the clip conventions of the
    /// [`crate::foundation::math::Mat4Ext`] builders; backends with different
    /// conventions override this.
    fn update_frustum(&self, combined: &Mat4, frustum: &mut Frustum) {
        *frustum = Frustum::from_matrix(combined);
    }

    /// Clear the target surface
    fn clear(&mut self, color: Color, flags: ClearFlags, depth: f32, stencil: u32);

    /// Submit one draw packet
    fn draw(&mut self, packet: &RenderPacket) -> SceneResult<()>;
}
