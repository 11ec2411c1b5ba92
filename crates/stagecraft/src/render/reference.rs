//! CPU-only reference implementation of [`RenderContext`]
//!
//! Builds matrices with the `Mat4Ext` conventions and records everything
//! submitted to it instead of driving a GPU. Tests assert against the
//! recorded state; the demo app uses it to log frame contents.

use crate::error::SceneResult;
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::render::context::{ClearFlags, Color, RenderContext};
use crate::scene::RenderPacket;

/// Recording renderer backend with no GPU behind it
#[derive(Debug)]
pub struct ReferenceRenderer {
    view: Mat4,
    projection: Mat4,
    world: Mat4,
    clear_count: u32,
    last_clear_color: Color,
    drawn: Vec<RenderPacket>,
}

impl ReferenceRenderer {
    /// Create a renderer with identity matrices and an empty surface
    pub fn new() -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
            world: Mat4::identity(),
            clear_count: 0,
            last_clear_color: [0.0, 0.0, 0.0, 1.0],
            drawn: Vec::new(),
        }
    }

    /// Last view matrix pushed by a camera
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Last projection matrix pushed by a camera
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Last world matrix pushed by the render queue
    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    /// Packets drawn since the last clear
    pub fn drawn(&self) -> &[RenderPacket] {
        &self.drawn
    }

    /// Number of clear calls seen
    pub fn clear_count(&self) -> u32 {
        self.clear_count
    }

    /// Color of the most recent clear
    pub fn last_clear_color(&self) -> Color {
        self.last_clear_color
    }
}

impl Default for ReferenceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for ReferenceRenderer {
    fn set_view_transform(&mut self, view: &Mat4) {
        self.view = *view;
    }

    fn set_projection_transform(&mut self, projection: &Mat4) {
        self.projection = *projection;
    }

    fn set_world_transform(&mut self, world: &Mat4) {
        self.world = *world;
    }

    fn perspective(&self, fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective(fovy, aspect, near, far)
    }

    fn orthographic(&self, width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        Mat4::orthographic(width, height, near, far)
    }

    fn clear(&mut self, color: Color, _flags: ClearFlags, _depth: f32, _stencil: u32) {
        self.clear_count += 1;
        self.last_clear_color = color;
        self.drawn.clear();
    }

    fn draw(&mut self, packet: &RenderPacket) -> SceneResult<()> {
        self.drawn.push(packet.clone());
        Ok(())
    }
}
