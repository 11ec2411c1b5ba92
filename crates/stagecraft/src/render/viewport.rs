//! Viewport: the camera-to-target binding used by `render`

use crate::render::context::{ClearFlags, Color};
use crate::scene::NodeKey;

/// A rectangular region of a render target bound to one camera.
///
/// Dimensions are stored as fractions of the target surface so the viewport
/// survives target resizes; the actual pixel rect is recomputed from the
/// target size on every dimension change.
#[derive(Debug, Clone)]
pub struct Viewport {
    camera: NodeKey,

    left: f32,
    top: f32,
    width: f32,
    height: f32,

    target_width: u32,
    target_height: u32,

    actual_left: u32,
    actual_top: u32,
    actual_width: u32,
    actual_height: u32,

    background: Color,
    clear_flags: ClearFlags,
    clear_depth: f32,
}

impl Viewport {
    /// Create a viewport covering a fractional region of a target surface.
    ///
    /// `camera` must be a node carrying a Camera component by the time
    /// `render` is called.
    pub fn new(
        camera: NodeKey,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        target_width: u32,
        target_height: u32,
    ) -> Self {
        let mut viewport = Self {
            camera,
            left,
            top,
            width,
            height,
            target_width,
            target_height,
            actual_left: 0,
            actual_top: 0,
            actual_width: 0,
            actual_height: 0,
            background: [0.0, 0.0, 0.0, 1.0],
            clear_flags: ClearFlags::COLOR | ClearFlags::DEPTH,
            clear_depth: 1.0,
        };
        viewport.update_actual_rect();
        viewport
    }

    /// Viewport covering the whole target surface
    pub fn full_target(camera: NodeKey, target_width: u32, target_height: u32) -> Self {
        Self::new(camera, 0.0, 0.0, 1.0, 1.0, target_width, target_height)
    }

    fn update_actual_rect(&mut self) {
        let tw = self.target_width as f32;
        let th = self.target_height as f32;
        self.actual_left = (self.left * tw) as u32;
        self.actual_top = (self.top * th) as u32;
        self.actual_width = (self.width * tw) as u32;
        self.actual_height = (self.height * th) as u32;
    }

    /// Camera node rendered through this viewport
    pub fn camera(&self) -> NodeKey {
        self.camera
    }

    /// Rebind to a different camera node
    pub fn set_camera(&mut self, camera: NodeKey) {
        self.camera = camera;
    }

    /// Move/resize the fractional region and recompute the pixel rect
    pub fn set_dimensions(&mut self, left: f32, top: f32, width: f32, height: f32) {
        self.left = left;
        self.top = top;
        self.width = width;
        self.height = height;
        self.update_actual_rect();
    }

    /// Pixel rect as (left, top, width, height)
    pub fn actual_rect(&self) -> (u32, u32, u32, u32) {
        (
            self.actual_left,
            self.actual_top,
            self.actual_width,
            self.actual_height,
        )
    }

    /// Aspect ratio of the pixel rect
    pub fn aspect_ratio(&self) -> f32 {
        if self.actual_height == 0 {
            1.0
        } else {
            self.actual_width as f32 / self.actual_height as f32
        }
    }

    /// Background color used when clearing
    pub fn background(&self) -> Color {
        self.background
    }

    /// Set the background color
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Surfaces cleared before rendering
    pub fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    /// Set the surfaces cleared before rendering
    pub fn set_clear_flags(&mut self, flags: ClearFlags) {
        self.clear_flags = flags;
    }

    /// Depth value written by the clear
    pub fn clear_depth(&self) -> f32 {
        self.clear_depth
    }

    /// Set the depth value written by the clear
    pub fn set_clear_depth(&mut self, depth: f32) {
        self.clear_depth = depth;
    }
}
