//! Camera component: lazy view/projection matrices and an owned frustum bound
//!
//! The view matrix is the inverse of the owning node's world transform, built
//! from the decomposed parts instead of a general 4x4 inverse. The projection
//! matrix is built by the renderer backend so clip conventions stay the
//! backend's business. Both are cached behind independent dirty flags; when
//! either changes, `update` rebuilds the owned frustum bound from the combined
//! matrix so culling later in the frame tests against current planes.

use log::trace;

use crate::foundation::math::{Mat4, Transform};
use crate::geometry::Frustum;
use crate::render::RenderContext;
use crate::scene::bound::{Bound, BoundShape};
use crate::scene::component::ComponentId;

/// How the camera projects the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    /// Parallel projection
    Orthographic,
    /// Perspective projection
    Perspective,
}

/// Camera component
#[derive(Debug, Clone)]
pub struct Camera {
    id: ComponentId,

    projection_type: ProjectionType,
    object_mask: u32,

    fovy: f32,
    aspect: f32,
    width: f32,
    height: f32,
    near: f32,
    far: f32,

    view: Mat4,
    projection: Mat4,
    view_dirty: bool,
    projection_dirty: bool,

    frustum: Bound,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a perspective camera with default parameters
    /// (fovY = 90 degrees, 16:9, near 0.1, far 1000)
    pub fn new() -> Self {
        Self {
            id: ComponentId::generate(),
            projection_type: ProjectionType::Perspective,
            object_mask: 0,
            fovy: std::f32::consts::FRAC_PI_2,
            aspect: 16.0 / 9.0,
            width: 2.0,
            height: 2.0,
            near: 0.1,
            far: 1000.0,
            view: Mat4::identity(),
            projection: Mat4::identity(),
            view_dirty: true,
            projection_dirty: true,
            frustum: Bound::new(BoundShape::Frustum(Frustum::default()), 0, true),
        }
    }

    /// Component identity
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ComponentId) {
        self.id = id;
    }

    /// Current projection type
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Switch projection type (equal values are no-ops)
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        if self.projection_type != projection_type {
            self.projection_type = projection_type;
            self.projection_dirty = true;
        }
    }

    /// Bitmask of registry slots visible to this camera
    pub fn object_mask(&self) -> u32 {
        self.object_mask
    }

    /// Set the visible-slot bitmask
    pub fn set_object_mask(&mut self, mask: u32) {
        self.object_mask = mask;
    }

    /// Set all perspective parameters at once (per-field change detection)
    pub fn set_perspective_params(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) {
        self.set_fovy(fovy);
        self.set_aspect(aspect);
        self.set_near(near);
        self.set_far(far);
    }

    /// Set all orthographic parameters at once (per-field change detection)
    pub fn set_orthographic_params(&mut self, width: f32, height: f32, near: f32, far: f32) {
        self.set_width(width);
        self.set_height(height);
        self.set_near(near);
        self.set_far(far);
    }

    /// Vertical field of view in radians (perspective)
    pub fn fovy(&self) -> f32 {
        self.fovy
    }

    /// Set the vertical field of view
    pub fn set_fovy(&mut self, fovy: f32) {
        if (self.fovy - fovy).abs() > f32::EPSILON {
            self.fovy = fovy;
            self.projection_dirty = true;
        }
    }

    /// Width / height ratio (perspective)
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Set the aspect ratio
    pub fn set_aspect(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.projection_dirty = true;
        }
    }

    /// View-volume width (orthographic)
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Set the view-volume width
    pub fn set_width(&mut self, width: f32) {
        if (self.width - width).abs() > f32::EPSILON {
            self.width = width;
            self.projection_dirty = true;
        }
    }

    /// View-volume height (orthographic)
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Set the view-volume height
    pub fn set_height(&mut self, height: f32) {
        if (self.height - height).abs() > f32::EPSILON {
            self.height = height;
            self.projection_dirty = true;
        }
    }

    /// Near clip distance
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Set the near clip distance
    pub fn set_near(&mut self, near: f32) {
        if (self.near - near).abs() > f32::EPSILON {
            self.near = near;
            self.projection_dirty = true;
        }
    }

    /// Far clip distance
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the far clip distance
    pub fn set_far(&mut self, far: f32) {
        if (self.far - far).abs() > f32::EPSILON {
            self.far = far;
            self.projection_dirty = true;
        }
    }

    /// Whether the cached view matrix is stale
    pub fn is_view_dirty(&self) -> bool {
        self.view_dirty
    }

    /// Whether the cached projection matrix is stale
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Transform-listener callback: the owning node moved, so the view is
    /// stale. No eager recomputation.
    pub fn mark_view_dirty(&mut self) {
        self.view_dirty = true;
    }

    /// The frustum bound other bounds are culled against
    pub fn bound(&self) -> &Bound {
        &self.frustum
    }

    /// Mutable access to the frustum bound (group/source configuration)
    pub fn bound_mut(&mut self) -> &mut Bound {
        &mut self.frustum
    }

    /// Current view matrix, recomputed from the owner's world transform and
    /// pushed to the renderer when stale
    pub fn view_matrix(&mut self, world: &Transform, ctx: &mut dyn RenderContext) -> Mat4 {
        if self.view_dirty {
            self.view = world.inverse_affine();
            ctx.set_view_transform(&self.view);
            self.view_dirty = false;
            trace!("camera {:?} view matrix recomputed", self.id);
        }
        self.view
    }

    /// Current projection matrix, rebuilt by the renderer and pushed to it
    /// when stale
    pub fn projection_matrix(&mut self, ctx: &mut dyn RenderContext) -> Mat4 {
        if self.projection_dirty {
            self.projection = match self.projection_type {
                ProjectionType::Perspective => {
                    ctx.perspective(self.fovy, self.aspect, self.near, self.far)
                }
                ProjectionType::Orthographic => {
                    ctx.orthographic(self.width, self.height, self.near, self.far)
                }
            };
            ctx.set_projection_transform(&self.projection);
            self.projection_dirty = false;
            trace!("camera {:?} projection matrix recomputed", self.id);
        }
        self.projection
    }

    /// Per-frame update: refresh both matrices and, if either was stale,
    /// rebuild the owned frustum from the combined matrix.
    ///
    /// The scene manager runs this before any culling in the frame, so every
    /// bound is tested against current planes.
    pub fn update(&mut self, world: &Transform, ctx: &mut dyn RenderContext) {
        let stale = self.view_dirty || self.projection_dirty;
        let view = self.view_matrix(world, ctx);
        let projection = self.projection_matrix(ctx);
        if stale {
            let combined = projection * view;
            let mut planes = match self.frustum.live() {
                BoundShape::Frustum(f) => *f,
                _ => Frustum::default(),
            };
            ctx.update_frustum(&combined, &mut planes);
            self.frustum.write_live_frustum(planes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4Ext, Quat, Vec3};
    use crate::render::ReferenceRenderer;
    use approx::assert_relative_eq;

    #[test]
    fn setters_dirty_only_on_change() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        camera.update(&Transform::identity(), &mut ctx);
        assert!(!camera.is_projection_dirty());

        camera.set_fovy(camera.fovy());
        assert!(!camera.is_projection_dirty(), "equal value is a no-op");

        camera.set_far(2000.0);
        assert!(camera.is_projection_dirty());
    }

    #[test]
    fn view_matrix_inverts_world_transform() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        let world = Transform::new(
            Vec3::new(0.0, 4.0, 8.0),
            Quat::from_axis_angle(&Vec3::y_axis(), 0.5),
            Vec3::new(1.0, 1.0, 1.0),
        );
        let view = camera.view_matrix(&world, &mut ctx);
        assert_relative_eq!(view * world.affine(), Mat4::identity(), epsilon = 1e-4);
        assert_eq!(*ctx.view(), view, "view pushed to the renderer");
    }

    #[test]
    fn projection_built_by_backend() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        camera.set_perspective_params(std::f32::consts::FRAC_PI_2, 16.0 / 9.0, 0.5, 1000.0);
        let projection = camera.projection_matrix(&mut ctx);
        assert_eq!(
            projection,
            Mat4::perspective(std::f32::consts::FRAC_PI_2, 16.0 / 9.0, 0.5, 1000.0)
        );
        assert_eq!(*ctx.projection(), projection);
    }

    #[test]
    fn orthographic_switch_rebuilds_projection() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        camera.projection_matrix(&mut ctx);
        camera.set_projection_type(ProjectionType::Orthographic);
        camera.set_orthographic_params(20.0, 10.0, 0.1, 50.0);
        let projection = camera.projection_matrix(&mut ctx);
        assert_eq!(projection, Mat4::orthographic(20.0, 10.0, 0.1, 50.0));
    }

    #[test]
    fn update_rebuilds_frustum_once_clean() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        let world = Transform::from_translation(Vec3::new(0.0, 0.0, 5.0));

        camera.update(&world, &mut ctx);
        let BoundShape::Frustum(frustum) = camera.bound().live().clone() else {
            panic!("camera bound is a frustum");
        };
        // Origin is in front of the camera at z=5 looking down -Z.
        assert!(frustum.contains_point(&Vec3::zeros()));
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, 10.0)));

        // Clean update leaves the planes untouched.
        camera.update(&world, &mut ctx);
        let BoundShape::Frustum(again) = camera.bound().live().clone() else {
            panic!("camera bound is a frustum");
        };
        assert_eq!(frustum, again);
    }

    #[test]
    fn listener_callback_marks_view_only() {
        let mut camera = Camera::new();
        let mut ctx = ReferenceRenderer::new();
        camera.update(&Transform::identity(), &mut ctx);
        camera.mark_view_dirty();
        assert!(camera.is_view_dirty());
        assert!(!camera.is_projection_dirty());
    }
}
