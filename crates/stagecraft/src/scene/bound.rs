//! Bounding-volume collider component
//!
//! A bound tracks two shapes: the *original* shape authored in model space and
//! the *live* shape in world space, recomputed from the owning node's world
//! transform when dirty. Only [`Bound::update`] writes the live shape; the one
//! exception is the frustum variant, which the camera rebuilds wholesale from
//! its combined view-projection matrix.
//!
//! Intersection testing dispatches through a single match over the two live
//! shape kinds, so every pairwise rule lives in `geometry::intersect`.

use log::trace;

use crate::foundation::math::{Point3, Transform, Vec3};
use crate::geometry::{intersect, Aabb, Frustum, Obb, Sphere};
use crate::scene::component::ComponentId;

/// Kind tag for a bound's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundKind {
    /// Center + radius sphere
    Sphere,
    /// Axis-aligned box
    Aabb,
    /// Oriented box
    Obb,
    /// Six-plane view frustum
    Frustum,
}

/// A bounding shape, model- or world-space depending on context
#[derive(Debug, Clone, PartialEq)]
pub enum BoundShape {
    /// Center + radius sphere
    Sphere(Sphere),
    /// Axis-aligned box
    Aabb(Aabb),
    /// Oriented box
    Obb(Obb),
    /// Six-plane view frustum
    Frustum(Frustum),
}

impl BoundShape {
    /// Kind tag of the wrapped shape
    pub fn kind(&self) -> BoundKind {
        match self {
            Self::Sphere(_) => BoundKind::Sphere,
            Self::Aabb(_) => BoundKind::Aabb,
            Self::Obb(_) => BoundKind::Obb,
            Self::Frustum(_) => BoundKind::Frustum,
        }
    }
}

/// Bounding-volume collider attached to a scene node
#[derive(Debug, Clone)]
pub struct Bound {
    id: ComponentId,
    group: u32,
    collision_source: bool,
    enabled: bool,
    dirty: bool,
    original: BoundShape,
    live: BoundShape,
}

impl Bound {
    /// Create a bound from its model-space shape.
    ///
    /// Starts dirty so the first `update` derives the live shape; until then
    /// the live shape equals the original.
    pub fn new(original: BoundShape, group: u32, collision_source: bool) -> Self {
        Self {
            id: ComponentId::generate(),
            group,
            collision_source,
            enabled: true,
            dirty: true,
            live: original.clone(),
            original,
        }
    }

    /// Component identity
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ComponentId) {
        self.id = id;
    }

    /// Collision group; equal nonzero groups never test against each other
    pub fn group(&self) -> u32 {
        self.group
    }

    /// Set the collision group
    pub fn set_group(&mut self, group: u32) {
        self.group = group;
    }

    /// Whether this bound initiates tests (non-sources only participate
    /// passively)
    pub fn is_collision_source(&self) -> bool {
        self.collision_source
    }

    /// Set the collision-source flag
    pub fn set_collision_source(&mut self, source: bool) {
        self.collision_source = source;
    }

    /// Whether the bound participates in tests at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the bound
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the live shape is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the live shape stale (the owner's world transform changed)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Kind tag of the shapes
    pub fn kind(&self) -> BoundKind {
        self.original.kind()
    }

    /// Model-space shape
    pub fn original(&self) -> &BoundShape {
        &self.original
    }

    /// Replace the model-space shape and invalidate the live one
    pub fn set_original(&mut self, shape: BoundShape) {
        self.original = shape;
        self.dirty = true;
    }

    /// World-space shape, current as of the last `update`
    pub fn live(&self) -> &BoundShape {
        &self.live
    }

    /// Overwrite the live frustum from a camera rebuild.
    ///
    /// Only meaningful for frustum bounds; other kinds ignore the call (their
    /// live shape is owned by `update`).
    pub(crate) fn write_live_frustum(&mut self, frustum: Frustum) {
        if let BoundShape::Frustum(live) = &mut self.live {
            *live = frustum;
            self.dirty = false;
        }
    }

    /// Recompute the live shape from the owner's world transform.
    ///
    /// Non-dirty bounds are silent no-ops, so calling twice in a row yields
    /// bit-identical live shapes. The frustum variant is a no-op regardless:
    /// its live planes come from the camera.
    pub fn update(&mut self, world: &Transform) {
        if !self.dirty {
            return;
        }
        match &self.original {
            BoundShape::Sphere(sphere) => {
                self.live = BoundShape::Sphere(transform_sphere(sphere, world));
            }
            BoundShape::Aabb(aabb) => {
                self.live = BoundShape::Aabb(transform_aabb(aabb, world));
            }
            BoundShape::Obb(obb) => {
                self.live = BoundShape::Obb(transform_obb(obb, world));
            }
            BoundShape::Frustum(_) => return,
        }
        trace!("bound {:?} recomputed live shape", self.id);
        self.dirty = false;
    }

    /// Test this bound's live shape against another's.
    ///
    /// Bounds sharing the same nonzero group never intersect, without
    /// invoking geometry.
    pub fn test(&self, other: &Bound) -> bool {
        if self.group != 0 && self.group == other.group {
            return false;
        }
        test_shapes(&self.live, &other.live)
    }
}

/// Pairwise live-shape test; the full 4x4 table in one place
fn test_shapes(a: &BoundShape, b: &BoundShape) -> bool {
    use BoundShape::{Aabb, Frustum, Obb, Sphere};
    match (a, b) {
        (Sphere(x), Sphere(y)) => intersect::sphere_sphere(x, y),
        (Sphere(x), Aabb(y)) | (Aabb(y), Sphere(x)) => intersect::sphere_aabb(x, y),
        (Sphere(x), Obb(y)) | (Obb(y), Sphere(x)) => intersect::sphere_obb(x, y),
        (Sphere(x), Frustum(y)) | (Frustum(y), Sphere(x)) => intersect::frustum_sphere(y, x),
        (Aabb(x), Aabb(y)) => intersect::aabb_aabb(x, y),
        (Aabb(x), Obb(y)) | (Obb(y), Aabb(x)) => intersect::aabb_obb(x, y),
        (Aabb(x), Frustum(y)) | (Frustum(y), Aabb(x)) => intersect::frustum_aabb(y, x),
        (Obb(x), Obb(y)) => intersect::obb_obb(x, y),
        (Obb(x), Frustum(y)) | (Frustum(y), Obb(x)) => intersect::frustum_obb(y, x),
        (Frustum(x), Frustum(y)) => intersect::frustum_frustum(x, y),
    }
}

fn transform_sphere(sphere: &Sphere, world: &Transform) -> Sphere {
    let center = world
        .affine()
        .transform_point(&Point3::from(sphere.center))
        .coords;
    let scaling = world.scaling();
    let max_scale = scaling.x.abs().max(scaling.y.abs()).max(scaling.z.abs());
    Sphere::new(center, sphere.radius * max_scale)
}

/// Transformed-AABB fast method: per output axis, pick the min/max source
/// extent by the sign of each affine entry instead of transforming all eight
/// corners.
fn transform_aabb(aabb: &Aabb, world: &Transform) -> Aabb {
    let m = world.affine();
    let mut min = Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
    let mut max = min;
    for i in 0..3 {
        for j in 0..3 {
            let a = m[(i, j)] * aabb.min[j];
            let b = m[(i, j)] * aabb.max[j];
            if a < b {
                min[i] += a;
                max[i] += b;
            } else {
                min[i] += b;
                max[i] += a;
            }
        }
    }
    Aabb::new(min, max)
}

/// Transforms each scaled axis through the full affine matrix, so non-uniform
/// scale and shear land in the extents rather than skewing the axes.
fn transform_obb(obb: &Obb, world: &Transform) -> Obb {
    let m = world.affine();
    let center = m.transform_point(&Point3::from(obb.center)).coords;

    let mut axes = obb.axes;
    let mut extents = obb.extents;
    for i in 0..3 {
        let scaled = m.transform_vector(&(obb.axes[i] * obb.extents[i]));
        let length = scaled.magnitude();
        if length > f32::EPSILON {
            axes[i] = scaled / length;
            extents[i] = length;
        } else {
            // Degenerate (zero-extent) axis keeps its direction.
            axes[i] = obb.axes[i];
            extents[i] = 0.0;
        }
    }
    Obb::new(center, axes, extents)
}
