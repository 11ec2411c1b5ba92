//! Bounding shapes used for visibility and coarse collision tests
//!
//! All shapes live in a single coordinate space; world/model distinctions are
//! handled by the components that own them.

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Which side of a plane a shape occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely on the positive (normal-facing) side
    Front,
    /// Entirely on the negative side
    Back,
    /// Straddling the plane
    Spanning,
}

/// A plane in the form `normal · p + distance = 0`
///
/// Points with `normal · p + distance > 0` are on the front side. Frustum
/// planes are built with normals pointing into the frustum, so "front of all
/// six planes" means inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Plane normal (unit length once normalized)
    pub normal: Vec3,
    /// Signed distance term
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal and distance term
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Create a plane passing through a point with the given normal
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            distance: -normal.dot(&point),
        }
    }

    /// Create a plane from the (a, b, c, d) coefficients of a clip-space row
    /// combination, normalized so the normal has unit length.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        Self {
            normal: Vec3::new(coefficients.x, coefficients.y, coefficients.z),
            distance: coefficients.w,
        }
        .normalized()
    }

    /// Return the plane scaled so its normal has unit length
    pub fn normalized(&self) -> Self {
        let length = self.normal.magnitude();
        if length > f32::EPSILON {
            Self {
                normal: self.normal / length,
                distance: self.distance / length,
            }
        } else {
            *self
        }
    }

    /// Signed distance from a point to the plane
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// Classify a point against the plane
    pub fn side(&self, point: &Vec3) -> PlaneSide {
        let d = self.distance_to_point(point);
        if d > f32::EPSILON {
            PlaneSide::Front
        } else if d < -f32::EPSILON {
            PlaneSide::Back
        } else {
            PlaneSide::Spanning
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::y(),
            distance: 0.0,
        }
    }
}

/// A sphere described by center and radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point
    pub center: Vec3,
    /// Radius (non-negative; zero is a degenerate but legal sphere)
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere from center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether the sphere contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center).magnitude_squared() <= self.radius * self.radius
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 0.0,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from min/max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a center point and half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-extents of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Whether the box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::zeros(),
            max: Vec3::zeros(),
        }
    }
}

/// Oriented bounding box: center, three orthonormal axes, and half-extents
/// along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb {
    /// Center point
    pub center: Vec3,
    /// Local box axes (unit length, mutually orthogonal)
    pub axes: [Vec3; 3],
    /// Half-extent along each axis
    pub extents: [f32; 3],
}

impl Obb {
    /// Create an OBB from center, axes, and half-extents
    pub fn new(center: Vec3, axes: [Vec3; 3], extents: [f32; 3]) -> Self {
        Self {
            center,
            axes,
            extents,
        }
    }

    /// Create an axis-aligned OBB from center and half-extents
    pub fn axis_aligned(center: Vec3, extents: Vec3) -> Self {
        Self {
            center,
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            extents: [extents.x, extents.y, extents.z],
        }
    }

    /// Whether the box contains a point (boundary inclusive)
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let offset = point - self.center;
        (0..3).all(|i| self.axes[i].dot(&offset).abs() <= self.extents[i])
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self::axis_aligned(Vec3::zeros(), Vec3::zeros())
    }
}

/// The six faces of a view frustum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumFace {
    /// Near clipping plane
    Near = 0,
    /// Far clipping plane
    Far = 1,
    /// Left plane
    Left = 2,
    /// Right plane
    Right = 3,
    /// Top plane
    Top = 4,
    /// Bottom plane
    Bottom = 5,
}

/// A view frustum as six inward-facing planes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from six planes indexed by [`FrustumFace`]
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the six planes from a combined view-projection matrix.
    ///
    /// Uses the Gribb–Hartmann row combinations for column-vector matrices
    /// with OpenGL clip conventions (`-w <= z <= w`); every plane is
    /// normalized so distance comparisons are metric.
    pub fn from_matrix(combined: &Mat4) -> Self {
        let row = |i: usize| {
            Vec4::new(
                combined[(i, 0)],
                combined[(i, 1)],
                combined[(i, 2)],
                combined[(i, 3)],
            )
        };
        let r0 = row(0);
        let r1 = row(1);
        let r2 = row(2);
        let r3 = row(3);

        Self {
            planes: [
                Plane::from_coefficients(r3 + r2), // near
                Plane::from_coefficients(r3 - r2), // far
                Plane::from_coefficients(r3 + r0), // left
                Plane::from_coefficients(r3 - r0), // right
                Plane::from_coefficients(r3 - r1), // top
                Plane::from_coefficients(r3 + r1), // bottom
            ],
        }
    }

    /// Plane for one face
    pub fn face(&self, face: FrustumFace) -> &Plane {
        &self.planes[face as usize]
    }

    /// Replace the plane for one face
    pub fn set_face(&mut self, face: FrustumFace, plane: Plane) {
        self.planes[face as usize] = plane;
    }

    /// All six planes in [`FrustumFace`] order
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    /// Whether a point lies inside (or on) all six planes
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            planes: [Plane::default(); 6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4Ext;
    use approx::assert_relative_eq;

    #[test]
    fn aabb_center_extents_roundtrip() {
        let aabb = Aabb::from_center_extents(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_relative_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(aabb.extents(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn aabb_point_containment() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.contains_point(&Vec3::zeros()));
        assert!(aabb.contains_point(&Vec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains_point(&Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn plane_distance_and_side() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::y());
        assert_relative_eq!(plane.distance_to_point(&Vec3::new(0.0, 5.0, 0.0)), 3.0);
        assert_eq!(plane.side(&Vec3::new(0.0, 5.0, 0.0)), PlaneSide::Front);
        assert_eq!(plane.side(&Vec3::new(0.0, -1.0, 0.0)), PlaneSide::Back);
    }

    #[test]
    fn obb_point_containment_respects_orientation() {
        let axes = [
            Vec3::new(std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2, 0.0),
            Vec3::new(-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2, 0.0),
            Vec3::z(),
        ];
        let obb = Obb::new(Vec3::zeros(), axes, [1.0, 0.1, 0.1]);
        // A point along the first (diagonal) axis is inside; the same distance
        // along world X is not.
        assert!(obb.contains_point(&(axes[0] * 0.9)));
        assert!(!obb.contains_point(&Vec3::new(0.9, 0.0, 0.0)));
    }

    #[test]
    fn frustum_from_perspective_contains_points_in_view() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let frustum = Frustum::from_matrix(&(proj * view));

        assert!(frustum.contains_point(&Vec3::zeros()));
        assert!(frustum.contains_point(&Vec3::new(0.0, 0.0, 4.0)));
        // Behind the camera
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, 6.0)));
        // Beyond the far plane
        assert!(!frustum.contains_point(&Vec3::new(0.0, 0.0, -200.0)));
    }

    #[test]
    fn frustum_planes_are_normalized() {
        let proj = Mat4::perspective(1.0, 16.0 / 9.0, 0.5, 1000.0);
        let frustum = Frustum::from_matrix(&proj);
        for plane in frustum.planes() {
            assert_relative_eq!(plane.normal.magnitude(), 1.0, epsilon = 1e-5);
        }
    }
}
