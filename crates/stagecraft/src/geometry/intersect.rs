//! Pairwise intersection predicates for the bounding shapes
//!
//! Free functions instead of per-shape virtual dispatch: the `Bound` component
//! selects the right predicate with a single `match` over the shape pair, so
//! every geometric rule lives in this one module.
//!
//! Frustum tests follow the conservative culling rule: a shape is outside only
//! when it lies entirely behind one of the six planes; anything spanning a
//! plane counts as intersecting.

use super::shapes::{Aabb, Frustum, Obb, Plane, PlaneSide, Sphere};

/// Classify a sphere against a plane
pub fn sphere_plane(sphere: &Sphere, plane: &Plane) -> PlaneSide {
    let distance = plane.distance_to_point(&sphere.center);
    if distance >= sphere.radius {
        PlaneSide::Front
    } else if distance <= -sphere.radius {
        PlaneSide::Back
    } else {
        PlaneSide::Spanning
    }
}

/// Classify an AABB against a plane.
///
/// Projects the box onto the plane normal by picking the min/max corner per
/// axis according to the normal's component signs, avoiding an eight-corner
/// loop.
pub fn aabb_plane(aabb: &Aabb, plane: &Plane) -> PlaneSide {
    let mut min_d = 0.0;
    let mut max_d = 0.0;
    for i in 0..3 {
        let n = plane.normal[i];
        if n >= 0.0 {
            min_d += n * aabb.min[i];
            max_d += n * aabb.max[i];
        } else {
            min_d += n * aabb.max[i];
            max_d += n * aabb.min[i];
        }
    }

    if min_d + plane.distance >= 0.0 {
        PlaneSide::Front
    } else if max_d + plane.distance <= 0.0 {
        PlaneSide::Back
    } else {
        PlaneSide::Spanning
    }
}

/// Classify an OBB against a plane using the projection-radius test.
pub fn obb_plane(obb: &Obb, plane: &Plane) -> PlaneSide {
    let radius = obb.extents[0] * plane.normal.dot(&obb.axes[0]).abs()
        + obb.extents[1] * plane.normal.dot(&obb.axes[1]).abs()
        + obb.extents[2] * plane.normal.dot(&obb.axes[2]).abs();
    let distance = plane.distance_to_point(&obb.center);

    if distance >= radius {
        PlaneSide::Front
    } else if distance <= -radius {
        PlaneSide::Back
    } else {
        PlaneSide::Spanning
    }
}

/// Sphere vs sphere overlap
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let combined = a.radius + b.radius;
    (b.center - a.center).magnitude_squared() <= combined * combined
}

/// Sphere vs AABB overlap via the closest point on the box
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    let closest = nalgebra::Vector3::new(
        sphere.center.x.clamp(aabb.min.x, aabb.max.x),
        sphere.center.y.clamp(aabb.min.y, aabb.max.y),
        sphere.center.z.clamp(aabb.min.z, aabb.max.z),
    );
    (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
}

/// Sphere vs OBB overlap via the closest point in box space
pub fn sphere_obb(sphere: &Sphere, obb: &Obb) -> bool {
    let offset = sphere.center - obb.center;
    let mut closest = obb.center;
    for i in 0..3 {
        let along_axis = offset.dot(&obb.axes[i]).clamp(-obb.extents[i], obb.extents[i]);
        closest += obb.axes[i] * along_axis;
    }
    (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
}

/// AABB vs AABB overlap (interval test per axis)
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x
        && a.max.x >= b.min.x
        && a.min.y <= b.max.y
        && a.max.y >= b.min.y
        && a.min.z <= b.max.z
        && a.max.z >= b.min.z
}

/// AABB vs OBB overlap (the AABB is treated as an axis-aligned OBB)
pub fn aabb_obb(aabb: &Aabb, obb: &Obb) -> bool {
    obb_obb(&Obb::axis_aligned(aabb.center(), aabb.extents()), obb)
}

/// OBB vs OBB overlap via the separating-axis test.
///
/// Fifteen candidate axes: the three axes of each box and the nine pairwise
/// cross products (Real-Time Collision Detection, §4.4.1). The epsilon term
/// keeps near-parallel edge axes from producing a false separation.
pub fn obb_obb(a: &Obb, b: &Obb) -> bool {
    const EPSILON: f32 = 1e-6;

    // Rotation matrix expressing b in a's coordinate frame, plus its
    // absolute-value counterpart for projection radii.
    let mut r = [[0.0f32; 3]; 3];
    let mut abs_r = [[0.0f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = a.axes[i].dot(&b.axes[j]);
            abs_r[i][j] = r[i][j].abs() + EPSILON;
        }
    }

    // Translation between centers, in a's frame.
    let offset = b.center - a.center;
    let t = [
        offset.dot(&a.axes[0]),
        offset.dot(&a.axes[1]),
        offset.dot(&a.axes[2]),
    ];

    // Axes A0, A1, A2
    for i in 0..3 {
        let ra = a.extents[i];
        let rb = b.extents[0] * abs_r[i][0]
            + b.extents[1] * abs_r[i][1]
            + b.extents[2] * abs_r[i][2];
        if t[i].abs() > ra + rb {
            return false;
        }
    }

    // Axes B0, B1, B2
    for j in 0..3 {
        let ra = a.extents[0] * abs_r[0][j]
            + a.extents[1] * abs_r[1][j]
            + a.extents[2] * abs_r[2][j];
        let rb = b.extents[j];
        let projected = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
        if projected.abs() > ra + rb {
            return false;
        }
    }

    // Cross-product axes Ai x Bj
    for i in 0..3 {
        let i1 = (i + 1) % 3;
        let i2 = (i + 2) % 3;
        for j in 0..3 {
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;

            let ra = a.extents[i1] * abs_r[i2][j] + a.extents[i2] * abs_r[i1][j];
            let rb = b.extents[j1] * abs_r[i][j2] + b.extents[j2] * abs_r[i][j1];
            let projected = t[i2] * r[i1][j] - t[i1] * r[i2][j];
            if projected.abs() > ra + rb {
                return false;
            }
        }
    }

    true
}

/// Frustum vs sphere: outside only if fully behind one plane
pub fn frustum_sphere(frustum: &Frustum, sphere: &Sphere) -> bool {
    frustum
        .planes()
        .iter()
        .all(|plane| sphere_plane(sphere, plane) != PlaneSide::Back)
}

/// Frustum vs AABB: outside only if fully behind one plane
pub fn frustum_aabb(frustum: &Frustum, aabb: &Aabb) -> bool {
    frustum
        .planes()
        .iter()
        .all(|plane| aabb_plane(aabb, plane) != PlaneSide::Back)
}

/// Frustum vs OBB: outside only if fully behind one plane
pub fn frustum_obb(frustum: &Frustum, obb: &Obb) -> bool {
    frustum
        .planes()
        .iter()
        .all(|plane| obb_plane(obb, plane) != PlaneSide::Back)
}

/// Frustum vs frustum is not supported; the pair always reports no
/// intersection, matching the engine's culling rules (no camera is ever
/// culled against another camera).
pub fn frustum_frustum(_a: &Frustum, _b: &Frustum) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext, Quat, Vec3};

    fn rotated_obb(center: Vec3, extents: [f32; 3], axis: &nalgebra::Unit<Vec3>, angle: f32) -> Obb {
        let q = Quat::from_axis_angle(axis, angle);
        Obb::new(center, [q * Vec3::x(), q * Vec3::y(), q * Vec3::z()], extents)
    }

    #[test]
    fn sphere_sphere_overlap_and_separation() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 0.5);
        assert!(sphere_sphere(&a, &b));
        assert!(!sphere_sphere(&a, &c));
    }

    #[test]
    fn sphere_aabb_touching_counts_as_overlap() {
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(sphere_aabb(&Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0), &aabb));
        assert!(!sphere_aabb(&Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5), &aabb));
    }

    #[test]
    fn sphere_obb_uses_box_orientation() {
        let obb = rotated_obb(Vec3::zeros(), [2.0, 0.2, 0.2], &Vec3::z_axis(), 0.78);
        // Near the rotated long axis end: inside reach of the box.
        let along = obb.axes[0] * 2.0;
        assert!(sphere_obb(&Sphere::new(along, 0.1), &obb));
        // Same distance along world X is far from the thin box.
        assert!(!sphere_obb(&Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.1), &obb));
    }

    #[test]
    fn aabb_aabb_interval_overlap() {
        let a = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));
        let b = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let c = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(6.0, 6.0, 6.0));
        assert!(aabb_aabb(&a, &b));
        assert!(!aabb_aabb(&a, &c));
    }

    #[test]
    fn obb_obb_axis_separation() {
        let a = Obb::axis_aligned(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        // Spans [2.1, 2.9] on X against a's [-1, 1]: separated.
        let apart = Obb::axis_aligned(Vec3::new(2.5, 0.0, 0.0), Vec3::new(0.4, 0.4, 0.4));
        assert!(!obb_obb(&a, &apart));

        // Spans [0.8, 3.2] on X: reaches into a.
        let reaching = Obb::axis_aligned(Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.2, 0.4, 0.4));
        assert!(obb_obb(&a, &reaching));
    }

    #[test]
    fn obb_obb_cross_axis_separation() {
        let a = rotated_obb(Vec3::zeros(), [1.0, 0.1, 0.1], &Vec3::z_axis(), 0.5);
        let b = rotated_obb(Vec3::new(0.0, 1.5, 0.0), [1.0, 0.1, 0.1], &Vec3::z_axis(), -0.5);
        assert!(!obb_obb(&a, &b));
        let overlapping = rotated_obb(Vec3::new(0.0, 0.1, 0.0), [1.0, 0.5, 0.5], &Vec3::z_axis(), -0.5);
        assert!(obb_obb(&a, &overlapping));
    }

    #[test]
    fn aabb_plane_classification() {
        let aabb = Aabb::new(Vec3::new(-1.0, 2.0, -1.0), Vec3::new(1.0, 3.0, 1.0));
        let plane = Plane::new(Vec3::y(), 0.0); // y = 0, front is +y
        assert_eq!(aabb_plane(&aabb, &plane), PlaneSide::Front);

        let below = Aabb::new(Vec3::new(-1.0, -3.0, -1.0), Vec3::new(1.0, -2.0, 1.0));
        assert_eq!(aabb_plane(&below, &plane), PlaneSide::Back);

        let straddling = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(aabb_plane(&straddling, &plane), PlaneSide::Spanning);
    }

    #[test]
    fn obb_plane_accounts_for_center_offset() {
        let plane = Plane::new(Vec3::y(), 0.0);
        let above = Obb::axis_aligned(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(obb_plane(&above, &plane), PlaneSide::Front);
        let below = Obb::axis_aligned(Vec3::new(0.0, -5.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(obb_plane(&below, &plane), PlaneSide::Back);
    }

    #[test]
    fn frustum_tests_cull_behind_far_plane() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::zeros(), Vec3::y());
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.5, 100.0);
        let frustum = Frustum::from_matrix(&(proj * view));

        let near_origin = Sphere::new(Vec3::zeros(), 1.0);
        let far_away = Sphere::new(Vec3::new(0.0, 0.0, -500.0), 1.0);
        assert!(frustum_sphere(&frustum, &near_origin));
        assert!(!frustum_sphere(&frustum, &far_away));

        let box_in = Aabb::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let box_out = Aabb::from_center_extents(Vec3::new(0.0, 0.0, -500.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(frustum_aabb(&frustum, &box_in));
        assert!(!frustum_aabb(&frustum, &box_out));

        let obb_in = Obb::axis_aligned(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let obb_out = Obb::axis_aligned(Vec3::new(0.0, 0.0, -500.0), Vec3::new(1.0, 1.0, 1.0));
        assert!(frustum_obb(&frustum, &obb_in));
        assert!(!frustum_obb(&frustum, &obb_out));
    }

    #[test]
    fn frustum_keeps_shapes_spanning_a_plane() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::zeros(), Vec3::y());
        let proj = Mat4::perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.5, 100.0);
        let frustum = Frustum::from_matrix(&(proj * view));

        // Centered on the far plane boundary: spans it, must not be culled.
        let spanning = Sphere::new(Vec3::new(0.0, 0.0, -90.0), 5.0);
        assert!(frustum_sphere(&frustum, &spanning));
    }

    #[test]
    fn frustum_frustum_is_defined_false() {
        let proj = Mat4::perspective(1.0, 1.0, 0.1, 10.0);
        let f = Frustum::from_matrix(&proj);
        assert!(!frustum_frustum(&f, &f));
    }
}
