//! Math utilities and types
//!
//! Provides the fundamental math types for the scene graph: nalgebra-backed
//! vectors, matrices, and quaternions, plus the decomposed TRS transform used
//! by the transform hierarchy.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Decomposed rigid transform: translation, orientation, and per-axis scaling
/// with a cached affine matrix.
///
/// The affine matrix is rebuilt whenever the TRS fields change, so it is always
/// consistent with them — callers can read `affine()` without a separate update
/// step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Vec3,
    orientation: Quat,
    scaling: Vec3,
    affine: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            translation: Vec3::zeros(),
            orientation: Quat::identity(),
            scaling: Vec3::new(1.0, 1.0, 1.0),
            affine: Mat4::identity(),
        }
    }

    /// Create a transform from translation, orientation, and scaling
    pub fn new(translation: Vec3, orientation: Quat, scaling: Vec3) -> Self {
        let affine = make_affine(&translation, &orientation, &scaling);
        Self {
            translation,
            orientation,
            scaling,
            affine,
        }
    }

    /// Create a transform from a translation only
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Create a transform by decomposing an affine matrix
    ///
    /// Assumes the matrix is a translation * rotation * scaling product with
    /// no shear; the scaling is recovered from the column magnitudes.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (translation, orientation, scaling) = decompose(matrix);
        Self::new(translation, orientation, scaling)
    }

    /// Translation component
    pub fn translation(&self) -> &Vec3 {
        &self.translation
    }

    /// Orientation component
    pub fn orientation(&self) -> &Quat {
        &self.orientation
    }

    /// Scaling component
    pub fn scaling(&self) -> &Vec3 {
        &self.scaling
    }

    /// Cached affine matrix (translation * rotation * scaling)
    pub fn affine(&self) -> &Mat4 {
        &self.affine
    }

    /// Compose a child's local TRS on top of this (parent) transform.
    ///
    /// World orientation is the parent orientation followed by the local one,
    /// world scaling multiplies componentwise, and the local translation is
    /// scaled by the parent scaling then rotated into the parent frame:
    ///
    /// ```text
    /// world.T = parent.T + parent.R * (local.T ⊙ parent.S)
    /// world.R = parent.R * local.R
    /// world.S = parent.S ⊙ local.S
    /// ```
    pub fn compose(&self, translation: &Vec3, orientation: &Quat, scaling: &Vec3) -> Self {
        let world_orientation = self.orientation * orientation;
        let world_scaling = self.scaling.component_mul(scaling);
        let world_translation =
            self.translation + self.orientation * translation.component_mul(&self.scaling);
        Self::new(world_translation, world_orientation, world_scaling)
    }

    /// Inverse of the affine matrix, built from the decomposed parts:
    /// `S⁻¹ · Rᵀ · T⁻¹`. Used for view-matrix construction.
    pub fn inverse_affine(&self) -> Mat4 {
        let inv_scaling = Mat4::new_nonuniform_scaling(&Vec3::new(
            1.0 / self.scaling.x,
            1.0 / self.scaling.y,
            1.0 / self.scaling.z,
        ));
        let inv_rotation = self.orientation.inverse().to_homogeneous();
        let inv_translation = Mat4::new_translation(&-self.translation);
        inv_scaling * inv_rotation * inv_translation
    }
}

fn make_affine(translation: &Vec3, orientation: &Quat, scaling: &Vec3) -> Mat4 {
    Mat4::new_translation(translation)
        * orientation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scaling)
}

/// Decompose an affine matrix into translation, orientation, and scaling
pub fn decompose(matrix: &Mat4) -> (Vec3, Quat, Vec3) {
    let translation = Vec3::new(matrix.m14, matrix.m24, matrix.m34);

    let scale_x = Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude();
    let scale_y = Vec3::new(matrix.m12, matrix.m22, matrix.m32).magnitude();
    let scale_z = Vec3::new(matrix.m13, matrix.m23, matrix.m33).magnitude();
    let scaling = Vec3::new(scale_x, scale_y, scale_z);

    let rotation_matrix = Mat3::new(
        matrix.m11 / scale_x, matrix.m12 / scale_y, matrix.m13 / scale_z,
        matrix.m21 / scale_x, matrix.m22 / scale_y, matrix.m23 / scale_z,
        matrix.m31 / scale_x, matrix.m32 / scale_y, matrix.m33 / scale_z,
    );
    let orientation = Quat::from_matrix(&rotation_matrix);

    (translation, orientation, scaling)
}

/// Extension trait for `Mat4` with projection and view builders
///
/// The builders follow the right-handed OpenGL clip conventions (camera looks
/// down -Z, NDC depth in [-1, 1]); frustum-plane extraction in the geometry
/// module matches these conventions.
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix centered on the view axis
    fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        nalgebra::Perspective3::new(aspect, fovy, near, far).to_homogeneous()
    }

    fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        let half_w = width * 0.5;
        let half_h = height * 0.5;
        nalgebra::Orthographic3::new(-half_w, half_w, -half_h, half_h, near, far)
            .to_homogeneous()
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
