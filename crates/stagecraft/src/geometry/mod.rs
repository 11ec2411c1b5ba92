//! Geometric primitives for visibility and coarse collision
//!
//! Shapes (`Sphere`, `Aabb`, `Obb`, `Frustum`, `Plane`) plus the pairwise
//! intersection predicates the bound components dispatch over. Everything here
//! is pure math with no scene-graph knowledge.

pub mod intersect;
pub mod shapes;

pub use shapes::{Aabb, Frustum, FrustumFace, Obb, Plane, PlaneSide, Sphere};
