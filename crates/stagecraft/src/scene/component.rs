//! Component identity, kinds, execution order, and construction
//!
//! Components form a closed set: every capability a scene node can carry is a
//! variant of [`Component`]. Construction goes through a [`ComponentCreator`]
//! so hosts can substitute their own factory (resource-backed renderables,
//! pooled bounds) without touching the scene node; the node calls the creator
//! exactly once per `add_component`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::{Material, VertexArrayId};
use crate::scene::bound::{Bound, BoundShape};
use crate::scene::camera::Camera;
use crate::scene::renderable::{Renderable, RenderableKind};
use crate::scene::transform3d::Transform3d;

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique numeric component identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Allocate the next auto-generated id
    pub fn generate() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an explicitly chosen id (callers own uniqueness)
    pub fn explicit(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value
    pub fn value(self) -> u64 {
        self.0
    }
}

/// The closed set of component categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Hierarchical TRS transform
    Transform3d,
    /// View/projection camera with an owned frustum bound
    Camera,
    /// Bounding-volume collider
    Bound,
    /// Drawable leaf
    Renderable,
}

impl ComponentKind {
    /// Human-readable kind name for logs and errors
    pub fn name(self) -> &'static str {
        match self {
            Self::Transform3d => "Transform3d",
            Self::Camera => "Camera",
            Self::Bound => "Bound",
            Self::Renderable => "Renderable",
        }
    }
}

/// Execution-order slots for the well-known component kinds.
///
/// Update order within a node is Transform, then Camera, then Bound, then
/// Renderable: the camera and collider read the world transform recomputed in
/// the same pass, and the renderable is only ever touched after its bound is
/// current.
pub mod order {
    /// Transform updates first
    pub const TRANSFORM: u32 = 0;
    /// Camera updates after the transform it observes
    pub const CAMERA: u32 = 1;
    /// Collider updates after the transform it observes
    pub const COLLIDER: u32 = 2;
    /// Renderable updates last
    pub const RENDERABLE: u32 = 3;
}

/// A component attached to a scene node
#[derive(Debug, Clone)]
pub enum Component {
    /// Hierarchical TRS transform
    Transform3d(Transform3d),
    /// View/projection camera
    Camera(Camera),
    /// Bounding-volume collider
    Bound(Bound),
    /// Drawable leaf
    Renderable(Renderable),
}

impl Component {
    /// Which category this component belongs to
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform3d(_) => ComponentKind::Transform3d,
            Self::Camera(_) => ComponentKind::Camera,
            Self::Bound(_) => ComponentKind::Bound,
            Self::Renderable(_) => ComponentKind::Renderable,
        }
    }

    /// Component identity
    pub fn id(&self) -> ComponentId {
        match self {
            Self::Transform3d(t) => t.id(),
            Self::Camera(c) => c.id(),
            Self::Bound(b) => b.id(),
            Self::Renderable(r) => r.id(),
        }
    }

    /// Duplicate the component under a fresh identity (node cloning)
    pub fn clone_with_new_id(&self) -> Self {
        let mut cloned = self.clone();
        match &mut cloned {
            Self::Transform3d(t) => t.set_id(ComponentId::generate()),
            Self::Camera(c) => c.set_id(ComponentId::generate()),
            Self::Bound(b) => b.set_id(ComponentId::generate()),
            Self::Renderable(r) => r.set_id(ComponentId::generate()),
        }
        cloned
    }
}

/// Construction arguments for one component, handed to the creator
#[derive(Debug, Clone)]
pub enum ComponentDesc {
    /// An identity transform
    Transform3d,
    /// A camera with default perspective parameters
    Camera,
    /// A collider wrapping a model-space shape
    Bound {
        /// Model-space shape
        shape: BoundShape,
        /// Collision group (equal nonzero groups never test each other)
        group: u32,
        /// Whether this bound initiates tests
        collision_source: bool,
    },
    /// A drawable leaf
    Renderable {
        /// What to draw
        kind: RenderableKind,
        /// Material whose best technique picks the queue group
        material: Material,
        /// Backend vertex-array handle, if the geometry is uploaded
        vertex_array: Option<VertexArrayId>,
    },
}

impl ComponentDesc {
    /// Category of the component this descriptor constructs
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Transform3d => ComponentKind::Transform3d,
            Self::Camera => ComponentKind::Camera,
            Self::Bound { .. } => ComponentKind::Bound,
            Self::Renderable { .. } => ComponentKind::Renderable,
        }
    }
}

/// Factory seam between the scene node and component construction
pub trait ComponentCreator {
    /// Execution-order slot for a component kind; `None` means the kind is
    /// not registered with this creator and the attach is rejected.
    fn execution_order(&self, kind: ComponentKind) -> Option<u32>;

    /// Construct a component from its descriptor; `None` signals a
    /// construction failure and the attach is rejected.
    fn create(&self, desc: &ComponentDesc) -> Option<Component>;
}

/// Default creator: all four kinds registered at the standard orders
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardComponentCreator;

impl ComponentCreator for StandardComponentCreator {
    fn execution_order(&self, kind: ComponentKind) -> Option<u32> {
        Some(match kind {
            ComponentKind::Transform3d => order::TRANSFORM,
            ComponentKind::Camera => order::CAMERA,
            ComponentKind::Bound => order::COLLIDER,
            ComponentKind::Renderable => order::RENDERABLE,
        })
    }

    fn create(&self, desc: &ComponentDesc) -> Option<Component> {
        Some(match desc {
            ComponentDesc::Transform3d => Component::Transform3d(Transform3d::new()),
            ComponentDesc::Camera => Component::Camera(Camera::new()),
            ComponentDesc::Bound {
                shape,
                group,
                collision_source,
            } => Component::Bound(Bound::new(shape.clone(), *group, *collision_source)),
            ComponentDesc::Renderable {
                kind,
                material,
                vertex_array,
            } => Component::Renderable(Renderable::new(
                kind.clone(),
                material.clone(),
                *vertex_array,
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::Sphere;

    #[test]
    fn generated_ids_are_unique() {
        let a = ComponentId::generate();
        let b = ComponentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn standard_creator_orders_follow_update_sequence() {
        let creator = StandardComponentCreator;
        let orders: Vec<u32> = [
            ComponentKind::Transform3d,
            ComponentKind::Camera,
            ComponentKind::Bound,
            ComponentKind::Renderable,
        ]
        .into_iter()
        .map(|kind| creator.execution_order(kind).expect("all kinds registered"))
        .collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted, "orders must already be ascending");
    }

    #[test]
    fn creator_builds_matching_kind() {
        let creator = StandardComponentCreator;
        let desc = ComponentDesc::Bound {
            shape: BoundShape::Sphere(Sphere::new(Vec3::zeros(), 1.0)),
            group: 0,
            collision_source: true,
        };
        let component = creator.create(&desc).expect("standard creator never fails");
        assert_eq!(component.kind(), ComponentKind::Bound);
        assert_eq!(component.kind(), desc.kind());
    }

    #[test]
    fn clone_with_new_id_changes_identity_only() {
        let original = Component::Transform3d(Transform3d::new());
        let cloned = original.clone_with_new_id();
        assert_ne!(original.id(), cloned.id());
        assert_eq!(original.kind(), cloned.kind());
    }
}
