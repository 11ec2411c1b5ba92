//! Scene graph: nodes, components, transform hierarchy, and culling
//!
//! The scene tree is owned by a [`DefaultSceneManager`]; nodes are addressed
//! through stable [`NodeKey`] handles and carry their components in a fixed
//! execution order (transform, camera, collider, renderable). Per frame the
//! manager updates the tree, finalizes cameras, culls registered nodes
//! against the viewport camera's frustum, and emits a [`RenderQueue`].

pub mod bound;
pub mod camera;
pub mod component;
pub mod manager;
pub mod node;
pub mod render_queue;
pub mod renderable;
pub mod transform3d;

pub use bound::{Bound, BoundKind, BoundShape};
pub use camera::{Camera, ProjectionType};
pub use component::{
    Component, ComponentCreator, ComponentDesc, ComponentId, ComponentKind,
    StandardComponentCreator,
};
pub use manager::{DefaultSceneManager, SceneManager, REGISTRY_SLOTS};
pub use node::{NodeKey, SceneNode};
pub use render_queue::{groups, RenderPacket, RenderQueue};
pub use renderable::{Renderable, RenderableKind};
pub use transform3d::{ListenerHandle, Transform3d, TransformListener};

#[cfg(test)]
mod culling_tests;
