//! Scene node: a tree node holding components in execution order
//!
//! Nodes live in the scene manager's slotmap arena and reference each other
//! through stable [`NodeKey`] handles; the node itself only stores pure state
//! (flags, component map, parent/children keys). Everything that spans nodes
//! — attach, registration, dirty propagation — lives on the manager, which is
//! the only code holding the arena.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::error::{SceneError, SceneResult};
use crate::scene::bound::Bound;
use crate::scene::camera::Camera;
use crate::scene::component::{order, Component, ComponentKind};
use crate::scene::renderable::Renderable;
use crate::scene::transform3d::{ListenerHandle, Transform3d};

new_key_type! {
    /// Stable handle to a scene node in the manager's arena
    pub struct NodeKey;
}

/// A node in the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    visible: bool,
    enabled: bool,
    camera_mask: u32,

    parent: Option<NodeKey>,
    children: Vec<NodeKey>,

    // Ordered execution map; doubles as the kind-keyed lookup since the
    // kind-to-order mapping is bijective for the closed component set.
    components: BTreeMap<u32, Component>,

    // Subscription handles into the transform's listener table, held so
    // detaching a camera/collider unregisters it cleanly.
    pub(crate) camera_listener: Option<ListenerHandle>,
    pub(crate) collider_listener: Option<ListenerHandle>,
}

impl SceneNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            enabled: true,
            camera_mask: 0,
            parent: None,
            children: Vec::new(),
            components: BTreeMap::new(),
            camera_listener: None,
            collider_listener: None,
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether the node is considered during culling
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether the node (and its subtree) updates
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Camera-mask slot number (1-based; 0 = unregistered)
    pub fn camera_mask(&self) -> u32 {
        self.camera_mask
    }

    pub(crate) fn set_camera_mask_raw(&mut self, mask: u32) {
        self.camera_mask = mask;
    }

    /// Parent handle, if attached
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeKey>) {
        self.parent = parent;
    }

    /// Child handles in sibling (insertion) order
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeKey) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeKey) {
        self.children.retain(|&key| key != child);
    }

    pub(crate) fn take_children(&mut self) -> Vec<NodeKey> {
        std::mem::take(&mut self.children)
    }

    /// Execution-order slots currently occupied, ascending
    pub fn component_orders(&self) -> impl Iterator<Item = u32> + '_ {
        self.components.keys().copied()
    }

    /// Component in an execution-order slot
    pub fn component(&self, order: u32) -> Option<&Component> {
        self.components.get(&order)
    }

    /// Insert a component into an execution-order slot.
    ///
    /// An occupied slot is a configuration error; the insert is rejected and
    /// the node unchanged.
    pub(crate) fn insert_component(&mut self, order: u32, component: Component) -> SceneResult<()> {
        if self.components.contains_key(&order) {
            return Err(SceneError::DuplicateComponent { order });
        }
        self.components.insert(order, component);
        Ok(())
    }

    pub(crate) fn take_component(&mut self, order: u32) -> Option<Component> {
        self.components.remove(&order)
    }

    /// Kind of the component occupying a slot, if any
    pub fn component_kind_at(&self, order: u32) -> Option<ComponentKind> {
        self.components.get(&order).map(Component::kind)
    }

    /// The node's transform, if attached
    pub fn transform3d(&self) -> Option<&Transform3d> {
        match self.components.get(&order::TRANSFORM) {
            Some(Component::Transform3d(transform)) => Some(transform),
            _ => None,
        }
    }

    pub(crate) fn transform3d_mut(&mut self) -> Option<&mut Transform3d> {
        match self.components.get_mut(&order::TRANSFORM) {
            Some(Component::Transform3d(transform)) => Some(transform),
            _ => None,
        }
    }

    /// The node's camera, if attached
    pub fn camera(&self) -> Option<&Camera> {
        match self.components.get(&order::CAMERA) {
            Some(Component::Camera(camera)) => Some(camera),
            _ => None,
        }
    }

    pub(crate) fn camera_mut(&mut self) -> Option<&mut Camera> {
        match self.components.get_mut(&order::CAMERA) {
            Some(Component::Camera(camera)) => Some(camera),
            _ => None,
        }
    }

    /// The node's collider bound, if attached
    pub fn collider(&self) -> Option<&Bound> {
        match self.components.get(&order::COLLIDER) {
            Some(Component::Bound(bound)) => Some(bound),
            _ => None,
        }
    }

    pub(crate) fn collider_mut(&mut self) -> Option<&mut Bound> {
        match self.components.get_mut(&order::COLLIDER) {
            Some(Component::Bound(bound)) => Some(bound),
            _ => None,
        }
    }

    /// The node's renderable, if attached
    pub fn renderable(&self) -> Option<&Renderable> {
        match self.components.get(&order::RENDERABLE) {
            Some(Component::Renderable(renderable)) => Some(renderable),
            _ => None,
        }
    }

    /// Duplicate the node's local state with fresh component identities.
    ///
    /// Tree links and listener handles are not copied; the manager re-wires
    /// both when it inserts the clone.
    pub(crate) fn clone_detached(&self) -> Self {
        let components = self
            .components
            .iter()
            .map(|(&slot, component)| (slot, component.clone_with_new_id()))
            .collect();
        Self {
            name: self.name.clone(),
            visible: self.visible,
            enabled: self.enabled,
            camera_mask: self.camera_mask,
            parent: None,
            children: Vec::new(),
            components,
            camera_listener: None,
            collider_listener: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_order_slot_is_rejected() {
        let mut node = SceneNode::new("test");
        node.insert_component(
            order::TRANSFORM,
            Component::Transform3d(Transform3d::new()),
        )
        .expect("first insert succeeds");

        let err = node
            .insert_component(
                order::TRANSFORM,
                Component::Transform3d(Transform3d::new()),
            )
            .expect_err("slot already occupied");
        assert_eq!(
            err,
            SceneError::DuplicateComponent {
                order: order::TRANSFORM
            }
        );
        assert_eq!(node.component_orders().count(), 1, "node unchanged");
    }

    #[test]
    fn well_known_accessors_resolve_by_slot() {
        let mut node = SceneNode::new("test");
        node.insert_component(
            order::TRANSFORM,
            Component::Transform3d(Transform3d::new()),
        )
        .expect("insert transform");
        node.insert_component(order::CAMERA, Component::Camera(Camera::new()))
            .expect("insert camera");

        assert!(node.transform3d().is_some());
        assert!(node.camera().is_some());
        assert!(node.collider().is_none());
        assert!(node.renderable().is_none());
    }

    #[test]
    fn components_iterate_in_execution_order() {
        let mut node = SceneNode::new("test");
        node.insert_component(order::CAMERA, Component::Camera(Camera::new()))
            .expect("insert camera");
        node.insert_component(
            order::TRANSFORM,
            Component::Transform3d(Transform3d::new()),
        )
        .expect("insert transform");

        let orders: Vec<u32> = node.component_orders().collect();
        assert_eq!(orders, vec![order::TRANSFORM, order::CAMERA]);
    }

    #[test]
    fn clone_detached_refreshes_ids_and_drops_links() {
        let mut node = SceneNode::new("source");
        node.insert_component(
            order::TRANSFORM,
            Component::Transform3d(Transform3d::new()),
        )
        .expect("insert transform");
        node.push_child(NodeKey::default());
        node.set_camera_mask_raw(3);

        let clone = node.clone_detached();
        assert_eq!(clone.name(), "source");
        assert_eq!(clone.camera_mask(), 3);
        assert!(clone.children().is_empty());
        assert!(clone.parent().is_none());
        assert_ne!(
            node.component(order::TRANSFORM).map(Component::id),
            clone.component(order::TRANSFORM).map(Component::id),
        );
    }
}
