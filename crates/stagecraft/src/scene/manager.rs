//! Scene manager: tree ownership, camera-mask registry, and frustum culling
//!
//! The manager owns the node arena, the root, the render queue, and the
//! 32-slot camera-mask registry. Each slot holds the nodes registered under
//! one mask value; a node occupies at most one slot, and culling walks only
//! the slots selected by the camera's object mask.
//!
//! Per-frame order is strict: `update` recomposes transforms parent before
//! child (components within a node in execution order), which finalizes every
//! camera's frustum; `render` then culls against those stable planes and
//! submits the queue. Everything is single-threaded; the lazy dirty-flag
//! reads resolve within the calling stack frame.

use log::{debug, error, trace};
use slotmap::SlotMap;

use crate::config::SceneConfig;
use crate::error::{SceneError, SceneResult};
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use crate::render::{RenderContext, Viewport};
use crate::scene::bound::Bound;
use crate::scene::camera::{Camera, ProjectionType};
use crate::scene::component::{
    Component, ComponentCreator, ComponentDesc, ComponentId, ComponentKind,
    StandardComponentCreator,
};
use crate::scene::node::{NodeKey, SceneNode};
use crate::scene::render_queue::{RenderPacket, RenderQueue};
use crate::scene::transform3d::{Transform3d, TransformListener};

/// Number of camera-mask registry slots
pub const REGISTRY_SLOTS: u32 = 32;

/// The per-frame surface of a scene manager.
///
/// Pluggable so hosts can wrap or replace [`DefaultSceneManager`] (an octree
/// variant, an instrumented test double) behind the same calls.
pub trait SceneManager {
    /// Root node of the scene tree
    fn root(&self) -> NodeKey;

    /// Traverse the tree, updating every enabled node's components in
    /// execution order
    fn update(&mut self, ctx: &mut dyn RenderContext) -> SceneResult<()>;

    /// Cull against the viewport's camera and render the resulting queue
    fn render(&mut self, viewport: &Viewport, ctx: &mut dyn RenderContext) -> SceneResult<()>;

    /// Register a node into the camera-mask slot named by its mask
    fn add_scene_node(&mut self, node: NodeKey) -> SceneResult<()>;

    /// Remove a node from the registry
    fn remove_scene_node(&mut self, node: NodeKey) -> SceneResult<()>;
}

/// Arena-backed scene manager
pub struct DefaultSceneManager {
    config: SceneConfig,
    creator: Box<dyn ComponentCreator>,
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
    registry: [Vec<NodeKey>; REGISTRY_SLOTS as usize],
    queue: RenderQueue,
}

impl Default for DefaultSceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultSceneManager {
    /// Create a manager with default configuration and the standard creator
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a manager with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        Self::with_creator(config, Box::new(StandardComponentCreator))
    }

    /// Create a manager with a custom component creator
    pub fn with_creator(config: SceneConfig, creator: Box<dyn ComponentCreator>) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = SceneNode::new(config.root_name.clone());
        // The root always carries a transform; it anchors the recursive
        // world-transform resolution.
        if let Some(Component::Transform3d(transform)) =
            creator.create(&ComponentDesc::Transform3d)
        {
            let _ = root_node.insert_component(
                crate::scene::component::order::TRANSFORM,
                Component::Transform3d(transform),
            );
        }
        let root = nodes.insert(root_node);
        Self {
            config,
            creator,
            nodes,
            root,
            registry: std::array::from_fn(|_| Vec::new()),
            queue: RenderQueue::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Render queue accumulated by the last `render` call
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Resolve a node handle
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Number of live nodes (root included)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes registered under one camera-mask slot (0-based)
    pub fn registered_in_slot(&self, slot: usize) -> &[NodeKey] {
        self.registry.get(slot).map_or(&[], Vec::as_slice)
    }

    /// Mutable access to a node's camera component
    pub fn camera_mut(&mut self, key: NodeKey) -> SceneResult<&mut Camera> {
        self.nodes
            .get_mut(key)
            .ok_or(SceneError::NodeNotFound)?
            .camera_mut()
            .ok_or_else(|| SceneError::ComponentMissing {
                kind: ComponentKind::Camera.name().to_string(),
            })
    }

    /// Mutable access to a node's collider bound
    pub fn collider_mut(&mut self, key: NodeKey) -> SceneResult<&mut Bound> {
        self.nodes
            .get_mut(key)
            .ok_or(SceneError::NodeNotFound)?
            .collider_mut()
            .ok_or_else(|| SceneError::ComponentMissing {
                kind: ComponentKind::Bound.name().to_string(),
            })
    }

    /// Create a node under a parent; a fresh transform is attached so the
    /// node participates in the hierarchy immediately.
    pub fn create_scene_node(
        &mut self,
        parent: NodeKey,
        name: impl Into<String>,
    ) -> SceneResult<NodeKey> {
        if !self.nodes.contains_key(parent) {
            error!("create_scene_node: parent handle is stale");
            return Err(SceneError::NodeNotFound);
        }
        let mut node = SceneNode::new(name);
        node.set_parent(Some(parent));
        let key = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.push_child(key);
        }
        self.add_component(key, ComponentDesc::Transform3d)?;
        debug!("created scene node {key:?} under {parent:?}");
        Ok(key)
    }

    /// Attach a component built from a descriptor.
    ///
    /// The creator is consulted exactly once. Attaching a renderable to a
    /// node that already carries a nonzero camera mask and a parent registers
    /// the node immediately.
    pub fn add_component(
        &mut self,
        key: NodeKey,
        desc: ComponentDesc,
    ) -> SceneResult<ComponentId> {
        if !self.nodes.contains_key(key) {
            error!("add_component: node handle is stale");
            return Err(SceneError::NodeNotFound);
        }
        let kind = desc.kind();
        let Some(slot) = self.creator.execution_order(kind) else {
            error!("add_component: no execution order for kind {}", kind.name());
            return Err(SceneError::InvalidComponentOrder {
                kind: kind.name().to_string(),
            });
        };
        let Some(component) = self.creator.create(&desc) else {
            error!("add_component: creator failed for kind {}", kind.name());
            return Err(SceneError::ComponentCreation {
                desc: kind.name().to_string(),
            });
        };
        let id = component.id();

        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        node.insert_component(slot, component).map_err(|err| {
            error!("add_component: {err}");
            err
        })?;

        match kind {
            ComponentKind::Transform3d => {
                // A fresh transform has no valid world cache yet; the whole
                // subtree inherits the invalidation. Any camera/collider
                // already on the node subscribes to the new listener table.
                let has_camera = node.camera().is_some();
                let has_collider = node.collider().is_some();
                let mut camera_handle = None;
                let mut collider_handle = None;
                if let Some(transform) = node.transform3d_mut() {
                    transform.mark_dirty();
                    if has_camera {
                        camera_handle = Some(transform.subscribe(TransformListener::Camera));
                    }
                    if has_collider {
                        collider_handle = Some(transform.subscribe(TransformListener::Collider));
                    }
                }
                node.camera_listener = camera_handle;
                node.collider_listener = collider_handle;
                self.mark_subtree_dirty(key);
            }
            ComponentKind::Camera => {
                if let Some(transform) = node.transform3d_mut() {
                    let handle = transform.subscribe(TransformListener::Camera);
                    node.camera_listener = Some(handle);
                }
            }
            ComponentKind::Bound => {
                if let Some(transform) = node.transform3d_mut() {
                    let handle = transform.subscribe(TransformListener::Collider);
                    node.collider_listener = Some(handle);
                }
            }
            ComponentKind::Renderable => {
                let register =
                    node.camera_mask() != 0 && node.parent().is_some();
                if register {
                    self.add_scene_node(key)?;
                }
            }
        }
        Ok(id)
    }

    /// Detach a component by kind.
    ///
    /// A renderable is unregistered from the registry first; cameras and
    /// colliders unsubscribe from the transform's listener table, and a
    /// removed transform takes its listener table with it, voiding the stored
    /// handles. Returns the detached component, or `None` when the node
    /// carried none of that kind.
    pub fn remove_component(
        &mut self,
        key: NodeKey,
        kind: ComponentKind,
    ) -> SceneResult<Option<Component>> {
        let slot = self
            .creator
            .execution_order(kind)
            .ok_or_else(|| SceneError::InvalidComponentOrder {
                kind: kind.name().to_string(),
            })?;
        if !self.nodes.contains_key(key) {
            return Err(SceneError::NodeNotFound);
        }
        if kind == ComponentKind::Renderable {
            self.remove_scene_node(key)?;
        }
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        let component = node.take_component(slot);
        if component.is_some() {
            match kind {
                ComponentKind::Camera => {
                    if let Some(handle) = node.camera_listener.take() {
                        if let Some(transform) = node.transform3d_mut() {
                            transform.unsubscribe(handle);
                        }
                    }
                }
                ComponentKind::Bound => {
                    if let Some(handle) = node.collider_listener.take() {
                        if let Some(transform) = node.transform3d_mut() {
                            transform.unsubscribe(handle);
                        }
                    }
                }
                ComponentKind::Transform3d => {
                    // The listener table left with the transform; the stored
                    // handles index into it and are void.
                    node.camera_listener = None;
                    node.collider_listener = None;
                }
                ComponentKind::Renderable => {}
            }
        }
        Ok(component)
    }

    /// Destroy a node and its whole subtree, unregistering every node from
    /// the registry. The root (and any stale handle) is rejected.
    pub fn destroy_node(&mut self, key: NodeKey) -> SceneResult<()> {
        let Some(node) = self.nodes.get(key) else {
            return Err(SceneError::NodeNotFound);
        };
        let Some(parent) = node.parent() else {
            error!("destroy_node: the root cannot be destroyed");
            return Err(SceneError::NodeNotFound);
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.remove_child(key);
        }
        self.destroy_subtree(key);
        Ok(())
    }

    fn destroy_subtree(&mut self, key: NodeKey) {
        let children = self
            .nodes
            .get_mut(key)
            .map(SceneNode::take_children)
            .unwrap_or_default();
        for child in children {
            self.destroy_subtree(child);
        }
        self.unregister(key);
        self.nodes.remove(key);
        trace!("destroyed node {key:?}");
    }

    /// Destroy every child of a node
    pub fn remove_all_children(&mut self, key: NodeKey) -> SceneResult<()> {
        let children = self
            .nodes
            .get_mut(key)
            .ok_or(SceneError::NodeNotFound)?
            .take_children();
        for child in children {
            self.destroy_subtree(child);
        }
        Ok(())
    }

    /// Reparent a node. Its world transform changes, so the subtree is
    /// invalidated.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> SceneResult<()> {
        if !self.nodes.contains_key(parent) || parent == child {
            return Err(SceneError::NodeNotFound);
        }
        let old_parent = self
            .nodes
            .get(child)
            .ok_or(SceneError::NodeNotFound)?
            .parent();
        if old_parent == Some(parent) {
            return Ok(());
        }
        if let Some(old) = old_parent {
            if let Some(old_node) = self.nodes.get_mut(old) {
                old_node.remove_child(child);
            }
        }
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.push_child(child);
        }
        let node = self.nodes.get_mut(child).ok_or(SceneError::NodeNotFound)?;
        node.set_parent(Some(parent));
        if let Some(transform) = node.transform3d_mut() {
            if transform.mark_dirty() {
                self.mark_subtree_dirty(child);
            }
        }
        Ok(())
    }

    /// Duplicate a node (components under fresh ids) beneath a parent.
    ///
    /// Children are not cloned. A masked clone with a renderable re-registers
    /// on its own slot.
    pub fn clone_node(&mut self, key: NodeKey, parent: NodeKey) -> SceneResult<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::NodeNotFound);
        }
        let mut clone = self
            .nodes
            .get(key)
            .ok_or(SceneError::NodeNotFound)?
            .clone_detached();
        clone.set_parent(Some(parent));
        // The clone's transform cache is stale by construction.
        if let Some(transform) = clone.transform3d_mut() {
            transform.mark_dirty();
        }
        let has_renderable = clone.renderable().is_some();
        let mask = clone.camera_mask();
        let new_key = self.nodes.insert(clone);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.push_child(new_key);
        }
        if mask != 0 && has_renderable {
            self.add_scene_node(new_key)?;
        }
        Ok(new_key)
    }

    /// Set visibility for a node and its whole subtree.
    ///
    /// Early-outs when the node already has the target state (its subtree is
    /// then assumed consistent).
    pub fn set_visible(&mut self, key: NodeKey, visible: bool) -> SceneResult<()> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        if node.is_visible() == visible {
            return Ok(());
        }
        node.set_visible(visible);
        let children = node.children().to_vec();
        for child in children {
            self.set_visible(child, visible)?;
        }
        Ok(())
    }

    /// Enable or disable a node and its whole subtree
    pub fn set_enabled(&mut self, key: NodeKey, enabled: bool) -> SceneResult<()> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        if node.is_enabled() == enabled {
            return Ok(());
        }
        node.set_enabled(enabled);
        let children = node.children().to_vec();
        for child in children {
            self.set_enabled(child, enabled)?;
        }
        Ok(())
    }

    /// Change a node's camera mask and propagate it to all children.
    ///
    /// The mask is a 1-based slot number in `[1, 32]`; 0 unregisters. An
    /// out-of-range mask is rejected before any state changes.
    pub fn set_camera_mask(&mut self, key: NodeKey, mask: u32) -> SceneResult<()> {
        if mask > REGISTRY_SLOTS {
            error!("set_camera_mask: mask {mask} exceeds the {REGISTRY_SLOTS}-slot registry");
            return Err(SceneError::OutOfBound {
                mask,
                slots: REGISTRY_SLOTS,
            });
        }
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
        let old_mask = node.camera_mask();
        if old_mask != 0 && old_mask != mask {
            self.remove_scene_node(key)?;
        }
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        node.set_camera_mask_raw(mask);
        let register =
            mask != 0 && old_mask != mask && node.parent().is_some() && node.renderable().is_some();
        if register {
            self.add_scene_node(key)?;
        }
        let children = self
            .nodes
            .get(key)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for child in children {
            self.set_camera_mask(child, mask)?;
        }
        Ok(())
    }

    /// Run a mutation against a node's transform; a true return from the
    /// closure means the node was newly dirtied and the subtree inherits it.
    pub fn edit_transform(
        &mut self,
        key: NodeKey,
        edit: impl FnOnce(&mut Transform3d) -> bool,
    ) -> SceneResult<()> {
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        let transform = node
            .transform3d_mut()
            .ok_or_else(|| SceneError::ComponentMissing {
                kind: ComponentKind::Transform3d.name().to_string(),
            })?;
        if edit(transform) {
            self.mark_subtree_dirty(key);
        }
        Ok(())
    }

    /// Replace a node's local position
    pub fn set_position(&mut self, key: NodeKey, position: Vec3) -> SceneResult<()> {
        self.edit_transform(key, |t| t.set_position(position))
    }

    /// Replace a node's local orientation
    pub fn set_orientation(&mut self, key: NodeKey, orientation: Quat) -> SceneResult<()> {
        self.edit_transform(key, |t| t.set_orientation(orientation))
    }

    /// Replace a node's local scaling
    pub fn set_scaling(&mut self, key: NodeKey, scaling: Vec3) -> SceneResult<()> {
        self.edit_transform(key, |t| t.set_scaling(scaling))
    }

    /// Translate a node in local space
    pub fn translate(&mut self, key: NodeKey, offset: Vec3) -> SceneResult<()> {
        self.edit_transform(key, |t| t.translate(offset))
    }

    /// Apply an incremental local rotation
    pub fn rotate(&mut self, key: NodeKey, rotation: Quat) -> SceneResult<()> {
        self.edit_transform(key, |t| t.rotate(rotation))
    }

    /// Rotate a node around its local X axis
    pub fn pitch(&mut self, key: NodeKey, radians: f32) -> SceneResult<()> {
        self.edit_transform(key, |t| t.pitch(radians))
    }

    /// Rotate a node around its local Y axis
    pub fn yaw(&mut self, key: NodeKey, radians: f32) -> SceneResult<()> {
        self.edit_transform(key, |t| t.yaw(radians))
    }

    /// Rotate a node around its local Z axis
    pub fn roll(&mut self, key: NodeKey, radians: f32) -> SceneResult<()> {
        self.edit_transform(key, |t| t.roll(radians))
    }

    /// Multiply a node's local scaling componentwise
    pub fn scale(&mut self, key: NodeKey, factors: Vec3) -> SceneResult<()> {
        self.edit_transform(key, |t| t.scale(factors))
    }

    /// Place a node at `eye` oriented toward `target`
    pub fn look_at(
        &mut self,
        key: NodeKey,
        eye: Vec3,
        target: Vec3,
        up: Vec3,
    ) -> SceneResult<()> {
        // face_towards points local +Z along the argument; a camera looks
        // down -Z, so aim +Z from the target back at the eye.
        let orientation = Quat::face_towards(&(eye - target), &up);
        self.edit_transform(key, |t| {
            let moved = t.set_position(eye);
            let turned = t.set_orientation(orientation);
            moved || turned
        })
    }

    /// The single world-transform read path.
    ///
    /// Resolves dirty ancestors recursively, composes this node's local TRS
    /// on the parent's world transform, clears the dirty flag, and notifies
    /// the node's transform listeners before returning, so no caller in this
    /// frame observes a stale cache. Nodes without a transform pass their
    /// parent's world through.
    pub fn world_transform(&mut self, key: NodeKey) -> SceneResult<Transform> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeNotFound)?;
        let parent = node.parent();
        let Some(transform) = node.transform3d() else {
            return match parent {
                Some(parent) => self.world_transform(parent),
                None => Ok(Transform::identity()),
            };
        };
        if !transform.is_dirty() {
            return Ok(*transform.world());
        }

        let parent_world = match parent {
            Some(parent) => self.world_transform(parent)?,
            None => Transform::identity(),
        };

        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        let transform = node
            .transform3d_mut()
            .ok_or_else(|| SceneError::ComponentMissing {
                kind: ComponentKind::Transform3d.name().to_string(),
            })?;
        let world = parent_world.compose(
            transform.position(),
            transform.orientation(),
            transform.scaling(),
        );
        transform.set_world(world);
        trace!("recomposed world transform for {key:?}");

        let listeners: Vec<TransformListener> = transform.active_listeners().collect();
        for listener in listeners {
            match listener {
                TransformListener::Camera => {
                    if let Some(camera) = node.camera_mut() {
                        camera.mark_view_dirty();
                    }
                }
                TransformListener::Collider => {
                    if let Some(bound) = node.collider_mut() {
                        bound.mark_dirty();
                    }
                }
            }
        }
        Ok(world)
    }

    // Invariant: a dirty node's descendants are already dirty, so the walk
    // early-outs the moment a mark does not transition.
    fn mark_subtree_dirty(&mut self, key: NodeKey) {
        let children = self
            .nodes
            .get(key)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for child in children {
            let newly_dirtied = self
                .nodes
                .get_mut(child)
                .and_then(SceneNode::transform3d_mut)
                .map_or(true, Transform3d::mark_dirty);
            if newly_dirtied {
                self.mark_subtree_dirty(child);
            }
        }
    }

    fn visit(&mut self, key: NodeKey, ctx: &mut dyn RenderContext) -> SceneResult<()> {
        let Some(node) = self.nodes.get(key) else {
            return Ok(());
        };
        // A disabled node's entire subtree skips updating.
        if !node.is_enabled() {
            return Ok(());
        }
        self.update_node(key, ctx)?;
        let children = self
            .nodes
            .get(key)
            .map(|node| node.children().to_vec())
            .unwrap_or_default();
        for child in children {
            self.visit(child, ctx)?;
        }
        Ok(())
    }

    // Components update in execution order: the world-transform read first,
    // then the camera and collider that depend on it.
    fn update_node(&mut self, key: NodeKey, ctx: &mut dyn RenderContext) -> SceneResult<()> {
        let world = self.world_transform(key)?;
        let node = self.nodes.get_mut(key).ok_or(SceneError::NodeNotFound)?;
        if let Some(camera) = node.camera_mut() {
            camera.update(&world, ctx);
        }
        if let Some(bound) = node.collider_mut() {
            bound.update(&world);
        }
        Ok(())
    }

    fn frustum_culling(&mut self, object_mask: u32, camera_bound: &Bound) {
        // One iteration per set bit; slots outside the mask are never
        // touched.
        let mut mask = object_mask;
        while mask != 0 {
            let slot = mask.trailing_zeros() as usize;
            mask &= mask - 1;
            if slot >= REGISTRY_SLOTS as usize {
                break;
            }
            let keys = self.registry[slot].clone();
            for key in keys {
                self.cull_node(key, camera_bound);
            }
        }
    }

    fn cull_node(&mut self, key: NodeKey, camera_bound: &Bound) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        if !node.is_enabled() || !node.is_visible() {
            return;
        }
        let passes = if self.config.enable_culling {
            // No usable bound means unconditionally visible.
            match node.collider() {
                Some(bound) if bound.is_enabled() => bound.test(camera_bound),
                _ => true,
            }
        } else {
            true
        };
        if !passes {
            trace!("culled node {key:?}");
            return;
        }
        let Some(renderable) = node.renderable() else {
            return;
        };
        let group = renderable.render_group(self.config.default_render_group);
        let world = node
            .transform3d()
            .map_or_else(Mat4::identity, |t| *t.world().affine());
        self.queue.add_renderable(
            group,
            RenderPacket {
                node: key,
                world,
                material: renderable.material().id(),
                vertex_array: renderable.vertex_array(),
            },
        );
    }

    fn slot_for_mask(&self, mask: u32) -> SceneResult<usize> {
        if mask == 0 || mask > REGISTRY_SLOTS {
            error!("camera mask {mask} maps outside the {REGISTRY_SLOTS}-slot registry");
            return Err(SceneError::OutOfBound {
                mask,
                slots: REGISTRY_SLOTS,
            });
        }
        Ok((mask - 1) as usize)
    }

    fn unregister(&mut self, key: NodeKey) {
        for slot in &mut self.registry {
            slot.retain(|&registered| registered != key);
        }
    }
}

impl SceneManager for DefaultSceneManager {
    fn root(&self) -> NodeKey {
        self.root
    }

    fn update(&mut self, ctx: &mut dyn RenderContext) -> SceneResult<()> {
        self.visit(self.root, ctx)
    }

    fn render(&mut self, viewport: &Viewport, ctx: &mut dyn RenderContext) -> SceneResult<()> {
        let camera_key = viewport.camera();
        let Some(node) = self.nodes.get(camera_key) else {
            error!("render: viewport camera node not found");
            return Err(SceneError::NotInitialized(
                "viewport camera node not found".to_string(),
            ));
        };
        if node.camera().is_none() {
            error!("render: viewport node carries no camera");
            return Err(SceneError::NotInitialized(
                "viewport node carries no camera".to_string(),
            ));
        }

        // Finalize the camera before any culling this frame: view and
        // projection current, frustum planes rebuilt from their product. A
        // perspective camera takes its aspect ratio from the viewport's pixel
        // rect, so resizing the target reshapes the frustum.
        let world = self.world_transform(camera_key)?;
        let node = self
            .nodes
            .get_mut(camera_key)
            .ok_or(SceneError::NodeNotFound)?;
        let (object_mask, camera_bound) = {
            let camera = node
                .camera_mut()
                .ok_or_else(|| SceneError::ComponentMissing {
                    kind: ComponentKind::Camera.name().to_string(),
                })?;
            if camera.projection_type() == ProjectionType::Perspective {
                camera.set_aspect(viewport.aspect_ratio());
            }
            camera.update(&world, ctx);
            (camera.object_mask(), camera.bound().clone())
        };

        self.queue.clear();
        self.frustum_culling(object_mask, &camera_bound);
        debug!("culling queued {} packet(s)", self.queue.len());

        ctx.clear(
            viewport.background(),
            viewport.clear_flags(),
            viewport.clear_depth(),
            0,
        );
        self.queue.render(ctx)
    }

    fn add_scene_node(&mut self, node: NodeKey) -> SceneResult<()> {
        let mask = self
            .nodes
            .get(node)
            .ok_or(SceneError::NodeNotFound)?
            .camera_mask();
        let slot = self.slot_for_mask(mask)?;
        let entries = &mut self.registry[slot];
        if !entries.contains(&node) {
            entries.push(node);
            debug!("registered node {node:?} in camera-mask slot {slot}");
        }
        Ok(())
    }

    fn remove_scene_node(&mut self, node: NodeKey) -> SceneResult<()> {
        if !self.nodes.contains_key(node) {
            return Err(SceneError::NodeNotFound);
        }
        self.unregister(node);
        Ok(())
    }
}
