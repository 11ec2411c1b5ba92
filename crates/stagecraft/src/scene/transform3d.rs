//! Local TRS transform component with lazy world-transform caching
//!
//! Every scene node carries one of these. Local mutators only flip the dirty
//! flag; the world transform is recomposed lazily by the scene manager's read
//! path, which also notifies registered listeners (the camera and collider on
//! the same node) so their own caches invalidate in the same call.
//!
//! Dirty-flag invariant: when a transform is dirty, every descendant's
//! transform is dirty too. Mutators report whether they newly dirtied the
//! node so the caller can skip re-walking subtrees that are already invalid.

use crate::foundation::math::{decompose, Mat4, Quat, Transform, Vec3};
use crate::scene::component::ComponentId;

/// Which same-node component a transform notification targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformListener {
    /// Invalidate the camera's view matrix
    Camera,
    /// Invalidate the collider's live shape
    Collider,
}

/// Handle returned by [`Transform3d::subscribe`]; invalidated on unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(usize);

/// Hierarchical position/orientation/scaling component
#[derive(Debug, Clone)]
pub struct Transform3d {
    id: ComponentId,

    position: Vec3,
    orientation: Quat,
    scaling: Vec3,

    world: Transform,
    dirty: bool,

    listeners: Vec<Option<TransformListener>>,
}

impl Default for Transform3d {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform3d {
    /// Create an identity transform (clean until attached)
    pub fn new() -> Self {
        Self {
            id: ComponentId::generate(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scaling: Vec3::new(1.0, 1.0, 1.0),
            world: Transform::identity(),
            dirty: false,
            listeners: Vec::new(),
        }
    }

    /// Component identity
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ComponentId) {
        self.id = id;
    }

    /// Local position
    pub fn position(&self) -> &Vec3 {
        &self.position
    }

    /// Local orientation
    pub fn orientation(&self) -> &Quat {
        &self.orientation
    }

    /// Local scaling
    pub fn scaling(&self) -> &Vec3 {
        &self.scaling
    }

    /// Replace the local position.
    ///
    /// Equal values are silent no-ops. Returns true when the node was newly
    /// dirtied, in which case the caller must invalidate the subtree.
    pub fn set_position(&mut self, position: Vec3) -> bool {
        if self.position == position {
            return false;
        }
        self.position = position;
        self.mark_dirty()
    }

    /// Replace the local orientation (equal values are no-ops)
    pub fn set_orientation(&mut self, orientation: Quat) -> bool {
        if self.orientation == orientation {
            return false;
        }
        self.orientation = orientation;
        self.mark_dirty()
    }

    /// Replace the local scaling (equal values are no-ops)
    pub fn set_scaling(&mut self, scaling: Vec3) -> bool {
        if self.scaling == scaling {
            return false;
        }
        self.scaling = scaling;
        self.mark_dirty()
    }

    /// Move by an offset in local space
    pub fn translate(&mut self, offset: Vec3) -> bool {
        self.position += offset;
        self.mark_dirty()
    }

    /// Move along a direction by a step length
    pub fn translate_axis(&mut self, direction: Vec3, step: f32) -> bool {
        self.translate(direction * step)
    }

    /// Apply an incremental local-space rotation
    pub fn rotate(&mut self, rotation: Quat) -> bool {
        self.orientation *= rotation;
        self.mark_dirty()
    }

    /// Rotate around an axis by an angle in radians
    pub fn rotate_axis(&mut self, axis: &nalgebra::Unit<Vec3>, radians: f32) -> bool {
        self.rotate(Quat::from_axis_angle(axis, radians))
    }

    /// Rotate around the local X axis
    pub fn pitch(&mut self, radians: f32) -> bool {
        self.rotate_axis(&Vec3::x_axis(), radians)
    }

    /// Rotate around the local Y axis
    pub fn yaw(&mut self, radians: f32) -> bool {
        self.rotate_axis(&Vec3::y_axis(), radians)
    }

    /// Rotate around the local Z axis
    pub fn roll(&mut self, radians: f32) -> bool {
        self.rotate_axis(&Vec3::z_axis(), radians)
    }

    /// Multiply the local scaling componentwise
    pub fn scale(&mut self, factors: Vec3) -> bool {
        self.scaling = self.scaling.component_mul(&factors);
        self.mark_dirty()
    }

    /// Replace position, orientation, and scaling from an affine matrix
    pub fn set_local_matrix(&mut self, matrix: &Mat4) -> bool {
        let (position, orientation, scaling) = decompose(matrix);
        self.position = position;
        self.orientation = orientation;
        self.scaling = scaling;
        self.mark_dirty()
    }

    /// Local TRS as a composed transform value
    pub fn local_transform(&self) -> Transform {
        Transform::new(self.position, self.orientation, self.scaling)
    }

    /// Whether the cached world transform is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the cached world transform stale.
    ///
    /// Returns true if the flag was newly set; false means the node (and by
    /// the hierarchy invariant, its whole subtree) was already dirty.
    pub fn mark_dirty(&mut self) -> bool {
        if self.dirty {
            false
        } else {
            self.dirty = true;
            true
        }
    }

    /// Cached world transform. Only meaningful when [`is_dirty`] is false;
    /// the scene manager's read path guarantees that before handing it out.
    ///
    /// [`is_dirty`]: Self::is_dirty
    pub fn world(&self) -> &Transform {
        &self.world
    }

    /// Store a freshly composed world transform and clear the dirty flag
    pub(crate) fn set_world(&mut self, world: Transform) {
        self.world = world;
        self.dirty = false;
    }

    /// Register a listener; the handle indexes a slot that is reused after
    /// unsubscribe.
    pub fn subscribe(&mut self, listener: TransformListener) -> ListenerHandle {
        if let Some(index) = self.listeners.iter().position(Option::is_none) {
            self.listeners[index] = Some(listener);
            ListenerHandle(index)
        } else {
            self.listeners.push(Some(listener));
            ListenerHandle(self.listeners.len() - 1)
        }
    }

    /// Remove a listener; returns false if the handle was already invalid
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        match self.listeners.get_mut(handle.0) {
            Some(slot @ Some(_)) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Currently subscribed listeners, for synchronous notification after a
    /// world-transform recomposition
    pub(crate) fn active_listeners(&self) -> impl Iterator<Item = TransformListener> + '_ {
        self.listeners.iter().filter_map(|slot| *slot)
    }
}
