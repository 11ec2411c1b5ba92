//! Error types for the scene subsystem
//!
//! Every mutating scene operation returns [`SceneResult`]; failures are logged
//! at the detecting call site and surfaced as a specific variant. None of
//! these are transient: they indicate caller mistakes (stale handles, invalid
//! masks, duplicate components), so retrying is never useful.

use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised by scene-node and scene-manager operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Camera mask maps outside the 32-slot registry
    #[error("camera mask {mask} maps outside the {slots}-slot registry")]
    OutOfBound {
        /// The rejected mask value
        mask: u32,
        /// Number of registry slots
        slots: u32,
    },

    /// A component already occupies the target execution-order slot
    #[error("node already has a component in execution-order slot {order}")]
    DuplicateComponent {
        /// The occupied order slot
        order: u32,
    },

    /// No execution order is registered for a component kind
    #[error("no execution order registered for component kind {kind}")]
    InvalidComponentOrder {
        /// Name of the unregistered kind
        kind: String,
    },

    /// The component creator declined to construct the component
    #[error("component creation failed: {desc}")]
    ComponentCreation {
        /// Description of the failed construction
        desc: String,
    },

    /// A node handle did not resolve to a live node
    #[error("scene node not found (stale handle)")]
    NodeNotFound,

    /// The operation needs a component the node does not carry
    #[error("node has no {kind} component")]
    ComponentMissing {
        /// Name of the missing kind
        kind: String,
    },

    /// The scene manager is missing a required collaborator
    #[error("scene manager not initialized: {0}")]
    NotInitialized(String),
}
