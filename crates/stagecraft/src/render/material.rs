//! Material and technique surface consumed by the culling path
//!
//! Materials here carry only what render-queue bucketing needs: an identity
//! for batching and an ordered list of techniques, each naming the render
//! queue group its passes belong to. Shader and texture state live behind the
//! renderer backend and are out of scope.

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_MATERIAL_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_VERTEX_ARRAY_ID: AtomicU32 = AtomicU32::new(1);

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Allocate the next process-unique material id
    pub fn next() -> Self {
        Self(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Opaque handle to a vertex array owned by the renderer backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub u32);

impl VertexArrayId {
    /// Allocate the next process-unique vertex-array handle
    pub fn next() -> Self {
        Self(NEXT_VERTEX_ARRAY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One way of rendering a material; names the render-queue group its
/// renderables are bucketed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    name: String,
    render_queue: u32,
}

impl Technique {
    /// Create a technique targeting a render-queue group
    pub fn new(name: impl Into<String>, render_queue: u32) -> Self {
        Self {
            name: name.into(),
            render_queue,
        }
    }

    /// Technique name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render-queue group this technique's renderables belong to
    pub fn render_queue(&self) -> u32 {
        self.render_queue
    }
}

/// Material resource as seen by the scene graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    id: MaterialId,
    name: String,
    techniques: Vec<Technique>,
}

impl Material {
    /// Create an empty material (no techniques yet)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MaterialId::next(),
            name: name.into(),
            techniques: Vec::new(),
        }
    }

    /// Create a material with a single technique
    pub fn with_technique(name: impl Into<String>, technique: Technique) -> Self {
        let mut material = Self::new(name);
        material.techniques.push(technique);
        material
    }

    /// Material identity, used for render-queue batching
    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// Material name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a technique
    pub fn add_technique(&mut self, technique: Technique) {
        self.techniques.push(technique);
    }

    /// The technique the renderer should prefer.
    ///
    /// Without GPU capability queries every technique is supported, so the
    /// first one wins; `None` means the material cannot be queued.
    pub fn best_technique(&self) -> Option<&Technique> {
        self.techniques.first()
    }
}
