//! Renderable component: the drawable leaf of a scene node
//!
//! Carries just enough for culling and queue bucketing: what to draw, the
//! material whose best technique names the queue group, and the backend
//! vertex-array handle. Mesh data itself lives behind the renderer boundary.

use crate::foundation::math::Vec3;
use crate::render::{Material, VertexArrayId};
use crate::scene::component::ComponentId;

/// What a renderable draws
#[derive(Debug, Clone, PartialEq)]
pub enum RenderableKind {
    /// Arbitrary mesh uploaded to the backend
    Mesh,
    /// Box with the given half-extents
    Cube {
        /// Half-extent along each axis
        extents: Vec3,
    },
    /// Sphere mesh
    Globe {
        /// Sphere radius
        radius: f32,
    },
    /// Flat rectangle
    Quad {
        /// Width in local units
        width: f32,
        /// Height in local units
        height: f32,
    },
    /// Camera-facing rectangle
    Billboard {
        /// Width in local units
        width: f32,
        /// Height in local units
        height: f32,
    },
    /// Debug coordinate axes
    Axis {
        /// Axis line length
        length: f32,
    },
    /// Light source marker
    Light,
}

/// Drawable leaf component
#[derive(Debug, Clone)]
pub struct Renderable {
    id: ComponentId,
    kind: RenderableKind,
    material: Material,
    vertex_array: Option<VertexArrayId>,
}

impl Renderable {
    /// Create a renderable from its geometry kind and material
    pub fn new(
        kind: RenderableKind,
        material: Material,
        vertex_array: Option<VertexArrayId>,
    ) -> Self {
        Self {
            id: ComponentId::generate(),
            kind,
            material,
            vertex_array,
        }
    }

    /// Component identity
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ComponentId) {
        self.id = id;
    }

    /// Geometry kind
    pub fn kind(&self) -> &RenderableKind {
        &self.kind
    }

    /// Material used for queue bucketing and drawing
    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Replace the material
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Backend vertex-array handle, if the geometry is uploaded
    pub fn vertex_array(&self) -> Option<VertexArrayId> {
        self.vertex_array
    }

    /// Render-queue group for this renderable: the material's best
    /// technique's group, or the supplied fallback when the material has no
    /// technique.
    pub fn render_group(&self, fallback: u32) -> u32 {
        self.material
            .best_technique()
            .map_or(fallback, |technique| technique.render_queue())
    }
}
