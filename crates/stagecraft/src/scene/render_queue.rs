//! Render queue: culling output, bucketed by group and material
//!
//! Groups render in ascending id (background first, overlays last); within a
//! group, packets batch by material so a backend can minimize state changes.
//! The queue is rebuilt from scratch every frame by the culling walk.

use std::collections::BTreeMap;

use crate::error::SceneResult;
use crate::foundation::math::Mat4;
use crate::render::{MaterialId, RenderContext, VertexArrayId};
use crate::scene::node::NodeKey;

/// Render-queue group ids, drawn in ascending order
pub mod groups {
    /// Unassigned
    pub const NONE: u32 = 0;
    /// Background layer
    pub const BACKGROUND: u32 = 10;
    /// Light markers
    pub const LIGHT: u32 = 15;
    /// Sky box
    pub const SKY_BOX: u32 = 20;
    /// Editor/debug indicators
    pub const INDICATOR: u32 = 30;
    /// Default group for materials that do not pick one
    pub const AUTOMATIC: u32 = 50;
    /// Opaque geometry
    pub const SOLID: u32 = 60;
    /// Wireframe passes
    pub const WIREFRAME: u32 = 65;
    /// Alpha-blended geometry
    pub const TRANSPARENT: u32 = 70;
    /// Particle and effect passes
    pub const TRANSPARENT_EFFECT: u32 = 80;
    /// Shadow passes
    pub const SHADOW: u32 = 90;
    /// Screen-space overlays
    pub const OVERLAY: u32 = 100;
}

/// One culling-approved draw: the node, its world matrix, and the material
/// and geometry handles the backend needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPacket {
    /// Node the packet came from
    pub node: NodeKey,
    /// World transform at queue time
    pub world: Mat4,
    /// Material identity (also the batch key)
    pub material: MaterialId,
    /// Backend vertex-array handle
    pub vertex_array: Option<VertexArrayId>,
}

impl RenderPacket {
    #[cfg(test)]
    pub(crate) fn test_packet() -> Self {
        use slotmap::Key;
        Self {
            node: NodeKey::null(),
            world: Mat4::identity(),
            material: MaterialId(0),
            vertex_array: None,
        }
    }
}

/// Per-frame queue of draw packets
#[derive(Debug, Default)]
pub struct RenderQueue {
    buckets: BTreeMap<u32, BTreeMap<MaterialId, Vec<RenderPacket>>>,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all packets (start of every frame)
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Append a packet to a group, batched under its material
    pub fn add_renderable(&mut self, group: u32, packet: RenderPacket) {
        self.buckets
            .entry(group)
            .or_default()
            .entry(packet.material)
            .or_default()
            .push(packet);
    }

    /// Total packet count across all groups
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Whether the queue holds no packets
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Packet count within one group
    pub fn group_len(&self, group: u32) -> usize {
        self.buckets
            .get(&group)
            .map_or(0, |batches| batches.values().map(Vec::len).sum())
    }

    /// How many packets reference a node (visibility assertions in tests)
    pub fn packets_for_node(&self, node: NodeKey) -> usize {
        self.buckets
            .values()
            .flat_map(BTreeMap::values)
            .flatten()
            .filter(|packet| packet.node == node)
            .count()
    }

    /// Iterate packets in draw order (ascending group, batched by material)
    pub fn packets(&self) -> impl Iterator<Item = &RenderPacket> {
        self.buckets.values().flat_map(BTreeMap::values).flatten()
    }

    /// Submit the queue to a backend: world transform then draw, per packet,
    /// in group order.
    pub fn render(&self, ctx: &mut dyn RenderContext) -> SceneResult<()> {
        for packet in self.packets() {
            ctx.set_world_transform(&packet.world);
            ctx.draw(packet)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ReferenceRenderer;

    fn packet(material: u32) -> RenderPacket {
        RenderPacket {
            material: MaterialId(material),
            ..RenderPacket::test_packet()
        }
    }

    #[test]
    fn packets_batch_by_material_within_group() {
        let mut queue = RenderQueue::new();
        queue.add_renderable(groups::SOLID, packet(2));
        queue.add_renderable(groups::SOLID, packet(1));
        queue.add_renderable(groups::SOLID, packet(2));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.group_len(groups::SOLID), 3);

        // Material 1 drains before material 2 despite insertion order.
        let order: Vec<MaterialId> = queue.packets().map(|p| p.material).collect();
        assert_eq!(order, vec![MaterialId(1), MaterialId(2), MaterialId(2)]);
    }

    #[test]
    fn groups_drain_in_ascending_order() {
        let mut queue = RenderQueue::new();
        queue.add_renderable(groups::OVERLAY, packet(1));
        queue.add_renderable(groups::BACKGROUND, packet(2));
        queue.add_renderable(groups::SOLID, packet(3));

        let order: Vec<MaterialId> = queue.packets().map(|p| p.material).collect();
        assert_eq!(order, vec![MaterialId(2), MaterialId(3), MaterialId(1)]);
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut queue = RenderQueue::new();
        queue.add_renderable(groups::SOLID, packet(1));
        assert!(!queue.is_empty());
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.group_len(groups::SOLID), 0);
    }

    #[test]
    fn render_submits_every_packet() {
        let mut queue = RenderQueue::new();
        queue.add_renderable(groups::SOLID, packet(1));
        queue.add_renderable(groups::TRANSPARENT, packet(2));

        let mut ctx = ReferenceRenderer::new();
        queue.render(&mut ctx).expect("reference draws never fail");
        assert_eq!(ctx.drawn().len(), 2);
    }
}
