//! Spatial indexing for node hit testing
//!
//! R-tree over node positions in simulation space. The layout moves every
//! node on every tick, so the index is rebuilt from the current positions
//! before a pick rather than updated in place.

use egui::Pos2;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::types::{GraphNode, NodeId};

/// A node entry in the spatial index
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialNode {
    pub id: NodeId,
    /// Center in simulation space
    pub center: [f32; 2],
    /// Hit radius in simulation units
    pub radius: f32,
}

impl SpatialNode {
    pub fn new(id: NodeId, center: Pos2, radius: f32) -> Self {
        Self {
            id,
            center: [center.x, center.y],
            radius,
        }
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.center[0] - self.radius, self.center[1] - self.radius],
            [self.center[0] + self.radius, self.center[1] + self.radius],
        )
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        dx * dx + dy * dy
    }
}

/// R-tree of node discs
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the current positions of `nodes`, each with hit radius `radius`.
    /// Nodes with a non-finite position are left out.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a GraphNode>, radius: f32) -> Self {
        let mut index = Self::new();
        index.rebuild(
            nodes
                .into_iter()
                .filter(|n| n.position.is_finite())
                .map(|n| SpatialNode::new(n.id.clone(), n.position, radius)),
        );
        index
    }

    /// Replace the contents with `nodes` (bulk load)
    pub fn rebuild(&mut self, nodes: impl IntoIterator<Item = SpatialNode>) {
        let nodes: Vec<SpatialNode> = nodes.into_iter().collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    /// Closest node whose disc, grown by `slop`, contains `point`
    pub fn hit_test(&self, point: Pos2, slop: f32) -> Option<&SpatialNode> {
        let p = [point.x, point.y];
        self.tree
            .nearest_neighbor(&p)
            .filter(|node| node.distance_2(&p).sqrt() <= node.radius + slop)
    }

    /// Node ids whose disc intersects the rectangle
    pub fn query_rect(&self, min: Pos2, max: Pos2) -> Vec<&NodeId> {
        let envelope = AABB::from_corners([min.x, min.y], [max.x, max.y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|node| &node.id)
            .collect()
    }

    /// Nearest node to a point, regardless of distance
    pub fn nearest(&self, point: Pos2) -> Option<&SpatialNode> {
        self.tree.nearest_neighbor(&[point.x, point.y])
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
