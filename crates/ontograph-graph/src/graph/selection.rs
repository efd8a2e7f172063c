//! Selection Controller - the single selected node
//!
//! Selection is held by node id, so it survives layout ticks and viewport
//! changes untouched. The details panel reads the selected node's payload;
//! nothing here interprets it.

use egui::{Pos2, Rect};

use super::camera::ViewportController;
use super::spatial::SpatialIndex;
use super::types::{GraphNode, NodeId};

/// Outcome of a pointer pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    /// A node was under the pointer
    Node(NodeId),
    /// Empty space
    Background,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<NodeId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select `id` if it names one of `nodes`; otherwise leave the selection
    /// as it is. Returns true when the selection changed.
    pub fn pick(&mut self, id: &NodeId, nodes: &[GraphNode]) -> bool {
        if !nodes.iter().any(|n| &n.id == id) {
            tracing::debug!("pick of unknown node {} ignored", id);
            return false;
        }
        if self.is_selected(id) {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    /// Select `id`, or deselect it when it is already selected
    pub fn toggle(&mut self, id: &NodeId, nodes: &[GraphNode]) -> bool {
        if self.is_selected(id) {
            self.clear()
        } else {
            self.pick(id, nodes)
        }
    }

    /// Returns true when something was selected
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Resolve the selection against the current node set
    pub fn selected_node<'a>(&self, nodes: &'a [GraphNode]) -> Option<&'a GraphNode> {
        let id = self.selected.as_ref()?;
        nodes.iter().find(|n| &n.id == id)
    }

    /// Drop the selection if its node is no longer part of `nodes`
    pub fn retain_in(&mut self, nodes: &[GraphNode]) {
        if self.selected.is_some() && self.selected_node(nodes).is_none() {
            self.selected = None;
        }
    }

    // =========================================================================
    // POINTER PICKING
    // =========================================================================

    /// Find what lies under a screen position.
    ///
    /// `radius` and `slop` are in screen pixels; they are scaled into
    /// simulation units through the current zoom.
    pub fn hit_test(
        screen_pos: Pos2,
        screen_rect: Rect,
        viewport: &ViewportController,
        nodes: &[GraphNode],
        radius: f32,
        slop: f32,
    ) -> PickResult {
        let scale = viewport.scale();
        let world = viewport.screen_to_world(screen_pos, screen_rect);
        let index = SpatialIndex::from_nodes(nodes, radius / scale);
        match index.hit_test(world, slop / scale) {
            Some(hit) => PickResult::Node(hit.id.clone()),
            None => PickResult::Background,
        }
    }

    /// Click handling: a node toggles, empty space clears
    pub fn click(&mut self, pick: PickResult, nodes: &[GraphNode]) -> bool {
        match pick {
            PickResult::Node(id) => self.toggle(&id, nodes),
            PickResult::Background => self.clear(),
        }
    }
}
