//! Rendering - draws nodes, edges, and labels using egui::Painter
//!
//! Reads node positions from the layout and maps them through the viewport
//! transform; nothing here writes back to the simulation.

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::camera::ViewportController;
use super::colors::{
    apply_opacity, edge_color, node_border_color, node_color, node_shape, NodeShape, LABEL_COLOR,
    SELECTION_RING,
};
use super::types::{GraphEdge, GraphNode, NodeId};

/// Sizes and toggles for drawing, in screen pixels at zoom 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub node_radius: f32,
    /// Label position relative to the node center
    pub label_offset: [f32; 2],
    pub label_font_size: f32,
    pub edge_width: f32,
    pub show_edge_labels: bool,
    /// Edge labels are hidden below this zoom
    pub edge_label_min_scale: f32,
    pub selection_ring_width: f32,
    /// Opacity of nodes and edges not adjacent to the selection
    pub unfocused_opacity: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            node_radius: 10.0,
            label_offset: [15.0, 5.0],
            label_font_size: 12.0,
            edge_width: 2.0,
            show_edge_labels: true,
            edge_label_min_scale: 0.6,
            selection_ring_width: 3.0,
            unfocused_opacity: 0.35,
        }
    }
}

impl RenderStyle {
    pub fn label_offset(&self) -> Vec2 {
        Vec2::new(self.label_offset[0], self.label_offset[1])
    }

    /// On-screen node radius at a given zoom
    pub fn radius_at(&self, scale: f32) -> f32 {
        (self.node_radius * scale).max(3.0)
    }
}

/// Outline points of a polygonal node shape (empty for circles)
pub fn shape_points(shape: NodeShape, center: Pos2, radius: f32) -> Vec<Pos2> {
    match shape {
        NodeShape::Circle => Vec::new(),
        NodeShape::Square => {
            let r = radius * 0.9;
            vec![
                center + Vec2::new(-r, -r),
                center + Vec2::new(r, -r),
                center + Vec2::new(r, r),
                center + Vec2::new(-r, r),
            ]
        }
        NodeShape::Diamond => vec![
            center + Vec2::new(0.0, -radius),
            center + Vec2::new(radius, 0.0),
            center + Vec2::new(0.0, radius),
            center + Vec2::new(-radius, 0.0),
        ],
        NodeShape::Triangle => {
            let h = radius * 1.15;
            vec![
                center + Vec2::new(0.0, -h),
                center + Vec2::new(h * 0.866, h * 0.5),
                center + Vec2::new(-h * 0.866, h * 0.5),
            ]
        }
    }
}

// =============================================================================
// GRAPH RENDERER
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct GraphRenderer {
    pub style: RenderStyle,
}

impl GraphRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Draw edges below nodes; with a selection, everything outside its
    /// neighborhood is faded
    pub fn render(
        &self,
        painter: &egui::Painter,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        viewport: &ViewportController,
        screen_rect: Rect,
        selected: Option<&NodeId>,
    ) {
        let by_id: HashMap<&NodeId, &GraphNode> = nodes.iter().map(|n| (&n.id, n)).collect();
        let focus = selected.map(|id| neighborhood(id, edges));
        let scale = viewport.scale();
        let visible = screen_rect.expand(self.style.radius_at(scale) * 2.0);

        for edge in edges {
            let (Some(source), Some(target)) = (by_id.get(&edge.source), by_id.get(&edge.target))
            else {
                continue;
            };
            if !source.position.is_finite() || !target.position.is_finite() {
                continue;
            }
            let in_focus = focus
                .as_ref()
                .map_or(true, |f| f.contains(&edge.source) && f.contains(&edge.target));
            self.render_edge(painter, edge, source, target, viewport, screen_rect, in_focus);
        }

        for node in nodes {
            if !node.position.is_finite() {
                continue;
            }
            let center = viewport.world_to_screen(node.position, screen_rect);
            if !visible.contains(center) {
                continue;
            }
            let in_focus = focus.as_ref().map_or(true, |f| f.contains(&node.id));
            let is_selected = selected == Some(&node.id);
            self.render_node(painter, node, center, scale, in_focus, is_selected);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_edge(
        &self,
        painter: &egui::Painter,
        edge: &GraphEdge,
        source: &GraphNode,
        target: &GraphNode,
        viewport: &ViewportController,
        screen_rect: Rect,
        in_focus: bool,
    ) {
        let start = viewport.world_to_screen(source.position, screen_rect);
        let end = viewport.world_to_screen(target.position, screen_rect);
        let opacity = if in_focus { 1.0 } else { self.style.unfocused_opacity };
        let color = apply_opacity(edge_color(edge.relation), opacity);
        painter.line_segment([start, end], Stroke::new(self.style.edge_width, color));

        if self.style.show_edge_labels && viewport.scale() >= self.style.edge_label_min_scale {
            let mid = start + (end - start) * 0.5;
            painter.text(
                mid,
                Align2::CENTER_CENTER,
                &edge.label,
                FontId::proportional(self.style.label_font_size * 0.85),
                apply_opacity(Color32::from_gray(110), opacity),
            );
        }
    }

    fn render_node(
        &self,
        painter: &egui::Painter,
        node: &GraphNode,
        center: Pos2,
        scale: f32,
        in_focus: bool,
        is_selected: bool,
    ) {
        let radius = self.style.radius_at(scale);
        let opacity = if in_focus { 1.0 } else { self.style.unfocused_opacity };
        let fill = apply_opacity(node_color(node.kind), opacity);
        let stroke = Stroke::new(1.5, apply_opacity(node_border_color(node.kind), opacity));

        match node_shape(node.kind) {
            NodeShape::Circle => {
                painter.circle_filled(center, radius, fill);
                painter.circle_stroke(center, radius, stroke);
            }
            shape => {
                painter.add(Shape::convex_polygon(
                    shape_points(shape, center, radius),
                    fill,
                    stroke,
                ));
            }
        }

        if is_selected {
            painter.circle_stroke(
                center,
                radius + 5.0,
                Stroke::new(self.style.selection_ring_width, SELECTION_RING),
            );
        }

        painter.text(
            center + self.style.label_offset(),
            Align2::LEFT_CENTER,
            &node.label,
            FontId::proportional(self.style.label_font_size),
            apply_opacity(LABEL_COLOR, opacity),
        );
    }
}

/// The node plus everything one edge away from it
fn neighborhood<'a>(id: &'a NodeId, edges: &'a [GraphEdge]) -> HashSet<&'a NodeId> {
    let mut set: HashSet<&NodeId> = edges
        .iter()
        .filter_map(|e| {
            if &e.source == id {
                Some(&e.target)
            } else if &e.target == id {
                Some(&e.source)
            } else {
                None
            }
        })
        .collect();
    set.insert(id);
    set
}
