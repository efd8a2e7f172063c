//! Color palettes for the graph visualization
//!
//! Node kind is encoded twice, by fill color and by shape, so the graph stays
//! readable without color.

use egui::Color32;

use super::types::{EdgeRelation, NodeKind};

// =============================================================================
// NODE ENCODING
// =============================================================================

/// Outline drawn for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    Square,
    Diamond,
    Triangle,
}

/// Shape for a node kind
pub fn node_shape(kind: NodeKind) -> NodeShape {
    match kind {
        NodeKind::Person => NodeShape::Circle,
        NodeKind::Film => NodeShape::Square,
        NodeKind::Book => NodeShape::Diamond,
        NodeKind::Painting => NodeShape::Triangle,
    }
}

/// Fill color for a node kind
pub fn node_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Person => Color32::from_rgb(66, 133, 244), // Blue
        NodeKind::Film => Color32::from_rgb(76, 175, 80),    // Green
        NodeKind::Book => Color32::from_rgb(255, 193, 7),    // Amber
        NodeKind::Painting => Color32::from_rgb(156, 39, 176), // Purple
    }
}

/// Darker outline matching `node_color`
pub fn node_border_color(kind: NodeKind) -> Color32 {
    let [r, g, b, _] = node_color(kind).to_array();
    Color32::from_rgb(
        (r as f32 * 0.6) as u8,
        (g as f32 * 0.6) as u8,
        (b as f32 * 0.6) as u8,
    )
}

/// Ring drawn around the selected node
pub const SELECTION_RING: Color32 = Color32::from_rgb(255, 87, 34);

pub const LABEL_COLOR: Color32 = Color32::from_rgb(60, 60, 60);

// =============================================================================
// EDGE COLORS
// =============================================================================

pub fn edge_color(relation: EdgeRelation) -> Color32 {
    match relation {
        EdgeRelation::Created | EdgeRelation::ActedIn => Color32::from_rgb(153, 153, 153),
        EdgeRelation::Related => Color32::from_rgb(189, 189, 189),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Scale a color's alpha, used to fade nodes outside the selection
pub fn apply_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, a] = color.to_array();
    Color32::from_rgba_unmultiplied(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [NodeKind; 4] = [
        NodeKind::Person,
        NodeKind::Film,
        NodeKind::Book,
        NodeKind::Painting,
    ];

    #[test]
    fn test_each_kind_has_distinct_encoding() {
        for (i, a) in KINDS.iter().enumerate() {
            for b in &KINDS[i + 1..] {
                assert_ne!(node_shape(*a), node_shape(*b));
                assert_ne!(node_color(*a), node_color(*b));
            }
        }
    }

    #[test]
    fn test_apply_opacity() {
        let faded = apply_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(faded.a(), 127);
        assert_eq!(apply_opacity(Color32::WHITE, 2.0).a(), 255);
    }
}
