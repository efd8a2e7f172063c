//! Input handling - mouse/keyboard interaction with the graph
//!
//! Raw egui input is turned into discrete [`GraphInput`] messages. The
//! widget routes each message to exactly one handler: gestures go to the
//! viewport, picks to the selection. Nothing here touches the layout.

use egui::{Key, Pos2, Rect, Response};

use super::camera::{Gesture, ViewportController};
use super::selection::{PickResult, SelectionController};
use super::types::{GraphNode, NodeId};

/// One input message for the graph view
#[derive(Debug, Clone, PartialEq)]
pub enum GraphInput {
    Gesture(Gesture),
    /// Primary click: on a node or on empty space
    Click(PickResult),
    /// Fit all nodes into view
    Fit,
    ClearSelection,
}

/// Hover/drag state kept between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub hovered_node: Option<NodeId>,
    pub is_panning: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> egui::CursorIcon {
        if self.is_panning {
            egui::CursorIcon::Grabbing
        } else if self.hovered_node.is_some() {
            egui::CursorIcon::PointingHand
        } else {
            egui::CursorIcon::Grab
        }
    }
}

/// Hit radius and slop for picking, in screen pixels
#[derive(Debug, Clone, Copy)]
pub struct PickRadius {
    pub radius: f32,
    pub slop: f32,
}

pub struct InputHandler;

impl InputHandler {
    /// Collect this frame's input messages
    pub fn collect(
        response: &Response,
        state: &mut InputState,
        viewport: &ViewportController,
        nodes: &[GraphNode],
        pick: PickRadius,
    ) -> Vec<GraphInput> {
        let mut inputs = Vec::new();
        let screen_rect = response.rect;
        let pointer_pos = response.hover_pos();
        let hit = |pos: Pos2| {
            SelectionController::hit_test(pos, screen_rect, viewport, nodes, pick.radius, pick.slop)
        };

        state.hovered_node = match pointer_pos.map(&hit) {
            Some(PickResult::Node(id)) => Some(id),
            _ => None,
        };

        let click = if response.clicked() {
            response.interact_pointer_pos().or(pointer_pos).map(&hit)
        } else {
            None
        };
        inputs.extend(click_messages(click, response.double_clicked()));

        if response.dragged() {
            let delta = response.drag_delta();
            if delta != egui::Vec2::ZERO {
                inputs.push(GraphInput::Gesture(Gesture::Pan(delta)));
                state.is_panning = true;
            }
        } else {
            state.is_panning = false;
        }

        if let Some(pos) = pointer_pos {
            let anchor = (pos - screen_rect.min).to_pos2();
            let (scroll_y, pinch) = response
                .ctx
                .input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            if scroll_y != 0.0 {
                inputs.push(GraphInput::Gesture(Gesture::Zoom {
                    factor: viewport.scroll_factor(scroll_y),
                    anchor,
                }));
            }
            if pinch != 1.0 {
                inputs.push(GraphInput::Gesture(Gesture::Zoom {
                    factor: pinch,
                    anchor,
                }));
            }
            Self::collect_keyboard(response, viewport, screen_rect, &mut inputs);
        }

        inputs
    }

    /// Keyboard shortcuts, active while the pointer is over the graph
    fn collect_keyboard(
        response: &Response,
        viewport: &ViewportController,
        screen_rect: Rect,
        inputs: &mut Vec<GraphInput>,
    ) {
        let center = (screen_rect.size() / 2.0).to_pos2();
        let step = viewport.limits.zoom_step;
        response.ctx.input(|i| {
            if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                inputs.push(GraphInput::Gesture(Gesture::Zoom {
                    factor: step,
                    anchor: center,
                }));
            }
            if i.key_pressed(Key::Minus) {
                inputs.push(GraphInput::Gesture(Gesture::Zoom {
                    factor: 1.0 / step,
                    anchor: center,
                }));
            }
            if i.key_pressed(Key::Num0) {
                inputs.push(GraphInput::Gesture(Gesture::Reset));
            }
            if i.key_pressed(Key::F) {
                inputs.push(GraphInput::Fit);
            }
            if i.key_pressed(Key::Escape) {
                inputs.push(GraphInput::ClearSelection);
            }
        });
    }
}

/// Messages for a primary click.
///
/// egui reports `clicked()` on both halves of a double-click; the second
/// half only fits, so the first click's selection is not toggled back off.
fn click_messages(pick: Option<PickResult>, double_clicked: bool) -> Vec<GraphInput> {
    match (pick, double_clicked) {
        (_, true) => vec![GraphInput::Fit],
        (Some(pick), false) => vec![GraphInput::Click(pick)],
        (None, false) => Vec::new(),
    }
}
