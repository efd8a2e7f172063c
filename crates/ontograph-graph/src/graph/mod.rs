//! Ontology Graph Visualization Module
//!
//! # Architecture
//!
//! ```text
//! SearchResponse {persons, works} (from server)
//!        │
//!        ▼
//! GraphAdapter (nodes + labeled edges)
//!        │
//!        ▼
//! LayoutEngine (force simulation, one tick per frame)
//!        │
//!        ├──► GraphRenderer (draws to egui::Painter)
//!        │
//!        └──► InputHandler (mouse/keyboard → GraphInput)
//!                    │
//!                    ├──► ViewportController (pan/zoom transform)
//!                    └──► SelectionController (selected node)
//!                                │
//!                                ▼
//!                         EntityDetails (details panel)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut graph_widget = OntologyGraphWidget::new();
//! graph_widget.set_data(&response);
//! graph_widget.ui(ui);
//! ```

pub mod adapter;
pub mod camera;
pub mod colors;
pub mod details;
pub mod force_sim;
pub mod input;
pub mod layout;
pub mod render;
pub mod selection;
pub mod spatial;
pub mod types;

pub use adapter::{build_graph, EdgeLabels, GraphAdapter};
pub use camera::{Gesture, ViewportController, ViewportLimits, ViewportTransform};
pub use details::EntityDetails;
pub use force_sim::{ForceConfig, ForceSimulation};
pub use input::{GraphInput, InputHandler, InputState};
pub use layout::{LayoutEngine, LayoutSnapshot, SimulationHandle, SimulationState};
pub use render::{GraphRenderer, RenderStyle};
pub use selection::{PickResult, SelectionController};
pub use types::*;

use egui::{Rect, Sense, Vec2};
use ontograph_types::SearchResponse;

use crate::settings::GraphSettings;

/// Padding around content when fitting to view, in screen pixels
const FIT_PADDING: f32 = 50.0;

// =============================================================================
// GRAPH WIDGET
// =============================================================================

/// Interactive force-directed graph of persons and works
pub struct OntologyGraphWidget {
    adapter: GraphAdapter,
    engine: LayoutEngine,
    /// Handle of the running layout; replacing it cancels the old run
    handle: Option<SimulationHandle>,
    viewport: ViewportController,
    selection: SelectionController,
    input_state: InputState,
    renderer: GraphRenderer,
    /// Fit to content once the next layout settles
    fit_on_settle: bool,
}

impl Default for OntologyGraphWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl OntologyGraphWidget {
    pub fn new() -> Self {
        Self::with_settings(&GraphSettings::default())
    }

    pub fn with_settings(settings: &GraphSettings) -> Self {
        Self {
            adapter: GraphAdapter::new(settings.labels.clone()),
            engine: LayoutEngine::new(settings.layout.clone(), Vec2::new(800.0, 600.0)),
            handle: None,
            viewport: ViewportController::new(settings.viewport),
            selection: SelectionController::new(),
            input_state: InputState::new(),
            renderer: GraphRenderer::new(settings.render.clone()),
            fit_on_settle: false,
        }
    }

    /// Replace the graph with one built from a search result.
    ///
    /// The previous layout is cancelled before the new one starts.
    pub fn set_data(&mut self, data: &SearchResponse) {
        let graph = self.adapter.build_graph(&data.persons, &data.works);
        tracing::info!(
            "graph rebuilt: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        if let Some(old) = self.handle.take() {
            old.cancel();
        }
        self.handle = Some(self.engine.start(graph));
        self.selection.retain_in(self.engine.nodes());
        self.fit_on_settle = true;
    }

    /// Drop the graph and stop the layout
    pub fn clear(&mut self) {
        self.handle = None;
        self.selection.clear();
        // Disposes the cancelled run
        self.engine.tick();
    }

    pub fn has_graph(&self) -> bool {
        !self.engine.nodes().is_empty()
    }

    pub fn layout_state(&self) -> SimulationState {
        self.engine.state()
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Select a node by id; unknown ids leave the selection unchanged
    pub fn select(&mut self, id: &NodeId) -> bool {
        self.selection.pick(id, self.engine.nodes())
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear()
    }

    /// Details of the selected node for the side panel
    pub fn selected_details(&self) -> Option<EntityDetails> {
        self.selection
            .selected_node(self.engine.nodes())
            .map(EntityDetails::from_node)
    }

    /// Fit all nodes into a viewport of `size`
    pub fn fit(&mut self, size: Vec2) {
        let positions = self
            .engine
            .nodes()
            .iter()
            .map(|n| n.position)
            .filter(|p| p.is_finite());
        if let Some(bounds) = bounds_of(positions) {
            self.viewport.fit_to_bounds(bounds, size, FIT_PADDING);
        }
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Route one input message to its handler
    pub fn handle_input(&mut self, input: GraphInput, size: Vec2) -> bool {
        match input {
            GraphInput::Gesture(gesture) => self.viewport.on_gesture(gesture),
            GraphInput::Click(pick) => self.selection.click(pick, self.engine.nodes()),
            GraphInput::Fit => {
                self.fit(size);
                true
            }
            GraphInput::ClearSelection => self.selection.clear(),
        }
    }

    /// Main UI function: one layout tick, input, then drawing
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
        let screen_rect = response.rect;

        self.engine.set_viewport_size(screen_rect.size());
        let ticked = self.engine.tick();

        if self.fit_on_settle && self.engine.state() == SimulationState::Settled {
            self.fit(screen_rect.size());
            self.fit_on_settle = false;
        }

        let pick = input::PickRadius {
            radius: self.renderer.style.radius_at(self.viewport.scale()),
            slop: 4.0,
        };
        let inputs = InputHandler::collect(
            &response,
            &mut self.input_state,
            &self.viewport,
            self.engine.nodes(),
            pick,
        );
        let mut changed = false;
        for input in inputs {
            changed |= self.handle_input(input, screen_rect.size());
        }
        ui.ctx().set_cursor_icon(self.input_state.cursor());

        if self.engine.nodes().is_empty() {
            painter.text(
                screen_rect.center(),
                egui::Align2::CENTER_CENTER,
                "No matching entities",
                egui::FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
        } else {
            self.renderer.render(
                &painter,
                self.engine.nodes(),
                self.engine.edges(),
                &self.viewport,
                screen_rect,
                self.selection.selected(),
            );
            self.render_chrome(&painter, screen_rect);
        }

        if ticked || changed || self.engine.state() == SimulationState::Running {
            ui.ctx().request_repaint();
        }
    }

    /// Stats and zoom level in the top-left corner
    fn render_chrome(&self, painter: &egui::Painter, screen_rect: Rect) {
        let state = match self.engine.state() {
            SimulationState::Idle => "idle",
            SimulationState::Running => "layout running",
            SimulationState::Settled => "settled",
        };
        let stats = format!(
            "{} nodes | {} edges | {} | {:.0}%",
            self.engine.nodes().len(),
            self.engine.edges().len(),
            state,
            self.viewport.scale() * 100.0
        );
        painter.text(
            screen_rect.left_top() + Vec2::new(10.0, 10.0),
            egui::Align2::LEFT_TOP,
            stats,
            egui::FontId::monospace(11.0),
            egui::Color32::from_gray(120),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_types::{Person, Role, Work};

    fn response() -> SearchResponse {
        SearchResponse::new(
            vec![
                Person::new(1, "Vincent van Gogh").with_role(Role::Painter),
                Person::new(2, "Salvador Dalí").with_role(Role::Painter),
            ],
            vec![
                Work::painting(1, "The Starry Night").with_creators([1]),
                Work::painting(2, "The Persistence of Memory").with_creators([2]),
            ],
        )
    }

    #[test]
    fn test_set_data_starts_layout() {
        let mut widget = OntologyGraphWidget::new();
        assert!(!widget.has_graph());
        assert_eq!(widget.layout_state(), SimulationState::Idle);

        widget.set_data(&response());
        assert!(widget.has_graph());
        assert_eq!(widget.layout_state(), SimulationState::Running);
        assert_eq!(widget.layout().edges().len(), 2);
    }

    #[test]
    fn test_selection_details_and_replacement() {
        let mut widget = OntologyGraphWidget::new();
        widget.set_data(&response());

        assert!(widget.select(&NodeId::work(1)));
        assert!(!widget.select(&NodeId::work(42)));
        let details = widget.selected_details().unwrap();
        assert_eq!(details.title, "The Starry Night");
        assert_eq!(details.kind, "Painting");

        // New snapshot without the selected work drops the selection
        let mut next = response();
        next.works.remove(0);
        widget.set_data(&next);
        assert!(widget.selected_details().is_none());
    }

    #[test]
    fn test_gestures_route_to_viewport_only() {
        let mut widget = OntologyGraphWidget::new();
        widget.set_data(&response());
        let before: Vec<_> = widget.layout().nodes().iter().map(|n| n.position).collect();

        let size = Vec2::new(800.0, 600.0);
        assert!(widget.handle_input(GraphInput::Gesture(Gesture::Pan(Vec2::new(5.0, 5.0))), size));
        assert!(widget.handle_input(
            GraphInput::Gesture(Gesture::Zoom {
                factor: 2.0,
                anchor: egui::Pos2::new(100.0, 100.0),
            }),
            size
        ));

        let after: Vec<_> = widget.layout().nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
        assert_eq!(widget.viewport().scale(), 2.0);
    }

    #[test]
    fn test_clear_stops_layout() {
        let mut widget = OntologyGraphWidget::new();
        widget.set_data(&response());
        widget.select(&NodeId::person(1));

        widget.clear();
        assert!(!widget.has_graph());
        assert_eq!(widget.layout_state(), SimulationState::Idle);
        assert!(widget.selection().selected().is_none());
    }
}
