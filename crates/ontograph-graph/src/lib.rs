//! Ontograph Graph
//!
//! Turns `{persons, works}` search results into an interactive
//! force-directed graph: adapter, layout engine, viewport and selection
//! controllers, plus the egui widget that ties them together. The
//! `ontograph-viewer` binary hosts the widget with a filter and details panel.

pub mod api;
pub mod graph;
pub mod settings;

pub use api::{ApiClient, ApiError};
pub use graph::{
    build_graph, EdgeLabels, EntityDetails, ForceConfig, GraphAdapter, GraphData, GraphEdge,
    GraphNode, LayoutEngine, NodeId, NodeKind, OntologyGraphWidget, SelectionController,
    SimulationHandle, SimulationState, ViewportController,
};
pub use settings::{global_settings, GraphSettings, SettingsError};
