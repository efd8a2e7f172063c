//! Layout Engine - owns the running force simulation
//!
//! ```text
//!   start(graph) ──► Running ──(alpha < alpha_min)──► Settled
//!        ▲              │                                │
//!        └──────────────┴──── start(new graph) ◄─────────┘
//!
//!   handle dropped / cancel() ──► Idle
//! ```
//!
//! `start` disposes the previous run before creating the next one, so two
//! simulations never write to the same nodes. The host calls
//! [`LayoutEngine::tick`] once per frame; every step commits a
//! [`LayoutSnapshot`] that renderers and tick callbacks read.
//!
//! Single-threaded by construction (the handle shares an `Rc`).

use egui::{Pos2, Vec2};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::force_sim::{ForceConfig, ForceSimulation};
use super::types::{GraphData, GraphEdge, GraphNode, NodeId};

/// Lifecycle of the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// No simulation
    Idle,
    /// Cooling; positions change every tick
    Running,
    /// Alpha below threshold; positions are stable
    Settled,
}

/// Positions committed at the end of a tick
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    /// Which `start` call produced this run
    pub generation: u64,
    pub tick: u32,
    pub alpha: f32,
    /// Sum of squared velocities
    pub energy: f32,
    pub state: SimulationState,
    pub positions: Vec<(NodeId, Pos2)>,
}

impl LayoutSnapshot {
    pub fn position_of(&self, id: &NodeId) -> Option<Pos2> {
        self.positions
            .iter()
            .find(|(node_id, _)| node_id == id)
            .map(|(_, pos)| *pos)
    }
}

type TickCallback = Box<dyn FnMut(&LayoutSnapshot)>;

/// Disposable handle for one simulation run.
///
/// Dropping the handle (or calling [`SimulationHandle::cancel`]) deregisters
/// the run: the engine discards it and its tick callbacks on the next tick.
#[must_use = "dropping the handle cancels the simulation"]
#[derive(Debug)]
pub struct SimulationHandle {
    generation: u64,
    cancelled: Rc<Cell<bool>>,
}

impl SimulationHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

struct ActiveRun {
    generation: u64,
    cancelled: Rc<Cell<bool>>,
    sim: ForceSimulation,
    callbacks: Vec<TickCallback>,
}

impl ActiveRun {
    fn state(&self) -> SimulationState {
        if self.sim.is_settled() {
            SimulationState::Settled
        } else {
            SimulationState::Running
        }
    }

    fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            generation: self.generation,
            tick: self.sim.ticks(),
            alpha: self.sim.alpha(),
            energy: self.sim.energy(),
            state: self.state(),
            positions: self
                .sim
                .nodes()
                .iter()
                .map(|n| (n.id.clone(), n.position))
                .collect(),
        }
    }
}

/// Runs at most one force simulation at a time
pub struct LayoutEngine {
    config: ForceConfig,
    viewport: Vec2,
    active: Option<ActiveRun>,
    snapshot: Option<LayoutSnapshot>,
    next_generation: u64,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("state", &self.state())
            .field("generation", &self.active.as_ref().map(|run| run.generation))
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    pub fn new(config: ForceConfig, viewport: Vec2) -> Self {
        Self {
            config,
            viewport,
            active: None,
            snapshot: None,
            next_generation: 1,
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Replace the running simulation with one over `graph`.
    ///
    /// Nodes whose id was present in the previous run keep their last
    /// position; the rest are placed around the viewport center.
    pub fn start(&mut self, mut graph: GraphData) -> SimulationHandle {
        let previous: HashMap<NodeId, Pos2> = self
            .active
            .as_ref()
            .map(|run| {
                run.sim
                    .nodes()
                    .iter()
                    .map(|n| (n.id.clone(), n.position))
                    .collect()
            })
            .unwrap_or_default();
        self.dispose_active();

        for node in &mut graph.nodes {
            if let Some(&pos) = previous.get(&node.id) {
                node.position = pos;
                node.velocity = Vec2::ZERO;
            }
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        let cancelled = Rc::new(Cell::new(false));

        tracing::debug!(
            "layout generation {} started: {} nodes, {} edges ({} carried over)",
            generation,
            graph.nodes.len(),
            graph.edges.len(),
            previous.len()
        );

        let run = ActiveRun {
            generation,
            cancelled: Rc::clone(&cancelled),
            sim: ForceSimulation::new(graph, self.config.clone(), self.viewport),
            callbacks: Vec::new(),
        };
        self.snapshot = Some(run.snapshot());
        self.active = Some(run);

        SimulationHandle {
            generation,
            cancelled,
        }
    }

    /// Register a callback invoked after every tick of the handle's run.
    ///
    /// Returns false (and drops the callback) when the handle no longer
    /// refers to the active run.
    pub fn on_tick(
        &mut self,
        handle: &SimulationHandle,
        callback: impl FnMut(&LayoutSnapshot) + 'static,
    ) -> bool {
        match self.active.as_mut() {
            Some(run) if run.generation == handle.generation && !handle.is_cancelled() => {
                run.callbacks.push(Box::new(callback));
                true
            }
            _ => false,
        }
    }

    /// Discard the active run and its callbacks
    fn dispose_active(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancelled.set(true);
            tracing::debug!(
                "layout generation {} disposed after {} ticks",
                run.generation,
                run.sim.ticks()
            );
        }
        self.snapshot = None;
    }

    /// Advance the active run by one step.
    ///
    /// Returns true when a step ran (the scene needs a repaint).
    pub fn tick(&mut self) -> bool {
        let cancelled = match &self.active {
            Some(run) => run.cancelled.get(),
            None => return false,
        };
        if cancelled {
            self.dispose_active();
            return false;
        }

        let Some(run) = self.active.as_mut() else {
            return false;
        };
        if run.sim.is_settled() {
            return false;
        }

        run.sim.tick();
        let snapshot = run.snapshot();
        for callback in &mut run.callbacks {
            callback(&snapshot);
        }
        if snapshot.state == SimulationState::Settled {
            tracing::debug!(
                "layout generation {} settled after {} ticks",
                run.generation,
                snapshot.tick
            );
        }
        self.snapshot = Some(snapshot);
        true
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    pub fn state(&self) -> SimulationState {
        match &self.active {
            Some(run) if !run.cancelled.get() => run.state(),
            _ => SimulationState::Idle,
        }
    }

    /// Latest committed snapshot
    pub fn snapshot(&self) -> Option<&LayoutSnapshot> {
        self.snapshot.as_ref()
    }

    /// The live run; a cancelled run awaiting disposal is not visible
    pub fn simulation(&self) -> Option<&ForceSimulation> {
        self.active
            .as_ref()
            .filter(|run| !run.cancelled.get())
            .map(|run| &run.sim)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        self.simulation().map(|sim| sim.nodes()).unwrap_or(&[])
    }

    pub fn edges(&self) -> &[GraphEdge] {
        self.simulation().map(|sim| sim.edges()).unwrap_or(&[])
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.simulation().and_then(|sim| sim.get_node(id))
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    // =========================================================================
    // VIEWPORT
    // =========================================================================

    /// Recenter on a resized viewport; a settled layout is reheated
    pub fn set_viewport_size(&mut self, size: Vec2) {
        if (size - self.viewport).length() < 0.5 {
            return;
        }
        self.viewport = size;
        if let Some(run) = self.active.as_mut() {
            run.sim.set_viewport_size(size.x, size.y);
            if run.sim.is_settled() {
                run.sim.reheat();
            }
        }
    }

    /// Restart cooling of the active run
    pub fn reheat(&mut self) {
        if let Some(run) = self.active.as_mut() {
            run.sim.reheat();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::adapter::build_graph;
    use ontograph_types::{Person, Work};
    use std::cell::RefCell;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn small_graph() -> GraphData {
        build_graph(
            &[Person::new(1, "A"), Person::new(2, "B")],
            &[Work::book(1, "X").with_creators([1, 2])],
        )
    }

    fn run_to_rest(engine: &mut LayoutEngine) -> u32 {
        let mut ticks = 0;
        while engine.tick() {
            ticks += 1;
            assert!(ticks <= 500, "layout did not settle");
        }
        ticks
    }

    #[test]
    fn test_idle_until_started() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        assert_eq!(engine.state(), SimulationState::Idle);
        assert!(!engine.tick());
        assert!(engine.nodes().is_empty());
    }

    #[test]
    fn test_runs_then_settles() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let _handle = engine.start(small_graph());
        assert_eq!(engine.state(), SimulationState::Running);

        let ticks = run_to_rest(&mut engine);
        assert!(ticks > 0);
        assert_eq!(engine.state(), SimulationState::Settled);
        assert_eq!(engine.snapshot().map(|s| s.state), Some(SimulationState::Settled));
    }

    #[test]
    fn test_callbacks_receive_each_tick() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let handle = engine.start(small_graph());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        assert!(engine.on_tick(&handle, move |snap| sink.borrow_mut().push(snap.tick)));

        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_start_cancels_previous_run() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let first = engine.start(small_graph());
        let stale_ticks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&stale_ticks);
        assert!(engine.on_tick(&first, move |_| counter.set(counter.get() + 1)));
        engine.tick();
        assert_eq!(stale_ticks.get(), 1);

        let second = engine.start(small_graph());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(second.generation() > first.generation());

        for _ in 0..5 {
            engine.tick();
        }
        assert_eq!(stale_ticks.get(), 1, "stale callback leaked ticks");
        assert!(!engine.on_tick(&first, |_| {}));
        assert_eq!(engine.snapshot().map(|s| s.generation), Some(second.generation()));
    }

    #[test]
    fn test_dropping_handle_stops_simulation() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let handle = engine.start(small_graph());
        engine.tick();
        drop(handle);

        assert_eq!(engine.state(), SimulationState::Idle);
        // Hidden before the next tick disposes it
        assert!(engine.nodes().is_empty());
        assert!(engine.edges().is_empty());
        assert!(engine.get_node(&NodeId::person(1)).is_none());
        assert!(!engine.tick());
        assert!(engine.snapshot().is_none());
        assert!(engine.nodes().is_empty());
    }

    #[test]
    fn test_positions_carry_over_between_runs() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let _first = engine.start(small_graph());
        run_to_rest(&mut engine);
        let kept = engine.get_node(&NodeId::person(1)).unwrap().position;

        let next = build_graph(
            &[Person::new(1, "A"), Person::new(3, "C")],
            &[Work::book(1, "X").with_creators([1, 3])],
        );
        let _second = engine.start(next);

        assert_eq!(engine.get_node(&NodeId::person(1)).unwrap().position, kept);
        assert_eq!(engine.state(), SimulationState::Running);
    }

    #[test]
    fn test_resize_reheats_settled_layout() {
        let mut engine = LayoutEngine::new(ForceConfig::default(), VIEWPORT);
        let _handle = engine.start(small_graph());
        run_to_rest(&mut engine);

        engine.set_viewport_size(Vec2::new(1600.0, 1200.0));
        assert_eq!(engine.state(), SimulationState::Running);
        assert_eq!(engine.simulation().unwrap().center(), Pos2::new(800.0, 600.0));
    }
}
