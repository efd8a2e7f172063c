//! Force Simulation for the ontology graph
//!
//! Implements a force-directed layout with a cooling schedule.
//! Designed for tens to a few hundred nodes; repulsion is pairwise O(n²).
//!
//! Forces (combined additively each tick, all scaled by alpha):
//! - Repulsion between all node pairs, magnitude `charge / distance`
//! - Spring attraction along every edge toward a rest length
//! - Weak centering of the node centroid on the viewport center
//!
//! Alpha starts near 1.0 and decays geometrically toward `alpha_target`;
//! once it drops below `alpha_min` the simulation is settled.
//!
//! # Usage
//! ```ignore
//! let mut sim = ForceSimulation::new(graph, ForceConfig::default(), Vec2::new(800.0, 600.0));
//!
//! // Each frame:
//! if !sim.is_settled() {
//!     sim.tick();
//! }
//! for node in sim.nodes() {
//!     draw_circle(node.position, radius);
//! }
//! ```

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{GraphData, GraphEdge, GraphNode, NodeId};

/// π(3 − √5), the angle between successive phyllotaxis placements
const INITIAL_ANGLE: f32 = 2.399_963;

// =============================================================================
// SIMULATION CONFIG
// =============================================================================

/// Configuration for the force simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Pairwise charge; negative repels
    pub charge_strength: f32,

    /// Distances below this are clamped in the repulsion term
    pub min_distance: f32,

    /// Rest length of every edge spring
    pub link_distance: f32,

    /// Multiplier on the per-edge spring stiffness (1 / min endpoint degree)
    pub link_strength: f32,

    /// Pull of the node centroid toward the viewport center
    pub center_strength: f32,

    /// Alpha at the start of a run
    pub alpha_start: f32,

    /// Settled once alpha falls below this
    pub alpha_min: f32,

    /// Fraction of the remaining distance to `alpha_target` covered per tick
    pub alpha_decay: f32,

    /// Alpha converges toward this value
    pub alpha_target: f32,

    /// Fraction of velocity removed per tick (0.0 = frictionless)
    pub velocity_decay: f32,

    /// Maximum speed per tick (prevents instability)
    pub max_velocity: f32,

    /// Scale of the phyllotaxis spiral used for unplaced nodes
    pub initial_radius: f32,

    /// Magnitude of the offset applied to coincident nodes
    pub jitter: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: -300.0,
            min_distance: 1.0,
            link_distance: 100.0,
            link_strength: 1.0,
            center_strength: 0.1,
            alpha_start: 1.0,
            alpha_min: 0.001,
            // 1 - 0.001^(1/300): reaches alpha_min in ~300 ticks
            alpha_decay: 0.0228,
            alpha_target: 0.0,
            velocity_decay: 0.4,
            max_velocity: 500.0,
            initial_radius: 10.0,
            jitter: 1e-3,
        }
    }
}

impl ForceConfig {
    /// Number of ticks until alpha drops below `alpha_min` from `alpha_start`
    pub fn ticks_to_settle(&self) -> u32 {
        if self.alpha_start < self.alpha_min {
            return 0;
        }
        if self.alpha_decay <= 0.0 || self.alpha_target >= self.alpha_min {
            return u32::MAX;
        }
        let remaining = (self.alpha_min - self.alpha_target) / (self.alpha_start - self.alpha_target);
        (remaining.ln() / (1.0 - self.alpha_decay).ln()).ceil() as u32
    }
}

/// Spring between two node indices with degree-derived stiffness
#[derive(Debug, Clone, Copy)]
struct Link {
    source: usize,
    target: usize,
    /// Share of the correction applied to the target
    bias: f32,
    strength: f32,
}

// =============================================================================
// FORCE SIMULATION
// =============================================================================

/// Force-directed layout simulation
///
/// Owns node positions exclusively. Call [`ForceSimulation::tick`] once per
/// frame; read positions between ticks.
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    /// Nodes in the simulation
    nodes: Vec<GraphNode>,

    /// Edges, as given (for rendering)
    edges: Vec<GraphEdge>,

    /// Resolved springs
    links: Vec<Link>,

    /// Quick lookup by ID
    node_index: HashMap<NodeId, usize>,

    /// Simulation configuration
    pub config: ForceConfig,

    /// Center point the centroid is pulled toward
    center: Pos2,

    /// Cooling coefficient
    alpha: f32,

    /// Ticks run so far
    ticks: u32,

    /// Sum of squared velocities after the last tick
    energy: f32,

    /// Node recoveries from non-finite state
    recoveries: usize,
}

impl ForceSimulation {
    /// Create a simulation centered in a viewport of the given size
    pub fn new(graph: GraphData, config: ForceConfig, viewport: Vec2) -> Self {
        let GraphData { nodes, edges } = graph;
        let node_index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        let mut sim = Self {
            nodes,
            edges,
            links: Vec::new(),
            node_index,
            alpha: config.alpha_start,
            config,
            center: Pos2::new(viewport.x / 2.0, viewport.y / 2.0),
            ticks: 0,
            energy: 0.0,
            recoveries: 0,
        };
        sim.resolve_links();
        sim.place_unpositioned();
        sim
    }

    // =========================================================================
    // SETUP
    // =========================================================================

    fn resolve_links(&mut self) {
        let mut degree = vec![0usize; self.nodes.len()];
        let mut pairs = Vec::with_capacity(self.edges.len());

        for edge in &self.edges {
            let (Some(&s), Some(&t)) = (
                self.node_index.get(&edge.source),
                self.node_index.get(&edge.target),
            ) else {
                tracing::debug!("edge {} -> {} has a missing endpoint", edge.source, edge.target);
                continue;
            };
            if s == t {
                continue;
            }
            degree[s] += 1;
            degree[t] += 1;
            pairs.push((s, t));
        }

        self.links = pairs
            .into_iter()
            .map(|(s, t)| {
                let (ds, dt) = (degree[s] as f32, degree[t] as f32);
                Link {
                    source: s,
                    target: t,
                    bias: ds / (ds + dt),
                    strength: 1.0 / ds.min(dt),
                }
            })
            .collect();
    }

    /// Phyllotaxis placement around the center for nodes still at the origin
    fn place_unpositioned(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if node.position == Pos2::ZERO || !node.position.is_finite() {
                let radius = self.config.initial_radius * (0.5 + i as f32).sqrt();
                let angle = i as f32 * INITIAL_ANGLE;
                node.position = self.center + Vec2::angled(angle) * radius;
            }
            if !node.velocity.is_finite() {
                node.velocity = Vec2::ZERO;
            }
        }
    }

    // =========================================================================
    // NODE ACCESS
    // =========================================================================

    /// Get node by ID
    pub fn get_node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Get mutable node by ID
    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut GraphNode> {
        self.node_index
            .get(id)
            .copied()
            .map(|idx| &mut self.nodes[idx])
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    // =========================================================================
    // SIMULATION
    // =========================================================================

    /// Run one integration step
    pub fn tick(&mut self) {
        if self.nodes.is_empty() {
            self.alpha = 0.0;
            return;
        }

        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
        self.ticks += 1;

        // Externally injected bad state must not leak into the force terms
        self.recover_non_finite();

        self.apply_repulsion();
        self.apply_links();
        self.apply_centering();

        // Damped explicit step
        let retain = 1.0 - self.config.velocity_decay;
        for node in &mut self.nodes {
            node.velocity *= retain;

            let speed = node.velocity.length();
            if speed > self.config.max_velocity {
                node.velocity = node.velocity / speed * self.config.max_velocity;
            }

            node.position += node.velocity;
        }

        self.recover_non_finite();
        self.energy = self.nodes.iter().map(|n| n.velocity.length_sq()).sum();
    }

    /// Pairwise repulsion `delta * charge / d²`, so the push falls off as 1/d
    fn apply_repulsion(&mut self) {
        let n = self.nodes.len();
        let min_d2 = self.config.min_distance * self.config.min_distance;
        let strength = self.config.charge_strength * self.alpha;

        for i in 0..n {
            for j in (i + 1)..n {
                let mut delta = self.nodes[j].position - self.nodes[i].position;
                if delta.length_sq() == 0.0 {
                    delta = jiggle(i + j, self.config.jitter);
                }
                let mut l = delta.length_sq();
                if l < min_d2 {
                    l = (min_d2 * l).sqrt();
                }
                let push = delta * (strength / l);
                self.nodes[i].velocity += push;
                self.nodes[j].velocity -= push;
            }
        }
    }

    /// Springs toward `link_distance`, split between endpoints by degree
    fn apply_links(&mut self) {
        let distance = self.config.link_distance;
        let scale = self.config.link_strength * self.alpha;

        for link in &self.links {
            let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
            let mut delta = (t.position + t.velocity) - (s.position + s.velocity);
            if delta.length_sq() == 0.0 {
                delta = jiggle(link.source + link.target, self.config.jitter);
            }
            let l = delta.length();
            let correction = delta * ((l - distance) / l * scale * link.strength);

            self.nodes[link.target].velocity -= correction * link.bias;
            self.nodes[link.source].velocity += correction * (1.0 - link.bias);
        }
    }

    /// Pull the centroid toward the center
    fn apply_centering(&mut self) {
        let n = self.nodes.len() as f32;
        let sum = self
            .nodes
            .iter()
            .fold(Vec2::ZERO, |acc, node| acc + node.position.to_vec2());
        let centroid = Pos2::new(sum.x / n, sum.y / n);
        let pull = (self.center - centroid) * self.config.center_strength * self.alpha;

        for node in &mut self.nodes {
            node.velocity += pull;
        }
    }

    /// Reset any node whose state went non-finite
    fn recover_non_finite(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if !node.velocity.is_finite() {
                node.velocity = Vec2::ZERO;
                self.recoveries += 1;
                tracing::warn!("node {} velocity went non-finite; reset", node.id);
            }
            if !node.position.is_finite() {
                node.position = self.center + jiggle(i, self.config.initial_radius);
                node.velocity = Vec2::ZERO;
                self.recoveries += 1;
                tracing::warn!("node {} position went non-finite; reset", node.id);
            }
        }
    }

    /// Check if simulation has settled
    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    /// Current cooling coefficient
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Get current kinetic energy (sum of squared velocities)
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Number of non-finite recoveries so far
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }

    /// Restart the cooling schedule
    pub fn reheat(&mut self) {
        self.alpha = self.config.alpha_start;
    }

    // =========================================================================
    // VIEWPORT SCALING
    // =========================================================================

    /// Move the centering target to the middle of a resized viewport
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.center = Pos2::new(width / 2.0, height / 2.0);
    }
}

/// Deterministic small offset for coincident points
fn jiggle(seed: usize, magnitude: f32) -> Vec2 {
    Vec2::angled((seed as f32 + 1.0) * INITIAL_ANGLE) * magnitude
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::EdgeRelation;
    use ontograph_types::{Person, Work};

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn person(id: u32, pos: Pos2) -> GraphNode {
        GraphNode::from_person(&Person::new(id, format!("P{}", id))).with_position(pos)
    }

    fn work(id: u32, pos: Pos2) -> GraphNode {
        GraphNode::from_work(&Work::book(id, format!("W{}", id))).with_position(pos)
    }

    fn link(source: NodeId, target: NodeId) -> GraphEdge {
        GraphEdge {
            source,
            target,
            relation: EdgeRelation::Created,
            label: "created".into(),
        }
    }

    fn distance(sim: &ForceSimulation, a: &NodeId, b: &NodeId) -> f32 {
        let a = sim.get_node(a).unwrap().position;
        let b = sim.get_node(b).unwrap().position;
        (a - b).length()
    }

    #[test]
    fn test_unplaced_nodes_get_distinct_positions() {
        let graph = GraphData {
            nodes: (0..10).map(|i| person(i, Pos2::ZERO)).collect(),
            edges: vec![],
        };
        let sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        for (i, a) in sim.nodes().iter().enumerate() {
            for b in &sim.nodes()[i + 1..] {
                assert!((a.position - b.position).length() > 1.0);
            }
        }
    }

    #[test]
    fn test_repulsion_separates_nodes() {
        let graph = GraphData {
            nodes: vec![
                person(1, Pos2::new(400.0, 300.0)),
                person(2, Pos2::new(410.0, 300.0)),
            ],
            edges: vec![],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        let (a, b) = (NodeId::person(1), NodeId::person(2));
        let initial = distance(&sim, &a, &b);

        for _ in 0..100 {
            sim.tick();
        }

        assert!(distance(&sim, &a, &b) > initial);
    }

    #[test]
    fn test_repulsion_falls_off_with_distance() {
        let push_at = |d: f32| {
            let graph = GraphData {
                nodes: vec![
                    person(1, Pos2::new(100.0, 100.0)),
                    person(2, Pos2::new(100.0 + d, 100.0)),
                ],
                edges: Vec::new(),
            };
            let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
            sim.apply_repulsion();
            sim.nodes()[0].velocity.length()
        };

        let near = push_at(50.0);
        assert!((near - 300.0 / 50.0).abs() < 1e-3, "push {}", near);
        assert!((near / push_at(100.0) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_spring_pulls_toward_rest_length() {
        let graph = GraphData {
            nodes: vec![
                person(1, Pos2::new(100.0, 300.0)),
                work(1, Pos2::new(700.0, 300.0)),
            ],
            edges: vec![link(NodeId::person(1), NodeId::work(1))],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        let (a, b) = (NodeId::person(1), NodeId::work(1));

        while !sim.is_settled() {
            sim.tick();
        }

        // Spring rest length 100, repulsion pushes slightly beyond it
        let d = distance(&sim, &a, &b);
        assert!(d > 80.0 && d < 250.0, "distance {}", d);
    }

    #[test]
    fn test_isolated_node_drifts_toward_center() {
        let graph = GraphData {
            nodes: vec![person(1, Pos2::new(50.0, 50.0))],
            edges: vec![],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        let start = (sim.nodes()[0].position - sim.center()).length();

        for _ in 0..50 {
            sim.tick();
        }

        let end = (sim.nodes()[0].position - sim.center()).length();
        assert!(end < start);
    }

    #[test]
    fn test_coincident_nodes_do_not_produce_nan() {
        let at = Pos2::new(400.0, 300.0);
        let graph = GraphData {
            nodes: vec![person(1, at), person(2, at), work(3, at)],
            edges: vec![link(NodeId::person(1), NodeId::work(3))],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);

        for _ in 0..20 {
            sim.tick();
        }

        for node in sim.nodes() {
            assert!(node.position.is_finite());
        }
        assert!(distance(&sim, &NodeId::person(1), &NodeId::person(2)) > 0.0);
        assert_eq!(sim.recoveries(), 0);
    }

    #[test]
    fn test_non_finite_state_is_recovered() {
        let graph = GraphData {
            nodes: vec![
                person(1, Pos2::new(300.0, 300.0)),
                person(2, Pos2::new(500.0, 300.0)),
            ],
            edges: vec![],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        if let Some(node) = sim.get_node_mut(&NodeId::person(1)) {
            node.position = Pos2::new(f32::NAN, 0.0);
        }
        if let Some(node) = sim.get_node_mut(&NodeId::person(2)) {
            node.velocity = Vec2::new(f32::INFINITY, 0.0);
        }

        sim.tick();

        for node in sim.nodes() {
            assert!(node.position.is_finite(), "{:?}", node.position);
            assert!(node.velocity.is_finite(), "{:?}", node.velocity);
        }
        assert!(sim.recoveries() >= 1);
    }

    #[test]
    fn test_alpha_decays_and_settles_within_bound() {
        let config = ForceConfig::default();
        let bound = config.ticks_to_settle();
        assert!(bound > 250 && bound < 350, "bound {}", bound);

        let graph = GraphData {
            nodes: (0..20)
                .map(|i| person(i, Pos2::new(300.0 + (i % 5) as f32 * 30.0, 200.0 + (i / 5) as f32 * 30.0)))
                .collect(),
            edges: (1..20)
                .map(|i| link(NodeId::person(0), NodeId::person(i)))
                .collect(),
        };
        let mut sim = ForceSimulation::new(graph, config, VIEWPORT);

        let mut previous_alpha = sim.alpha();
        while !sim.is_settled() {
            sim.tick();
            assert!(sim.alpha() < previous_alpha);
            previous_alpha = sim.alpha();
            assert!(sim.ticks() <= 500);
        }
        assert!(sim.ticks() <= bound);
    }

    #[test]
    fn test_empty_simulation_is_settled_after_tick() {
        let mut sim = ForceSimulation::new(GraphData::default(), ForceConfig::default(), VIEWPORT);
        assert!(sim.is_empty());
        sim.tick();
        assert!(sim.is_settled());
    }

    #[test]
    fn test_reheat_restarts_cooling() {
        let graph = GraphData {
            nodes: vec![person(1, Pos2::new(10.0, 10.0))],
            edges: vec![],
        };
        let mut sim = ForceSimulation::new(graph, ForceConfig::default(), VIEWPORT);
        while !sim.is_settled() {
            sim.tick();
        }
        sim.reheat();
        assert!(!sim.is_settled());
        assert_eq!(sim.alpha(), 1.0);
    }
}
