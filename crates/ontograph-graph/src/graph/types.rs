//! Core types for the ontology graph
//!
//! Nodes and edges are derived from an entity snapshot on every adapter run
//! and replaced wholesale on the next one.

use egui::{Pos2, Rect, Vec2};
use ontograph_types::{EntityId, Person, Work, WorkType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// NODE IDENTITY
// =============================================================================

/// Composite node id: source kind + source id.
///
/// Person and work ids share the same numeric space, so the prefix is what
/// keeps `person:1` and `work:1` apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    pub fn person(id: EntityId) -> Self {
        Self(format!("person:{}", id))
    }

    pub fn work(id: EntityId) -> Self {
        Self(format!("work:{}", id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Node kind, used for color/shape encoding and the details panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Person,
    Film,
    Book,
    Painting,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Person => "Person",
            NodeKind::Film => "Film",
            NodeKind::Book => "Book",
            NodeKind::Painting => "Painting",
        }
    }

    pub fn is_work(&self) -> bool {
        !matches!(self, NodeKind::Person)
    }
}

impl From<WorkType> for NodeKind {
    fn from(t: WorkType) -> Self {
        match t {
            WorkType::Film => NodeKind::Film,
            WorkType::Book => NodeKind::Book,
            WorkType::Painting => NodeKind::Painting,
        }
    }
}

/// Source entity a node was derived from
#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Person(Arc<Person>),
    Work(Arc<Work>),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Person(_) => NodeKind::Person,
            NodePayload::Work(work) => work.work_type().into(),
        }
    }
}

// =============================================================================
// NODES & EDGES
// =============================================================================

/// A positioned node in simulation space
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    /// Current position (updated by the layout engine)
    pub position: Pos2,
    /// Current velocity (updated by the layout engine)
    pub velocity: Vec2,
    pub payload: NodePayload,
}

impl GraphNode {
    pub fn from_person(person: &Person) -> Self {
        Self {
            id: NodeId::person(person.id),
            label: person.name.clone(),
            kind: NodeKind::Person,
            position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            payload: NodePayload::Person(Arc::new(person.clone())),
        }
    }

    pub fn from_work(work: &Work) -> Self {
        Self {
            id: NodeId::work(work.id),
            label: work.title.clone(),
            kind: work.work_type().into(),
            position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            payload: NodePayload::Work(Arc::new(work.clone())),
        }
    }

    /// Builder: set position
    pub fn with_position(mut self, pos: Pos2) -> Self {
        self.position = pos;
        self
    }
}

/// Which relation produced an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeRelation {
    /// Person is in the work's creator list
    Created,
    /// Person is in a film's cast (and not a creator)
    ActedIn,
    /// Work lists the target in its related works
    Related,
}

/// A labeled relation between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: EdgeRelation,
    pub label: String,
}

// =============================================================================
// GRAPH
// =============================================================================

/// Node and edge sets produced by the graph adapter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Edges touching a node
    pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source.as_str() == id || e.target.as_str() == id)
    }
}

/// Bounding box of a set of positions, `None` when empty
pub fn bounds_of(positions: impl IntoIterator<Item = Pos2>) -> Option<Rect> {
    let mut iter = positions.into_iter();
    let first = iter.next()?;
    Some(iter.fold(Rect::from_min_max(first, first), |rect, p| {
        rect.union(Rect::from_min_max(p, p))
    }))
}
