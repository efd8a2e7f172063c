//! Graph Adapter - derives nodes and edges from an entity snapshot
//!
//! Pure function of its inputs. Node order is persons then works, in input
//! order. Edge order is person→work edges sorted by (person, work) input
//! position, followed by work→work edges in work order.
//!
//! # Relation rules
//!
//! A person is linked to a work when the work lists them as a creator,
//! *else if* the work is a film whose cast contains them. The creator rule
//! wins, so a person credited as both yields exactly one edge.
//!
//! Every id in a work's related-works list yields one work→work edge
//! labeled by the source work's kind. Ids with no node in the snapshot are
//! skipped.
//!
//! # Complexity
//!
//! [`GraphAdapter::build_graph`] indexes works and persons by id first and
//! walks each relation list once: O(P + W + R log R) for R relations.
//! [`GraphAdapter::build_graph_pairwise`] tests every person against every
//! work, O(P·W); it is kept as a reference and only suits datasets of a few
//! hundred entities.

use ontograph_types::{EntityId, Person, Work, WorkType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::types::{EdgeRelation, GraphData, GraphEdge, GraphNode, NodeId};

// =============================================================================
// LABEL VOCABULARY
// =============================================================================

/// Edge label vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeLabels {
    /// Person → work they created
    pub created: String,
    /// Person → film they appear in
    pub acted_in: String,
    /// Film → related work
    pub film_related: String,
    /// Book or painting → related work
    pub related: String,
}

impl Default for EdgeLabels {
    fn default() -> Self {
        Self {
            created: "created".to_string(),
            acted_in: "acted in".to_string(),
            film_related: "adaptation".to_string(),
            related: "theme/inspiration".to_string(),
        }
    }
}

impl EdgeLabels {
    /// Label for a relation; related-work labels depend on the source kind
    pub fn label_for(&self, relation: EdgeRelation, source_kind: Option<WorkType>) -> &str {
        match (relation, source_kind) {
            (EdgeRelation::Created, _) => &self.created,
            (EdgeRelation::ActedIn, _) => &self.acted_in,
            (EdgeRelation::Related, Some(WorkType::Film)) => &self.film_related,
            (EdgeRelation::Related, _) => &self.related,
        }
    }
}

// =============================================================================
// ADAPTER
// =============================================================================

/// Builds [`GraphData`] from persons and works
#[derive(Debug, Clone, Default)]
pub struct GraphAdapter {
    pub labels: EdgeLabels,
}

/// Build with the default label vocabulary
pub fn build_graph(persons: &[Person], works: &[Work]) -> GraphData {
    GraphAdapter::default().build_graph(persons, works)
}

impl GraphAdapter {
    pub fn new(labels: EdgeLabels) -> Self {
        Self { labels }
    }

    /// Id-indexed construction, O(P + W + R log R)
    pub fn build_graph(&self, persons: &[Person], works: &[Work]) -> GraphData {
        let persons = unique_by_id(persons, |p| p.id, "person");
        let works = unique_by_id(works, |w| w.id, "work");

        let person_index: HashMap<EntityId, usize> =
            persons.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        // (person position, work position) -> relation; sorted iteration
        // gives persons-then-works order
        let mut links: BTreeMap<(usize, usize), EdgeRelation> = BTreeMap::new();
        for (w, work) in works.iter().enumerate() {
            for pid in &work.creator_ids {
                match person_index.get(pid) {
                    Some(&p) => {
                        links.insert((p, w), EdgeRelation::Created);
                    }
                    None => tracing::trace!("work {} creator {} not in snapshot", work.id, pid),
                }
            }
            for pid in work.actor_ids() {
                match person_index.get(pid) {
                    Some(&p) => {
                        links.entry((p, w)).or_insert(EdgeRelation::ActedIn);
                    }
                    None => tracing::trace!("work {} actor {} not in snapshot", work.id, pid),
                }
            }
        }

        let mut edges: Vec<GraphEdge> = links
            .into_iter()
            .map(|((p, w), relation)| self.person_edge(persons[p], works[w], relation))
            .collect();
        edges.extend(self.related_edges(&works));

        assemble(&persons, &works, edges)
    }

    /// Pairwise construction, O(P·W). Same output as [`Self::build_graph`].
    pub fn build_graph_pairwise(&self, persons: &[Person], works: &[Work]) -> GraphData {
        let persons = unique_by_id(persons, |p| p.id, "person");
        let works = unique_by_id(works, |w| w.id, "work");

        let mut edges = Vec::new();
        for person in &persons {
            for work in &works {
                let relation = if work.is_created_by(person.id) {
                    Some(EdgeRelation::Created)
                } else if work.work_type() == WorkType::Film && work.actor_ids().contains(&person.id)
                {
                    Some(EdgeRelation::ActedIn)
                } else {
                    None
                };
                if let Some(relation) = relation {
                    edges.push(self.person_edge(person, work, relation));
                }
            }
        }
        edges.extend(self.related_edges(&works));

        assemble(&persons, &works, edges)
    }

    fn person_edge(&self, person: &Person, work: &Work, relation: EdgeRelation) -> GraphEdge {
        GraphEdge {
            source: NodeId::person(person.id),
            target: NodeId::work(work.id),
            relation,
            label: self.labels.label_for(relation, None).to_string(),
        }
    }

    /// Work → related-work edges, skipping dangling ids and self references
    fn related_edges(&self, works: &[&Work]) -> Vec<GraphEdge> {
        let present: HashSet<EntityId> = works.iter().map(|w| w.id).collect();
        let mut edges = Vec::new();
        for work in works {
            let label = self
                .labels
                .label_for(EdgeRelation::Related, Some(work.work_type()));
            for &related in &work.related_work_ids {
                if related == work.id {
                    tracing::trace!("work {} lists itself as related", work.id);
                    continue;
                }
                if !present.contains(&related) {
                    tracing::debug!("work {} related work {} not in snapshot", work.id, related);
                    continue;
                }
                edges.push(GraphEdge {
                    source: NodeId::work(work.id),
                    target: NodeId::work(related),
                    relation: EdgeRelation::Related,
                    label: label.to_string(),
                });
            }
        }
        edges
    }
}

fn assemble(persons: &[&Person], works: &[&Work], edges: Vec<GraphEdge>) -> GraphData {
    let nodes = persons
        .iter()
        .map(|p| GraphNode::from_person(p))
        .chain(works.iter().map(|w| GraphNode::from_work(w)))
        .collect();
    GraphData { nodes, edges }
}

/// First occurrence of each id wins; later duplicates are dropped
fn unique_by_id<'a, T>(
    items: &'a [T],
    id: impl Fn(&T) -> EntityId,
    kind: &str,
) -> Vec<&'a T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| {
            let fresh = seen.insert(id(*item));
            if !fresh {
                tracing::warn!("duplicate {} id {} dropped", kind, id(*item));
            }
            fresh
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
