//! Graph construction from a roster and extracted nominations.
//!
//! # Overview
//!
//! Every roster student becomes a node, in roster order, whether or not
//! anyone nominated them. Zero-degree students must be present so they can
//! be classified as isolated.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A nominated B".
//!
//! ## Parallel Edges
//!
//! Repeated nominations of the same ordered pair (two questions both naming
//! the same peer) are kept as separate edges. Raw in/out degree and weight
//! are additive over them; the undirected view in
//! [`crate::graph::normalize`] collapses them.
//!
//! ## Validation
//!
//! Self-nominations and nominations with an endpoint outside the roster are
//! dropped and reported as [`DataWarning`]s. Cross-class nominations are
//! out of scope for a single-class build.
//!
//! ## Fingerprint
//!
//! [`RawGraph::content_hash`] is a BLAKE3 hash of the roster ids and the
//! validated edge list. Identical input always yields the same hash.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use sociogram_core::{DataWarning, Nomination, Student};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// RawGraph
// ---------------------------------------------------------------------------

/// Payload of a nomination edge.
#[derive(Debug, Clone, PartialEq)]
pub struct NominationEdge {
    pub weight: f64,
    pub relation: String,
}

/// A directed, weighted nomination multigraph for one period.
///
/// Node indices follow roster order (after duplicate ids are collapsed),
/// so `NodeIndex::index()` is the student's roster position.
#[derive(Debug, Clone)]
pub struct RawGraph {
    /// Directed multigraph: nodes = students, edges = validated nominations.
    pub graph: DiGraph<Student, NominationEdge>,
    /// Mapping from student ID to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of roster and edges.
    pub content_hash: String,
}

impl RawGraph {
    /// Build the graph for `roster` from `nominations`.
    ///
    /// Invalid nominations are skipped and a warning is pushed onto
    /// `warnings` for each one. A student listed twice on the roster keeps
    /// its first entry.
    #[instrument(skip_all, fields(students = roster.len(), nominations = nominations.len()))]
    pub fn from_roster(
        roster: &[Student],
        nominations: &[Nomination],
        warnings: &mut Vec<DataWarning>,
    ) -> Self {
        let mut graph = DiGraph::<Student, NominationEdge>::with_capacity(
            roster.len(),
            nominations.len(),
        );
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(roster.len());

        for student in roster {
            if node_map.contains_key(&student.id) {
                warnings.push(DataWarning::DuplicateRosterEntry {
                    student: student.id.clone(),
                });
                continue;
            }
            let idx = graph.add_node(student.clone());
            node_map.insert(student.id.clone(), idx);
        }

        let mut dropped = 0_usize;
        for nomination in nominations {
            if nomination.nominator == nomination.nominee {
                warnings.push(DataWarning::SelfNomination {
                    student: nomination.nominator.clone(),
                });
                dropped += 1;
                continue;
            }

            let source = node_map.get(&nomination.nominator).copied();
            let target = node_map.get(&nomination.nominee).copied();
            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    &nomination.nominator
                } else {
                    &nomination.nominee
                };
                warnings.push(DataWarning::DanglingReference {
                    nominator: nomination.nominator.clone(),
                    nominee: nomination.nominee.clone(),
                    missing: missing.clone(),
                });
                dropped += 1;
                continue;
            };

            graph.add_edge(
                source,
                target,
                NominationEdge {
                    weight: nomination.weight,
                    relation: nomination.relation.clone(),
                },
            );
        }

        let content_hash = compute_content_hash(&graph);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped,
            "nomination graph built"
        );

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of nodes (students) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (validated nominations) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a student ID.
    #[must_use]
    pub fn node_index(&self, student_id: &str) -> Option<NodeIndex> {
        self.node_map.get(student_id).copied()
    }

    /// Return the student stored at a node.
    #[must_use]
    pub fn student(&self, idx: NodeIndex) -> Option<&Student> {
        self.graph.node_weight(idx)
    }

    /// Return the student ID label for a node.
    #[must_use]
    pub fn student_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|s| s.id.as_str())
    }

    /// Nominations received, counting parallel edges.
    #[must_use]
    pub fn in_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Nominations given, counting parallel edges.
    #[must_use]
    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Outgoing).count()
    }

    /// Iterate over `(nominator, nominee, edge)` in insertion order.
    pub fn nominations(&self) -> impl Iterator<Item = (&str, &str, &NominationEdge)> + '_ {
        self.graph.edge_references().filter_map(|e| {
            let source = self.student_id(e.source())?;
            let target = self.student_id(e.target())?;
            Some((source, target, e.weight()))
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash of node ids followed by the edge list.
fn compute_content_hash(graph: &DiGraph<Student, NominationEdge>) -> String {
    let mut hasher = blake3::Hasher::new();
    for student in graph.node_weights() {
        hasher.update(student.id.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for edge in graph.edge_references() {
        let source = &graph[edge.source()].id;
        let target = &graph[edge.target()].id;
        hasher.update(source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(target.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&edge.weight().weight.to_le_bytes());
        hasher.update(edge.weight().relation.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
