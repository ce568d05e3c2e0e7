//! Undirected simple view of the nomination multigraph.
//!
//! # Overview
//!
//! A nomination implies a social tie regardless of its direction, and two
//! nominations of the same pair are one tie for path purposes. This module
//! derives that view once per run:
//!
//! 1. **Direction dropped**: `A → B` and `B → A` both make A and B
//!    neighbors.
//! 2. **Parallel edges collapsed**: each neighbor appears once.
//!
//! Centrality, community detection, classification and network stats all
//! read [`NormalizedGraph::neighbors`]; raw degree and weights stay on the
//! original [`RawGraph`].

#![allow(clippy::module_name_repetitions)]

use std::collections::VecDeque;

use petgraph::{graph::NodeIndex, visit::EdgeRef};
use tracing::instrument;

use crate::graph::build::RawGraph;

/// Sentinel distance for nodes not reachable from the BFS source.
pub const UNREACHABLE: usize = usize::MAX;

/// The raw multigraph plus its undirected simple adjacency.
#[derive(Debug, Clone)]
pub struct NormalizedGraph {
    /// Original nomination multigraph.
    pub raw: RawGraph,
    /// `neighbors[i]` = sorted, deduplicated neighbor positions of node `i`.
    pub neighbors: Vec<Vec<usize>>,
    /// Number of distinct undirected ties.
    pub unique_edge_count: usize,
}

impl NormalizedGraph {
    /// Build the undirected view of `raw`.
    #[must_use]
    #[instrument(skip_all, fields(nodes = raw.node_count(), edges = raw.edge_count()))]
    pub fn from_raw(raw: RawGraph) -> Self {
        let n = raw.node_count();
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for edge in raw.graph.edge_references() {
            let u = edge.source().index();
            let v = edge.target().index();
            neighbors[u].push(v);
            neighbors[v].push(u);
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        // Every tie is listed from both ends.
        let unique_edge_count = neighbors.iter().map(Vec::len).sum::<usize>() / 2;

        Self {
            raw,
            neighbors,
            unique_edge_count,
        }
    }

    /// Number of students.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Unique-neighbor count of node `i`.
    #[must_use]
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors.get(i).map_or(0, Vec::len)
    }

    /// Whether nodes `u` and `v` share a tie.
    #[must_use]
    pub fn are_adjacent(&self, u: usize, v: usize) -> bool {
        self.neighbors
            .get(u)
            .is_some_and(|list| list.binary_search(&v).is_ok())
    }

    /// Student ID at position `i`.
    #[must_use]
    pub fn student_id(&self, i: usize) -> &str {
        self.raw
            .student_id(NodeIndex::new(i))
            .unwrap_or_default()
    }

    /// Student IDs in node order.
    #[must_use]
    pub fn student_ids(&self) -> Vec<&str> {
        self.raw.graph.node_weights().map(|s| s.id.as_str()).collect()
    }

    /// Hop distances from `source` to every node ([`UNREACHABLE`] if none).
    #[must_use]
    pub fn bfs_distances(&self, source: usize) -> Vec<usize> {
        let n = self.node_count();
        let mut dist = vec![UNREACHABLE; n];
        if source >= n {
            return dist;
        }
        dist[source] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            for &w in &self.neighbors[v] {
                if dist[w] == UNREACHABLE {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
            }
        }

        dist
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
