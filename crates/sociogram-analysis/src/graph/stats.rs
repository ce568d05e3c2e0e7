//! Class-level network statistics.
//!
//! # Statistics Provided
//!
//! All structural figures use the undirected simple view, the same view
//! centrality and classification read. `E_u` below is the number of
//! distinct undirected ties.
//!
//! - **total_students**: roster size `N`.
//! - **total_relationships**: validated nominations in the raw multigraph
//!   (parallel nominations counted).
//! - **average_degree**: `2·E_u / N`; 0 for an empty roster.
//! - **density**: `2·E_u / (N·(N − 1))`; 0 for `N < 2`.
//! - **clustering_coefficient**: mean local clustering coefficient over all
//!   students. Students with fewer than two neighbors contribute 0.
//! - **average_path_length**: mean hop distance over connected ordered
//!   pairs. Disconnected pairs are excluded; 0 when no pair is connected.
//! - **disconnected_pair_fraction**: share of ordered pairs with no path,
//!   to interpret `average_path_length` on fragmented classes.
//! - **component_count**: connected components, isolated students included.

use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::graph::normalize::{NormalizedGraph, UNREACHABLE};

// ---------------------------------------------------------------------------
// NetworkStats
// ---------------------------------------------------------------------------

/// Summary statistics for one class network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_students: usize,
    pub total_relationships: usize,
    pub average_degree: f64,
    pub density: f64,
    pub clustering_coefficient: f64,
    pub average_path_length: f64,
    pub disconnected_pair_fraction: f64,
    pub component_count: usize,
}

impl NetworkStats {
    /// Compute statistics from a [`NormalizedGraph`].
    #[must_use]
    #[instrument(skip_all)]
    pub fn from_normalized(ng: &NormalizedGraph) -> Self {
        let n = ng.node_count();
        let (average_path_length, disconnected_pair_fraction) = path_length_summary(ng);

        Self {
            total_students: n,
            total_relationships: ng.raw.edge_count(),
            average_degree: average_degree(n, ng.unique_edge_count),
            density: undirected_density(n, ng.unique_edge_count),
            clustering_coefficient: average_clustering(ng),
            average_path_length,
            disconnected_pair_fraction,
            // Directed graph components are weak components, i.e. the
            // undirected view's components.
            component_count: connected_components(&ng.raw.graph),
        }
    }

    /// Return `true` if nobody nominated anybody.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.total_relationships == 0
    }
}

/// Local clustering coefficient of node `v`: the fraction of its neighbor
/// pairs that are themselves tied.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn local_clustering(ng: &NormalizedGraph, v: usize) -> f64 {
    let neighbors = &ng.neighbors[v];
    let k = neighbors.len();
    if k < 2 {
        return 0.0;
    }

    let mut closed = 0_usize;
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[i + 1..] {
            if ng.are_adjacent(a, b) {
                closed += 1;
            }
        }
    }

    let pairs = k * (k - 1) / 2;
    closed as f64 / pairs as f64
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn undirected_density(node_count: usize, unique_edges: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    2.0 * unique_edges as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn average_degree(node_count: usize, unique_edges: usize) -> f64 {
    if node_count == 0 {
        return 0.0_f64;
    }
    2.0 * unique_edges as f64 / node_count as f64
}

#[allow(clippy::cast_precision_loss)]
fn average_clustering(ng: &NormalizedGraph) -> f64 {
    let n = ng.node_count();
    if n == 0 {
        return 0.0_f64;
    }
    let total: f64 = (0..n).map(|v| local_clustering(ng, v)).sum();
    total / n as f64
}

/// Returns `(average_path_length, disconnected_pair_fraction)`.
#[allow(clippy::cast_precision_loss)]
fn path_length_summary(ng: &NormalizedGraph) -> (f64, f64) {
    let n = ng.node_count();
    if n < 2 {
        return (0.0, 0.0);
    }

    let mut distance_sum = 0_usize;
    let mut connected_pairs = 0_usize;

    for source in 0..n {
        for (target, &d) in ng.bfs_distances(source).iter().enumerate() {
            if target != source && d != UNREACHABLE {
                distance_sum += d;
                connected_pairs += 1;
            }
        }
    }

    let ordered_pairs = n * (n - 1);
    let disconnected = (ordered_pairs - connected_pairs) as f64 / ordered_pairs as f64;
    let average = if connected_pairs == 0 {
        0.0
    } else {
        distance_sum as f64 / connected_pairs as f64
    };
    (average, disconnected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
