//! Degree counts and degree centrality.
//!
//! # Overview
//!
//! Two degree notions coexist and must not be confused:
//!
//! - **Raw degree** (in, out, total) counts nominations in the multigraph,
//!   parallel nominations included. `Σ out = Σ in = edge count`.
//! - **Connection count** counts unique neighbors in the undirected view.
//!   It drives degree centrality and the friendship-type buckets, and is
//!   never larger than the raw total degree.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::graph::normalize::NormalizedGraph;

// ---------------------------------------------------------------------------
// Degree counts
// ---------------------------------------------------------------------------

/// Per-student degree counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeCounts {
    /// Nominations received per student ID.
    pub in_degree: HashMap<String, usize>,
    /// Nominations given per student ID.
    pub out_degree: HashMap<String, usize>,
    /// `in + out` per student ID.
    pub total_degree: HashMap<String, usize>,
    /// Unique undirected neighbors per student ID.
    pub connections: HashMap<String, usize>,
}

/// Compute raw and unique-neighbor degrees for every student.
#[must_use]
pub fn degree_counts(ng: &NormalizedGraph) -> DegreeCounts {
    let n = ng.node_count();
    let mut in_degree = HashMap::with_capacity(n);
    let mut out_degree = HashMap::with_capacity(n);
    let mut total_degree = HashMap::with_capacity(n);
    let mut connections = HashMap::with_capacity(n);

    for i in 0..n {
        let idx = NodeIndex::new(i);
        let id = ng.student_id(i).to_string();
        let in_d = ng.raw.in_degree(idx);
        let out_d = ng.raw.out_degree(idx);

        in_degree.insert(id.clone(), in_d);
        out_degree.insert(id.clone(), out_d);
        total_degree.insert(id.clone(), in_d + out_d);
        connections.insert(id, ng.degree(i));
    }

    DegreeCounts {
        in_degree,
        out_degree,
        total_degree,
        connections,
    }
}

// ---------------------------------------------------------------------------
// Degree centrality
// ---------------------------------------------------------------------------

/// Degree centrality: unique neighbors / (N − 1).
///
/// Zero for isolated students and for rosters of one student or fewer.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(ng: &NormalizedGraph) -> HashMap<String, f64> {
    let n = ng.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };

    (0..n)
        .map(|i| (ng.student_id(i).to_string(), ng.degree(i) as f64 * scale))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
