//! Closeness centrality with the Wasserman–Faust adjustment.
//!
//! For a student reaching `r` classmates with total hop distance `Σd`:
//!
//! ```text
//! C(v) = (r / Σd) · (r / (N − 1))
//! ```
//!
//! The first factor is classic closeness inside the student's own
//! component; the second scales it by the share of the class that is
//! reachable at all, so a tight pair in an otherwise empty class does not
//! outrank a well-connected student in a large group. On a connected graph
//! it reduces to `(N − 1) / Σd`. Isolated students score 0.

use std::collections::HashMap;

use tracing::instrument;

use crate::graph::normalize::{NormalizedGraph, UNREACHABLE};

/// Compute closeness centrality for every student, in `[0, 1]`.
#[must_use]
#[instrument(skip(ng))]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_centrality(ng: &NormalizedGraph) -> HashMap<String, f64> {
    let n = ng.node_count();
    let mut result = HashMap::with_capacity(n);

    for v in 0..n {
        let mut reachable = 0_usize;
        let mut distance_sum = 0_usize;

        if n > 1 && !ng.neighbors[v].is_empty() {
            for (u, &d) in ng.bfs_distances(v).iter().enumerate() {
                if u != v && d != UNREACHABLE {
                    reachable += 1;
                    distance_sum += d;
                }
            }
        }

        let score = if distance_sum == 0 {
            0.0
        } else {
            let r = reachable as f64;
            (r / distance_sum as f64) * (r / (n - 1) as f64)
        };
        result.insert(ng.student_id(v).to_string(), score);
    }

    result
}
