//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a student lies on shortest paths between
//! two other students. High-betweenness students are bridges between
//! friend groups; removing them would split the class.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs, run on the undirected view:
//!
//! 1. For each source `s`, BFS to count shortest paths (`sigma`) and
//!    record predecessors.
//! 2. Accumulate dependencies in reverse BFS order (farthest first).
//! 3. Sum dependencies over all sources.
//!
//! Complexity: O(V · E).
//!
//! # Normalization
//!
//! Each unordered pair is visited from both ends, so the raw sum is twice
//! the undirected betweenness. Dividing by `(N − 1)(N − 2)` both halves it
//! and normalizes by the maximum `(N − 1)(N − 2)/2`, giving values in
//! `[0, 1]`. Rosters of two or fewer students score 0 everywhere.

use std::collections::{HashMap, VecDeque};

use tracing::instrument;

use crate::graph::normalize::NormalizedGraph;

/// Compute normalized betweenness centrality for every student.
///
/// # Returns
///
/// A `HashMap<String, f64>` mapping each student ID to its score in
/// `[0, 1]`. Isolated students and students on no shortest path score 0.
#[must_use]
#[instrument(skip(ng))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(ng: &NormalizedGraph) -> HashMap<String, f64> {
    let n = ng.node_count();

    if n == 0 {
        return HashMap::new();
    }

    let cb = raw_betweenness(ng);

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        0.0
    };

    cb.iter()
        .enumerate()
        .map(|(i, &score)| (ng.student_id(i).to_string(), (score * scale).clamp(0.0, 1.0)))
        .collect()
}

/// Unnormalized Brandes accumulator, indexed by node position.
fn raw_betweenness(ng: &NormalizedGraph) -> Vec<f64> {
    let n = ng.node_count();
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in 0..n {
        // Isolated sources contribute nothing.
        if ng.neighbors[s].is_empty() {
            continue;
        }

        // Stack: nodes in order of discovery (farthest popped first).
        let mut stack: Vec<usize> = Vec::with_capacity(n);

        // predecessors[w] = nodes immediately preceding w on shortest
        // paths from s.
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[s] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[s] = 0;

        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);

            for &w in &ng.neighbors[v] {
                // First visit to w?
                if dist[w] < 0 {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }

                // Shortest path to w via v?
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Accumulate dependencies in reverse BFS order.
        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                if sigma[w] > 0.0 {
                    delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
                }
            }

            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    cb
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::normalized;

    #[test]
    fn empty_graph_returns_empty() {
        let bc = betweenness_centrality(&normalized(&[], &[]));
        assert!(bc.is_empty());
    }

    #[test]
    fn single_node_zero_betweenness() {
        let bc = betweenness_centrality(&normalized(&["A"], &[]));
        assert_eq!(bc.get("A"), Some(&0.0));
    }

    #[test]
    fn pair_has_zero_betweenness() {
        let bc = betweenness_centrality(&normalized(&["A", "B"], &[("A", "B")]));
        assert_eq!(bc["A"], 0.0);
        assert_eq!(bc["B"], 0.0);
    }

    #[test]
    fn linear_chain_middle_node_is_maximal() {
        // A - B - C: B is on the only A..C path.
        let bc = betweenness_centrality(&normalized(&["A", "B", "C"], &[("A", "B"), ("C", "B")]));

        assert!((bc["A"] - 0.0).abs() < 1e-10);
        assert!((bc["B"] - 1.0).abs() < 1e-10, "got {}", bc["B"]);
        assert!((bc["C"] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn direction_does_not_matter() {
        let forward = betweenness_centrality(&normalized(&["A", "B", "C"], &[("A", "B"), ("B", "C")]));
        let backward = betweenness_centrality(&normalized(&["A", "B", "C"], &[("B", "A"), ("C", "B")]));
        assert!((forward["B"] - backward["B"]).abs() < 1e-10);
    }

    #[test]
    fn star_center_is_one_leaves_zero() {
        let bc = betweenness_centrality(&normalized(
            &["hub", "a", "b", "c"],
            &[("a", "hub"), ("b", "hub"), ("c", "hub")],
        ));
        assert!((bc["hub"] - 1.0).abs() < 1e-10);
        for id in ["a", "b", "c"] {
            assert!((bc[id] - 0.0).abs() < 1e-10, "{id} should be 0");
        }
    }

    #[test]
    fn square_splits_paths_evenly() {
        // 4-cycle A - B - D - C - A: the two A..D paths split between B
        // and C, the two B..C paths split between A and D.
        let bc = betweenness_centrality(&normalized(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        ));
        // Each node lies on half the paths of the one opposite pair: 0.5 / 3.
        for id in ["A", "B", "C", "D"] {
            assert!((bc[id] - 0.5 / 3.0).abs() < 1e-10, "{id}: {}", bc[id]);
        }
    }

    #[test]
    fn chain_of_four_betweenness() {
        // A - B - C - D: B on A..C, A..D → 2 of 3 pairs.
        let bc = betweenness_centrality(&normalized(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "D")],
        ));
        assert!((bc["B"] - 2.0 / 3.0).abs() < 1e-10, "got {}", bc["B"]);
        assert!((bc["C"] - 2.0 / 3.0).abs() < 1e-10, "got {}", bc["C"]);
        assert!((bc["A"] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn disconnected_components_no_cross_betweenness() {
        let bc = betweenness_centrality(&normalized(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("C", "D")],
        ));
        for id in ["A", "B", "C", "D"] {
            assert!((bc[id] - 0.0).abs() < 1e-10, "{id} should be 0");
        }
    }

    #[test]
    fn parallel_nominations_do_not_inflate_paths() {
        let single = betweenness_centrality(&normalized(&["A", "B", "C"], &[("A", "B"), ("B", "C")]));
        let doubled = betweenness_centrality(&normalized(
            &["A", "B", "C"],
            &[("A", "B"), ("A", "B"), ("B", "C"), ("C", "B")],
        ));
        assert!((single["B"] - doubled["B"]).abs() < 1e-10);
    }
}
