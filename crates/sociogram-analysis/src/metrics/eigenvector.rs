//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores students by the idea that being named by
//! well-connected classmates counts for more than being named by
//! peripheral ones. It is the dominant eigenvector of the adjacency matrix
//! of the undirected view.
//!
//! # Algorithm
//!
//! Power iteration on `A + I`:
//!
//! 1. Initialize scores uniformly.
//! 2. For each node `v`: `score(v) = score(v) + Σ score(u)` over neighbors `u`.
//! 3. Normalize the score vector to unit L2 norm.
//! 4. Repeat until convergence or max iterations.
//!
//! The identity shift leaves the eigenvectors unchanged but stops the
//! iteration from oscillating on bipartite graphs (a star, a chain), which
//! plain `A` does. Every component of a unit vector lies in `[0, 1]`.
//!
//! Isolated students score 0. A class with no ties at all scores 0
//! everywhere.

use std::collections::HashMap;

use tracing::{instrument, warn};

use crate::graph::normalize::NormalizedGraph;

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: student ID → score.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

/// Compute eigenvector centrality for every student.
///
/// # Arguments
///
/// * `ng`: The undirected view.
/// * `max_iter`: Maximum number of iterations.
/// * `tolerance`: Convergence threshold: stop when the L2 norm of the
///   change in scores is below this value.
#[must_use]
#[instrument(skip(ng))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(
    ng: &NormalizedGraph,
    max_iter: usize,
    tolerance: f64,
) -> EigenvectorResult {
    let n = ng.node_count();

    if ng.unique_edge_count == 0 {
        return EigenvectorResult {
            scores: (0..n).map(|i| (ng.student_id(i).to_string(), 0.0)).collect(),
            iterations: 0,
            converged: true,
        };
    }

    // Isolated nodes never exchange mass; keep them out of the iteration
    // so the remaining vector is not diluted.
    let connected: Vec<bool> = (0..n).map(|i| ng.degree(i) > 0).collect();
    let active = connected.iter().filter(|&&c| c).count();

    let init_val = 1.0 / (active as f64).sqrt();
    let mut scores: Vec<f64> = connected
        .iter()
        .map(|&c| if c { init_val } else { 0.0 })
        .collect();

    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..max_iter {
        iterations = iter + 1;

        let mut new_scores = scores.clone();

        for (v, nbrs) in ng.neighbors.iter().enumerate() {
            for &u in nbrs {
                new_scores[v] += scores[u];
            }
        }

        // Normalize to unit L2 norm.
        let norm: f64 = new_scores.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut new_scores {
                *x /= norm;
            }
        }

        // Check convergence.
        let diff: f64 = scores
            .iter()
            .zip(new_scores.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt();

        scores = new_scores;

        if diff < tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(iterations, "eigenvector centrality did not converge");
    }

    EigenvectorResult {
        scores: scores
            .iter()
            .enumerate()
            .map(|(i, &s)| (ng.student_id(i).to_string(), s.clamp(0.0, 1.0)))
            .collect(),
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
