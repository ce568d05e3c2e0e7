//! Centrality metrics for the class network.
//!
//! # Overview
//!
//! Every metric reads the undirected simple view from
//! [`crate::graph::normalize`] and answers a different question about a
//! student's place in the class:
//!
//! - **Degree centrality** (`basic`): How many classmates is the student
//!   tied to, relative to the class size?
//! - **Betweenness centrality** (`betweenness`): Which students bridge
//!   otherwise separate friend groups?
//! - **Closeness centrality** (`closeness`): How few hops does it take the
//!   student to reach everyone they can reach?
//! - **Eigenvector centrality** (`eigenvector`): Which students are tied to
//!   other well-connected students?
//!
//! # Usage
//!
//! All metrics take a [`NormalizedGraph`] reference and return scores keyed
//! by student ID. Every score lies in `[0, 1]`.
//!
//! ```rust,ignore
//! use sociogram_analysis::metrics::compute_centrality;
//!
//! let scores = compute_centrality(&ng, &config.eigenvector);
//! let bridge = scores.betweenness["s-007"];
//! ```

pub mod basic;
pub mod betweenness;
pub mod closeness;
pub mod eigenvector;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sociogram_core::config::EigenvectorConfig;
use tracing::{debug, instrument};

use crate::graph::normalize::NormalizedGraph;

/// The four centrality scores of one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentCentrality {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub eigenvector: f64,
}

/// Centrality scores for a whole class, one map per metric.
#[derive(Debug, Clone, Default)]
pub struct CentralityScores {
    pub degree: HashMap<String, f64>,
    pub betweenness: HashMap<String, f64>,
    pub closeness: HashMap<String, f64>,
    pub eigenvector: HashMap<String, f64>,
}

impl CentralityScores {
    /// Scores of one student; 0 for any metric that has no entry.
    #[must_use]
    pub fn of(&self, student_id: &str) -> StudentCentrality {
        let get = |map: &HashMap<String, f64>| map.get(student_id).copied().unwrap_or(0.0);
        StudentCentrality {
            degree: get(&self.degree),
            betweenness: get(&self.betweenness),
            closeness: get(&self.closeness),
            eigenvector: get(&self.eigenvector),
        }
    }
}

/// Compute every centrality metric for `ng`.
#[must_use]
#[instrument(skip_all, fields(students = ng.node_count()))]
pub fn compute_centrality(ng: &NormalizedGraph, eigen: &EigenvectorConfig) -> CentralityScores {
    let ev = eigenvector::eigenvector_centrality(ng, eigen.max_iter, eigen.tolerance);
    debug!(
        iterations = ev.iterations,
        converged = ev.converged,
        "eigenvector centrality done"
    );

    CentralityScores {
        degree: basic::degree_centrality(ng),
        betweenness: betweenness::betweenness_centrality(ng),
        closeness: closeness::closeness_centrality(ng),
        eigenvector: ev.scores,
    }
}
