//! Community detection on the undirected view.
//!
//! # Strategies
//!
//! - [`CommunityStrategy::Components`] (default): each connected component
//!   is one community. Isolated students are singleton communities.
//! - [`CommunityStrategy::LabelPropagation`]: every student starts with its
//!   own label and, sweeping in roster order, adopts the label most common
//!   among its neighbors. A student keeps its current label when that label
//!   is among the most common ones; otherwise the smallest tied label wins.
//!   Sweeps stop when nothing changes or after `max_iterations`.
//!
//! Both strategies relabel densely (0, 1, 2 …) in order of each
//! community's first roster member, so identical input always yields
//! identical ids.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use sociogram_core::config::{CommunityConfig, CommunityStrategy};
use tracing::{debug, instrument};

use crate::graph::normalize::NormalizedGraph;

/// One detected community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Community {
    pub id: usize,
    /// Member student IDs in roster order.
    pub members: Vec<String>,
}

/// Output of a community detection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityResult {
    pub strategy: CommunityStrategy,
    /// Communities ordered by id.
    pub communities: Vec<Community>,
    /// Student ID → community id.
    pub assignments: HashMap<String, usize>,
    /// Label-propagation sweeps performed (0 for components).
    pub iterations: usize,
}

impl CommunityResult {
    /// Community id of `student_id`, if the student is on the roster.
    #[must_use]
    pub fn of(&self, student_id: &str) -> Option<usize> {
        self.assignments.get(student_id).copied()
    }

    /// Number of communities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.communities.len()
    }
}

/// Partition the class into communities using the configured strategy.
#[must_use]
#[instrument(skip(ng), fields(students = ng.node_count()))]
pub fn detect_communities(ng: &NormalizedGraph, config: &CommunityConfig) -> CommunityResult {
    let (labels, iterations) = match config.strategy {
        CommunityStrategy::Components => (component_labels(ng), 0),
        CommunityStrategy::LabelPropagation => propagate_labels(ng, config.max_iterations),
    };

    let dense = relabel_dense(&labels);
    let result = assemble(ng, config.strategy, &dense, iterations);
    debug!(communities = result.count(), iterations, "communities detected");
    result
}

/// BFS component labels; a component is labeled by its first node.
fn component_labels(ng: &NormalizedGraph) -> Vec<usize> {
    let n = ng.node_count();
    let mut labels = vec![usize::MAX; n];
    let mut queue = VecDeque::new();

    for start in 0..n {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = start;
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            for &w in &ng.neighbors[v] {
                if labels[w] == usize::MAX {
                    labels[w] = start;
                    queue.push_back(w);
                }
            }
        }
    }

    labels
}

/// Asynchronous label propagation in roster order.
fn propagate_labels(ng: &NormalizedGraph, max_iterations: usize) -> (Vec<usize>, usize) {
    let n = ng.node_count();
    let mut labels: Vec<usize> = (0..n).collect();
    let mut iterations = 0;
    let mut counts: HashMap<usize, usize> = HashMap::new();

    while iterations < max_iterations {
        iterations += 1;
        let mut changed = false;

        for v in 0..n {
            let nbrs = &ng.neighbors[v];
            if nbrs.is_empty() {
                continue;
            }

            counts.clear();
            for &u in nbrs {
                *counts.entry(labels[u]).or_insert(0) += 1;
            }
            let best = counts.values().copied().max().unwrap_or(0);

            let current = labels[v];
            if counts.get(&current).copied() == Some(best) {
                continue;
            }
            let Some(next) = counts
                .iter()
                .filter(|&(_, &c)| c == best)
                .map(|(&label, _)| label)
                .min()
            else {
                continue;
            };

            labels[v] = next;
            changed = true;
        }

        if !changed {
            break;
        }
    }

    (labels, iterations)
}

/// Map arbitrary labels to 0, 1, 2 … in order of first appearance.
fn relabel_dense(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

fn assemble(
    ng: &NormalizedGraph,
    strategy: CommunityStrategy,
    dense: &[usize],
    iterations: usize,
) -> CommunityResult {
    let count = dense.iter().copied().max().map_or(0, |m| m + 1);
    let mut communities: Vec<Community> = (0..count)
        .map(|id| Community {
            id,
            members: Vec::new(),
        })
        .collect();
    let mut assignments = HashMap::with_capacity(dense.len());

    for (i, &cid) in dense.iter().enumerate() {
        let id = ng.student_id(i).to_string();
        communities[cid].members.push(id.clone());
        assignments.insert(id, cid);
    }

    CommunityResult {
        strategy,
        communities,
        assignments,
        iterations,
    }
}
