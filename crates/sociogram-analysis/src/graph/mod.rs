//! Nomination graph module.
//!
//! # Overview
//!
//! This module turns a roster and the extracted nominations into a
//! petgraph-based directed multigraph, derives the undirected simple view
//! every structural metric reads, and summarizes the class network.
//!
//! ## Pipeline
//!
//! ```text
//! roster + Vec<Nomination>
//!        ↓  build::RawGraph::from_roster()
//! RawGraph (DiGraph, parallel nominations kept)
//!        ↓  normalize::NormalizedGraph::from_raw()
//! NormalizedGraph (undirected, parallel edges collapsed)
//!        ↓  stats::NetworkStats::from_normalized()
//! NetworkStats (density, clustering, path length, …)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use sociogram_analysis::graph::{RawGraph, NormalizedGraph, NetworkStats};
//!
//! let mut warnings = Vec::new();
//! let raw = RawGraph::from_roster(&roster, &nominations, &mut warnings);
//! let ng = NormalizedGraph::from_raw(raw);
//! let stats = NetworkStats::from_normalized(&ng);
//!
//! println!("students={} ties={} density={:.3}",
//!     stats.total_students, ng.unique_edge_count, stats.density);
//! ```

pub mod build;
pub mod normalize;
pub mod stats;

// Re-export primary types at module level for convenience.
pub use build::{NominationEdge, RawGraph};
pub use normalize::NormalizedGraph;
pub use stats::NetworkStats;
