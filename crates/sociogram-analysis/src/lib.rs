#![forbid(unsafe_code)]
//! sociogram-analysis library.
//!
//! Turns one class's peer-nomination survey into a social graph and
//! derives per-student and per-class metrics from it: centrality scores,
//! community membership, friendship-type buckets and network statistics.
//! Periods can be analyzed one at a time, as a trend, or compared.
//!
//! # Conventions
//!
//! - **Errors**: fatal failures are [`sociogram_core::AnalysisError`];
//!   recoverable data problems are returned as
//!   [`sociogram_core::DataWarning`]s next to the result.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod classify;
pub mod community;
pub mod compare;
pub mod extract;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod trend;

pub use classify::{FriendshipDistribution, FriendshipType};
pub use community::{Community, CommunityResult};
pub use compare::{PeriodComparison, StudentPeriodSnapshot, compare_periods};
pub use pipeline::{
    AnalysisOutcome, NetworkAnalysisResult, NetworkAnalyzer, NetworkData, NetworkEdge,
    NetworkNode, StudentMetrics, analyze_snapshot,
};
pub use trend::{PeriodStatus, TrendEntry, TrendSeries};
