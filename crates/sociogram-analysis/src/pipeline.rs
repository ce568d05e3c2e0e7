//! End-to-end analysis of one class for one period.
//!
//! # Stages
//!
//! ```text
//! ResponseRecord[] ──extract──▶ Nomination[] ──build──▶ RawGraph
//!     ──normalize──▶ NormalizedGraph ──┬─▶ centrality
//!                                      ├─▶ communities
//!                                      ├─▶ classification
//!                                      └─▶ network stats
//! ```
//!
//! [`analyze_snapshot`] runs the stages over data already in memory.
//! [`NetworkAnalyzer`] fetches the roster and responses through the
//! provider traits first. Cancellation is checked between stages; a
//! cancelled run returns [`AnalysisError::Cancelled`] and nothing else.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use sociogram_core::{
    AnalysisConfig, AnalysisError, CancellationFlag, ClassScope, DataWarning, ResponseProvider,
    ResponseRecord, RosterProvider, Student,
};
use tracing::{info, instrument, warn};

use crate::classify::{FriendshipDistribution, FriendshipType, classify};
use crate::community::detect_communities;
use crate::extract::extract_nominations;
use crate::graph::{NetworkStats, NormalizedGraph, RawGraph};
use crate::metrics::{StudentCentrality, basic::degree_counts, compute_centrality};
use crate::trend::{TrendSeries, run_periods};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything computed for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentMetrics {
    pub student_id: String,
    pub name: String,
    /// Nominations received (parallel nominations counted).
    pub in_degree: usize,
    /// Nominations given (parallel nominations counted).
    pub out_degree: usize,
    pub total_degree: usize,
    /// Unique classmates tied to the student in either direction.
    pub connection_count: usize,
    /// Those classmates' IDs, sorted.
    pub neighbors: Vec<String>,
    pub centrality: StudentCentrality,
    pub community_id: usize,
    pub friendship_type: FriendshipType,
}

/// Node entry of the exported network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub class: String,
    pub friendship_type: FriendshipType,
    /// Degree centrality.
    pub centrality: f64,
    pub community: usize,
    pub connection_count: usize,
}

/// Edge entry of the exported network; one per validated nomination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub relationship_type: String,
}

/// Nodes and edges ready for a visualization layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

/// Full analysis of one class for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkAnalysisResult {
    pub period: String,
    pub network_stats: NetworkStats,
    pub friendship_type_distribution: FriendshipDistribution,
    /// Student ID → metrics, ordered by ID.
    pub student_details: BTreeMap<String, StudentMetrics>,
    pub network_data: NetworkData,
    /// BLAKE3 fingerprint of roster and validated nominations.
    pub graph_fingerprint: String,
}

/// A result plus the data-quality warnings gathered while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub result: NetworkAnalysisResult,
    pub warnings: Vec<DataWarning>,
}

// ---------------------------------------------------------------------------
// Pipeline over in-memory data
// ---------------------------------------------------------------------------

fn checkpoint(cancel: &CancellationFlag) -> Result<(), AnalysisError> {
    if cancel.is_cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    Ok(())
}

/// Analyze `records` for `period` against `roster`.
///
/// # Errors
///
/// Returns [`AnalysisError::Cancelled`] if `cancel` is raised before the
/// run completes. Bad input data never fails the run; it is reported in
/// [`AnalysisOutcome::warnings`].
#[instrument(skip(roster, records, config, cancel), fields(students = roster.len(), records = records.len()))]
pub fn analyze_snapshot(
    period: &str,
    roster: &[Student],
    records: &[ResponseRecord],
    config: &AnalysisConfig,
    cancel: &CancellationFlag,
) -> Result<AnalysisOutcome, AnalysisError> {
    let mut warnings = Vec::new();

    checkpoint(cancel)?;
    let nominations = extract_nominations(period, records, &config.extraction, &mut warnings);

    checkpoint(cancel)?;
    let raw = RawGraph::from_roster(roster, &nominations, &mut warnings);
    let ng = NormalizedGraph::from_raw(raw);

    checkpoint(cancel)?;
    let centrality = compute_centrality(&ng, &config.eigenvector);

    checkpoint(cancel)?;
    let communities = detect_communities(&ng, &config.community);
    let types = classify(&ng);
    let network_stats = NetworkStats::from_normalized(&ng);

    checkpoint(cancel)?;
    let degrees = degree_counts(&ng);
    let mut student_details = BTreeMap::new();
    let mut nodes = Vec::with_capacity(ng.node_count());

    for i in 0..ng.node_count() {
        let Some(student) = ng.raw.student(NodeIndex::new(i)) else {
            continue;
        };
        let id = student.id.as_str();
        let scores = centrality.of(id);
        let community_id = communities.of(id).unwrap_or_default();
        let friendship_type = types
            .get(id)
            .copied()
            .unwrap_or(FriendshipType::Isolated);
        let connection_count = ng.degree(i);

        nodes.push(NetworkNode {
            id: id.to_string(),
            name: student.name.clone(),
            grade: student.grade.clone(),
            class: student.class.clone(),
            friendship_type,
            centrality: scores.degree,
            community: community_id,
            connection_count,
        });

        let mut neighbors: Vec<String> = ng.neighbors[i]
            .iter()
            .map(|&j| ng.student_id(j).to_string())
            .collect();
        neighbors.sort_unstable();

        student_details.insert(
            id.to_string(),
            StudentMetrics {
                student_id: id.to_string(),
                name: student.name.clone(),
                in_degree: degrees.in_degree.get(id).copied().unwrap_or_default(),
                out_degree: degrees.out_degree.get(id).copied().unwrap_or_default(),
                total_degree: degrees.total_degree.get(id).copied().unwrap_or_default(),
                connection_count,
                neighbors,
                centrality: scores,
                community_id,
                friendship_type,
            },
        );
    }

    let edges = ng
        .raw
        .nominations()
        .map(|(source, target, edge)| NetworkEdge {
            source: source.to_string(),
            target: target.to_string(),
            weight: edge.weight,
            relationship_type: edge.relation.clone(),
        })
        .collect();

    let friendship_type_distribution = nodes.iter().map(|n| n.friendship_type).collect();

    if !warnings.is_empty() {
        warn!(count = warnings.len(), "data-quality warnings");
    }
    info!(
        students = network_stats.total_students,
        relationships = network_stats.total_relationships,
        communities = communities.count(),
        "period analyzed"
    );

    Ok(AnalysisOutcome {
        result: NetworkAnalysisResult {
            period: period.to_string(),
            network_stats,
            friendship_type_distribution,
            student_details,
            network_data: NetworkData { nodes, edges },
            graph_fingerprint: ng.raw.content_hash.clone(),
        },
        warnings,
    })
}

// ---------------------------------------------------------------------------
// Provider-backed analyzer
// ---------------------------------------------------------------------------

/// Runs the pipeline over data fetched from injected providers.
pub struct NetworkAnalyzer<'a> {
    roster: &'a dyn RosterProvider,
    responses: &'a dyn ResponseProvider,
    config: AnalysisConfig,
    cancel: CancellationFlag,
}

impl<'a> NetworkAnalyzer<'a> {
    #[must_use]
    pub fn new(
        roster: &'a dyn RosterProvider,
        responses: &'a dyn ResponseProvider,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            roster,
            responses,
            config,
            cancel: CancellationFlag::new(),
        }
    }

    /// Share `cancel` with the caller so it can stop the run.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one period for the class `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::RosterFetch`] or
    /// [`AnalysisError::ResponseFetch`] if a provider fails, and
    /// [`AnalysisError::Cancelled`] if the run is cancelled.
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub fn analyze_period(
        &self,
        period: &str,
        scope: &ClassScope,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        checkpoint(&self.cancel)?;
        let roster = self
            .roster
            .active_students(scope)
            .map_err(|source| AnalysisError::RosterFetch {
                scope: scope.clone(),
                source,
            })?;

        checkpoint(&self.cancel)?;
        let records =
            self.responses
                .responses(period)
                .map_err(|source| AnalysisError::ResponseFetch {
                    period: period.to_string(),
                    source,
                })?;

        analyze_snapshot(period, &roster, &records, &self.config, &self.cancel)
    }

    /// Analyze every period independently, in request order.
    ///
    /// A failed period does not affect the others. Runs on the rayon pool
    /// when `trend.parallel` is set.
    #[must_use]
    pub fn analyze_periods(
        &self,
        periods: &[String],
        scope: &ClassScope,
    ) -> Vec<(String, Result<AnalysisOutcome, AnalysisError>)> {
        run_periods(periods, self.config.trend.parallel, |period| {
            self.analyze_period(period, scope)
        })
    }

    /// Friendship-type histogram per period.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Cancelled`] if the run is cancelled. Every
    /// other failure is recorded on its period's entry.
    #[instrument(skip(self, periods, scope), fields(periods = periods.len(), scope = %scope))]
    pub fn trend(&self, periods: &[String], scope: &ClassScope) -> Result<TrendSeries, AnalysisError> {
        let runs = self.analyze_periods(periods, scope);
        checkpoint(&self.cancel)?;
        Ok(TrendSeries::from_runs(runs))
    }
}
