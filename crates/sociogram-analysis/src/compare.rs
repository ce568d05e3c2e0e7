//! Cross-period comparison of per-student friendship types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::classify::{FriendshipDistribution, FriendshipType};
use crate::pipeline::NetworkAnalysisResult;

/// A student's standing in one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPeriodSnapshot {
    pub period: String,
    pub friendship_type: FriendshipType,
    pub connection_count: usize,
}

/// How the class and its students changed across periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodComparison {
    /// Periods in input order.
    pub periods: Vec<String>,
    /// Period → histogram.
    pub trends: BTreeMap<String, FriendshipDistribution>,
    /// Student ID → snapshots in period order, for students seen in two or
    /// more periods.
    pub changes: BTreeMap<String, Vec<StudentPeriodSnapshot>>,
}

impl PeriodComparison {
    /// Students whose friendship type differs between their first and last
    /// snapshot.
    pub fn shifted(&self) -> impl Iterator<Item = (&str, FriendshipType, FriendshipType)> {
        self.changes.iter().filter_map(|(id, snaps)| {
            let first = snaps.first()?.friendship_type;
            let last = snaps.last()?.friendship_type;
            (first != last).then_some((id.as_str(), first, last))
        })
    }
}

/// Compare results from several periods.
///
/// Fewer than two results yield an empty comparison.
#[must_use]
#[instrument(skip_all, fields(periods = results.len()))]
pub fn compare_periods(results: &[NetworkAnalysisResult]) -> PeriodComparison {
    if results.len() < 2 {
        return PeriodComparison::default();
    }

    let mut changes: BTreeMap<String, Vec<StudentPeriodSnapshot>> = BTreeMap::new();
    for result in results {
        for (id, metrics) in &result.student_details {
            changes
                .entry(id.clone())
                .or_default()
                .push(StudentPeriodSnapshot {
                    period: result.period.clone(),
                    friendship_type: metrics.friendship_type,
                    connection_count: metrics.connection_count,
                });
        }
    }
    changes.retain(|_, snaps| snaps.len() >= 2);

    PeriodComparison {
        periods: results.iter().map(|r| r.period.clone()).collect(),
        trends: results
            .iter()
            .map(|r| (r.period.clone(), r.friendship_type_distribution))
            .collect(),
        changes,
    }
}
