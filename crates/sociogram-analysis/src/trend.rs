//! Per-period trend of friendship-type counts.
//!
//! Each requested period is analyzed on its own. Periods run on the rayon
//! pool when parallelism is enabled, but the series is always ordered as
//! the periods were requested. A period that fails carries its error
//! message instead of a histogram and never affects its neighbors.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sociogram_core::AnalysisError;
use tracing::{debug, warn};

use crate::classify::FriendshipDistribution;
use crate::pipeline::AnalysisOutcome;

/// Whether a period's analysis produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Ok,
    Failed,
}

/// One point of the trend series.
///
/// Serializes flat: the five bucket counts sit next to `period` and
/// `status`, and are absent for a failed period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
    pub period: String,
    pub status: PeriodStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub warning_count: usize,
    #[serde(flatten)]
    pub distribution: Option<FriendshipDistribution>,
}

/// Ordered per-period entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendSeries {
    pub entries: Vec<TrendEntry>,
}

impl TrendSeries {
    /// Build the series from per-period outcomes, keeping their order.
    #[must_use]
    pub fn from_runs(runs: Vec<(String, Result<AnalysisOutcome, AnalysisError>)>) -> Self {
        let entries = runs
            .into_iter()
            .map(|(period, run)| match run {
                Ok(outcome) => TrendEntry {
                    period,
                    status: PeriodStatus::Ok,
                    error: None,
                    warning_count: outcome.warnings.len(),
                    distribution: Some(outcome.result.friendship_type_distribution),
                },
                Err(err) => {
                    warn!(%period, code = err.code(), error = %err, "period failed");
                    TrendEntry {
                        period,
                        status: PeriodStatus::Failed,
                        error: Some(err.to_string()),
                        warning_count: 0,
                        distribution: None,
                    }
                }
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose analysis failed.
    pub fn failures(&self) -> impl Iterator<Item = &TrendEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == PeriodStatus::Failed)
    }
}

/// Run `analyze` once per period and pair each result with its period.
///
/// Output order matches `periods` whether or not the runs are parallel.
pub fn run_periods<T, E, F>(periods: &[String], parallel: bool, analyze: F) -> Vec<(String, Result<T, E>)>
where
    F: Fn(&str) -> Result<T, E> + Sync + Send,
    T: Send,
    E: Send,
{
    debug!(periods = periods.len(), parallel, "dispatching periods");
    if parallel {
        periods
            .par_iter()
            .map(|period| (period.clone(), analyze(period)))
            .collect()
    } else {
        periods
            .iter()
            .map(|period| (period.clone(), analyze(period)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periods(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parallel_runs_keep_request_order() {
        let requested = periods(&["p3", "p1", "p2", "p9", "p0"]);
        let runs = run_periods(&requested, true, |p| Ok::<_, ()>(p.len()));
        let order: Vec<&str> = runs.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(order, vec!["p3", "p1", "p2", "p9", "p0"]);
    }

    #[test]
    fn one_failure_does_not_touch_the_others() {
        let requested = periods(&["good", "bad", "good2"]);
        let runs = run_periods(&requested, false, |p| {
            if p == "bad" { Err("boom") } else { Ok(p.to_uppercase()) }
        });
        assert_eq!(runs[0].1, Ok("GOOD".to_string()));
        assert_eq!(runs[1].1, Err("boom"));
        assert_eq!(runs[2].1, Ok("GOOD2".to_string()));
    }

    #[test]
    fn failed_entry_serializes_without_counts() {
        let series = TrendSeries::from_runs(vec![("p1".to_string(), Err(AnalysisError::Cancelled))]);
        let value = serde_json::to_value(&series).expect("serialize");
        let entry = &value[0];
        assert_eq!(entry["period"], "p1");
        assert_eq!(entry["status"], "failed");
        assert_eq!(entry["error"], "analysis cancelled");
        assert!(entry.get("isolated").is_none());
        assert_eq!(series.failures().count(), 1);
    }

    #[test]
    fn ok_entry_serializes_flat() {
        let entry = TrendEntry {
            period: "p1".to_string(),
            status: PeriodStatus::Ok,
            error: None,
            warning_count: 2,
            distribution: Some(FriendshipDistribution {
                isolated: 1,
                few_friends: 3,
                ..FriendshipDistribution::default()
            }),
        };
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["status"], "ok");
        assert_eq!(value["few-friends"], 3);
        assert_eq!(value["social-star"], 0);
        assert_eq!(value["warning_count"], 2);
        assert!(value.get("error").is_none());
    }
}
