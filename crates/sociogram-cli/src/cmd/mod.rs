pub mod analyze;
pub mod compare;
pub mod trend;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use sociogram_core::{ClassScope, SnapshotStore};
use tracing::debug;

/// Where the class data comes from and which class to analyze.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON snapshot with a `students` array and `responses` keyed by period.
    #[arg(long, short = 's', value_name = "FILE")]
    pub snapshot: PathBuf,

    /// School identifier of the class.
    #[arg(long, default_value = "")]
    pub school: String,

    /// Grade of the class.
    #[arg(long)]
    pub grade: String,

    /// Class within the grade.
    #[arg(long)]
    pub class: String,
}

impl SourceArgs {
    pub fn scope(&self) -> ClassScope {
        ClassScope::new(&self.school, &self.grade, &self.class)
    }
}

/// Read a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<SnapshotStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let store: SnapshotStore = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    debug!(
        students = store.students.len(),
        periods = store.responses.len(),
        "snapshot loaded"
    );
    Ok(store)
}

/// Envelope around exported JSON documents.
#[derive(Debug, Serialize)]
pub struct Export<'a, T: Serialize> {
    pub generated_at: DateTime<Utc>,
    pub generator: &'static str,
    pub scope: &'a ClassScope,
    pub data: &'a T,
}

/// Write `data` wrapped in an [`Export`] envelope to `path`.
pub fn write_export<T: Serialize>(path: &Path, scope: &ClassScope, data: &T) -> Result<()> {
    let export = Export {
        generated_at: Utc::now(),
        generator: concat!("sociogram ", env!("CARGO_PKG_VERSION")),
        scope,
        data,
    };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize export")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export {}", path.display()))?;
    debug!(path = %path.display(), "export written");
    Ok(())
}

/// Format a score for human output.
pub fn score(value: f64) -> String {
    format!("{value:.3}")
}
