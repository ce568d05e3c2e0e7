use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "sociogram.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub eigenvector: EigenvectorConfig,
    #[serde(default)]
    pub trend: TrendConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Weight given to every nomination; surveys carry no strength of their own.
    #[serde(default = "default_strength")]
    pub default_strength: f64,
    #[serde(default = "default_relation")]
    pub default_relation: String,
    /// Question id → relation tag, for surveys that ask distinct relations
    /// (e.g. `"q3" = "conflict"`).
    #[serde(default)]
    pub question_relations: BTreeMap<String, String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_strength: default_strength(),
            default_relation: default_relation(),
            question_relations: BTreeMap::new(),
        }
    }
}

impl ExtractionConfig {
    /// Relation tag for nominations produced by `question`.
    #[must_use]
    pub fn relation_for(&self, question: &str) -> &str {
        self.question_relations
            .get(question)
            .map_or(self.default_relation.as_str(), String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityStrategy {
    /// Connected components of the undirected view.
    #[default]
    Components,
    /// Deterministic asynchronous label propagation.
    LabelPropagation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    #[serde(default)]
    pub strategy: CommunityStrategy,
    /// Sweep limit for label propagation.
    #[serde(default = "default_community_iterations")]
    pub max_iterations: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            strategy: CommunityStrategy::default(),
            max_iterations: default_community_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenvectorConfig {
    #[serde(default = "default_eigen_iterations")]
    pub max_iter: usize,
    #[serde(default = "default_eigen_tolerance")]
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iter: default_eigen_iterations(),
            tolerance: default_eigen_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Analyze periods on the rayon pool instead of one after another.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
        }
    }
}

impl AnalysisConfig {
    /// Reject values the pipeline cannot work with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        let strength = self.extraction.default_strength;
        ensure!(
            strength.is_finite() && strength > 0.0,
            "extraction.default_strength must be a positive number, got {strength}"
        );
        ensure!(
            !self.extraction.default_relation.trim().is_empty(),
            "extraction.default_relation must not be empty"
        );
        let tolerance = self.eigenvector.tolerance;
        ensure!(
            tolerance.is_finite() && tolerance > 0.0,
            "eigenvector.tolerance must be a positive number, got {tolerance}"
        );
        ensure!(
            self.eigenvector.max_iter > 0,
            "eigenvector.max_iter must be at least 1"
        );
        Ok(())
    }
}

/// Load and validate a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<AnalysisConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}

/// Resolve the effective configuration.
///
/// Precedence (highest wins):
/// 1. `explicit` path (must exist)
/// 2. `sociogram.toml` in `working_dir`
/// 3. `sociogram/config.toml` in the user config directory
/// 4. Built-in defaults
///
/// # Errors
///
/// Returns an error if a selected file cannot be loaded.
pub fn resolve_config(explicit: Option<&Path>, working_dir: &Path) -> Result<AnalysisConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let candidates: Vec<PathBuf> = std::iter::once(working_dir.join(PROJECT_CONFIG_FILE))
        .chain(dirs::config_dir().map(|dir| dir.join("sociogram/config.toml")))
        .collect();

    for candidate in candidates {
        if candidate.exists() {
            debug!(path = %candidate.display(), "loading analysis config");
            return load_config(&candidate);
        }
    }

    Ok(AnalysisConfig::default())
}

const fn default_true() -> bool {
    true
}

const fn default_strength() -> f64 {
    5.0
}

fn default_relation() -> String {
    "friend".to_string()
}

const fn default_community_iterations() -> usize {
    100
}

const fn default_eigen_iterations() -> usize {
    1000
}

const fn default_eigen_tolerance() -> f64 {
    1e-6
}
