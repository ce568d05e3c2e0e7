//! `sociogram analyze`: full network analysis of one class for one period.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use sociogram_analysis::{AnalysisOutcome, FriendshipType, NetworkAnalyzer};
use sociogram_core::AnalysisConfig;
use tracing::info;

use super::{SourceArgs, load_snapshot, score, write_export};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `sociogram analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Survey period to analyze.
    #[arg(long, short = 'p')]
    pub period: String,

    /// Also write the result, wrapped with a timestamp, to this JSON file.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

/// Execute `sociogram analyze`.
pub fn run_analyze(args: &AnalyzeArgs, config: AnalysisConfig, output: OutputMode) -> Result<()> {
    let store = load_snapshot(&args.source.snapshot)?;
    let scope = args.source.scope();
    let analyzer = NetworkAnalyzer::new(&store, &store, config);

    let outcome = match analyzer.analyze_period(&args.period, &scope) {
        Ok(outcome) => outcome,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    if let Some(path) = &args.export {
        write_export(path, &scope, &outcome)?;
        info!(path = %path.display(), "analysis exported");
    }

    render_mode(output, &outcome, render_text, render_pretty)
}

fn render_text(outcome: &AnalysisOutcome, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "id\ttype\tconnections\tdegree\tbetweenness\tcloseness\teigenvector\tcommunity"
    )?;
    for m in outcome.result.student_details.values() {
        let c = m.centrality;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            m.student_id,
            m.friendship_type,
            m.connection_count,
            score(c.degree),
            score(c.betweenness),
            score(c.closeness),
            score(c.eigenvector),
            m.community_id
        )?;
    }
    Ok(())
}

fn render_pretty(outcome: &AnalysisOutcome, w: &mut dyn Write) -> io::Result<()> {
    let result = &outcome.result;
    let stats = &result.network_stats;

    pretty_section(w, &format!("Class network, period {}", result.period))?;
    pretty_kv(w, "students", stats.total_students.to_string())?;
    pretty_kv(w, "nominations", stats.total_relationships.to_string())?;
    pretty_kv(w, "density", score(stats.density))?;
    pretty_kv(w, "average degree", score(stats.average_degree))?;
    pretty_kv(w, "clustering", score(stats.clustering_coefficient))?;
    pretty_kv(w, "average path length", score(stats.average_path_length))?;
    pretty_kv(w, "disconnected pairs", score(stats.disconnected_pair_fraction))?;
    pretty_kv(w, "components", stats.component_count.to_string())?;
    pretty_kv(w, "fingerprint", &result.graph_fingerprint)?;
    writeln!(w)?;

    pretty_section(w, "Friendship types")?;
    for kind in FriendshipType::ALL {
        pretty_kv(
            w,
            kind.as_str(),
            result.friendship_type_distribution.count(kind).to_string(),
        )?;
    }
    writeln!(w)?;

    pretty_section(w, "Students")?;
    writeln!(
        w,
        "{:<12} {:<24} {:<13} {:>5} {:>6} {:>6} {:>6} {:>4}",
        "id", "name", "type", "conn", "btw", "close", "eigen", "grp"
    )?;
    for m in result.student_details.values() {
        let c = m.centrality;
        writeln!(
            w,
            "{:<12} {:<24} {:<13} {:>5} {:>6} {:>6} {:>6} {:>4}",
            m.student_id,
            m.name,
            m.friendship_type.as_str(),
            m.connection_count,
            score(c.betweenness),
            score(c.closeness),
            score(c.eigenvector),
            m.community_id
        )?;
    }

    let isolated: Vec<&str> = result
        .student_details
        .values()
        .filter(|m| m.friendship_type == FriendshipType::Isolated)
        .map(|m| m.name.as_str())
        .collect();
    if !isolated.is_empty() {
        writeln!(w)?;
        pretty_kv(w, "isolated students", isolated.join(", "))?;
    }

    if !outcome.warnings.is_empty() {
        writeln!(w)?;
        pretty_section(w, &format!("Warnings ({})", outcome.warnings.len()))?;
        for warning in &outcome.warnings {
            writeln!(w, "  {warning}")?;
        }
    }
    Ok(())
}
