//! `sociogram compare`: how students' friendship types moved between
//! periods.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use sociogram_analysis::{NetworkAnalyzer, PeriodComparison, compare_periods};
use sociogram_core::AnalysisConfig;

use super::{SourceArgs, load_snapshot, write_export};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `sociogram compare`.
#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Periods to compare, oldest first. At least two.
    #[arg(long = "period", short = 'p', value_name = "PERIOD", num_args = 1.., required = true)]
    pub periods: Vec<String>,

    /// Only list students whose friendship type changed.
    #[arg(long)]
    pub changed_only: bool,

    /// Also write the comparison, wrapped with a timestamp, to this JSON file.
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,
}

/// Execute `sociogram compare`.
pub fn run_compare(args: &CompareArgs, config: AnalysisConfig, output: OutputMode) -> Result<()> {
    if args.periods.len() < 2 {
        render_error(
            output,
            &CliError {
                message: "compare needs at least two periods".to_string(),
                suggestion: Some("pass --period twice or more".to_string()),
                error_code: None,
            },
        )?;
        bail!("compare needs at least two periods");
    }

    let store = load_snapshot(&args.source.snapshot)?;
    let scope = args.source.scope();
    let analyzer = NetworkAnalyzer::new(&store, &store, config);

    let mut results = Vec::with_capacity(args.periods.len());
    for (period, run) in analyzer.analyze_periods(&args.periods, &scope) {
        match run {
            Ok(outcome) => results.push(outcome.result),
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                bail!("period {period} could not be analyzed: {err}");
            }
        }
    }

    let mut comparison = compare_periods(&results);
    if args.changed_only {
        comparison.changes.retain(|_, snaps| {
            snaps
                .windows(2)
                .any(|pair| pair[0].friendship_type != pair[1].friendship_type)
        });
    }

    if let Some(path) = &args.export {
        write_export(path, &scope, &comparison)?;
    }

    render_mode(output, &comparison, render_text, render_pretty)
}

fn render_text(comparison: &PeriodComparison, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "id\t{}", comparison.periods.join("\t"))?;
    for (id, snaps) in &comparison.changes {
        let cells: Vec<String> = snaps
            .iter()
            .map(|s| format!("{}:{}", s.friendship_type, s.connection_count))
            .collect();
        writeln!(w, "{id}\t{}", cells.join("\t"))?;
    }
    Ok(())
}

fn render_pretty(comparison: &PeriodComparison, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Comparison of {}", comparison.periods.join(", ")))?;
    for period in &comparison.periods {
        if let Some(d) = comparison.trends.get(period) {
            pretty_kv(
                w,
                period,
                format!(
                    "isolated {} / few-friends {} / average {} / many-friends {} / social-star {}",
                    d.isolated, d.few_friends, d.average, d.many_friends, d.social_star
                ),
            )?;
        }
    }
    writeln!(w)?;

    pretty_section(w, "Students")?;
    for (id, snaps) in &comparison.changes {
        let path: Vec<String> = snaps
            .iter()
            .map(|s| format!("{} ({})", s.friendship_type, s.connection_count))
            .collect();
        pretty_kv(w, id, path.join(" -> "))?;
    }
    Ok(())
}
