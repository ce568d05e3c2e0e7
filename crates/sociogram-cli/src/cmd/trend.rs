//! `sociogram trend`: friendship-type counts across periods.

use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use sociogram_analysis::{FriendshipType, NetworkAnalyzer, PeriodStatus, TrendSeries};
use sociogram_core::AnalysisConfig;
use tracing::warn;

use super::{SourceArgs, load_snapshot};
use crate::output::{CliError, OutputMode, pretty_section, render_error, render_mode};

/// Arguments for `sociogram trend`.
#[derive(Args, Debug)]
pub struct TrendArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Periods to include, in display order. Defaults to every period in
    /// the snapshot.
    #[arg(long = "period", short = 'p', value_name = "PERIOD")]
    pub periods: Vec<String>,

    /// Analyze periods one after another instead of in parallel.
    #[arg(long)]
    pub sequential: bool,
}

/// Execute `sociogram trend`.
pub fn run_trend(args: &TrendArgs, mut config: AnalysisConfig, output: OutputMode) -> Result<()> {
    let store = load_snapshot(&args.source.snapshot)?;
    let periods: Vec<String> = if args.periods.is_empty() {
        store.periods().map(str::to_string).collect()
    } else {
        args.periods.clone()
    };
    if args.sequential {
        config.trend.parallel = false;
    }

    let analyzer = NetworkAnalyzer::new(&store, &store, config);
    let series = match analyzer.trend(&periods, &args.source.scope()) {
        Ok(series) => series,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };

    let failed = series.failures().count();
    if failed > 0 {
        warn!(failed, total = series.len(), "some periods failed");
    }

    render_mode(output, &series, render_text, render_pretty)
}

fn render_text(series: &TrendSeries, w: &mut dyn Write) -> io::Result<()> {
    let headers: Vec<&str> = FriendshipType::ALL
        .into_iter()
        .map(FriendshipType::as_str)
        .collect();
    writeln!(w, "period\tstatus\t{}\twarnings", headers.join("\t"))?;
    for entry in &series.entries {
        let counts: Vec<String> = FriendshipType::ALL
            .into_iter()
            .map(|k| {
                entry
                    .distribution
                    .map_or_else(|| "-".to_string(), |d| d.count(k).to_string())
            })
            .collect();
        let status = match entry.status {
            PeriodStatus::Ok => "ok",
            PeriodStatus::Failed => "failed",
        };
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            entry.period,
            status,
            counts.join("\t"),
            entry.warning_count
        )?;
    }
    Ok(())
}

fn render_pretty(series: &TrendSeries, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Friendship-type trend")?;
    writeln!(
        w,
        "{:<12} {:>8} {:>11} {:>7} {:>12} {:>11}",
        "period", "isolated", "few-friends", "average", "many-friends", "social-star"
    )?;
    for entry in &series.entries {
        match (&entry.distribution, &entry.error) {
            (Some(d), _) => writeln!(
                w,
                "{:<12} {:>8} {:>11} {:>7} {:>12} {:>11}",
                entry.period, d.isolated, d.few_friends, d.average, d.many_friends, d.social_star
            )?,
            (None, error) => writeln!(
                w,
                "{:<12} failed: {}",
                entry.period,
                error.as_deref().unwrap_or("unknown error")
            )?,
        }
    }
    Ok(())
}
