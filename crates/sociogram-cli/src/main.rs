#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use sociogram_core::config::resolve_config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "sociogram: classroom peer-nomination network analysis",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `SOCIOGRAM_FORMAT`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Analysis config file (defaults to ./sociogram.toml, then the user
    /// config directory).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Analyze one class for one period",
        long_about = "Build the nomination network for one class and period and report centrality, communities, friendship types and network statistics.",
        after_help = "EXAMPLES:\n    # Analyze the spring survey\n    sociogram analyze -s class.json --grade 3 --class 2 -p 2024-1\n\n    # Also write a timestamped JSON export\n    sociogram analyze -s class.json --grade 3 --class 2 -p 2024-1 --export out.json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Friendship-type counts across periods",
        long_about = "Analyze each period independently and list friendship-type counts per period. A failing period is reported without affecting the others.",
        after_help = "EXAMPLES:\n    # Every period in the snapshot\n    sociogram trend -s class.json --grade 3 --class 2\n\n    # Selected periods, machine-readable\n    sociogram trend -s class.json --grade 3 --class 2 -p 2024-1 -p 2024-2 --json"
    )]
    Trend(cmd::trend::TrendArgs),

    #[command(
        about = "Track students across periods",
        long_about = "Compare friendship types and connection counts of each student across two or more periods.",
        after_help = "EXAMPLES:\n    # Spring vs autumn\n    sociogram compare -s class.json --grade 3 --class 2 -p 2024-1 -p 2024-2\n\n    # Only students whose type changed\n    sociogram compare -s class.json --grade 3 --class 2 -p 2024-1 -p 2024-2 --changed-only"
    )]
    Compare(cmd::compare::CompareArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SOCIOGRAM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "sociogram=debug,info"
        } else {
            "sociogram=info,warn"
        })
    });

    let format = env::var("SOCIOGRAM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    // Logs go to stderr so stdout stays clean for --json.
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let output = cli.output_mode();
    let working_dir = env::current_dir().context("Failed to read working directory")?;
    let config = resolve_config(cli.config.as_deref(), &working_dir)?;
    debug!(?config, "effective analysis config");

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, config, output),
        Commands::Trend(ref args) => cmd::trend::run_trend(args, config, output),
        Commands::Compare(ref args) => cmd::compare::run_compare(args, config, output),
    }
}
