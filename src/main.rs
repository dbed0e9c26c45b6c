// PerfTrend - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml)
// 3. Logging initialisation (debug mode support)
// 4. The batch run, and the exit status

use perftrend::app::pipeline::{self, RunOptions};
use perftrend::platform::config::{self, PlatformPaths};
use perftrend::util;
use perftrend::util::error::PerfTrendError;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::error::Error;
use std::path::PathBuf;

/// PerfTrend - solver run log performance tracker.
///
/// Scans a directory of solver run logs, writes one row per solve attempt to
/// results.csv, and optionally renders trend charts.
#[derive(Parser, Debug)]
#[command(name = "perftrend", version, about)]
struct Cli {
    /// Directory scanned recursively for run logs.
    input_dir: PathBuf,

    /// Parent directory of the timestamped output directory for this run.
    output_dir: PathBuf,

    /// Render the PNG charts (true/false, yes/no, 1/0, on/off). A bare
    /// `--plot` means true.
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    plot: bool,

    /// Configuration file (defaults to config.toml in the platform config directory).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so its level can seed the filter;
    // its warnings are logged once the subscriber is up.
    let (config_path, required) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let loaded = config::load_config(&config_path, required);

    let config_level = match loaded {
        Ok((ref app_config, _)) => app_config.log_level.clone(),
        Err(_) => None,
    };
    util::logging::init(cli.debug, config_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        plot = cli.plot,
        "PerfTrend starting"
    );

    let app_config = match loaded {
        Ok((app_config, warnings)) => {
            for warning in &warnings {
                tracing::warn!(config = %config_path.display(), "{warning}");
            }
            app_config
        }
        Err(e) => fail(&PerfTrendError::from(e)),
    };

    let options = RunOptions {
        input_dir: cli.input_dir,
        output_dir: cli.output_dir,
        plot: cli.plot,
    };

    match pipeline::run(&options, &app_config) {
        Ok(outcome) => {
            println!("{}", outcome.results_csv.display());
            for chart in &outcome.charts {
                println!("{}", chart.display());
            }
            tracing::info!(
                rows = outcome.table.len(),
                charts = outcome.charts.len(),
                dir = %outcome.run_dir.display(),
                "Run complete"
            );
        }
        Err(e) => fail(&e),
    }
}

/// Log and print the full error chain, then exit with status 1.
fn fail(err: &PerfTrendError) -> ! {
    tracing::error!(error = %err, "Run failed");

    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(1);
}
