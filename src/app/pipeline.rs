// PerfTrend - app/pipeline.rs
//
// One batch run: discovery → extraction → table assembly → CSV export →
// optional charts. Synchronous and single-threaded; each file is read in
// full and released before the next one is opened.
//
// Every failure is fatal and surfaces as a `PerfTrendError`.

use crate::core::discovery::{self, DiscoveryConfig};
use crate::core::export;
use crate::core::extract;
use crate::core::model::{RunRecord, RunTable, ScanSummary};
use crate::core::table;
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::plot::{self, PlotConfig};
use crate::util::error::{ExtractError, PerfTrendError, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What to run, as given on the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root directory scanned for run logs.
    pub input_dir: PathBuf,
    /// Parent of the per-run output directory.
    pub output_dir: PathBuf,
    /// Render the charts after writing results.csv.
    pub plot: bool,
}

/// Artifacts and statistics of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The `<output_dir>/<YYYY-MM-DD_HH-MM-SS>` directory.
    pub run_dir: PathBuf,
    pub results_csv: PathBuf,
    /// Charts written, empty when plotting was off or skipped.
    pub charts: Vec<PathBuf>,
    pub summary: ScanSummary,
    pub table: RunTable,
}

impl From<&AppConfig> for DiscoveryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            include_patterns: config.include_patterns.clone(),
        }
    }
}

impl From<&AppConfig> for PlotConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            width: config.plot_width,
            height: config.plot_height,
            histogram_bins: config.histogram_bins,
            top_variation_instances: config.top_variation_instances,
        }
    }
}

/// Run the pipeline with the run directory named after the current local
/// time.
pub fn run(options: &RunOptions, config: &AppConfig) -> Result<RunOutcome> {
    run_at(options, config, chrono::Local::now().naive_local())
}

/// Run the pipeline with an explicit start time (names the run directory).
pub fn run_at(options: &RunOptions, config: &AppConfig, now: NaiveDateTime) -> Result<RunOutcome> {
    let run_dir = fs::create_run_directory(&options.output_dir, &now).map_err(|e| {
        PerfTrendError::Io {
            path: options.output_dir.clone(),
            operation: "create run directory",
            source: e,
        }
    })?;
    tracing::info!(dir = %run_dir.display(), "Run directory ready");

    let (table, summary) = scan(&options.input_dir, &DiscoveryConfig::from(config))?;

    let results_csv = export::write_results(&table, &run_dir)?;

    let mut charts = Vec::new();
    if options.plot {
        if table.is_empty() {
            tracing::warn!("No records extracted; skipping plots");
        } else {
            let plot_config = PlotConfig::from(config);
            charts = plot::generate_objective_function_plots(&table, &run_dir, &plot_config)?;
            charts.push(plot::generate_execution_time_variation_plot(
                &table,
                &run_dir,
                &plot_config,
            )?);
        }
    }

    Ok(RunOutcome {
        run_dir,
        results_csv,
        charts,
        summary,
        table,
    })
}

/// Discover and extract every run log under `root` and assemble the table.
pub fn scan(root: &Path, config: &DiscoveryConfig) -> Result<(RunTable, ScanSummary)> {
    let started = Instant::now();
    let files = discovery::discover_files(root, config)?;
    tracing::info!(root = %root.display(), files = files.len(), "Discovery complete");

    let mut summary = ScanSummary {
        files_scanned: files.len(),
        ..ScanSummary::default()
    };
    let mut records: Vec<RunRecord> = Vec::new();

    for file in &files {
        let content = fs::read_file_lossy(&file.path).map_err(|e| ExtractError::Io {
            file: file.path.clone(),
            source: e,
        })?;

        let extraction = extract::extract_records(&content, file)?;
        tracing::debug!(
            file = %file.path.display(),
            records = extraction.records.len(),
            lines = extraction.lines_processed,
            "File extracted"
        );

        summary.records += extraction.records.len();
        summary.dropped_cycles += extraction.dropped_cycles;
        summary.lines_processed += extraction.lines_processed;
        records.extend(extraction.records);
    }

    let table = table::assemble(records);
    summary.rows_without_timestamp = table
        .rows()
        .iter()
        .filter(|r| r.timestamp.is_none())
        .count();
    summary.duration = started.elapsed();

    tracing::info!(
        files = summary.files_scanned,
        records = summary.records,
        dropped = summary.dropped_cycles,
        untimed = summary.rows_without_timestamp,
        lines = summary.lines_processed,
        duration_ms = summary.duration.as_millis() as u64,
        "Scan complete"
    );

    Ok((table, summary))
}
