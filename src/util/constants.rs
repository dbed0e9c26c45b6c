// PerfTrend - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "PerfTrend";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "PerfTrend";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Discovery
// =============================================================================

/// Default include glob patterns (matched against file names only).
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.txt"];

/// Default maximum directory recursion depth.
///
/// Deep enough that any realistic results tree is walked completely.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard upper bound on max depth.
pub const ABSOLUTE_MAX_DEPTH: usize = 256;

// =============================================================================
// Run-log line markers
// =============================================================================

/// Prefix of the line naming the instance being solved (e.g. `./data/inst_01`).
pub const INSTANCE_PREFIX: &str = "./";

/// Marker of the feasibility line.
pub const FEASIBILITY_MARKER: &str = "Is solution feasible:";

/// Marker of the objective value line.
pub const OBJECTIVE_MARKER: &str = "Objective function value:";

/// Marker of the execution time line. Completes a record.
pub const EXECUTION_TIME_MARKER: &str = "Execution time:";

/// Feasibility value recorded when a cycle carries no feasibility line.
pub const DEFAULT_FEASIBILITY: &str = "False";

// =============================================================================
// Timestamps
// =============================================================================

/// Pattern locating the run timestamp inside a file name stem.
pub const FILENAME_TIMESTAMP_PATTERN: &str = r"(\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2})";

/// chrono format of the file name timestamp and of the output directory name.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Placeholder recorded when a file name carries no timestamp.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// chrono format of the Timestamp column in `results.csv`.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Output artefacts
// =============================================================================

/// Results table file name.
pub const RESULTS_FILE_NAME: &str = "results.csv";

pub const OBJECTIVE_EVOLUTION_FILE: &str = "objective_evolution.png";
pub const OBJECTIVE_DISTRIBUTION_FILE: &str = "objective_distribution.png";
pub const RELATIVE_CHANGE_FILE: &str = "relative_change.png";
pub const EXECUTION_VS_OBJECTIVE_FILE: &str = "execution_vs_objective.png";
pub const EXECUTION_TIME_VARIATION_FILE: &str = "execution_time_variation.png";

// =============================================================================
// Plotting
// =============================================================================

/// Default chart width in pixels.
pub const DEFAULT_PLOT_WIDTH: u32 = 1400;

/// Default chart height in pixels.
pub const DEFAULT_PLOT_HEIGHT: u32 = 600;

/// Width of the execution-time variation chart, which carries a categorical
/// axis with one tick per file.
pub const VARIATION_PLOT_WIDTH: u32 = 1600;

/// Height of the execution-time variation chart.
pub const VARIATION_PLOT_HEIGHT: u32 = 800;

/// Accepted chart dimension range in pixels.
pub const MIN_PLOT_DIMENSION: u32 = 200;
pub const MAX_PLOT_DIMENSION: u32 = 8_000;

/// Width of the legend band drawn to the right of a chart's plotting area.
pub const LEGEND_BAND_WIDTH: u32 = 200;

/// Vertical distance between two legend entries, in pixels.
pub const LEGEND_ROW_HEIGHT: i32 = 22;

/// Default number of histogram bins for the objective distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Accepted histogram bin range.
pub const MIN_HISTOGRAM_BINS: usize = 1;
pub const MAX_HISTOGRAM_BINS: usize = 500;

/// Default number of instances shown in the execution-time variation chart.
pub const DEFAULT_TOP_VARIATION_INSTANCES: usize = 7;

/// Accepted range for the number of variation instances.
pub const MIN_TOP_VARIATION_INSTANCES: usize = 1;
pub const MAX_TOP_VARIATION_INSTANCES: usize = 50;

/// Number of points sampled along the density overlay curve.
pub const KDE_SAMPLE_POINTS: usize = 200;

/// Annotation font size in pixels.
pub const ANNOTATION_FONT_SIZE: u32 = 12;

/// Maximum number of relaxation passes used to separate overlapping labels.
pub const LABEL_REPEL_MAX_ITERATIONS: usize = 200;

/// Gap kept between two repelled labels, in pixels.
pub const LABEL_REPEL_PADDING: f64 = 2.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
