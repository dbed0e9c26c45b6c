// PerfTrend - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every failure is fatal for the run; the chain is printed by main.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all PerfTrend operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum PerfTrendError {
    /// Run-log discovery failed.
    Discovery(DiscoveryError),

    /// Record extraction from a run log failed.
    Extract(ExtractError),

    /// Writing the results table failed.
    Export(ExportError),

    /// Rendering a chart failed.
    Plot(PlotError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for PerfTrendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Extract(e) => write!(f, "Extraction error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Plot(e) => write!(f, "Plot error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for PerfTrendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Discovery(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Plot(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to run-log discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The root scan path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// The root path is not a directory.
    NotADirectory { path: PathBuf },

    /// Walkdir traversal error (an entry below the root could not be read).
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Input directory '{}' does not exist", path.display())
            }
            Self::NotADirectory { path } => {
                write!(f, "Input path '{}' is not a directory", path.display())
            }
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for PerfTrendError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Extraction errors
// ---------------------------------------------------------------------------

/// Errors related to record extraction.
#[derive(Debug)]
pub enum ExtractError {
    /// A numeric field carried text that is not a floating-point number.
    InvalidNumber {
        file: PathBuf,
        line_number: u64,
        field: &'static str,
        text: String,
        source: std::num::ParseFloatError,
    },

    /// An execution time line carried no value at all.
    MissingValue {
        file: PathBuf,
        line_number: u64,
        field: &'static str,
    },

    /// I/O error while reading a run log.
    Io { file: PathBuf, source: io::Error },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber {
                file,
                line_number,
                field,
                text,
                source,
            } => write!(
                f,
                "'{}' line {line_number}: {field} '{text}' is not a number: {source}",
                file.display()
            ),
            Self::MissingValue {
                file,
                line_number,
                field,
            } => write!(
                f,
                "'{}' line {line_number}: {field} has no value",
                file.display()
            ),
            Self::Io { file, source } => {
                write!(f, "'{}': I/O error: {source}", file.display())
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidNumber { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::MissingValue { .. } => None,
        }
    }
}

impl From<ExtractError> for PerfTrendError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing the results table.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for PerfTrendError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Plot errors
// ---------------------------------------------------------------------------

/// Errors related to chart rendering.
#[derive(Debug)]
pub enum PlotError {
    /// The drawing backend failed while rendering or saving a chart.
    ///
    /// plotters error types are generic over the backend, so the cause is
    /// captured as text.
    Render { path: PathBuf, reason: String },
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render { path, reason } => {
                write!(f, "Failed to render '{}': {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for PlotError {}

impl From<PlotError> for PerfTrendError {
    fn from(e: PlotError) -> Self {
        Self::Plot(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for PerfTrendError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for PerfTrend results.
pub type Result<T> = std::result::Result<T, PerfTrendError>;
