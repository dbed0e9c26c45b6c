// PerfTrend - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// rendering dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

// =============================================================================
// Run Record (output of extraction)
// =============================================================================

/// One solve attempt extracted from a run log.
///
/// Produced by `core::extract` when an execution time line completes a
/// cycle. The timestamp is still the raw text found in the file name; the
/// table assembler parses it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Benchmark instance name (last path segment of the `./...` line).
    pub instance: String,

    /// Source file name without extension.
    pub file: String,

    /// Timestamp text from the file name, or the `Unknown` placeholder.
    pub raw_timestamp: String,

    /// Feasibility flag exactly as reported by the solver.
    pub feasible: String,

    /// Objective function value.
    pub objective: f64,

    /// Execution time in seconds.
    pub execution_time: f64,
}

// =============================================================================
// Run Row (output of assembly)
// =============================================================================

/// A run record with its timestamp parsed, as held by the results table.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub instance: String,
    pub file: String,

    /// Parsed run timestamp. `None` when the file name had no timestamp or
    /// it did not form a valid date (sorted to the end of the table).
    pub timestamp: Option<NaiveDateTime>,

    pub feasible: String,
    pub objective: f64,
    pub execution_time: f64,
}

// =============================================================================
// Run Table
// =============================================================================

/// Chronologically ordered results table.
///
/// Only `core::table::assemble` builds one, which guarantees the ordering:
/// ascending timestamp, missing timestamps last, ties in collection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunTable {
    pub(crate) rows: Vec<RunRow>,
}

impl RunTable {
    pub fn rows(&self) -> &[RunRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct instance names in order of first appearance.
    pub fn instances(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.instance.as_str()) {
                seen.push(&row.instance);
            }
        }
        seen
    }

    /// Rows of one instance, in table order.
    pub fn rows_for<'a>(&'a self, instance: &'a str) -> impl Iterator<Item = &'a RunRow> + 'a {
        self.rows.iter().filter(move |r| r.instance == instance)
    }
}

// =============================================================================
// CSV row shape
// =============================================================================

/// Serialisable view of a row, in `results.csv` column order.
///
/// Column names match the header written by `core::export`.
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    #[serde(rename = "Instance")]
    pub instance: &'a str,
    #[serde(rename = "File")]
    pub file: &'a str,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "Is Solution Feasible")]
    pub feasible: &'a str,
    #[serde(rename = "Objective Function Value")]
    pub objective: f64,
    #[serde(rename = "Execution Time")]
    pub execution_time: f64,
}

// =============================================================================
// Source file (output of discovery)
// =============================================================================

/// A run log found during directory scanning, before extraction.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// File name without extension; becomes the File column.
    pub stem: String,

    /// Timestamp text taken from the stem, or the `Unknown` placeholder.
    pub raw_timestamp: String,
}

// =============================================================================
// Scan Summary
// =============================================================================

/// Statistics for a completed scan, logged once the table is assembled.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Run logs found under the input directory.
    pub files_scanned: usize,

    /// Records extracted across all files.
    pub records: usize,

    /// Cycles completed by an execution time line before any instance line.
    pub dropped_cycles: usize,

    /// Rows whose timestamp is missing.
    pub rows_without_timestamp: usize,

    /// Total lines read.
    pub lines_processed: u64,

    /// Wall-clock scan duration.
    pub duration: std::time::Duration,
}
