// PerfTrend - core/export.rs
//
// CSV export of the results table.
// Core layer: writes to any Write trait object; `write_results` is the thin
// file-creating wrapper used by the app layer.

use crate::core::model::{CsvRow, RunTable};
use crate::core::timestamp;
use crate::util::constants;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column header of `results.csv`, in order.
pub const CSV_HEADER: [&str; 6] = [
    "Instance",
    "File",
    "Timestamp",
    "Is Solution Feasible",
    "Objective Function Value",
    "Execution Time",
];

/// Export the table to CSV.
///
/// The header is always written, so an empty table yields a header-only
/// file. Missing timestamps are written as empty fields. Returns the number
/// of data rows written.
pub fn export_csv<W: Write>(
    table: &RunTable,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    // The header is written by hand: serde-driven headers only appear once a
    // first row is serialised.
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CSV_HEADER).map_err(csv_err)?;

    let mut count = 0;
    for row in table.rows() {
        csv_writer
            .serialize(CsvRow {
                instance: &row.instance,
                file: &row.file,
                timestamp: row.timestamp.as_ref().map(timestamp::format_for_csv),
                feasible: &row.feasible,
                objective: row.objective,
                execution_time: row.execution_time,
            })
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Write `results.csv` into `dir` and return its path.
pub fn write_results(table: &RunTable, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(constants::RESULTS_FILE_NAME);
    let file = std::fs::File::create(&path).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;

    let count = export_csv(table, std::io::BufWriter::new(file), &path)?;
    tracing::info!(path = %path.display(), rows = count, "Results table written");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RunRecord;
    use crate::core::table::assemble;

    fn record(instance: &str, raw_ts: &str, objective: f64, time: f64) -> RunRecord {
        RunRecord {
            instance: instance.to_string(),
            file: format!("{instance}_{raw_ts}"),
            raw_timestamp: raw_ts.to_string(),
            feasible: "True".to_string(),
            objective,
            execution_time: time,
        }
    }

    fn export_to_string(table: &RunTable) -> String {
        let mut buf = Vec::new();
        export_csv(table, &mut buf, Path::new("results.csv")).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_csv_export() {
        let table = assemble(vec![
            record("inst_a", "2024-01-01_00-00-00", 100.0, 2.5),
            record("inst_b", "Unknown", 12.25, 1.0),
        ]);
        let output = export_to_string(&table);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "Instance,File,Timestamp,Is Solution Feasible,Objective Function Value,Execution Time"
        );
        assert_eq!(
            lines[1],
            "inst_a,inst_a_2024-01-01_00-00-00,2024-01-01 00:00:00,True,100.0,2.5"
        );
        assert_eq!(lines[2], "inst_b,inst_b_Unknown,,True,12.25,1.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let output = export_to_string(&RunTable::default());
        assert_eq!(
            output,
            "Instance,File,Timestamp,Is Solution Feasible,Objective Function Value,Execution Time\n"
        );
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut rec = record("inst", "Unknown", 1.0, 1.0);
        rec.feasible = "no, 3 violations".to_string();
        let output = export_to_string(&assemble(vec![rec]));
        assert!(output.contains("\"no, 3 violations\""), "got: {output}");
    }

    #[test]
    fn test_write_results_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = assemble(vec![record("inst", "2024-01-01_00-00-00", 1.0, 1.0)]);
        let path = write_results(&table, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("results.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
