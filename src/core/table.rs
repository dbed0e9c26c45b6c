// PerfTrend - core/table.rs
//
// Assembles extracted records into the chronologically ordered results table.

use crate::core::model::{RunRecord, RunRow, RunTable};
use crate::core::timestamp;
use std::cmp::Ordering;

/// Build the results table from records in collection order.
///
/// Timestamps are parsed with the file name rule; unparseable ones become
/// `None`. Rows are sorted by timestamp ascending with missing timestamps
/// last. The sort is stable, so rows sharing a timestamp keep their
/// collection order.
pub fn assemble(records: Vec<RunRecord>) -> RunTable {
    let mut rows: Vec<RunRow> = records
        .into_iter()
        .map(|rec| {
            let timestamp = timestamp::parse(&rec.raw_timestamp);
            if timestamp.is_none() {
                tracing::debug!(
                    file = %rec.file,
                    raw = %rec.raw_timestamp,
                    "Timestamp missing or unparseable; treated as missing"
                );
            }
            RunRow {
                instance: rec.instance,
                file: rec.file,
                timestamp,
                feasible: rec.feasible,
                objective: rec.objective,
                execution_time: rec.execution_time,
            }
        })
        .collect();

    rows.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(at), Some(bt)) => at.cmp(&bt),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    RunTable { rows }
}
