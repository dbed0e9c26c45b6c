// PerfTrend - core/stats.rs
//
// Descriptive quantities derived from the results table for the charts:
// per-instance relative change, percentage-change annotations, histogram
// binning, kernel density, and execution-time variation ranking.
// Pure functions; no rendering.

use crate::core::model::{RunRow, RunTable};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

// =============================================================================
// Relative change
// =============================================================================

/// Relative change of the objective value between consecutive rows of the
/// same instance, aligned with `table.rows()`.
///
/// `None` for each instance's first row, and when the previous value is 0
/// (the ratio is undefined). Otherwise `(curr - prev) / prev`.
pub fn relative_changes(table: &RunTable) -> Vec<Option<f64>> {
    let mut previous: BTreeMap<&str, f64> = BTreeMap::new();

    table
        .rows()
        .iter()
        .map(|row| {
            let change = previous
                .get(row.instance.as_str())
                .and_then(|&prev| ratio_change(prev, row.objective));
            previous.insert(&row.instance, row.objective);
            change
        })
        .collect()
}

fn ratio_change(prev: f64, curr: f64) -> Option<f64> {
    if prev == 0.0 {
        None
    } else {
        Some((curr - prev) / prev)
    }
}

// =============================================================================
// Objective evolution annotations
// =============================================================================

/// Percentage change of an instance's objective against its previous
/// chronological point, anchored at the current point.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAnnotation {
    pub instance: String,
    pub timestamp: NaiveDateTime,
    pub value: f64,
    /// Signed percentage, e.g. `50.0` for +50 %.
    pub percent: f64,
}

/// Annotations for the objective evolution chart.
///
/// Only rows with a timestamp take part (they are the ones placed on the
/// time axis). A point is annotated when its instance has an earlier point
/// whose value is non-zero.
pub fn objective_annotations(table: &RunTable) -> Vec<ChangeAnnotation> {
    let mut previous: BTreeMap<&str, f64> = BTreeMap::new();
    let mut out = Vec::new();

    for row in table.rows() {
        let Some(ts) = row.timestamp else { continue };
        if let Some(change) = previous
            .get(row.instance.as_str())
            .and_then(|&prev| ratio_change(prev, row.objective))
        {
            out.push(ChangeAnnotation {
                instance: row.instance.clone(),
                timestamp: ts,
                value: row.objective,
                percent: change * 100.0,
            });
        }
        previous.insert(&row.instance, row.objective);
    }
    out
}

// =============================================================================
// Histogram and density
// =============================================================================

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin finite `values` into `bins` equal-width bins spanning their range.
///
/// Every bin is half-open except the last, which includes the maximum. When
/// all values are equal the range is widened to `value ± 0.5`. Returns
/// `None` when there is no finite value or `bins` is 0.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let (lo, hi) = finite_range(values)?;
    if bins == 0 {
        return None;
    }
    let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
    let width = (hi - lo) / bins as f64;

    let edges: Vec<f64> = (0..=bins)
        .map(|i| if i == bins { hi } else { lo + width * i as f64 })
        .collect();
    let mut counts = vec![0usize; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate of the finite `values`, sampled at
/// `points` evenly spaced positions across their range.
///
/// The bandwidth follows Scott's rule: `n^(-1/5)` times the sample standard
/// deviation. Returns `None` with fewer than two values, zero spread, or
/// fewer than two sample points.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = data.len();
    if n < 2 || points < 2 {
        return None;
    }

    let mean = data.iter().sum::<f64>() / n as f64;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return None;
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let (lo, hi) = finite_range(&data)?;
    let step = (hi - lo) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = data
                .iter()
                .map(|v| {
                    let z = (x - v) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, density * norm)
        })
        .collect();

    Some(curve)
}

/// Minimum and maximum of the finite values.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// =============================================================================
// Execution time variation
// =============================================================================

/// First and last recorded execution time of one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionTimeChange {
    pub instance: String,
    pub first: f64,
    pub last: f64,
}

impl ExecutionTimeChange {
    pub fn absolute_change(&self) -> f64 {
        (self.last - self.first).abs()
    }
}

/// The `n` instances whose execution time moved most between their first
/// and last row (table order), largest change first.
///
/// Equal changes keep instance-name order.
pub fn top_execution_time_changes(table: &RunTable, n: usize) -> Vec<ExecutionTimeChange> {
    let mut by_instance: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in table.rows() {
        by_instance
            .entry(row.instance.as_str())
            .and_modify(|(_, last)| *last = row.execution_time)
            .or_insert((row.execution_time, row.execution_time));
    }

    let mut changes: Vec<ExecutionTimeChange> = by_instance
        .into_iter()
        .map(|(instance, (first, last))| ExecutionTimeChange {
            instance: instance.to_string(),
            first,
            last,
        })
        .collect();

    // Stable sort: ties stay in name order. total_cmp keeps NaN deterministic.
    changes.sort_by(|a, b| b.absolute_change().total_cmp(&a.absolute_change()));
    changes.truncate(n);
    changes
}

/// One point of an execution time series on the categorical file axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePoint {
    /// Index into [`FileAxis::files`].
    pub file_index: usize,
    pub execution_time: f64,
    /// Signed percentage against the instance's first execution time.
    /// `None` for the first point and when the first time is 0.
    pub percent_from_first: Option<f64>,
}

/// Execution time series of one instance over the file axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSeries {
    pub instance: String,
    pub points: Vec<FilePoint>,
}

/// Categorical file axis shared by all series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileAxis {
    /// File names in order of first appearance.
    pub files: Vec<String>,
    /// One series per instance, ordered by instance name.
    pub series: Vec<FileSeries>,
}

/// Build the execution time series of the given instances.
///
/// Series are ordered by instance name, points by table order (i.e.
/// chronologically). A file becomes an axis category the first time any of
/// the selected series reaches it.
pub fn execution_time_series(table: &RunTable, instances: &[&str]) -> FileAxis {
    let mut selected: Vec<&str> = instances.to_vec();
    selected.sort_unstable();
    selected.dedup();

    let mut axis = FileAxis::default();

    for instance in selected {
        let rows: Vec<&RunRow> = table.rows_for(instance).collect();
        let Some(first) = rows.first().map(|r| r.execution_time) else {
            continue;
        };

        let points = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let file_index = match axis.files.iter().position(|f| *f == row.file) {
                    Some(idx) => idx,
                    None => {
                        axis.files.push(row.file.clone());
                        axis.files.len() - 1
                    }
                };
                let percent_from_first = if i == 0 || first == 0.0 {
                    None
                } else {
                    Some((row.execution_time - first) / first * 100.0)
                };
                FilePoint {
                    file_index,
                    execution_time: row.execution_time,
                    percent_from_first,
                }
            })
            .collect();

        axis.series.push(FileSeries {
            instance: instance.to_string(),
            points,
        });
    }

    axis
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

    #[test]
    fn test_relative_change_per_instance() {
        let table = assemble(vec![
            record("instA", "2024-01-01_00-00-00", 100.0, 1.0),
            record("instB", "2024-01-15_00-00-00", 10.0, 1.0),
            record("instA", "2024-02-01_00-00-00", 150.0, 1.0),
            record("instB", "2024-02-15_00-00-00", 5.0, 1.0),
        ]);
        let changes = relative_changes(&table);
        assert_eq!(changes, vec![None, None, Some(0.5), Some(-0.5)]);
    }

    #[test]
    fn test_relative_change_after_zero_is_undefined() {
        let table = assemble(vec![
            record("a", "2024-01-01_00-00-00", 0.0, 1.0),
            record("a", "2024-01-02_00-00-00", 3.0, 1.0),
            record("a", "2024-01-03_00-00-00", 6.0, 1.0),
        ]);
        assert_eq!(relative_changes(&table), vec![None, None, Some(1.0)]);
    }

    #[test]
    fn test_objective_annotations_skip_first_and_untimed_points() {
        let table = assemble(vec![
            record("a", "2024-01-01_00-00-00", 200.0, 1.0),
            record("a", "2024-01-02_00-00-00", 150.0, 1.0),
            record("a", "Unknown", 999.0, 1.0),
        ]);
        let notes = objective_annotations(&table);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].value, 150.0);
        assert!((notes[0].percent + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_counts_include_maximum() {
        let hist = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(hist.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(hist.counts, vec![1, 1, 1, 2]);
        assert_eq!(hist.bin_width(), 1.0);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn test_histogram_single_value_widens_range() {
        let hist = histogram(&[5.0, 5.0, 5.0], 20).unwrap();
        assert_eq!(hist.edges.first().copied(), Some(4.5));
        assert_eq!(hist.edges.last().copied(), Some(5.5));
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_histogram_empty_input() {
        assert!(histogram(&[], 20).is_none());
        assert!(histogram(&[f64::NAN], 20).is_none());
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let values: Vec<f64> = (0..50).map(|i| (i % 10) as f64).collect();
        let curve = gaussian_kde(&values, 400).unwrap();
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, y)| y * step).sum();
        // Truncated at the data range, so a little mass is lost at the tails.
        assert!(area > 0.7 && area < 1.01, "area = {area}");
    }

    #[test]
    fn test_kde_needs_spread() {
        assert!(gaussian_kde(&[1.0], 10).is_none());
        assert!(gaussian_kde(&[2.0, 2.0, 2.0], 10).is_none());
    }

    #[test]
    fn test_top_execution_time_changes() {
        let table = assemble(vec![
            record("small", "2024-01-01_00-00-00", 1.0, 10.0),
            record("big", "2024-01-01_00-00-00", 1.0, 10.0),
            record("tie", "2024-01-01_00-00-00", 1.0, 5.0),
            record("small", "2024-02-01_00-00-00", 1.0, 11.0),
            record("big", "2024-02-01_00-00-00", 1.0, 2.0),
            record("tie", "2024-02-01_00-00-00", 1.0, 6.0),
        ]);
        let top = top_execution_time_changes(&table, 2);
        let names: Vec<_> = top.iter().map(|c| c.instance.as_str()).collect();
        // small and tie both changed by 1.0; name order breaks the tie.
        assert_eq!(names, vec!["big", "small"]);
        assert_eq!(top[0].first, 10.0);
        assert_eq!(top[0].last, 2.0);
    }

    #[test]
    fn test_execution_time_series_shares_file_axis() {
        let mut recs = vec![
            record("b", "2024-01-01_00-00-00", 1.0, 4.0),
            record("a", "2024-01-01_00-00-00", 1.0, 2.0),
            record("a", "2024-02-01_00-00-00", 1.0, 3.0),
        ];
        // Same file holding two instances.
        for r in &mut recs {
            r.file = format!("run_{}", r.raw_timestamp);
        }
        let table = assemble(recs);
        let axis = execution_time_series(&table, &["b", "a"]);

        assert_eq!(
            axis.files,
            vec!["run_2024-01-01_00-00-00", "run_2024-02-01_00-00-00"]
        );
        assert_eq!(axis.series[0].instance, "a");
        assert_eq!(axis.series[0].points[0].percent_from_first, None);
        assert_eq!(axis.series[0].points[1].file_index, 1);
        assert_eq!(axis.series[0].points[1].percent_from_first, Some(50.0));
        assert_eq!(axis.series[1].instance, "b");
        assert_eq!(axis.series[1].points[0].file_index, 0);
    }
}
