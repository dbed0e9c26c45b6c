// PerfTrend - plot/mod.rs
//
// Chart rendering (plotters, bitmap backend).
// Dependencies: core (model, stats), util.
// Must NOT depend on: app, platform.
//
// Each chart module exposes `render(table, path, config)`. Drawing code
// returns boxed plotters errors; `finish` turns them into `PlotError` with
// the output path attached.

pub mod distribution;
pub mod evolution;
pub mod layout;
pub mod relative;
pub mod scatter;
pub mod variation;

use crate::core::model::RunTable;
use crate::util::constants;
use crate::util::error::PlotError;
use chrono::{DateTime, NaiveDateTime, Utc};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Chart settings taken from `[plot]` in config.toml.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    pub top_variation_instances: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_PLOT_WIDTH,
            height: constants::DEFAULT_PLOT_HEIGHT,
            histogram_bins: constants::DEFAULT_HISTOGRAM_BINS,
            top_variation_instances: constants::DEFAULT_TOP_VARIATION_INSTANCES,
        }
    }
}

/// Render the four objective function charts into `dir`.
///
/// Returns the written paths in rendering order.
pub fn generate_objective_function_plots(
    table: &RunTable,
    dir: &Path,
    config: &PlotConfig,
) -> Result<Vec<PathBuf>, PlotError> {
    Ok(vec![
        evolution::render(table, &dir.join(constants::OBJECTIVE_EVOLUTION_FILE), config)?,
        distribution::render(table, &dir.join(constants::OBJECTIVE_DISTRIBUTION_FILE), config)?,
        relative::render(table, &dir.join(constants::RELATIVE_CHANGE_FILE), config)?,
        scatter::render(table, &dir.join(constants::EXECUTION_VS_OBJECTIVE_FILE), config)?,
    ])
}

/// Render the execution time variation chart into `dir`.
pub fn generate_execution_time_variation_plot(
    table: &RunTable,
    dir: &Path,
    config: &PlotConfig,
) -> Result<PathBuf, PlotError> {
    variation::render(
        table,
        &dir.join(constants::EXECUTION_TIME_VARIATION_FILE),
        config,
    )
}

// =============================================================================
// Shared drawing helpers
// =============================================================================

pub(crate) type DrawResult = Result<(), Box<dyn std::error::Error>>;

pub(crate) type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Map a drawing result to the chart path or a `PlotError`.
pub(crate) fn finish(path: &Path, result: DrawResult) -> Result<PathBuf, PlotError> {
    result.map_err(|e| PlotError::Render {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::info!(file = %path.display(), "Chart written");
    Ok(path.to_path_buf())
}

/// Colour of the `idx`-th series. Instances keep their colour across charts
/// because every chart enumerates them in table order.
pub(crate) fn series_color(idx: usize) -> RGBColor {
    let c = Palette99::pick(idx).to_rgba();
    RGBColor(c.0, c.1, c.2)
}

/// `[lo, hi]` widened by `fraction` of the span on both sides. A zero-width
/// range is widened to a unit span around the value.
pub(crate) fn padded_range(lo: f64, hi: f64, fraction: f64) -> Range<f64> {
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        let half = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - half)..(hi + half);
    }
    (lo - span * fraction)..(hi + span * fraction)
}

pub(crate) fn epoch_seconds(ts: &NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

pub(crate) fn format_epoch(secs: f64) -> String {
    DateTime::<Utc>::from_timestamp(secs.round() as i64, 0)
        .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// One instance's points on a time axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimedSeries {
    pub instance: String,
    /// Position of the instance in `RunTable::instances`, for its colour.
    pub color_index: usize,
    /// `(epoch seconds, value)` in table order.
    pub points: Vec<(f64, f64)>,
}

/// Group `values` (aligned with `table.rows()`) into per-instance time
/// series. Rows without a timestamp or without a value are left out;
/// instances with no remaining point get no series.
pub(crate) fn timed_series(table: &RunTable, values: &[Option<f64>]) -> Vec<TimedSeries> {
    let mut series: Vec<TimedSeries> = table
        .instances()
        .into_iter()
        .enumerate()
        .map(|(color_index, instance)| TimedSeries {
            instance: instance.to_string(),
            color_index,
            points: Vec::new(),
        })
        .collect();

    for (row, value) in table.rows().iter().zip(values) {
        let (Some(ts), Some(v)) = (row.timestamp, value) else {
            continue;
        };
        if let Some(s) = series.iter_mut().find(|s| s.instance == row.instance) {
            s.points.push((epoch_seconds(&ts), *v));
        }
    }

    series.retain(|s| !s.points.is_empty());
    series
}

/// Axis ranges covering every point of `series`, and 0 on the y axis when
/// `include_zero` is set.
pub(crate) fn time_ranges(series: &[TimedSeries], include_zero: bool) -> (Range<f64>, Range<f64>) {
    let xs: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.0)).collect();
    let ys: Vec<f64> = series.iter().flat_map(|s| s.points.iter().map(|p| p.1)).collect();
    let (x_lo, x_hi) = crate::core::stats::finite_range(&xs).unwrap_or((0.0, 0.0));
    let (mut y_lo, mut y_hi) = crate::core::stats::finite_range(&ys).unwrap_or((0.0, 0.0));
    if include_zero {
        y_lo = y_lo.min(0.0);
        y_hi = y_hi.max(0.0);
    }

    // A single instant still gets a readable day-wide axis.
    let x_range = if x_hi > x_lo {
        padded_range(x_lo, x_hi, 0.03)
    } else {
        (x_lo - 43_200.0)..(x_hi + 43_200.0)
    };
    (x_range, padded_range(y_lo, y_hi, 0.08))
}

/// Draw a time-axis line chart: mesh and one line with markers per series.
/// Returns the chart so callers can overlay more elements before the legend.
pub(crate) fn draw_time_chart<'a, 'b>(
    root: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    title: &str,
    y_desc: &str,
    series: &[TimedSeries],
    include_zero: bool,
) -> Result<Chart2d<'a, 'b>, Box<dyn std::error::Error>> {
    let (x_range, y_range) = time_ranges(series, include_zero);

    let mut chart = ChartBuilder::on(root)
        .margin(15)
        .caption(title, ("sans-serif", 22).into_font())
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time")
        .y_desc(y_desc)
        .x_labels(6)
        .x_label_formatter(&|x: &f64| format_epoch(*x))
        .draw()?;

    for s in series {
        let color = series_color(s.color_index);
        chart.draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?;
        chart.draw_series(s.points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
    }

    Ok(chart)
}

/// Sample drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegendMarker {
    Line,
    Dot,
}

/// One legend row: series name and colour.
#[derive(Debug, Clone)]
pub(crate) struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
    pub marker: LegendMarker,
}

/// Width of the legend band for an image `total_width` pixels wide. Narrow
/// images give up at most a quarter of their width.
pub(crate) fn legend_band_width(total_width: u32) -> u32 {
    constants::LEGEND_BAND_WIDTH.min(total_width / 4)
}

/// Split `root` into the chart area on the left and the legend band on the
/// right. Annotations stay inside the chart area, so the legend never
/// covers them.
pub(crate) fn split_legend_band<'b>(
    root: &DrawingArea<BitMapBackend<'b>, Shift>,
) -> (DrawingArea<BitMapBackend<'b>, Shift>, DrawingArea<BitMapBackend<'b>, Shift>) {
    let (width, _) = root.dim_in_pixel();
    root.split_horizontally(width - legend_band_width(width))
}

/// Top-left corner of each legend row, in the band's own pixel space.
pub(crate) fn legend_rows(count: usize, top: i32) -> Vec<(i32, i32)> {
    (0..count)
        .map(|i| (10, top + 10 + i as i32 * constants::LEGEND_ROW_HEIGHT))
        .collect()
}

/// Draw `entries` into the legend band, aligned with the top of the
/// plotting area at `top` pixels.
pub(crate) fn draw_legend(
    band: &DrawingArea<BitMapBackend<'_>, Shift>,
    top: i32,
    entries: &[LegendEntry],
) -> DrawResult {
    if entries.is_empty() {
        return Ok(());
    }
    let rows = legend_rows(entries.len(), top);
    let (band_width, _) = band.dim_in_pixel();
    let right = band_width as i32 - 10;
    let bottom = rows.last().map_or(top, |r| r.1) + constants::LEGEND_ROW_HEIGHT;
    band.draw(&Rectangle::new([(0, top), (right, bottom)], BLACK.stroke_width(1)))?;

    for (entry, &(x, y)) in entries.iter().zip(&rows) {
        let mid = y + constants::LEGEND_ROW_HEIGHT / 2 - 2;
        match entry.marker {
            LegendMarker::Line => band.draw(&PathElement::new(
                vec![(x, mid), (x + 20, mid)],
                entry.color.stroke_width(2),
            ))?,
            LegendMarker::Dot => band.draw(&Circle::new((x + 10, mid), 5, entry.color.filled()))?,
        }
        band.draw(&Text::new(
            entry.label.clone(),
            (x + 28, mid - 7),
            ("sans-serif", 14).into_font(),
        ))?;
    }
    Ok(())
}

/// Legend entries for time series drawn by `draw_time_chart`.
pub(crate) fn line_entries(series: &[TimedSeries]) -> Vec<LegendEntry> {
    series
        .iter()
        .map(|s| LegendEntry {
            label: s.instance.clone(),
            color: series_color(s.color_index),
            marker: LegendMarker::Line,
        })
        .collect()
}

/// A text label tied to a data point, in backend pixels.
#[derive(Debug, Clone)]
pub(crate) struct Annotation {
    pub anchor: (i32, i32),
    pub text: String,
    pub color: RGBColor,
}

/// Place `annotations` above their anchors, separate overlapping labels
/// inside `area`, and draw them on `root`. A label that ended up away from
/// its anchor gets a grey leader line.
pub(crate) fn draw_annotations(
    root: &DrawingArea<BitMapBackend<'_>, Shift>,
    area: (Range<i32>, Range<i32>),
    annotations: &[Annotation],
) -> DrawResult {
    let font_px = constants::ANNOTATION_FONT_SIZE;
    let mut boxes: Vec<layout::LabelBox> = annotations
        .iter()
        .map(|a| {
            let (w, h) = layout::estimate_text_size(&a.text, font_px);
            layout::LabelBox::above((f64::from(a.anchor.0), f64::from(a.anchor.1)), w, h)
        })
        .collect();
    let initial = boxes.clone();

    let bounds = layout::Bounds {
        left: f64::from(area.0.start),
        top: f64::from(area.1.start),
        right: f64::from(area.0.end),
        bottom: f64::from(area.1.end),
    };
    let passes = layout::repel(&mut boxes, &bounds);
    tracing::trace!(labels = boxes.len(), passes, "Annotation layout done");

    for ((annotation, placed), start) in annotations.iter().zip(&boxes).zip(&initial) {
        let (cx, cy) = placed.center();
        let (sx, sy) = start.center();
        if (cx - sx).hypot(cy - sy) > placed.height {
            let bottom = (cx as i32, (placed.y + placed.height) as i32);
            root.draw(&PathElement::new(
                vec![annotation.anchor, bottom],
                RGBColor(128, 128, 128).stroke_width(1),
            ))?;
        }
        root.draw(&Text::new(
            annotation.text.clone(),
            (placed.x as i32, placed.y as i32),
            ("sans-serif", font_px).into_font().color(&annotation.color),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RunRecord;
    use crate::core::table::assemble;

    fn record(instance: &str, raw_ts: &str, objective: f64) -> RunRecord {
        RunRecord {
            instance: instance.to_string(),
            file: format!("run_{raw_ts}"),
            raw_timestamp: raw_ts.to_string(),
            feasible: "True".to_string(),
            objective,
            execution_time: 1.0,
        }
    }

    #[test]
    fn test_timed_series_skips_untimed_rows() {
        let table = assemble(vec![
            record("a", "2024-01-01_00-00-00", 1.0),
            record("b", "Unknown", 2.0),
            record("a", "2024-01-02_00-00-00", 3.0),
        ]);
        let values: Vec<Option<f64>> = table.rows().iter().map(|r| Some(r.objective)).collect();
        let series = timed_series(&table, &values);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].instance, "a");
        assert_eq!(series[0].color_index, 0);
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[0].points[1].0 - series[0].points[0].0, 86_400.0);
    }

    #[test]
    fn test_timed_series_skips_missing_values() {
        let table = assemble(vec![
            record("a", "2024-01-01_00-00-00", 1.0),
            record("a", "2024-01-02_00-00-00", 3.0),
        ]);
        let series = timed_series(&table, &[None, Some(2.0)]);
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].1, 2.0);
    }

    #[test]
    fn test_padded_range_widens_degenerate_span() {
        assert_eq!(padded_range(0.0, 0.0, 0.1), -1.0..1.0);
        assert_eq!(padded_range(50.0, 50.0, 0.1), 45.0..55.0);
        assert_eq!(padded_range(0.0, 10.0, 0.1), -1.0..11.0);
    }

    #[test]
    fn test_time_ranges_single_instant() {
        let series = vec![TimedSeries {
            instance: "a".to_string(),
            color_index: 0,
            points: vec![(1_000_000.0, 0.5)],
        }];
        let (x, y) = time_ranges(&series, false);
        assert_eq!(x, 956_800.0..1_043_200.0);
        assert!(y.start < 0.5 && y.end > 0.5 && y.start > 0.0);

        let (_, y) = time_ranges(&series, true);
        assert!(y.start < 0.0 && y.end > 0.5);
    }

    #[test]
    fn test_format_epoch_round_trips_timestamp() {
        let ts = crate::core::timestamp::parse("2024-03-05_14-30-00").unwrap();
        assert_eq!(format_epoch(epoch_seconds(&ts)), "2024-03-05 14:30");
    }

    #[test]
    fn test_legend_band_sits_beside_the_chart() {
        let width = constants::DEFAULT_PLOT_WIDTH;
        let band = legend_band_width(width);
        assert_eq!(band, constants::LEGEND_BAND_WIDTH);
        assert!(width - band >= width / 2, "chart keeps most of the image");

        // The smallest accepted image still leaves room for the chart.
        let narrow = constants::MIN_PLOT_DIMENSION;
        assert_eq!(legend_band_width(narrow), narrow / 4);
    }

    #[test]
    fn test_legend_rows_stack_from_plot_top() {
        let rows = legend_rows(3, 40);
        assert_eq!(rows, vec![(10, 50), (10, 72), (10, 94)]);
        assert!(legend_rows(0, 40).is_empty());
    }

    #[test]
    fn test_line_entries_follow_series_colors() {
        let table = assemble(vec![
            record("a", "2024-01-01_00-00-00", 1.0),
            record("b", "2024-01-02_00-00-00", 2.0),
        ]);
        let values: Vec<Option<f64>> = table.rows().iter().map(|r| Some(r.objective)).collect();
        let entries = line_entries(&timed_series(&table, &values));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].label, "b");
        assert_eq!(entries[1].color, series_color(1));
        assert_eq!(entries[0].marker, LegendMarker::Line);
    }

    #[test]
    fn test_series_colors_differ() {
        assert_ne!(series_color(0), series_color(1));
    }
}
