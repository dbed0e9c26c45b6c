// PerfTrend - plot/distribution.rs
//
// Histogram of all objective function values with a kernel density curve
// scaled to the bar heights.

use super::{DrawResult, PlotConfig};
use crate::core::model::RunTable;
use crate::core::stats::{self, Histogram};
use crate::util::constants;
use crate::util::error::PlotError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub fn render(table: &RunTable, path: &Path, config: &PlotConfig) -> Result<PathBuf, PlotError> {
    super::finish(path, draw(table, path, config))
}

/// Density curve in count units: `density * n * bin_width`, so its area
/// matches the histogram's.
pub(crate) fn density_in_counts(values: &[f64], hist: &Histogram) -> Vec<(f64, f64)> {
    let n = values.iter().filter(|v| v.is_finite()).count() as f64;
    let scale = n * hist.bin_width();
    stats::gaussian_kde(values, constants::KDE_SAMPLE_POINTS)
        .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect())
        .unwrap_or_default()
}

fn draw(table: &RunTable, path: &Path, config: &PlotConfig) -> DrawResult {
    let values: Vec<f64> = table.rows().iter().map(|r| r.objective).collect();
    let hist = stats::histogram(&values, config.histogram_bins)
        .ok_or("no finite objective values to bin")?;
    let curve = density_in_counts(&values, &hist);

    let (x_lo, x_hi) = match (hist.edges.first(), hist.edges.last()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => return Err("histogram has no bin edges".into()),
    };
    let y_top = curve
        .iter()
        .map(|p| p.1)
        .fold(hist.max_count() as f64, f64::max)
        * 1.1;

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(15)
        .caption("Distribution of Objective Function Values", ("sans-serif", 22).into_font())
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(super::padded_range(x_lo, x_hi, 0.02), 0.0..y_top.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Objective Function Value")
        .y_desc("Frequency")
        .draw()?;

    let bars = hist.counts.iter().enumerate().filter(|(_, c)| **c > 0);
    chart.draw_series(bars.clone().map(|(i, &count)| {
        Rectangle::new(
            [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
            BLUE.mix(0.4).filled(),
        )
    }))?;
    chart.draw_series(bars.map(|(i, &count)| {
        Rectangle::new(
            [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
            BLUE.stroke_width(1),
        )
    }))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, BLUE.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}
