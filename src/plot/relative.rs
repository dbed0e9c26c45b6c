// PerfTrend - plot/relative.rs
//
// Relative change of the objective function value over time.

use super::{DrawResult, PlotConfig};
use crate::core::model::RunTable;
use crate::core::stats;
use crate::util::error::PlotError;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::{Path, PathBuf};

pub fn render(table: &RunTable, path: &Path, config: &PlotConfig) -> Result<PathBuf, PlotError> {
    super::finish(path, draw(table, path, config))
}

fn draw(table: &RunTable, path: &Path, config: &PlotConfig) -> DrawResult {
    let series = super::timed_series(table, &stats::relative_changes(table));

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, band) = super::split_legend_band(&root);

    let mut chart = super::draw_time_chart(
        &plot_area,
        "Relative Change of Objective Function Value",
        "Relative Change",
        &series,
        true,
    )?;

    // Zero reference across the whole x range.
    let x_range = chart.x_range();
    chart.draw_series(DashedLineSeries::new(
        vec![(x_range.start, 0.0), (x_range.end, 0.0)],
        8,
        6,
        RGBColor(128, 128, 128).stroke_width(1),
    ))?;

    let legend_top = chart.plotting_area().get_pixel_range().1.start;
    super::draw_legend(&band, legend_top, &super::line_entries(&series))?;
    root.present()?;
    Ok(())
}
