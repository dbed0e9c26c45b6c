// PerfTrend - plot/scatter.rs
//
// Execution time against objective function value, coloured by instance.

use super::{DrawResult, LegendEntry, LegendMarker, PlotConfig};
use crate::core::model::RunTable;
use crate::core::stats;
use crate::util::error::PlotError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub fn render(table: &RunTable, path: &Path, config: &PlotConfig) -> Result<PathBuf, PlotError> {
    super::finish(path, draw(table, path, config))
}

fn draw(table: &RunTable, path: &Path, config: &PlotConfig) -> DrawResult {
    let times: Vec<f64> = table.rows().iter().map(|r| r.execution_time).collect();
    let objectives: Vec<f64> = table.rows().iter().map(|r| r.objective).collect();
    let (t_lo, t_hi) = stats::finite_range(&times).unwrap_or((0.0, 0.0));
    let (o_lo, o_hi) = stats::finite_range(&objectives).unwrap_or((0.0, 0.0));

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, band) = super::split_legend_band(&root);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .caption(
            "Relationship between Execution Time and Objective Function Value",
            ("sans-serif", 22).into_font(),
        )
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(
            super::padded_range(t_lo, t_hi, 0.05),
            super::padded_range(o_lo, o_hi, 0.08),
        )?;

    chart
        .configure_mesh()
        .x_desc("Execution Time (s)")
        .y_desc("Objective Function Value")
        .draw()?;

    let mut entries = Vec::new();
    for (idx, instance) in table.instances().into_iter().enumerate() {
        let color = super::series_color(idx);
        let points: Vec<(f64, f64)> = table
            .rows_for(instance)
            .map(|r| (r.execution_time, r.objective))
            .collect();
        chart.draw_series(points.into_iter().map(|p| Circle::new(p, 5, color.mix(0.7).filled())))?;
        entries.push(LegendEntry {
            label: instance.to_string(),
            color,
            marker: LegendMarker::Dot,
        });
    }

    let legend_top = chart.plotting_area().get_pixel_range().1.start;
    super::draw_legend(&band, legend_top, &entries)?;
    root.present()?;
    Ok(())
}
