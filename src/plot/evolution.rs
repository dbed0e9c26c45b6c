// PerfTrend - plot/evolution.rs
//
// Objective function value over time, one line per instance, with the
// percentage change against the instance's previous point written next to
// each point.

use super::{Annotation, DrawResult, PlotConfig};
use crate::core::model::RunTable;
use crate::core::stats::{self, ChangeAnnotation};
use crate::util::error::PlotError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub fn render(table: &RunTable, path: &Path, config: &PlotConfig) -> Result<PathBuf, PlotError> {
    super::finish(path, draw(table, path, config))
}

/// Label text and colour: increases are blue with an up arrow, decreases
/// red with a down arrow.
pub(crate) fn change_label(note: &ChangeAnnotation) -> (String, RGBColor) {
    if note.percent >= 0.0 {
        (format!("{:.1}% ↑", note.percent.abs()), BLUE)
    } else {
        (format!("{:.1}% ↓", note.percent.abs()), RED)
    }
}

fn draw(table: &RunTable, path: &Path, config: &PlotConfig) -> DrawResult {
    let values: Vec<Option<f64>> = table.rows().iter().map(|r| Some(r.objective)).collect();
    let series = super::timed_series(table, &values);

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, band) = super::split_legend_band(&root);

    let chart = super::draw_time_chart(
        &plot_area,
        "Evolution of Objective Function Value per Instance",
        "Objective Function Value",
        &series,
        false,
    )?;

    let annotations: Vec<Annotation> = stats::objective_annotations(table)
        .iter()
        .map(|note| {
            let (text, color) = change_label(note);
            Annotation {
                anchor: chart.backend_coord(&(super::epoch_seconds(&note.timestamp), note.value)),
                text,
                color,
            }
        })
        .collect();
    let area = chart.plotting_area().get_pixel_range();
    let legend_top = area.1.start;

    super::draw_annotations(&root, area, &annotations)?;
    super::draw_legend(&band, legend_top, &super::line_entries(&series))?;
    root.present()?;
    Ok(())
}
