// PerfTrend - plot/variation.rs
//
// Execution time per run log for the instances whose execution time moved
// most between their first and last run. The x axis is categorical (one
// slot per file); every point after the first carries its percentage change
// against the instance's first execution time.

use super::{Annotation, DrawResult, LegendEntry, LegendMarker, PlotConfig};
use crate::core::model::RunTable;
use crate::core::stats::{self, FileAxis};
use crate::util::constants;
use crate::util::error::PlotError;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

pub fn render(table: &RunTable, path: &Path, config: &PlotConfig) -> Result<PathBuf, PlotError> {
    super::finish(path, draw(table, path, config))
}

/// Tick label for position `x` on the file axis; blank between slots.
pub(crate) fn file_label(files: &[String], x: f64) -> String {
    let slot = x.round();
    if slot < 0.0 || (x - slot).abs() > 1e-6 {
        return String::new();
    }
    files.get(slot as usize).cloned().unwrap_or_default()
}

/// Series data for the chart: the top-changing instances on a shared file
/// axis.
pub(crate) fn variation_axis(table: &RunTable, top: usize) -> FileAxis {
    let changes = stats::top_execution_time_changes(table, top);
    let selected: Vec<&str> = changes.iter().map(|c| c.instance.as_str()).collect();
    tracing::debug!(instances = ?selected, "Execution time variation selection");
    stats::execution_time_series(table, &selected)
}

fn draw(table: &RunTable, path: &Path, config: &PlotConfig) -> DrawResult {
    let axis = variation_axis(table, config.top_variation_instances);
    let slots = axis.files.len().max(1);

    let times: Vec<f64> = axis
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.execution_time))
        .collect();
    let (t_lo, t_hi) = stats::finite_range(&times).unwrap_or((0.0, 0.0));

    let root = BitMapBackend::new(
        path,
        (constants::VARIATION_PLOT_WIDTH, constants::VARIATION_PLOT_HEIGHT),
    )
    .into_drawing_area();
    root.fill(&WHITE)?;
    let (plot_area, band) = super::split_legend_band(&root);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .caption("Evolution of Execution Time", ("sans-serif", 22).into_font())
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            -0.5..(slots as f64 - 0.5),
            super::padded_range(t_lo, t_hi, 0.1),
        )?;

    let files = &axis.files;
    chart
        .configure_mesh()
        .x_desc("Files")
        .y_desc("Execution Time (s)")
        .x_labels(slots)
        .x_label_formatter(&|x: &f64| file_label(files, *x))
        .draw()?;

    // Colours follow table order so an instance matches the other charts.
    let instances = table.instances();
    let mut annotations = Vec::new();
    let mut entries = Vec::new();

    for s in &axis.series {
        let color_index = instances
            .iter()
            .position(|i| *i == s.instance)
            .unwrap_or_default();
        let color = super::series_color(color_index);
        let points: Vec<(f64, f64)> = s
            .points
            .iter()
            .map(|p| (p.file_index as f64, p.execution_time))
            .collect();

        chart.draw_series(LineSeries::new(points.iter().copied(), color.mix(0.7).stroke_width(2)))?;
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;

        for (p, coord) in s.points.iter().zip(&points) {
            if let Some(pct) = p.percent_from_first {
                annotations.push(Annotation {
                    anchor: chart.backend_coord(coord),
                    text: format!("{pct:.1}%"),
                    color: BLACK,
                });
            }
        }
        entries.push(LegendEntry {
            label: s.instance.clone(),
            color,
            marker: LegendMarker::Line,
        });
    }

    let area = chart.plotting_area().get_pixel_range();
    let legend_top = area.1.start;
    super::draw_annotations(&root, area, &annotations)?;
    super::draw_legend(&band, legend_top, &entries)?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::RunRecord;
    use crate::core::table::assemble;

    fn record(instance: &str, file: &str, time: f64) -> RunRecord {
        RunRecord {
            instance: instance.to_string(),
            file: file.to_string(),
            raw_timestamp: file.trim_start_matches("run_").to_string(),
            feasible: "True".to_string(),
            objective: 1.0,
            execution_time: time,
        }
    }

    #[test]
    fn test_file_label_only_on_slots() {
        let files = vec!["run_a".to_string(), "run_b".to_string()];
        assert_eq!(file_label(&files, 0.0), "run_a");
        assert_eq!(file_label(&files, 1.0), "run_b");
        assert_eq!(file_label(&files, 0.5), "");
        assert_eq!(file_label(&files, -0.5), "");
        assert_eq!(file_label(&files, 2.0), "");
    }

    #[test]
    fn test_variation_axis_keeps_top_instances() {
        let table = assemble(vec![
            record("steady", "run_2024-01-01_00-00-00", 10.0),
            record("jumpy", "run_2024-01-01_00-00-00", 10.0),
            record("steady", "run_2024-02-01_00-00-00", 10.5),
            record("jumpy", "run_2024-02-01_00-00-00", 30.0),
        ]);
        let axis = variation_axis(&table, 1);
        assert_eq!(axis.series.len(), 1);
        assert_eq!(axis.series[0].instance, "jumpy");
        assert_eq!(axis.series[0].points[1].percent_from_first, Some(200.0));
        assert_eq!(axis.files.len(), 2);
    }
}
