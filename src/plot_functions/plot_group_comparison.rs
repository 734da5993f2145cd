// src/plot_functions/plot_group_comparison.rs

use plotters::backend::{BitMapBackend, SVGBackend};
use plotters::drawing::IntoDrawingArea;
use std::error::Error;
use std::ops::Range;
use std::path::Path;

use crate::config::{parse_color, FigureConfig, OutputFormat, YScale};
use crate::constants::{MIN_PLOT_HEIGHT, MIN_PLOT_WIDTH};
use crate::data_analysis::box_stats::value_extent;
use crate::plot_framework::{
    calculate_log_range, calculate_range, draw_group_chart, GroupChartConfig, GroupSeries,
    HorizontalLine,
};
use crate::types::GroupLayout;

/// Y range when the figure does not fix one: padded data extent on a linear
/// axis, bounding decades on a log axis. Reference lines are kept in view.
pub fn default_y_range(config: &FigureConfig, layouts: &[GroupLayout]) -> Range<f64> {
    let line_values: Vec<f64> = config.reference_lines.iter().map(|l| l.y).collect();
    let samples = layouts
        .iter()
        .map(|l| l.values.as_slice())
        .chain(std::iter::once(line_values.as_slice()));

    match config.y_scale {
        YScale::Linear => match value_extent(samples) {
            Some((lo, hi)) => {
                let (lo, hi) = calculate_range(lo, hi);
                lo..hi
            }
            None => 0.0..1.0,
        },
        YScale::Log => {
            let positive: Vec<Vec<f64>> = samples
                .map(|s| s.iter().copied().filter(|v| *v > 0.0).collect())
                .collect();
            match value_extent(positive.iter().map(Vec::as_slice)) {
                Some((lo, hi)) => {
                    let (lo, hi) = calculate_log_range(lo, hi);
                    lo..hi
                }
                None => 0.1..1.0,
            }
        }
    }
}

fn build_chart_config(
    config: &FigureConfig,
    layouts: &[GroupLayout],
) -> Result<GroupChartConfig, Box<dyn Error>> {
    let y_range = match config.y_limits {
        Some((lo, hi)) => lo..hi,
        None => default_y_range(config, layouts),
    };

    let mut groups = Vec::with_capacity(layouts.len());
    for (i, (spec, layout)) in config.groups.iter().zip(layouts).enumerate() {
        let center = (i + 1) as f64;
        groups.push(GroupSeries {
            label: layout.label.clone(),
            center,
            points: layout.points(center),
            color: parse_color(&spec.color)?,
            marker: spec.marker,
            box_stats: layout.box_stats,
        });
    }

    let mut lines = Vec::with_capacity(config.reference_lines.len());
    for line in &config.reference_lines {
        lines.push(HorizontalLine {
            y: line.y,
            color: parse_color(&line.color)?,
            dashed: line.dashed,
        });
    }

    Ok(GroupChartConfig {
        title: config.title.clone(),
        x_label: config.x_label.clone(),
        y_label: config.y_label.clone(),
        y_range,
        log_y: config.y_scale == YScale::Log,
        groups,
        lines,
        point_radius: config.point_radius,
        point_alpha: config.point_alpha,
        box_width: config.box_width,
    })
}

/// Renders one box-and-swarm comparison figure to `output_path`.
///
/// `layouts` must be in the same order as `config.groups`.
pub fn plot_group_comparison(
    config: &FigureConfig,
    layouts: &[GroupLayout],
    output_path: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let chart_config = build_chart_config(config, layouts)?;
    let (width, height) = config.pixel_size();
    let size = (width.max(MIN_PLOT_WIDTH), height.max(MIN_PLOT_HEIGHT));

    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            draw_group_chart(&root, &chart_config)?;
            root.present()?;
        }
        OutputFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            draw_group_chart(&root, &chart_config)?;
            root.present()?;
        }
    }

    tracing::info!("  Figure saved as '{}'.", output_path.display());
    Ok(())
}


// src/plot_functions/plot_group_comparison.rs
