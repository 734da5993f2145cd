// src/plot_framework.rs

use plotters::backend::DrawingBackend;
use plotters::chart::{ChartBuilder, ChartContext};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::Ranged;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::element::{Circle, EmptyElement, PathElement, Polygon, Rectangle, Text};
use plotters::prelude::IntoLogRange;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;

use crate::config::MarkerShape;
use crate::constants::{
    BOX_CAP_FRACTION, BOX_LINE_WIDTH, COLOR_BOX_OUTLINE, COLOR_GRID, COLOR_MEDIAN,
    FONT_SIZE_MESSAGE, REFERENCE_LINE_DASH_SEGMENTS, REFERENCE_LINE_OVERHANG,
    REFERENCE_LINE_WIDTH,
};
use crate::data_analysis::box_stats::BoxStats;
use crate::font_config::{
    FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_MESSAGE, FONT_TUPLE_TICK_LABEL,
};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Smallest span of whole decades containing `[min_val, max_val]`.
/// Both values must be positive; at least one decade is always returned.
pub fn calculate_log_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let lo = min_val.min(max_val).log10().floor();
    let mut hi = min_val.max(max_val).log10().ceil();
    if hi <= lo {
        hi = lo + 1.0;
    }
    (10f64.powf(lo), 10f64.powf(hi))
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message<DB>(
    area: &DrawingArea<DB, Shift>,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;

    let start_x = (width / 2 - estimated_text_width / 2).max(0);
    let start_y = height / 2 - lines.len() as i32 * estimated_line_height / 2;

    let text_style = FONT_TUPLE_MESSAGE.into_font().color(&RED);
    for (i, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            *line,
            (start_x, start_y + i as i32 * estimated_line_height),
            text_style.clone(),
        ))?;
    }
    Ok(())
}

/// One group column: swarm points around `center` plus an optional box.
#[derive(Clone)]
pub struct GroupSeries {
    pub label: String,
    pub center: f64,
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub marker: MarkerShape,
    pub box_stats: Option<BoxStats>,
}

#[derive(Clone)]
pub struct HorizontalLine {
    pub y: f64,
    pub color: RGBColor,
    pub dashed: bool,
}

#[derive(Clone)]
pub struct GroupChartConfig {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub y_range: Range<f64>,
    pub log_y: bool,
    pub groups: Vec<GroupSeries>,
    pub lines: Vec<HorizontalLine>,
    pub point_radius: i32,
    pub point_alpha: f64,
    pub box_width: f64,
}

impl GroupChartConfig {
    /// Groups sit at x = 1, 2, ..., n with half a unit of room on either side.
    pub fn x_range(&self) -> Range<f64> {
        0.5..(self.groups.len() as f64 + 0.5)
    }
}

fn format_linear_tick(y: f64) -> String {
    if y.abs() >= 1000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if y.fract() == 0.0 {
        format!("{y:.0}")
    } else if y.abs() < 0.01 {
        format!("{y:.0e}")
    } else {
        format!("{y:.2}")
    }
}

fn format_log_tick(y: f64) -> String {
    format!("{y:.0e}")
}

/// Draws a box-and-swarm comparison chart on `area`.
///
/// Boxes go in first so the swarm points are drawn on top of them. On a log
/// axis, points at or below zero cannot be placed and are skipped.
pub fn draw_group_chart<DB>(
    area: &DrawingArea<DB, Shift>,
    config: &GroupChartConfig,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    area.fill(&WHITE)?;

    let has_points = config.groups.iter().any(|g| !g.points.is_empty());
    let valid_range = config.y_range.end > config.y_range.start
        && (!config.log_y || config.y_range.start > 0.0);
    if !has_points || !valid_range {
        let reason = if !has_points {
            "No data points"
        } else {
            "Invalid ranges"
        };
        return draw_unavailable_message(area, "Group Comparison", reason);
    }

    let mut builder = ChartBuilder::on(area);
    builder.margin(10).x_label_area_size(45).y_label_area_size(60);
    if let Some(title) = &config.title {
        builder.caption(title, FONT_TUPLE_CHART_TITLE.into_font());
    }

    if config.log_y {
        let mut chart = builder.build_cartesian_2d(
            config.x_range(),
            (config.y_range.start..config.y_range.end).log_scale(),
        )?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(&config.x_label)
            .y_desc(&config.y_label)
            .y_label_formatter(&|y| format_log_tick(*y))
            .bold_line_style(COLOR_GRID)
            .light_line_style(WHITE.mix(0.7))
            .label_style(FONT_TUPLE_TICK_LABEL.into_font())
            .axis_desc_style(FONT_TUPLE_AXIS_LABEL.into_font())
            .draw()?;
        draw_group_elements(&mut chart, config)?;
        draw_group_labels(area, &chart, config)?;
    } else {
        let mut chart = builder.build_cartesian_2d(config.x_range(), config.y_range.clone())?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(&config.x_label)
            .y_desc(&config.y_label)
            .y_labels(8)
            .y_label_formatter(&|y| format_linear_tick(*y))
            .bold_line_style(COLOR_GRID)
            .light_line_style(WHITE.mix(0.7))
            .label_style(FONT_TUPLE_TICK_LABEL.into_font())
            .axis_desc_style(FONT_TUPLE_AXIS_LABEL.into_font())
            .draw()?;
        draw_group_elements(&mut chart, config)?;
        draw_group_labels(area, &chart, config)?;
    }

    Ok(())
}

/// Points that have a position on the y axis; a log axis has none for y <= 0.
fn placeable_points(points: &[(f64, f64)], log_y: bool) -> Vec<(f64, f64)> {
    points
        .iter()
        .copied()
        .filter(|&(_, y)| !log_y || y > 0.0)
        .collect()
}

/// Boxes, reference lines and swarm points, in that order.
fn draw_group_elements<DB, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, Y>>,
    config: &GroupChartConfig,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
{
    let y_floor = config.y_range.start;
    let place = |y: f64| if config.log_y { y.max(y_floor) } else { y };
    let outline = COLOR_BOX_OUTLINE.stroke_width(BOX_LINE_WIDTH);
    let half_box = config.box_width / 2.0;
    let half_cap = half_box * BOX_CAP_FRACTION;

    for group in &config.groups {
        let Some(stats) = group.box_stats else {
            continue;
        };
        let c = group.center;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(c - half_box, place(stats.q1)), (c + half_box, place(stats.q3))],
            outline,
        )))?;
        let whisker_paths = vec![
            vec![(c, place(stats.q1)), (c, place(stats.whisker_low))],
            vec![(c, place(stats.q3)), (c, place(stats.whisker_high))],
            vec![
                (c - half_cap, place(stats.whisker_low)),
                (c + half_cap, place(stats.whisker_low)),
            ],
            vec![
                (c - half_cap, place(stats.whisker_high)),
                (c + half_cap, place(stats.whisker_high)),
            ],
        ];
        chart.draw_series(
            whisker_paths
                .into_iter()
                .map(|path| PathElement::new(path, outline)),
        )?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (c - half_box, place(stats.median)),
                (c + half_box, place(stats.median)),
            ],
            COLOR_MEDIAN.stroke_width(BOX_LINE_WIDTH + 1),
        )))?;
    }

    let x_start = 1.0 - REFERENCE_LINE_OVERHANG;
    let x_end = config.groups.len() as f64 + REFERENCE_LINE_OVERHANG;
    for line in &config.lines {
        let style = line.color.stroke_width(REFERENCE_LINE_WIDTH);
        if line.dashed {
            // Dashes are drawn as separate segments, half dash and half gap
            let segment_length = (x_end - x_start) / (REFERENCE_LINE_DASH_SEGMENTS as f64 * 2.0);
            chart.draw_series((0..REFERENCE_LINE_DASH_SEGMENTS).map(|i| {
                let seg_start = x_start + (i as f64 * 2.0) * segment_length;
                PathElement::new(
                    vec![(seg_start, line.y), (seg_start + segment_length, line.y)],
                    style,
                )
            }))?;
        } else {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x_start, line.y), (x_end, line.y)],
                style,
            )))?;
        }
    }

    let radius = config.point_radius;
    for group in &config.groups {
        let style = group.color.mix(config.point_alpha).filled();
        let placed = placeable_points(&group.points, config.log_y);
        let skipped = group.points.len() - placed.len();
        if skipped > 0 {
            tracing::warn!(
                "Group '{}': {} non-positive value(s) cannot be shown on a log axis",
                group.label,
                skipped
            );
        }

        match group.marker {
            MarkerShape::Circle => {
                chart.draw_series(placed.into_iter().map(|p| Circle::new(p, radius, style)))?;
            }
            MarkerShape::Diamond => {
                chart.draw_series(placed.into_iter().map(|p| {
                    EmptyElement::at(p)
                        + Polygon::new(
                            vec![(0, -radius), (radius, 0), (0, radius), (-radius, 0)],
                            style,
                        )
                }))?;
            }
        }
    }

    Ok(())
}

/// Group names under their x positions, in place of numeric x ticks.
fn draw_group_labels<DB, Y>(
    area: &DrawingArea<DB, Shift>,
    chart: &ChartContext<'_, DB, Cartesian2d<RangedCoordf64, Y>>,
    config: &GroupChartConfig,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: Ranged<ValueType = f64>,
{
    let area_offset = area.get_base_pixel();
    let style = FONT_TUPLE_TICK_LABEL
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for group in &config.groups {
        let (x, y) = chart.backend_coord(&(group.center, config.y_range.start));
        area.draw(&Text::new(
            group.label.as_str(),
            (x - area_offset.0, y - area_offset.1 + 6),
            style.clone(),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_padding_matches_fifteen_percent() {
        let (lo, hi) = calculate_range(0.0, 10.0);
        assert!((lo + 1.5).abs() < 1e-12);
        assert!((hi - 11.5).abs() < 1e-12);
        assert_eq!(calculate_range(2.0, 2.0), (1.5, 2.5));
    }

    #[test]
    fn log_range_snaps_to_decades() {
        let (lo, hi) = calculate_log_range(3e-5, 0.4);
        assert!((lo - 1e-5).abs() < 1e-18);
        assert!((hi - 1.0).abs() < 1e-12);

        let (lo, hi) = calculate_log_range(1e-3, 1e-3);
        assert!((lo - 1e-3).abs() < 1e-15);
        assert!((hi - 1e-2).abs() < 1e-15);
    }

    #[test]
    fn log_axis_drops_non_positive_points() {
        let points = [(1.0, 0.0), (1.1, 1e-3), (0.9, -2.0), (1.0, 0.5)];
        assert_eq!(
            placeable_points(&points, true),
            vec![(1.1, 1e-3), (1.0, 0.5)]
        );
        assert_eq!(placeable_points(&points, false), points.to_vec());
    }

    #[test]
    fn tick_labels_stay_short() {
        assert_eq!(format_log_tick(1e-6), "1e-6");
        assert_eq!(format_linear_tick(2.0), "2");
        assert_eq!(format_linear_tick(0.25), "0.25");
        assert_eq!(format_linear_tick(3000.0), "3k");
    }
}

// src/plot_framework.rs
