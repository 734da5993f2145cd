// src/constants.rs

use plotters::style::colors::{BLUE, RED};
use plotters::style::RGBColor;

// Output resolution used to convert figure sizes given in inches.
pub const DEFAULT_DPI: u32 = 100;
// Figure size in inches when a figure does not set one.
pub const DEFAULT_FIGURE_SIZE_IN: (f64, f64) = (3.0, 3.0);
// Lower bound on the rendered canvas so axis labels always fit.
pub const MIN_PLOT_WIDTH: u32 = 240;
pub const MIN_PLOT_HEIGHT: u32 = 240;

// --- Beeswarm layout defaults ---
pub const BEESWARM_DEFAULT_BINS: usize = 10;
pub const BEESWARM_DEFAULT_WIDTH: f64 = 0.25;
pub const BEESWARM_FALLBACK_STEP: f64 = 0.25;
// Samples per bin when the bin count is derived from the sample size.
pub const BEESWARM_AUTO_SAMPLES_PER_BIN: usize = 6;
// Upper limit accepted for a configured bin count.
pub const BEESWARM_MAX_BINS: usize = 10_000;

// --- Rank-sum test ---
// The exact null distribution is used when there are no ties and one sample is at most this size.
pub const RANK_SUM_EXACT_MAX_N: usize = 8;

// --- Box plot ---
pub const BOX_WIDTH: f64 = 0.5;
pub const WHISKER_IQR_FACTOR: f64 = 1.5;
pub const BOX_LINE_WIDTH: u32 = 1;
pub const BOX_CAP_FRACTION: f64 = 0.5; // Cap length relative to the box width

// --- Scatter points ---
pub const POINT_RADIUS_PX: i32 = 5;
pub const POINT_ALPHA: f64 = 0.5;

// --- Reference lines ---
pub const REFERENCE_LINE_WIDTH: u32 = 1;
pub const REFERENCE_LINE_DASH_SEGMENTS: usize = 30;
pub const REFERENCE_LINE_OVERHANG: f64 = 0.5; // Extends past the outer group centers

// --- Font sizes ---
pub const FONT_SIZE_CHART_TITLE: i32 = 16;
pub const FONT_SIZE_AXIS_LABEL: i32 = 12;
pub const FONT_SIZE_TICK_LABEL: i32 = 11;
pub const FONT_SIZE_MESSAGE: i32 = 14;

// --- Plot Color Assignments ---
pub const COLOR_BOX_OUTLINE: RGBColor = RGBColor(0, 0, 0);
pub const COLOR_MEDIAN: RGBColor = RGBColor(255, 127, 14); // Box median line
pub const COLOR_GRID: RGBColor = RGBColor(220, 220, 220);

// Manifest color names used when a group or reference line sets none.
pub const DEFAULT_GROUP_COLOR: &str = "black";
pub const DEFAULT_REFERENCE_LINE_COLOR: &str = "red";

// Named colors accepted in figure manifests besides `#rrggbb`.
pub const NAMED_COLORS: &[(&str, RGBColor)] = &[
    ("black", RGBColor(0, 0, 0)),
    ("white", RGBColor(255, 255, 255)),
    ("red", RED),
    ("blue", BLUE),
    ("purple", RGBColor(128, 0, 128)),
    ("gold", RGBColor(255, 215, 0)),
    ("green", RGBColor(0, 128, 0)),
    ("orange", RGBColor(255, 165, 0)),
    ("grey", RGBColor(128, 128, 128)),
    ("gray", RGBColor(128, 128, 128)),
];

// src/constants.rs
