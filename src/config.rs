// src/config.rs

//! Per-figure configuration.
//!
//! A figure is described either in code through [`FigureConfigBuilder`] or in a
//! TOML manifest holding one `[[figure]]` table per figure. Both paths end in
//! the same validation in [`FigureConfigBuilder::build`].

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    BEESWARM_MAX_BINS, BOX_WIDTH, DEFAULT_DPI, DEFAULT_FIGURE_SIZE_IN, DEFAULT_GROUP_COLOR,
    DEFAULT_REFERENCE_LINE_COLOR, NAMED_COLORS, POINT_ALPHA, POINT_RADIUS_PX,
};
use crate::data_analysis::beeswarm::{BeeswarmParams, BinCount, EdgeInclusion};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Figure '{figure}': {message}")]
    Invalid { figure: String, message: String },

    #[error("Figure '{figure}': unknown group '{label}' in comparison")]
    UnknownGroup { figure: String, label: String },

    #[error("Unrecognized color '{0}' (use a color name or #rrggbb)")]
    InvalidColor(String),

    #[error("Figure '{0}' is not defined in the manifest")]
    UnknownFigure(String),
}

fn check_bin_count(figure: &str, what: &str, nbins: usize) -> Result<(), ConfigError> {
    if (1..=BEESWARM_MAX_BINS).contains(&nbins) {
        Ok(())
    } else {
        Err(invalid(
            figure,
            format!("{what} needs between 1 and {BEESWARM_MAX_BINS} bins, got {nbins}"),
        ))
    }
}

fn invalid(figure: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        figure: figure.to_string(),
        message: message.into(),
    }
}

/// Parses a color name from `NAMED_COLORS` or a `#rrggbb` hex string.
pub fn parse_color(text: &str) -> Result<RGBColor, ConfigError> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(*color);
    }
    let hex = trimmed
        .strip_prefix('#')
        .filter(|h| h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| ConfigError::InvalidColor(text.to_string()))?;
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| ConfigError::InvalidColor(text.to_string()))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YScale {
    #[default]
    Linear,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// One plotted group: a labeled column of the data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub label: String,
    pub column: String,
    #[serde(default = "GroupSpec::default_color")]
    pub color: String,
    #[serde(default)]
    pub marker: MarkerShape,
    /// Overrides the figure's swarm bin count for this group only.
    #[serde(default)]
    pub nbins: Option<usize>,
}

impl GroupSpec {
    fn default_color() -> String {
        DEFAULT_GROUP_COLOR.to_string()
    }

    pub fn new(label: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            column: column.into(),
            color: Self::default_color(),
            marker: MarkerShape::Circle,
            nbins: None,
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn marker(mut self, marker: MarkerShape) -> Self {
        self.marker = marker;
        self
    }

    pub fn nbins(mut self, nbins: usize) -> Self {
        self.nbins = Some(nbins);
        self
    }
}

/// Horizontal line across the groups, e.g. a detection limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceLine {
    pub y: f64,
    #[serde(default = "ReferenceLine::default_color")]
    pub color: String,
    #[serde(default = "ReferenceLine::default_dashed")]
    pub dashed: bool,
}

impl ReferenceLine {
    fn default_color() -> String {
        DEFAULT_REFERENCE_LINE_COLOR.to_string()
    }
    fn default_dashed() -> bool {
        true
    }

    pub fn dashed(y: f64) -> Self {
        Self {
            y,
            color: Self::default_color(),
            dashed: true,
        }
    }
}

/// Everything needed to render one comparison figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureConfig {
    pub name: String,
    /// CSV file relative to the data directory.
    pub data_file: PathBuf,
    pub title: Option<String>,
    pub groups: Vec<GroupSpec>,
    /// Pairs of group labels to test against each other.
    pub comparisons: Vec<(String, String)>,
    pub x_label: String,
    pub y_label: String,
    pub y_scale: YScale,
    pub y_limits: Option<(f64, f64)>,
    pub size_in: (f64, f64),
    pub dpi: u32,
    pub point_radius: i32,
    pub point_alpha: f64,
    pub box_width: f64,
    pub reference_lines: Vec<ReferenceLine>,
    /// Value substituted for exact zeros before plotting.
    pub detection_limit: Option<f64>,
    pub swarm: BeeswarmParams,
}

impl FigureConfig {
    pub fn builder(name: impl Into<String>) -> FigureConfigBuilder {
        FigureConfigBuilder::new(name)
    }

    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.size_in.0 * dpi).round() as u32,
            (self.size_in.1 * dpi).round() as u32,
        )
    }

    /// Swarm parameters for one group, honoring its bin override.
    pub fn swarm_params_for(&self, group: &GroupSpec) -> BeeswarmParams {
        match group.nbins {
            Some(n) => self.swarm.with_bins(BinCount::Fixed(n)),
            None => self.swarm,
        }
    }
}

/// Builder for [`FigureConfig`] with defaults from `constants.rs`.
pub struct FigureConfigBuilder {
    config: FigureConfig,
}

impl FigureConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            config: FigureConfig {
                data_file: PathBuf::from(format!("{name}.csv")),
                name,
                title: None,
                groups: Vec::new(),
                comparisons: Vec::new(),
                x_label: String::new(),
                y_label: String::new(),
                y_scale: YScale::Linear,
                y_limits: None,
                size_in: DEFAULT_FIGURE_SIZE_IN,
                dpi: DEFAULT_DPI,
                point_radius: POINT_RADIUS_PX,
                point_alpha: POINT_ALPHA,
                box_width: BOX_WIDTH,
                reference_lines: Vec::new(),
                detection_limit: None,
                swarm: BeeswarmParams::default(),
            },
        }
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn group(mut self, group: GroupSpec) -> Self {
        self.config.groups.push(group);
        self
    }

    pub fn compare(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.config.comparisons.push((a.into(), b.into()));
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.config.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.config.y_label = label.into();
        self
    }

    pub fn y_scale(mut self, scale: YScale) -> Self {
        self.config.y_scale = scale;
        self
    }

    pub fn y_limits(mut self, lo: f64, hi: f64) -> Self {
        self.config.y_limits = Some((lo, hi));
        self
    }

    pub fn size_in(mut self, width: f64, height: f64) -> Self {
        self.config.size_in = (width, height);
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn point_radius(mut self, radius: i32) -> Self {
        self.config.point_radius = radius;
        self
    }

    pub fn point_alpha(mut self, alpha: f64) -> Self {
        self.config.point_alpha = alpha;
        self
    }

    pub fn box_width(mut self, width: f64) -> Self {
        self.config.box_width = width;
        self
    }

    pub fn reference_line(mut self, line: ReferenceLine) -> Self {
        self.config.reference_lines.push(line);
        self
    }

    pub fn detection_limit(mut self, sentinel: f64) -> Self {
        self.config.detection_limit = Some(sentinel);
        self
    }

    pub fn swarm(mut self, params: BeeswarmParams) -> Self {
        self.config.swarm = params;
        self
    }

    pub fn build(self) -> Result<FigureConfig, ConfigError> {
        let config = self.config;
        let name = config.name.as_str();

        if name.trim().is_empty() {
            return Err(invalid(name, "figure name must not be empty"));
        }
        // The name becomes the output file stem
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid(name, "figure name must not contain path separators"));
        }
        if config.groups.is_empty() {
            return Err(invalid(name, "at least one group is required"));
        }

        let mut labels = HashSet::new();
        for group in &config.groups {
            if !labels.insert(group.label.as_str()) {
                return Err(invalid(name, format!("duplicate group '{}'", group.label)));
            }
            parse_color(&group.color)?;
            if let Some(nbins) = group.nbins {
                check_bin_count(name, &format!("group '{}'", group.label), nbins)?;
            }
        }
        if let BinCount::Fixed(nbins) = config.swarm.bins {
            check_bin_count(name, "swarm", nbins)?;
        }

        for (a, b) in &config.comparisons {
            for label in [a, b] {
                if !labels.contains(label.as_str()) {
                    return Err(ConfigError::UnknownGroup {
                        figure: name.to_string(),
                        label: label.clone(),
                    });
                }
            }
            if a == b {
                return Err(invalid(name, format!("group '{a}' compared with itself")));
            }
        }

        if let Some((lo, hi)) = config.y_limits {
            if !(lo < hi) {
                return Err(invalid(name, format!("y limits {lo}..{hi} are empty")));
            }
            if config.y_scale == YScale::Log && lo <= 0.0 {
                return Err(invalid(name, "log scale needs a positive lower y limit"));
            }
        }

        if let Some(sentinel) = config.detection_limit {
            if !(sentinel > 0.0 && sentinel.is_finite()) {
                return Err(invalid(name, "detection limit must be a positive number"));
            }
        }

        for line in &config.reference_lines {
            parse_color(&line.color)?;
            if config.y_scale == YScale::Log && line.y <= 0.0 {
                return Err(invalid(
                    name,
                    format!("reference line at {} cannot be drawn on a log axis", line.y),
                ));
            }
        }

        let (w, h) = config.size_in;
        if !(w > 0.0 && h > 0.0) || config.dpi == 0 {
            return Err(invalid(name, "figure size and dpi must be positive"));
        }
        if !(0.0..=1.0).contains(&config.point_alpha) {
            return Err(invalid(name, "point alpha must be within 0..=1"));
        }
        if !(config.box_width > 0.0) {
            return Err(invalid(name, "box width must be positive"));
        }
        if !(config.swarm.width >= 0.0 && config.swarm.width.is_finite()) {
            return Err(invalid(name, "swarm width must be a non-negative number"));
        }

        Ok(config)
    }
}

// --- TOML manifest ---

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SwarmEntry {
    width: Option<f64>,
    /// Fixed bin count; `"auto"` is expressed with `auto_bins = true`.
    nbins: Option<usize>,
    #[serde(default)]
    auto_bins: bool,
    edge: Option<EdgeInclusion>,
    fallback_step: Option<f64>,
}

impl SwarmEntry {
    fn into_params(self) -> BeeswarmParams {
        let mut params = BeeswarmParams::default();
        if let Some(width) = self.width {
            params.width = width;
        }
        if self.auto_bins {
            params.bins = BinCount::Auto;
        } else if let Some(n) = self.nbins {
            params.bins = BinCount::Fixed(n);
        }
        if let Some(edge) = self.edge {
            params.edge = edge;
        }
        if let Some(step) = self.fallback_step {
            params.fallback_step = step;
        }
        params
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FigureEntry {
    name: String,
    data: Option<PathBuf>,
    title: Option<String>,
    #[serde(default)]
    x_label: String,
    #[serde(default)]
    y_label: String,
    #[serde(default)]
    y_scale: YScale,
    y_limits: Option<[f64; 2]>,
    size_in: Option<[f64; 2]>,
    dpi: Option<u32>,
    point_radius: Option<i32>,
    point_alpha: Option<f64>,
    box_width: Option<f64>,
    detection_limit: Option<f64>,
    #[serde(default)]
    swarm: SwarmEntry,
    #[serde(default, rename = "group")]
    groups: Vec<GroupSpec>,
    #[serde(default)]
    comparisons: Vec<(String, String)>,
    #[serde(default, rename = "reference_line")]
    reference_lines: Vec<ReferenceLine>,
}

impl FigureEntry {
    fn into_config(self) -> Result<FigureConfig, ConfigError> {
        let mut builder = FigureConfig::builder(self.name)
            .x_label(self.x_label)
            .y_label(self.y_label)
            .y_scale(self.y_scale)
            .swarm(self.swarm.into_params());

        if let Some(data) = self.data {
            builder = builder.data_file(data);
        }
        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some([lo, hi]) = self.y_limits {
            builder = builder.y_limits(lo, hi);
        }
        if let Some([w, h]) = self.size_in {
            builder = builder.size_in(w, h);
        }
        if let Some(dpi) = self.dpi {
            builder = builder.dpi(dpi);
        }
        if let Some(radius) = self.point_radius {
            builder = builder.point_radius(radius);
        }
        if let Some(alpha) = self.point_alpha {
            builder = builder.point_alpha(alpha);
        }
        if let Some(width) = self.box_width {
            builder = builder.box_width(width);
        }
        if let Some(sentinel) = self.detection_limit {
            builder = builder.detection_limit(sentinel);
        }
        for group in self.groups {
            builder = builder.group(group);
        }
        for (a, b) in self.comparisons {
            builder = builder.compare(a, b);
        }
        for line in self.reference_lines {
            builder = builder.reference_line(line);
        }
        builder.build()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default, rename = "figure")]
    figures: Vec<FigureEntry>,
}

/// An ordered set of validated figure configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureManifest {
    pub figures: Vec<FigureConfig>,
}

impl FigureManifest {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ManifestFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })?;
        let figures = file
            .figures
            .into_iter()
            .map(FigureEntry::into_config)
            .collect::<Result<Vec<_>, _>>()?;

        let mut names = HashSet::new();
        for figure in &figures {
            if !names.insert(figure.name.as_str()) {
                return Err(invalid(&figure.name, "figure defined more than once"));
            }
        }
        Ok(Self { figures })
    }

    /// Keeps only the named figures, in manifest order. An empty selection keeps all.
    pub fn select(self, names: &[String]) -> Result<Self, ConfigError> {
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.figures.iter().any(|f| &f.name == *n))
        {
            return Err(ConfigError::UnknownFigure(unknown.clone()));
        }
        if names.is_empty() {
            return Ok(self);
        }
        let figures = self
            .figures
            .into_iter()
            .filter(|f| names.contains(&f.name))
            .collect();
        Ok(Self { figures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[[figure]]
name = "Figure2A"
x_label = "Strain"
y_label = "Transformation Efficiency"
y_scale = "log"
y_limits = [1e-6, 1.0]
size_in = [2.0, 3.0]
comparisons = [["WT", "pilU"]]

[[figure.group]]
label = "WT"
column = "WT"
nbins = 1

[[figure.group]]
label = "pilU"
column = "pilU"
color = "blue"

[[figure.reference_line]]
y = 4e-4
"#;

    #[test]
    fn parses_manifest_into_validated_figures() {
        let manifest = FigureManifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.figures.len(), 1);

        let fig = &manifest.figures[0];
        assert_eq!(fig.name, "Figure2A");
        assert_eq!(fig.data_file, PathBuf::from("Figure2A.csv"));
        assert_eq!(fig.y_scale, YScale::Log);
        assert_eq!(fig.y_limits, Some((1e-6, 1.0)));
        assert_eq!(fig.pixel_size(), (200, 300));
        assert_eq!(fig.groups[1].color, "blue");
        assert_eq!(fig.comparisons, vec![("WT".to_string(), "pilU".to_string())]);
        assert_eq!(fig.reference_lines, vec![ReferenceLine::dashed(4e-4)]);
        assert_eq!(fig.swarm_params_for(&fig.groups[0]).bins, BinCount::Fixed(1));
        assert_eq!(fig.swarm_params_for(&fig.groups[1]).bins, BinCount::Fixed(10));
    }

    #[test]
    fn comparisons_must_name_groups() {
        let err = FigureConfig::builder("F")
            .group(GroupSpec::new("a", "A"))
            .compare("a", "b")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGroup { ref label, .. } if label == "b"));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let err = FigureConfig::builder("F")
            .group(GroupSpec::new("a", "A"))
            .group(GroupSpec::new("a", "B"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate group 'a'"));
    }

    #[test]
    fn log_scale_rejects_non_positive_limits() {
        let err = FigureConfig::builder("F")
            .group(GroupSpec::new("a", "A"))
            .y_scale(YScale::Log)
            .y_limits(0.0, 1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn figure_without_groups_is_rejected() {
        assert!(FigureConfig::builder("F").build().is_err());
    }

    #[test]
    fn colors_parse_by_name_and_hex() {
        assert_eq!(parse_color("Black").unwrap(), RGBColor(0, 0, 0));
        assert_eq!(parse_color("#ff8000").unwrap(), RGBColor(255, 128, 0));
        assert!(parse_color("#ff80").is_err());
        assert!(parse_color("chartreuse-ish").is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = "[[figure]]\nname = \"F\"\ncolour = \"red\"\n";
        assert!(matches!(
            FigureManifest::from_toml_str(text),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn select_filters_and_checks_names() {
        let manifest = FigureManifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.clone().select(&[]).unwrap().figures.len(), 1);
        assert!(matches!(
            manifest.select(&["Figure9".to_string()]),
            Err(ConfigError::UnknownFigure(_))
        ));
    }

    #[test]
    fn bin_counts_are_bounded() {
        let err = FigureConfig::builder("F")
            .group(GroupSpec::new("a", "A").nbins(0))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("group 'a' needs between 1 and"));

        let text = "[[figure]]\nname = \"F\"\n[figure.swarm]\nnbins = 9000000000000000000\n\
                    [[figure.group]]\nlabel = \"a\"\ncolumn = \"A\"\n";
        assert!(matches!(
            FigureManifest::from_toml_str(text),
            Err(ConfigError::Invalid { .. })
        ));

        let ok = FigureConfig::builder("F")
            .group(GroupSpec::new("a", "A").nbins(BEESWARM_MAX_BINS))
            .swarm(BeeswarmParams::default().with_bins(BinCount::Auto))
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn figure_names_stay_inside_output_directory() {
        for name in ["../escape", "a/b", "a\\b", ".."] {
            let err = FigureConfig::builder(name)
                .group(GroupSpec::new("a", "A"))
                .build()
                .unwrap_err();
            assert!(err.to_string().contains("path separators"), "{name}");
        }
    }

    #[test]
    fn edge_rule_reads_from_swarm_table() {
        let text = "[[figure]]\nname = \"F\"\n[figure.swarm]\nedge = \"lower\"\n\
                    [[figure.group]]\nlabel = \"a\"\ncolumn = \"A\"\n";
        let manifest = FigureManifest::from_toml_str(text).unwrap();
        assert_eq!(manifest.figures[0].swarm.edge, EdgeInclusion::Lower);
    }

    #[test]
    fn swarm_table_maps_to_params() {
        let entry = SwarmEntry {
            width: Some(0.3),
            nbins: Some(4),
            auto_bins: false,
            edge: Some(EdgeInclusion::Lower),
            fallback_step: None,
        };
        let params = entry.into_params();
        assert_eq!(params.width, 0.3);
        assert_eq!(params.bins, BinCount::Fixed(4));
        assert_eq!(params.edge, EdgeInclusion::Lower);
    }
}

// src/config.rs
