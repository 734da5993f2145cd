// src/figure.rs

//! One figure from start to finish: table in, statistics printed, image and
//! statistics CSV out.

use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{FigureConfig, OutputFormat};
use crate::data_analysis::beeswarm::beeswarm_offsets;
use crate::data_analysis::box_stats::BoxStats;
use crate::data_analysis::rank_sum::{mann_whitney_u, RankSumResult};
use crate::data_analysis::sentinel::substitute_zeros_in_place;
use crate::data_input::sample_table::SampleTable;
use crate::plot_functions::plot_group_comparison::plot_group_comparison;
use crate::types::{GroupLayout, SampleGroups};

/// Rank-sum test between two groups, on the values as measured.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub first: String,
    pub second: String,
    /// `None` when one of the groups has no values.
    pub result: Option<RankSumResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureReport {
    pub name: String,
    pub image_path: PathBuf,
    pub stats_path: PathBuf,
    pub comparisons: Vec<ComparisonReport>,
    pub layouts: Vec<GroupLayout>,
    /// Zeros replaced by the detection limit before plotting.
    pub substituted_zeros: usize,
}

#[derive(Serialize)]
struct StatsRow<'a> {
    kind: &'a str,
    group: &'a str,
    compared_with: Option<&'a str>,
    n: Option<usize>,
    median: Option<f64>,
    q1: Option<f64>,
    q3: Option<f64>,
    whisker_low: Option<f64>,
    whisker_high: Option<f64>,
    statistic: Option<f64>,
    p_value: Option<f64>,
    method: Option<String>,
}

impl<'a> StatsRow<'a> {
    fn group(layout: &'a GroupLayout) -> Self {
        let stats = layout.box_stats;
        StatsRow {
            kind: "group",
            group: &layout.label,
            compared_with: None,
            n: Some(layout.values.len()),
            median: stats.map(|s| s.median),
            q1: stats.map(|s| s.q1),
            q3: stats.map(|s| s.q3),
            whisker_low: stats.map(|s| s.whisker_low),
            whisker_high: stats.map(|s| s.whisker_high),
            statistic: None,
            p_value: None,
            method: None,
        }
    }

    fn comparison(report: &'a ComparisonReport) -> Self {
        StatsRow {
            kind: "comparison",
            group: &report.first,
            compared_with: Some(&report.second),
            n: None,
            median: None,
            q1: None,
            q3: None,
            whisker_low: None,
            whisker_high: None,
            statistic: report.result.as_ref().map(|r| r.statistic),
            p_value: report.result.as_ref().map(|r| r.p_value),
            method: report.result.as_ref().map(|r| r.method.to_string()),
        }
    }
}

fn write_stats_csv(
    path: &Path,
    layouts: &[GroupLayout],
    comparisons: &[ComparisonReport],
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for layout in layouts {
        writer.serialize(StatsRow::group(layout))?;
    }
    for report in comparisons {
        writer.serialize(StatsRow::comparison(report))?;
    }
    writer.flush()?;
    Ok(())
}

/// Runs the configured rank-sum tests and prints each result.
pub fn compare_groups(config: &FigureConfig, groups: &SampleGroups) -> Vec<ComparisonReport> {
    config
        .comparisons
        .iter()
        .map(|(first, second)| {
            let x = groups.get(first).unwrap_or_default();
            let y = groups.get(second).unwrap_or_default();
            let result = mann_whitney_u(x, y);
            match &result {
                Some(r) => println!("{}: {first} vs {second}: {r}", config.name),
                None => println!(
                    "{}: {first} vs {second}: not tested, a group has no values",
                    config.name
                ),
            }
            ComparisonReport {
                first: first.clone(),
                second: second.clone(),
                result,
            }
        })
        .collect()
}

/// Swarm offsets and box summaries for each group, in figure order.
pub fn layout_groups(config: &FigureConfig, groups: &SampleGroups) -> Vec<GroupLayout> {
    config
        .groups
        .iter()
        .map(|spec| {
            let values = groups.get(&spec.label).unwrap_or_default().to_vec();
            let offsets = beeswarm_offsets(&values, &config.swarm_params_for(spec));
            GroupLayout {
                label: spec.label.clone(),
                box_stats: BoxStats::compute(&values),
                values,
                offsets,
            }
        })
        .collect()
}

/// Renders one figure into `out_dir` as `<name>.<ext>` plus `<name>_stats.csv`.
///
/// Rank-sum tests see the measured values; the detection-limit substitution
/// only affects what is drawn.
pub fn run_figure(
    config: &FigureConfig,
    data_dir: &Path,
    out_dir: &Path,
    format: OutputFormat,
) -> Result<FigureReport, Box<dyn Error>> {
    let data_path = data_dir.join(&config.data_file);
    tracing::info!("Figure '{}': reading {}", config.name, data_path.display());
    let table = SampleTable::from_path(&data_path)?;
    let mut groups = table.groups(
        config
            .groups
            .iter()
            .map(|g| (g.label.as_str(), g.column.as_str())),
    )?;

    for (label, _) in groups.iter().filter(|(_, v)| v.is_empty()) {
        tracing::warn!("Figure '{}': group '{}' has no values", config.name, label);
    }

    let comparisons = compare_groups(config, &groups);

    let substituted_zeros = match config.detection_limit {
        Some(sentinel) => {
            let count = substitute_zeros_in_place(&mut groups, sentinel);
            tracing::debug!(
                "Figure '{}': {} zero value(s) shown at {:e}",
                config.name,
                count,
                sentinel
            );
            count
        }
        None => 0,
    };

    let layouts = layout_groups(config, &groups);

    fs::create_dir_all(out_dir)?;
    let image_path = out_dir.join(format!("{}.{}", config.name, format.extension()));
    plot_group_comparison(config, &layouts, &image_path, format)?;

    let stats_path = out_dir.join(format!("{}_stats.csv", config.name));
    write_stats_csv(&stats_path, &layouts, &comparisons)?;
    tracing::info!("  Statistics saved as '{}'.", stats_path.display());

    Ok(FigureReport {
        name: config.name.clone(),
        image_path,
        stats_path,
        comparisons,
        layouts,
        substituted_zeros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupSpec;

    fn config() -> FigureConfig {
        FigureConfig::builder("Figure1D")
            .group(GroupSpec::new("Label", "L"))
            .group(GroupSpec::new("DNA", "D"))
            .compare("Label", "DNA")
            .detection_limit(1e-5)
            .build()
            .unwrap()
    }

    fn groups() -> SampleGroups {
        [
            ("Label".to_string(), vec![0.0, 0.0, 1e-4]),
            ("DNA".to_string(), vec![0.01, 0.02, 0.03]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn comparisons_use_configured_pairs() {
        let reports = compare_groups(&config(), &groups());
        assert_eq!(reports.len(), 1);
        let result = reports[0].result.as_ref().unwrap();
        assert_eq!(result.statistic, 0.0);
    }

    #[test]
    fn layouts_follow_group_order() {
        let layouts = layout_groups(&config(), &groups());
        assert_eq!(layouts[0].label, "Label");
        assert_eq!(layouts[1].values, vec![0.01, 0.02, 0.03]);
        assert_eq!(layouts[1].offsets.len(), 3);
        assert_eq!(layouts[1].box_stats.map(|s| s.median), Some(0.02));
    }

    #[test]
    fn stats_csv_has_group_and_comparison_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.csv");
        let layouts = layout_groups(&config(), &groups());
        let comparisons = compare_groups(&config(), &groups());
        write_stats_csv(&path, &layouts, &comparisons).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("kind,group,compared_with,n,median"));
        assert!(lines[1].starts_with("group,Label,,3,"));
        assert!(lines[3].starts_with("comparison,Label,DNA,,"));
        // The two zeros are tied
        assert!(lines[3].ends_with(",asymptotic"));
    }
}

// src/figure.rs
