// tests/figure_pipeline_test.rs

use std::fs;
use std::path::Path;

use beeswarm_csv_render::config::{FigureManifest, OutputFormat};
use beeswarm_csv_render::data_analysis::rank_sum::RankSumMethod;
use beeswarm_csv_render::figure::run_figure;

const TABLE: &str = "\
Label-_DNA+,Label+_DNA-,Label+_DNA+,Blank
0.012,0,0.21,0
0.020,0,0.35,0
0.017,0.00004,0.18,
0.009,0,0.40,
0.015,,0.29,
";

const MANIFEST: &str = r#"
[[figure]]
name = "Figure1C"
data = "Figure1C.csv"
y_label = "Transformation Efficiency"
y_scale = "log"
y_limits = [1e-6, 1.0]
detection_limit = 1e-5
comparisons = [["DNA", "No_Label"], ["DNA", "No_DNA"]]

[[figure.group]]
label = "No_Label"
column = "Label-_DNA+"

[[figure.group]]
label = "No_DNA"
column = "Label+_DNA-"
color = "red"

[[figure.group]]
label = "DNA"
column = "Label+_DNA+"
color = "blue"

[[figure.group]]
label = "Blank"
column = "Blank"
marker = "diamond"

[[figure.reference_line]]
y = 1e-5

[[figure]]
name = "Broken"
data = "Figure1C.csv"

[[figure.group]]
label = "WT"
column = "no such column"
"#;

fn write_inputs(dir: &Path) -> FigureManifest {
    fs::write(dir.join("Figure1C.csv"), TABLE).unwrap();
    let manifest_path = dir.join("figures.toml");
    fs::write(&manifest_path, MANIFEST).unwrap();
    FigureManifest::from_path(&manifest_path).unwrap()
}

#[test]
fn renders_svg_and_statistics() {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let manifest = write_inputs(data_dir.path());

    let report = run_figure(
        &manifest.figures[0],
        data_dir.path(),
        out_dir.path(),
        OutputFormat::Svg,
    )
    .unwrap();

    assert_eq!(report.image_path, out_dir.path().join("Figure1C.svg"));
    let svg = fs::read_to_string(&report.image_path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("No_Label"));

    // Three zeros in No_DNA and two in Blank
    assert_eq!(report.substituted_zeros, 5);
    assert_eq!(report.layouts.len(), 4);
    assert_eq!(report.layouts[3].values, vec![1e-5, 1e-5]);
    assert_eq!(report.layouts[1].offsets.len(), 4);

    // DNA lies entirely above No_Label: U of DNA is n1 * n2
    let dna_vs_no_label = report.comparisons[0].result.as_ref().unwrap();
    assert_eq!(dna_vs_no_label.statistic, 25.0);
    assert_eq!(dna_vs_no_label.method, RankSumMethod::Exact);
    assert!((dna_vs_no_label.p_value - 2.0 / 252.0).abs() < 1e-12);

    // The tests run on the measured zeros, so No_DNA has ties
    let dna_vs_no_dna = report.comparisons[1].result.as_ref().unwrap();
    assert_eq!(dna_vs_no_dna.method, RankSumMethod::Asymptotic);

    let stats = fs::read_to_string(out_dir.path().join("Figure1C_stats.csv")).unwrap();
    assert_eq!(stats.lines().count(), 1 + 4 + 2);
    assert!(stats.lines().any(|l| l.starts_with("comparison,DNA,No_Label,")));
}

#[test]
fn missing_column_fails_only_that_figure() {
    let data_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let manifest = write_inputs(data_dir.path());

    let err = run_figure(
        &manifest.figures[1],
        data_dir.path(),
        out_dir.path(),
        OutputFormat::Svg,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no such column"));
    assert!(!out_dir.path().join("Broken.svg").exists());
}

#[test]
fn selecting_figures_by_name() {
    let data_dir = tempfile::tempdir().unwrap();
    let manifest = write_inputs(data_dir.path());
    let selected = manifest.select(&["Broken".to_string()]).unwrap();
    assert_eq!(selected.figures.len(), 1);
    assert_eq!(selected.figures[0].name, "Broken");
}

#[test]
fn demo_manifest_renders_every_figure() {
    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let manifest = FigureManifest::from_path(&demos.join("figures.toml")).unwrap();
    assert_eq!(manifest.figures.len(), 6);

    let out_dir = tempfile::tempdir().unwrap();
    for figure in &manifest.figures {
        let report = run_figure(figure, &demos.join("data"), out_dir.path(), OutputFormat::Svg)
            .unwrap_or_else(|e| panic!("{} failed: {e}", figure.name));
        assert!(report.image_path.exists());
        assert!(report.stats_path.exists());
    }
}

// tests/figure_pipeline_test.rs
