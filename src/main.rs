// src/main.rs

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use beeswarm_csv_render::config::{FigureManifest, OutputFormat};
use beeswarm_csv_render::crate_version;
use beeswarm_csv_render::figure::run_figure;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Svg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

/// Render box-and-beeswarm group comparison figures from CSV sample tables.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Figure manifest (TOML, one [[figure]] table per figure)
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Directory holding the data files named in the manifest [default: manifest directory]
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for images and statistics CSVs
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Render only this figure (repeatable)
    #[arg(long = "figure", value_name = "NAME")]
    figures: Vec<String>,

    /// Image format
    #[arg(long, value_enum, default_value_t = FormatArg::Svg)]
    format: FormatArg,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!("beeswarm_csv_render {}", crate_version());

    let manifest = match FigureManifest::from_path(&args.manifest)
        .and_then(|manifest| manifest.select(&args.figures))
    {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let data_dir = args.data_dir.clone().unwrap_or_else(|| {
        args.manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let format = OutputFormat::from(args.format);

    let mut failed = Vec::new();
    for figure in &manifest.figures {
        match run_figure(figure, &data_dir, &args.out_dir, format) {
            Ok(report) => {
                if report.substituted_zeros > 0 {
                    tracing::info!(
                        "  {} zero value(s) drawn at the detection limit.",
                        report.substituted_zeros
                    );
                }
            }
            Err(e) => {
                eprintln!("Error: figure '{}' failed: {e}", figure.name);
                failed.push(figure.name.as_str());
            }
        }
    }

    if failed.is_empty() {
        tracing::info!("Rendered {} figure(s).", manifest.figures.len());
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{} of {} figure(s) failed: {}",
            failed.len(),
            manifest.figures.len(),
            failed.join(", ")
        );
        ExitCode::FAILURE
    }
}

// src/main.rs
