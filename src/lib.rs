// src/lib.rs - Library interface for internal module access

pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod figure;
pub mod font_config;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

pub use config::{FigureConfig, FigureConfigBuilder, FigureManifest, OutputFormat};
pub use data_analysis::beeswarm::{beeswarm_offsets, BeeswarmParams, BinCount, EdgeInclusion};
pub use data_analysis::sentinel::{restore_zeros, substitute_zeros};
pub use figure::{run_figure, FigureReport};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
