// src/plot_functions/mod.rs

pub mod plot_group_comparison;

// src/plot_functions/mod.rs
