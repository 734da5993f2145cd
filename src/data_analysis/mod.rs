// src/data_analysis/mod.rs

pub mod beeswarm;
pub mod box_stats;
pub mod rank_sum;
pub mod sentinel;

// src/data_analysis/mod.rs
