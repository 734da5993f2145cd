// src/data_input/mod.rs

pub mod sample_table;

// src/data_input/mod.rs
