// src/data_analysis/box_stats.rs

use ndarray::{Array1, Axis};
use ndarray_stats::interpolate::Linear;
use ndarray_stats::QuantileExt;
use noisy_float::types::n64;

use crate::constants::WHISKER_IQR_FACTOR;

/// Box-and-whisker summary of one sample. Outliers are not kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub n: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest data point within `WHISKER_IQR_FACTOR * IQR` below `q1`.
    pub whisker_low: f64,
    /// Highest data point within `WHISKER_IQR_FACTOR * IQR` above `q3`.
    pub whisker_high: f64,
}

impl BoxStats {
    /// Quartiles use linear interpolation between order statistics. NaN values are skipped.
    pub fn compute(sample: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = sample.iter().copied().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return None;
        }
        let mut values = Array1::from(finite);

        let mut quantile = |q: f64| -> Option<f64> {
            values
                .quantile_axis_skipnan_mut(Axis(0), n64(q), &Linear)
                .ok()
                .map(|a| a.into_scalar())
        };
        let q1 = quantile(0.25)?;
        let median = quantile(0.5)?;
        let q3 = quantile(0.75)?;

        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let whisker_low = values
            .iter()
            .copied()
            .filter(|v| *v >= low_fence)
            .fold(f64::INFINITY, f64::min)
            .min(q1);
        let whisker_high = values
            .iter()
            .copied()
            .filter(|v| *v <= high_fence)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(q3);

        Some(BoxStats {
            n: values.len(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
        })
    }
}

/// Smallest and largest finite values across all samples, if any.
pub fn value_extent<'a>(samples: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    let values: Vec<f64> = samples
        .into_iter()
        .flat_map(|s| s.iter().copied())
        .filter(|v| v.is_finite())
        .collect();
    let values = Array1::from(values);
    match (values.min(), values.max()) {
        (Ok(lo), Ok(hi)) => Some((*lo, *hi)),
        _ => None,
    }
}


// src/data_analysis/box_stats.rs
