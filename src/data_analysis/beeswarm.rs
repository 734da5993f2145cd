// src/data_analysis/beeswarm.rs

use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::constants::{
    BEESWARM_AUTO_SAMPLES_PER_BIN, BEESWARM_DEFAULT_BINS, BEESWARM_DEFAULT_WIDTH,
    BEESWARM_FALLBACK_STEP,
};

/// How many value bins the swarm is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinCount {
    /// Always use this many bins (clamped to at least one).
    Fixed(usize),
    /// One bin per `BEESWARM_AUTO_SAMPLES_PER_BIN` samples, rounded up.
    Auto,
}

impl BinCount {
    pub fn resolve(self, sample_len: usize) -> usize {
        match self {
            BinCount::Fixed(n) => n.max(1),
            BinCount::Auto => sample_len.div_ceil(BEESWARM_AUTO_SAMPLES_PER_BIN).max(1),
        }
    }
}

/// Which bin a value lying exactly on an inner bin edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeInclusion {
    /// Bins are `(lo, hi]`: an edge value goes to the lower bin.
    #[default]
    Upper,
    /// Bins are `[lo, hi)`: an edge value goes to the upper bin.
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeeswarmParams {
    pub bins: BinCount,
    /// Maximum horizontal spread on either side of the group center.
    pub width: f64,
    pub edge: EdgeInclusion,
    /// Step used when no bin holds two or more points. Such bins are never
    /// shifted, so this value does not change the resulting offsets.
    pub fallback_step: f64,
}

impl Default for BeeswarmParams {
    fn default() -> Self {
        Self {
            bins: BinCount::Fixed(BEESWARM_DEFAULT_BINS),
            width: BEESWARM_DEFAULT_WIDTH,
            edge: EdgeInclusion::Upper,
            fallback_step: BEESWARM_FALLBACK_STEP,
        }
    }
}

impl BeeswarmParams {
    pub fn with_bins(mut self, bins: BinCount) -> Self {
        self.bins = bins;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_edge(mut self, edge: EdgeInclusion) -> Self {
        self.edge = edge;
        self
    }
}

/// Index of the bin holding `value`: the first of the `nbins - 1` inner bins
/// whose upper edge claims it, otherwise the last bin.
fn bin_index(value: f64, lo: f64, dy: f64, nbins: usize, edge: EdgeInclusion) -> usize {
    // Upper edges grow with the bin index, so whether a bin claims the value
    // is monotone and can be bisected.
    let claims = |j: usize| {
        let upper = lo + (j + 1) as f64 * dy;
        match edge {
            EdgeInclusion::Upper => value <= upper,
            EdgeInclusion::Lower => value < upper,
        }
    };
    let (mut first, mut last) = (0, nbins - 1);
    while first < last {
        let mid = first + (last - first) / 2;
        if claims(mid) {
            last = mid;
        } else {
            first = mid + 1;
        }
    }
    first
}

/// Splits sample indices into `nbins` equal-width value bins between the sample
/// minimum and maximum. Every index lands in exactly one bin; whatever an earlier
/// bin does not claim falls through to the last one. Only occupied bins are
/// returned, keyed by bin index, with members in sample order.
fn partition_into_bins(
    sample: &[f64],
    lo: f64,
    hi: f64,
    nbins: usize,
    edge: EdgeInclusion,
) -> BTreeMap<usize, Vec<usize>> {
    let nbins = nbins.max(1);
    let dy = (hi - lo) / nbins as f64;
    let mut bins: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &value) in sample.iter().enumerate() {
        bins.entry(bin_index(value, lo, dy, nbins, edge))
            .or_default()
            .push(i);
    }
    bins
}

/// Computes horizontal offsets for a beeswarm scatter of `sample`.
///
/// The returned vector is index-aligned with `sample`: plotting
/// `(center + offsets[i], sample[i])` spreads points sideways within value bins
/// while keeping their vertical position. Points of one bin are sorted by value
/// and dealt alternately to the right and left in steps of
/// `width / (nmax / 2)`, where `nmax` is the size of the fullest bin. In a bin
/// with an odd count the lowest point stays on the center line and the others
/// are shifted out by an extra third of a step.
///
/// The layout is deterministic and never fails: an empty sample gives an empty
/// vector, a single point gives `[0.0]`.
pub fn beeswarm_offsets(sample: &[f64], params: &BeeswarmParams) -> Vec<f64> {
    let n = sample.len();
    let mut offsets = vec![0.0; n];
    if n < 2 {
        return offsets;
    }

    let view = ArrayView1::from(sample);
    let (lo, hi) = match (view.min(), view.max()) {
        (Ok(lo), Ok(hi)) => (*lo, *hi),
        _ => {
            tracing::warn!("Beeswarm layout skipped: sample contains NaN, using zero offsets");
            return offsets;
        }
    };

    let nbins = params.bins.resolve(n);
    let bins = partition_into_bins(sample, lo, hi, nbins, params.edge);
    let nmax = bins.values().map(Vec::len).max().unwrap_or(0);

    let dx = match nmax / 2 {
        0 => params.fallback_step,
        half => params.width / half as f64,
    };

    for mut members in bins.into_values() {
        if members.len() < 2 {
            continue;
        }
        // Stable: equal values keep their original relative order.
        members.sort_by(|&a, &b| sample[a].total_cmp(&sample[b]));

        let parity = members.len() % 2;
        let bias = 0.5 + parity as f64 / 3.0;
        let right = members.iter().skip(parity).step_by(2);
        let left = members.iter().skip(parity + 1).step_by(2);

        for (step, (&r, &l)) in right.zip(left).enumerate() {
            let magnitude = (bias + step as f64) * dx;
            offsets[r] = magnitude;
            offsets[l] = -magnitude;
        }
    }

    offsets
}


// src/data_analysis/beeswarm.rs
