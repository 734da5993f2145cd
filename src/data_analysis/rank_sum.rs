// src/data_analysis/rank_sum.rs

use std::fmt;

use crate::constants::RANK_SUM_EXACT_MAX_N;

/// How the p-value of a rank-sum test was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankSumMethod {
    /// Exact permutation distribution of U (small samples without ties).
    Exact,
    /// Normal approximation with tie correction and continuity correction.
    Asymptotic,
}

impl fmt::Display for RankSumMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankSumMethod::Exact => write!(f, "exact"),
            RankSumMethod::Asymptotic => write!(f, "asymptotic"),
        }
    }
}

/// Two-sided Mann-Whitney U test result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankSumResult {
    /// U statistic of the first sample.
    pub statistic: f64,
    pub p_value: f64,
    pub method: RankSumMethod,
}

impl fmt::Display for RankSumResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MannwhitneyuResult(statistic={:?}, pvalue={:?})",
            self.statistic, self.p_value
        )
    }
}

/// Average ranks (1-based) of the pooled values, plus the tie term `sum(t^3 - t)`.
fn rank_with_ties(pooled: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..pooled.len()).collect();
    order.sort_by(|&a, &b| pooled[a].total_cmp(&pooled[b]));

    let mut ranks = vec![0.0; pooled.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && pooled[order[end + 1]] == pooled[order[start]] {
            end += 1;
        }
        let average_rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = average_rank;
        }
        let t = (end - start + 1) as f64;
        tie_term += t * t * t - t;
        start = end + 1;
    }
    (ranks, tie_term)
}

/// Frequencies of U = 0..=m*n under the null hypothesis, i.e. the coefficients of
/// the Gaussian binomial `[m+n choose m]`, built as a truncated power series.
fn exact_u_frequencies(m: usize, n: usize) -> Vec<f64> {
    let max_u = m * n;
    let mut freq = vec![0.0; max_u + 1];
    freq[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        if shift <= max_u {
            for k in (shift..=max_u).rev() {
                freq[k] -= freq[k - shift];
            }
        }
        for k in i..=max_u {
            freq[k] += freq[k - i];
        }
    }
    freq
}

/// Complementary error function, fractional error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Upper tail of the standard normal distribution.
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Two-sided Mann-Whitney U (Wilcoxon rank-sum) test of `x` against `y`.
///
/// Returns `None` if either sample is empty. The exact null distribution is
/// used when the pooled data has no ties and at least one sample has at most
/// eight observations; otherwise the tie-corrected normal approximation with
/// continuity correction is used.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Option<RankSumResult> {
    let (n1, n2) = (x.len(), y.len());
    if n1 == 0 || n2 == 0 {
        return None;
    }

    let pooled: Vec<f64> = x.iter().chain(y.iter()).copied().collect();
    let (ranks, tie_term) = rank_with_ties(&pooled);
    let rank_sum_x: f64 = ranks[..n1].iter().sum();

    let n1f = n1 as f64;
    let n2f = n2 as f64;
    let u1 = rank_sum_x - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;
    let u = u1.max(u2);

    let has_ties = tie_term > 0.0;
    let method = if !has_ties && n1.min(n2) <= RANK_SUM_EXACT_MAX_N {
        RankSumMethod::Exact
    } else {
        RankSumMethod::Asymptotic
    };

    let p_value = match method {
        RankSumMethod::Exact => {
            let freq = exact_u_frequencies(n1.min(n2), n1.max(n2));
            let total: f64 = freq.iter().sum();
            let from = (u.round() as usize).min(freq.len());
            let upper_tail: f64 = freq[from..].iter().sum();
            2.0 * upper_tail / total
        }
        RankSumMethod::Asymptotic => {
            let n = n1f + n2f;
            let mean = n1f * n2f / 2.0;
            let variance = n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
            if variance <= 0.0 {
                1.0
            } else {
                let z = (u - mean - 0.5) / variance.sqrt();
                2.0 * normal_sf(z)
            }
        }
    };

    Some(RankSumResult {
        statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_average_ties() {
        let (ranks, tie_term) = rank_with_ties(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
        assert_eq!(tie_term, 6.0);
    }

    #[test]
    fn exact_frequencies_sum_to_binomial() {
        let freq = exact_u_frequencies(3, 3);
        assert_eq!(freq.len(), 10);
        assert_eq!(freq.iter().sum::<f64>(), 20.0);
        assert_eq!(freq, vec![1.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn separated_small_samples_use_exact_distribution() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(result.method, RankSumMethod::Exact);
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 0.1).abs() < 1e-12);
    }

    #[test]
    fn larger_samples_use_normal_approximation() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = (11..=20).map(f64::from).collect();
        let result = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(result.method, RankSumMethod::Asymptotic);
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.826_717_9e-4).abs() < 1e-8);
    }

    #[test]
    fn ties_force_normal_approximation() {
        let result =
            mann_whitney_u(&[1.0, 2.0, 2.0, 3.0, 4.0], &[2.0, 3.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        assert_eq!(result.method, RankSumMethod::Asymptotic);
        assert_eq!(result.statistic, 4.5);
        assert!((result.p_value - 0.064_768_97).abs() < 1e-6);
    }

    #[test]
    fn all_tied_gives_p_of_one() {
        let result = mann_whitney_u(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.statistic, 4.5);
    }

    #[test]
    fn empty_sample_has_no_result() {
        assert!(mann_whitney_u(&[], &[1.0]).is_none());
    }

    #[test]
    fn display_matches_report_format() {
        let result = RankSumResult {
            statistic: 3.0,
            p_value: 0.25,
            method: RankSumMethod::Exact,
        };
        assert_eq!(
            result.to_string(),
            "MannwhitneyuResult(statistic=3.0, pvalue=0.25)"
        );
    }
}

// src/data_analysis/rank_sum.rs
