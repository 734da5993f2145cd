// tests/beeswarm_properties_test.rs

use beeswarm_csv_render::data_analysis::beeswarm::{
    beeswarm_offsets, BeeswarmParams, BinCount, EdgeInclusion,
};
use beeswarm_csv_render::data_analysis::sentinel::{restore_zeros, substitute_zeros};
use beeswarm_csv_render::types::SampleGroups;
use proptest::prelude::*;

fn params_strategy() -> impl Strategy<Value = BeeswarmParams> {
    (1usize..12, 0.01f64..1.0, any::<bool>(), any::<bool>()).prop_map(
        |(bins, width, auto, lower)| {
            BeeswarmParams::default()
                .with_bins(if auto {
                    BinCount::Auto
                } else {
                    BinCount::Fixed(bins)
                })
                .with_width(width)
                .with_edge(if lower {
                    EdgeInclusion::Lower
                } else {
                    EdgeInclusion::Upper
                })
        },
    )
}

fn sample_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop_oneof![
        prop::collection::vec(-1e3f64..1e3, 0..60),
        // Heavy ties, like detection-limit data
        prop::collection::vec(prop::sample::select(vec![0.0, 1e-5, 0.5, 2.0]), 0..40),
    ]
}

proptest! {
    #[test]
    fn offsets_are_index_aligned(sample in sample_strategy(), params in params_strategy()) {
        prop_assert_eq!(beeswarm_offsets(&sample, &params).len(), sample.len());
    }

    #[test]
    fn offsets_stay_within_width(sample in sample_strategy(), params in params_strategy()) {
        for offset in beeswarm_offsets(&sample, &params) {
            prop_assert!(offset.abs() <= params.width + 1e-12, "offset {} exceeds {}", offset, params.width);
        }
    }

    #[test]
    fn offsets_are_mirror_symmetric(sample in sample_strategy(), params in params_strategy()) {
        let offsets = beeswarm_offsets(&sample, &params);
        let mut positive: Vec<f64> = offsets.iter().copied().filter(|o| *o > 0.0).collect();
        let mut negative: Vec<f64> = offsets.iter().copied().filter(|o| *o < 0.0).map(|o| -o).collect();
        positive.sort_by(f64::total_cmp);
        negative.sort_by(f64::total_cmp);
        prop_assert_eq!(positive, negative);
    }

    #[test]
    fn layout_is_deterministic(sample in sample_strategy(), params in params_strategy()) {
        let first = beeswarm_offsets(&sample, &params);
        let second = beeswarm_offsets(&sample, &params);
        prop_assert_eq!(
            first.iter().map(|o| o.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|o| o.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn tiny_samples_have_no_spread(value in -1e3f64..1e3, params in params_strategy()) {
        prop_assert!(beeswarm_offsets(&[], &params).is_empty());
        prop_assert_eq!(beeswarm_offsets(&[value], &params), vec![0.0]);
    }

    #[test]
    fn sentinel_substitution_round_trips(
        a in prop::collection::vec(prop_oneof![Just(0.0), 1e-3f64..1.0], 0..30),
        b in prop::collection::vec(prop_oneof![Just(0.0), 1e-3f64..1.0], 0..30),
    ) {
        let groups: SampleGroups = [("DNA".to_string(), a), ("Blank".to_string(), b)]
            .into_iter()
            .collect();
        let substituted = substitute_zeros(&groups, 1e-5);
        for (_, values) in substituted.iter() {
            prop_assert!(values.iter().all(|v| *v != 0.0));
        }
        prop_assert_eq!(restore_zeros(&substituted, 1e-5), groups);
    }
}

#[test]
fn even_bin_without_ties_is_balanced() {
    // A single bin of four distinct values
    let sample = [0.4, 0.1, 0.3, 0.2];
    let params = BeeswarmParams::default().with_bins(BinCount::Fixed(1));
    let offsets = beeswarm_offsets(&sample, &params);

    // Sorted order 0.1, 0.2, 0.3, 0.4 alternates right, left, right, left
    let step = 0.25 / 2.0;
    let expected = [-1.5 * step, 0.5 * step, 1.5 * step, -0.5 * step];
    for (got, want) in offsets.iter().zip(expected.iter()) {
        assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
    }
    assert!(offsets.iter().sum::<f64>().abs() < 1e-12);
}

// tests/beeswarm_properties_test.rs
