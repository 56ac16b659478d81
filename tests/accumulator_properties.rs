//! Single-pass accumulator properties that should hold independent of input
//! order or scale (spec §3.3, §8).

use pixelforge::accumulators::{MinMaxAccumulator, StatisticsAccumulator};

#[test]
fn statistics_accumulator_matches_hand_computed_mean_and_variance() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let mut acc = StatisticsAccumulator::new();
    for &v in &values {
        acc.push(v);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    assert!((acc.mean() - mean).abs() < 1e-9);
    assert!((acc.variance() - variance).abs() < 1e-9);
    assert_eq!(acc.number(), values.len() as u64);
}

#[test]
fn a_perfectly_symmetric_distribution_has_zero_skewness() {
    let mut acc = StatisticsAccumulator::new();
    for &v in &[1.0, 2.0, 3.0, 4.0, 5.0] {
        acc.push(v);
    }
    assert!(acc.skewness().abs() < 1e-9);
}

#[test]
fn minmax_accumulator_tracks_extremes_regardless_of_push_order() {
    let mut acc = MinMaxAccumulator::new();
    for &v in &[3.0, -1.0, 7.0, 2.0, -5.0] {
        acc.push(v);
    }
    assert_eq!(acc.minimum(), -5.0);
    assert_eq!(acc.maximum(), 7.0);
}
