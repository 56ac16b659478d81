//! Grey-value mean/standard-deviation/skewness/excess-kurtosis per object,
//! grounded on `original_source/src/measurement/feature_statistics.h`,
//! which pushes every grey sample of an object into a `StatisticsAccumulator`
//! during its `ScanLine` and reads off the four moments in `Finish`.
//! Consolidated into one feature (rather than separate Mean/StandardDeviation
//! features) so the measurement engine exercises
//! [`crate::accumulators::StatisticsAccumulator`] directly instead of
//! re-deriving the same moments by hand.

use crate::accumulators::StatisticsAccumulator;
use crate::measurement::feature::{Feature, FeatureKind, LineBasedFeature, ValueInfo};

#[derive(Default)]
pub struct Statistics {
    accumulators: Vec<StatisticsAccumulator>,
}

impl Statistics {
    pub fn new() -> Statistics {
        Statistics::default()
    }
}

impl Feature for Statistics {
    fn name(&self) -> &str {
        "Statistics"
    }
    fn description(&self) -> &str {
        "Mean, standard deviation, skewness and excess kurtosis of the grey values in the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
    fn needs_grey_value(&self) -> bool {
        true
    }
}

impl LineBasedFeature for Statistics {
    fn initialize(&mut self, _dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.accumulators = vec![StatisticsAccumulator::new(); n_objects];
        vec![
            ValueInfo::dimensionless("Mean"),
            ValueInfo::dimensionless("StandardDeviation"),
            ValueInfo::dimensionless("Skewness"),
            ValueInfo::dimensionless("ExcessKurtosis"),
        ]
    }

    fn scan_line(
        &mut self,
        label_line: &[u32],
        grey_line: Option<&[f64]>,
        _position: &[usize],
        _dimension: usize,
        object_index: &dyn Fn(u32) -> Option<usize>,
    ) {
        let Some(grey_line) = grey_line else { return };
        for (p, &id) in label_line.iter().enumerate() {
            if id == 0 {
                continue;
            }
            if let Some(row) = object_index(id) {
                self.accumulators[row].push(grey_line[p]);
            }
        }
    }

    fn finish(&mut self, object_index: usize, out_values: &mut [f64]) {
        let acc = &self.accumulators[object_index];
        out_values[0] = acc.mean();
        out_values[1] = acc.standard_deviation();
        out_values[2] = acc.skewness();
        out_values[3] = acc.excess_kurtosis();
    }

    fn cleanup(&mut self) {
        self.accumulators.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_matches_hand_computation() {
        let mut f = Statistics::new();
        f.initialize(1, 1);
        let index_of = |id: u32| if id == 1 { Some(0) } else { None };
        f.scan_line(&[1, 1, 1, 1], Some(&[2.0, 4.0, 4.0, 6.0]), &[0], 0, &index_of);
        let mut out = [0.0; 4];
        f.finish(0, &mut out);
        assert!((out[0] - 4.0).abs() < 1e-12);
    }
}
