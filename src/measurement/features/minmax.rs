//! Per-object grey-value extrema, grounded on
//! `original_source/src/measurement/feature_minimum.h` and
//! `feature_maximum.h`, both thin wrappers around `MinMaxAccumulator`.

use crate::accumulators::MinMaxAccumulator;
use crate::measurement::feature::{Feature, FeatureKind, LineBasedFeature, ValueInfo};

#[derive(Default)]
pub struct Minimum {
    accumulators: Vec<MinMaxAccumulator>,
}

impl Minimum {
    pub fn new() -> Minimum {
        Minimum::default()
    }
}

impl Feature for Minimum {
    fn name(&self) -> &str {
        "Minimum"
    }
    fn description(&self) -> &str {
        "Lowest grey value in the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
    fn needs_grey_value(&self) -> bool {
        true
    }
}

impl LineBasedFeature for Minimum {
    fn initialize(&mut self, _dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.accumulators = vec![MinMaxAccumulator::default(); n_objects];
        vec![ValueInfo::dimensionless("Minimum")]
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
        out_values[0] = self.accumulators[object_index].minimum();
    }

    fn cleanup(&mut self) {
        self.accumulators.clear();
    }
}

#[derive(Default)]
pub struct Maximum {
    accumulators: Vec<MinMaxAccumulator>,
}

impl Maximum {
    pub fn new() -> Maximum {
        Maximum::default()
    }
}

impl Feature for Maximum {
    fn name(&self) -> &str {
        "Maximum"
    }
    fn description(&self) -> &str {
        "Highest grey value in the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
    fn needs_grey_value(&self) -> bool {
        true
    }
}

impl LineBasedFeature for Maximum {
    fn initialize(&mut self, _dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.accumulators = vec![MinMaxAccumulator::default(); n_objects];
        vec![ValueInfo::dimensionless("Maximum")]
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
        out_values[0] = self.accumulators[object_index].maximum();
    }

    fn cleanup(&mut self) {
        self.accumulators.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_extremes_across_several_lines() {
        let mut min = Minimum::new();
        let mut max = Maximum::new();
        min.initialize(1, 1);
        max.initialize(1, 1);
        let index_of = |id: u32| if id == 1 { Some(0) } else { None };
        min.scan_line(&[1, 1, 1], Some(&[3.0, 1.0, 9.0]), &[0], 0, &index_of);
        max.scan_line(&[1, 1, 1], Some(&[3.0, 1.0, 9.0]), &[0], 0, &index_of);
        let mut out = [0.0];
        min.finish(0, &mut out);
        assert_eq!(out[0], 1.0);
        max.finish(0, &mut out);
        assert_eq!(out[0], 9.0);
    }
}
