//! Unweighted geometric centroid, grounded on
//! `original_source/src/measurement/feature_center.h`: accumulate the sum
//! of each dimension's coordinate plus a pixel count per object as lines
//! are scanned, then report the mean coordinate. The same accumulation
//! [`super::gravity::Gravity`] does with grey-value weights; this is its
//! unweighted, line-based counterpart.

use crate::measurement::feature::{Feature, FeatureKind, LineBasedFeature, ValueInfo};

#[derive(Default)]
pub struct Center {
    dimensionality: usize,
    sums: Vec<f64>,
    counts: Vec<u64>,
}

impl Center {
    pub fn new() -> Center {
        Center::default()
    }
}

impl Feature for Center {
    fn name(&self) -> &str {
        "Center"
    }
    fn description(&self) -> &str {
        "Coordinates of the geometric mean of the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
}

impl LineBasedFeature for Center {
    fn initialize(&mut self, dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.dimensionality = dimensionality;
        self.sums = vec![0.0; n_objects * dimensionality];
        self.counts = vec![0; n_objects];
        (0..dimensionality).map(|d| ValueInfo::dimensionless(format!("dim{d}"))).collect()
    }

    fn scan_line(
        &mut self,
        label_line: &[u32],
        _grey_line: Option<&[f64]>,
        position: &[usize],
        dimension: usize,
        object_index: &dyn Fn(u32) -> Option<usize>,
    ) {
        let nd = self.dimensionality;
        let mut coords = position.to_vec();
        for (p, &id) in label_line.iter().enumerate() {
            coords[dimension] = p;
            if id == 0 {
                continue;
            }
            if let Some(row) = object_index(id) {
                let sums = &mut self.sums[row * nd..row * nd + nd];
                for d in 0..nd {
                    sums[d] += coords[d] as f64;
                }
                self.counts[row] += 1;
            }
        }
    }

    fn finish(&mut self, object_index: usize, out_values: &mut [f64]) {
        let nd = self.dimensionality;
        let count = self.counts[object_index];
        let sums = &self.sums[object_index * nd..object_index * nd + nd];
        if count == 0 {
            out_values[..nd].fill(0.0);
        } else {
            for d in 0..nd {
                out_values[d] = sums[d] / count as f64;
            }
        }
    }

    fn cleanup(&mut self) {
        self.sums.clear();
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_the_coordinates_touched() {
        let mut f = Center::new();
        f.initialize(2, 1);
        let index_of = |id: u32| if id == 1 { Some(0) } else { None };
        // A single row of 10 pixels at y=5, x in 0..10 — mean is (4.5, 5.0).
        f.scan_line(&[1; 10], None, &[0, 5], 0, &index_of);
        let mut out = [0.0; 2];
        f.finish(0, &mut out);
        assert_eq!(out[0], 4.5);
        assert_eq!(out[1], 5.0);
    }

    #[test]
    fn empty_object_reports_zero() {
        let mut f = Center::new();
        f.initialize(2, 1);
        let mut out = [0.0; 2];
        f.finish(0, &mut out);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[1], 0.0);
    }
}
