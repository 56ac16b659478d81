//! Pixel count per object, grounded on
//! `original_source/src/measurement/feature_size.h`.

use crate::measurement::feature::{Feature, FeatureKind, LineBasedFeature, ValueInfo};

#[derive(Default)]
pub struct Size {
    counts: Vec<u64>,
}

impl Size {
    pub fn new() -> Size {
        Size::default()
    }
}

impl Feature for Size {
    fn name(&self) -> &str {
        "Size"
    }
    fn description(&self) -> &str {
        "Number of pixels belonging to the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
}

impl LineBasedFeature for Size {
    fn initialize(&mut self, _dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.counts = vec![0; n_objects];
        vec![ValueInfo::dimensionless("Size")]
    }

    fn scan_line(
        &mut self,
        label_line: &[u32],
        _grey_line: Option<&[f64]>,
        _position: &[usize],
        _dimension: usize,
        object_index: &dyn Fn(u32) -> Option<usize>,
    ) {
        for &id in label_line {
            if id == 0 {
                continue;
            }
            if let Some(row) = object_index(id) {
                self.counts[row] += 1;
            }
        }
    }

    fn finish(&mut self, object_index: usize, out_values: &mut [f64]) {
        out_values[0] = self.counts[object_index] as f64;
    }

    fn cleanup(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_the_requested_object() {
        let mut f = Size::new();
        f.initialize(1, 2);
        let index_of = |id: u32| if id == 5 { Some(0) } else if id == 6 { Some(1) } else { None };
        f.scan_line(&[0, 5, 5, 6, 0], None, &[0], 0, &index_of);
        f.scan_line(&[5, 5, 5, 0, 0], None, &[1], 0, &index_of);
        let mut out = [0.0];
        f.finish(0, &mut out);
        assert_eq!(out[0], 5.0);
        f.finish(1, &mut out);
        assert_eq!(out[0], 1.0);
    }
}
