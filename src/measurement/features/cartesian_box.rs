//! Per-axis bounding box of an object, grounded on
//! `original_source/src/measurement/feature_cartesian_box.h`: track a
//! running `(min, max)` coordinate pair per dimension per object as lines
//! are scanned, then report `max - min + 1` (box size in pixels).

use crate::measurement::feature::{Feature, FeatureKind, LineBasedFeature, ValueInfo};

#[derive(Clone, Copy)]
struct MinMaxCoord {
    min: usize,
    max: usize,
}

impl Default for MinMaxCoord {
    fn default() -> Self {
        MinMaxCoord { min: usize::MAX, max: 0 }
    }
}

#[derive(Default)]
pub struct CartesianBox {
    dimensionality: usize,
    data: Vec<MinMaxCoord>,
}

impl CartesianBox {
    pub fn new() -> CartesianBox {
        CartesianBox::default()
    }
}

impl Feature for CartesianBox {
    fn name(&self) -> &str {
        "CartesianBox"
    }
    fn description(&self) -> &str {
        "Cartesian box size of the object in all dimensions"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::LineBased
    }
}

impl LineBasedFeature for CartesianBox {
    fn initialize(&mut self, dimensionality: usize, n_objects: usize) -> Vec<ValueInfo> {
        self.dimensionality = dimensionality;
        self.data = vec![MinMaxCoord::default(); n_objects * dimensionality];
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
                let data = &mut self.data[row * nd..row * nd + nd];
                for d in 0..nd {
                    data[d].min = data[d].min.min(coords[d]);
                    data[d].max = data[d].max.max(coords[d]);
                }
            }
        }
    }

    fn finish(&mut self, object_index: usize, out_values: &mut [f64]) {
        let nd = self.dimensionality;
        let data = &self.data[object_index * nd..object_index * nd + nd];
        if data[0].min > data[0].max {
            out_values[..nd].fill(0.0);
        } else {
            for d in 0..nd {
                out_values[d] = (data[d].max - data[d].min + 1) as f64;
            }
        }
    }

    fn cleanup(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_spans_the_extreme_coordinates_touched() {
        let mut f = CartesianBox::new();
        f.initialize(2, 1);
        let index_of = |id: u32| if id == 1 { Some(0) } else { None };
        f.scan_line(&[0, 1, 1, 1, 0], None, &[0, 0], 1, &index_of);
        f.scan_line(&[0, 0, 1, 0, 0], None, &[1, 0], 1, &index_of);
        f.scan_line(&[0, 0, 1, 0, 0], None, &[2, 0], 1, &index_of);
        let mut out = [0.0; 2];
        f.finish(0, &mut out);
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 3.0);
    }
}
