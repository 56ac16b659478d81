//! Intensity-weighted centroid, grounded on
//! `original_source/src/measurement/feature_gravity.h`. The original scans
//! line-by-line like [`super::cartesian_box::CartesianBox`]; here it is
//! deliberately implemented as an [`ImageBasedFeature`] instead, walking
//! every pixel once with [`crate::iterators::ImageIterator`] to exercise
//! that dispatch shape end to end.

use crate::error::{PfError, PfResult};
use crate::image::{DynImage, Image};
use crate::iterators::ImageIterator;
use crate::measurement::feature::{Feature, FeatureKind, ImageBasedFeature, ValueInfo};

#[derive(Default)]
pub struct Gravity;

impl Gravity {
    pub fn new() -> Gravity {
        Gravity
    }
}

impl Feature for Gravity {
    fn name(&self) -> &str {
        "Gravity"
    }
    fn description(&self) -> &str {
        "Coordinates of the center of mass of the grey-value object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::ImageBased
    }
    fn needs_grey_value(&self) -> bool {
        true
    }
}

impl ImageBasedFeature for Gravity {
    fn value_info(&self, dimensionality: usize) -> Vec<ValueInfo> {
        (0..dimensionality).map(|d| ValueInfo::dimensionless(format!("dim{d}"))).collect()
    }

    fn measure(&self, label: &Image<u32>, grey: Option<&DynImage>, object_ids: &[u32]) -> PfResult<Vec<Vec<f64>>> {
        let grey = grey.ok_or_else(|| PfError::InvalidParameter("Gravity requires a grey-value image".into()))?;
        let nd = label.dimensionality();
        let mut sums = vec![vec![0.0; nd + 1]; object_ids.len()];
        let mut it = ImageIterator::new(label, None)?;
        loop {
            let coords = it.coords();
            let id = label.at(coords)?;
            if id > 0 {
                if let Some(row) = object_ids.iter().position(|&o| o == id) {
                    let weight = grey.at_f64(coords, 0)?;
                    for d in 0..nd {
                        sums[row][d] += coords[d] as f64 * weight;
                    }
                    sums[row][nd] += weight;
                }
            }
            if !it.advance() {
                break;
            }
        }
        Ok(sums
            .into_iter()
            .map(|mut s| {
                let total = s[nd];
                if total == 0.0 {
                    vec![0.0; nd]
                } else {
                    s.truncate(nd);
                    s.iter().map(|v| v / total).collect()
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorShape;

    #[test]
    fn weighs_toward_the_brighter_side() {
        let mut label = Image::<u32>::raw(vec![4, 1]);
        label.reforge(vec![4, 1], TensorShape::Scalar, 1);
        for x in 0..4 {
            label.set(&[x, 0], 0, 1u32).unwrap();
        }
        let mut grey = Image::<f64>::raw(vec![4, 1]);
        grey.reforge(vec![4, 1], TensorShape::Scalar, 1);
        let weights = [1.0, 1.0, 1.0, 5.0];
        for x in 0..4 {
            grey.set(&[x, 0], 0, weights[x]).unwrap();
        }
        let dyn_grey = DynImage::F64(grey);
        let feature = Gravity::new();
        let out = feature.measure(&label, Some(&dyn_grey), &[1]).unwrap();
        assert!(out[0][0] > 2.0);
    }
}
