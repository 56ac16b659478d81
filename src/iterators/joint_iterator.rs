//! Coordinated multi-image geometry: the dimension bookkeeping behind a
//! joint iterator over N images of compatible shape (spec §4.2).
//!
//! This doesn't walk samples itself — `Image<T>` values passed to it may
//! have different element types, so there is no single `T` to hand back a
//! value for. Instead it computes, for N images' sizes and strides, the
//! permutation that sorts dimensions into an anchor image's storage order
//! (`optimize`) and the further dimension-merging pass that collapses
//! adjacent dimensions whose strides compose (`optimize_and_flatten`).
//! Frameworks use the resulting sizes/strides to drive their own
//! coordinate walk and compute per-image offsets directly.

use crate::error::PfError;

#[derive(Debug, Clone)]
pub struct JointGeometry {
    sizes: Vec<usize>,
    strides: Vec<Vec<isize>>,
}

impl JointGeometry {
    pub fn new(sizes: Vec<usize>, strides: Vec<Vec<isize>>) -> Result<JointGeometry, PfError> {
        if strides.iter().any(|s| s.len() != sizes.len()) {
            return Err(PfError::SizesDontMatch("joint geometry: stride/size length mismatch".into()));
        }
        Ok(JointGeometry { sizes, strides })
    }

    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn strides(&self, image: usize) -> &[isize] {
        &self.strides[image]
    }

    pub fn number_of_images(&self) -> usize {
        self.strides.len()
    }

    /// Computes the sum of per-dimension coordinate times stride for
    /// `image`, i.e. that image's sample offset at `coords` relative to its
    /// own origin.
    pub fn offset_of(&self, image: usize, coords: &[usize]) -> isize {
        coords.iter().zip(&self.strides[image]).map(|(&c, &s)| c as isize * s).sum()
    }

    /// Reorders dimensions (consistently across every image) into
    /// non-decreasing order of `anchor`'s absolute stride. Returns the new
    /// geometry and the list of original dimension indices in their new
    /// order (`order[new_dim] = old_dim`).
    pub fn optimize(&self, anchor: usize) -> (JointGeometry, Vec<usize>) {
        let mut order: Vec<usize> = (0..self.dimensionality()).collect();
        order.sort_by_key(|&d| (self.strides[anchor][d].unsigned_abs(), usize::MAX - self.sizes[d]));
        let sizes = order.iter().map(|&d| self.sizes[d]).collect();
        let strides = self.strides.iter().map(|s| order.iter().map(|&d| s[d]).collect()).collect();
        (JointGeometry { sizes, strides }, order)
    }

    /// Runs [`Self::optimize`], then merges adjacent dimensions (in the
    /// optimized order) whose strides compose in every image
    /// (`stride[d] * size[d] == stride[d+1]`), never merging across
    /// `processing_dim` (given in original-dimension numbering).
    ///
    /// Returns the flattened geometry and, for every surviving dimension,
    /// the list of original dimensions it absorbed (outermost last).
    pub fn optimize_and_flatten(&self, anchor: usize, processing_dim: Option<usize>) -> (JointGeometry, Vec<Vec<usize>>) {
        let (optimized, order) = self.optimize(anchor);
        let mut groups: Vec<Vec<usize>> = order.iter().map(|&d| vec![d]).collect();
        let mut sizes = optimized.sizes.clone();
        let mut strides = optimized.strides.clone();

        let mut d = 0;
        while d + 1 < sizes.len() {
            let crosses_processing = processing_dim
                .map(|p| groups[d].contains(&p) || groups[d + 1].contains(&p))
                .unwrap_or(false);
            let composes = !crosses_processing
                && (0..strides.len()).all(|img| strides[img][d] * sizes[d] as isize == strides[img][d + 1]);
            if composes {
                sizes[d] *= sizes[d + 1];
                sizes.remove(d + 1);
                for img in 0..strides.len() {
                    strides[img].remove(d + 1);
                }
                let absorbed = groups.remove(d + 1);
                groups[d].extend(absorbed);
                // Re-check this position against its new neighbor.
            } else {
                d += 1;
            }
        }
        (JointGeometry { sizes, strides }, groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optimize_sorts_by_anchor_stride() {
        // Anchor has column-major-looking strides: dim 0 stride 10, dim 1 stride 1.
        let geo = JointGeometry::new(vec![3, 5], vec![vec![10, 1]]).unwrap();
        let (optimized, order) = geo.optimize(0);
        assert_eq!(order, vec![1, 0]);
        assert_eq!(optimized.sizes(), &[5, 3]);
    }

    #[test]
    fn flatten_merges_fully_contiguous_normal_order_image() {
        // Normal row-major 4x3 image: strides [3, 1], sizes [4, 3]; dim 1 (inner)
        // composes into dim 0 since stride[1] * size[1] == stride[0].
        let geo = JointGeometry::new(vec![4, 3], vec![vec![3, 1]]).unwrap();
        let (flat, groups) = geo.optimize_and_flatten(0, None);
        assert_eq!(flat.dimensionality(), 1);
        assert_eq!(flat.sizes(), &[12]);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn flatten_never_merges_across_the_processing_dimension() {
        let geo = JointGeometry::new(vec![4, 3], vec![vec![3, 1]]).unwrap();
        let (flat, _) = geo.optimize_and_flatten(0, Some(1));
        assert_eq!(flat.dimensionality(), 2);
    }

    #[test]
    fn offset_of_matches_dot_product() {
        let geo = JointGeometry::new(vec![4, 3], vec![vec![3, 1], vec![1, 4]]).unwrap();
        assert_eq!(geo.offset_of(0, &[2, 1]), 2 * 3 + 1 * 1);
        assert_eq!(geo.offset_of(1, &[2, 1]), 2 * 1 + 1 * 4);
    }
}
