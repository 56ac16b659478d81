//! The n-dimensional strided image container (spec §3.1, §4.1).

use std::sync::Arc;

use crate::error::PfError;
use crate::image::buffer::ImageBuffer;
use crate::types::{PixelSize, Sample, TensorShape};

/// An n-dimensional, strided, tensor-valued image.
///
/// A *raw* image (`buffer: None`) carries only sizes/strides/shape and no
/// storage. A *forged* image owns (or, via `Arc`, shares) a buffer large
/// enough to address every coordinate in `[0, sizes)` and every tensor
/// element.
#[derive(Clone)]
pub struct Image<T> {
    buffer: Option<Arc<ImageBuffer<T>>>,
    origin: isize,
    sizes: Vec<usize>,
    strides: Vec<isize>,
    tensor_shape: TensorShape,
    tensor_elements: usize,
    tensor_stride: isize,
    pixel_size: Vec<Option<PixelSize>>,
    color_space: Option<String>,
}

impl<T: Sample> Image<T> {
    /// A raw (unforged) image of the given sizes, scalar tensor shape.
    pub fn raw(sizes: Vec<usize>) -> Self {
        let n = sizes.len();
        Image {
            buffer: None,
            origin: 0,
            sizes,
            strides: vec![0; n],
            tensor_shape: TensorShape::Scalar,
            tensor_elements: 1,
            tensor_stride: 1,
            pixel_size: vec![None; n],
            color_space: None,
        }
    }

    /// An empty (zero-dimensional, unforged) image.
    pub fn empty() -> Self {
        Image::raw(Vec::new())
    }

    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    pub fn size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn tensor_shape(&self) -> TensorShape {
        self.tensor_shape
    }

    pub fn tensor_elements(&self) -> usize {
        self.tensor_elements
    }

    pub fn tensor_stride(&self) -> isize {
        self.tensor_stride
    }

    pub fn sample_type(&self) -> crate::types::SampleType {
        T::SAMPLE_TYPE
    }

    pub fn is_forged(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn is_scalar(&self) -> bool {
        self.tensor_elements == 1
    }

    pub fn number_of_pixels(&self) -> usize {
        self.sizes.iter().product()
    }

    pub fn pixel_size(&self, dim: usize) -> Option<PixelSize> {
        self.pixel_size.get(dim).copied().flatten()
    }

    pub fn set_pixel_size(&mut self, dim: usize, size: Option<PixelSize>) {
        if dim < self.pixel_size.len() {
            self.pixel_size[dim] = size;
        }
    }

    pub fn color_space(&self) -> Option<&str> {
        self.color_space.as_deref()
    }

    pub fn set_color_space(&mut self, cs: Option<String>) {
        self.color_space = cs;
    }

    fn require_forged(&self, op: &str) -> Result<(), PfError> {
        if self.buffer.is_none() {
            Err(PfError::NotForged(format!("{op}: image has no buffer")))
        } else {
            Ok(())
        }
    }

    /// Sample-space offset (in units of `T`) of pixel `coords`, tensor
    /// element `k`.
    pub fn offset_of(&self, coords: &[usize], k: usize) -> isize {
        let mut off = self.origin;
        for (c, s) in coords.iter().zip(self.strides.iter()) {
            off += *c as isize * *s;
        }
        off + k as isize * self.tensor_stride
    }

    /// Reads the pixel's scalar (tensor element 0) sample at `coords`.
    pub fn at(&self, coords: &[usize]) -> Result<T, PfError> {
        self.at_tensor(coords, 0)
    }

    pub fn at_tensor(&self, coords: &[usize], k: usize) -> Result<T, PfError> {
        self.require_forged("at")?;
        if coords.len() != self.sizes.len() {
            return Err(PfError::SizesDontMatch(format!(
                "coordinate has {} dims, image has {}",
                coords.len(),
                self.sizes.len()
            )));
        }
        for (c, s) in coords.iter().zip(self.sizes.iter()) {
            if *c >= *s {
                return Err(PfError::IndexOutOfRange(format!("coordinate {c} out of range [0,{s})")));
            }
        }
        if k >= self.tensor_elements {
            return Err(PfError::IndexOutOfRange(format!("tensor index {k} out of range")));
        }
        let offset = self.offset_of(coords, k);
        let buffer = self.buffer.as_ref().unwrap();
        buffer
            .get(offset as usize)
            .ok_or_else(|| PfError::IndexOutOfRange(format!("offset {offset} outside buffer")))
    }

    /// Writes a sample. See [`ImageBuffer`] for the single-writer contract
    /// this relies on when called concurrently from framework workers.
    pub fn set(&self, coords: &[usize], k: usize, value: T) -> Result<(), PfError> {
        self.require_forged("set")?;
        let offset = self.offset_of(coords, k);
        let buffer = self.buffer.as_ref().unwrap();
        if buffer.set(offset as usize, value) {
            Ok(())
        } else {
            Err(PfError::IndexOutOfRange(format!("offset {offset} outside buffer")))
        }
    }

    /// Low-level unchecked write used by frameworks that have already
    /// validated coordinates and own a disjoint tile.
    ///
    /// # Safety
    /// `offset` must be a valid in-bounds sample index, and the caller must
    /// guarantee no other thread is concurrently accessing it.
    pub unsafe fn write_unchecked(&self, offset: isize, value: T) {
        self.buffer.as_ref().unwrap().write(offset as usize, value);
    }

    /// # Safety
    /// `offset` must be a valid in-bounds sample index.
    pub unsafe fn read_unchecked(&self, offset: isize) -> T {
        self.buffer.as_ref().unwrap().read(offset as usize)
    }

    pub fn buffer_ptr(&self) -> Option<*const T> {
        self.buffer.as_ref().map(|b| b.as_ptr())
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    /// Allocates a buffer to match the requested sizes/tensor shape. A
    /// no-op when the image is already forged, is the sole owner of its
    /// buffer, and that buffer is already exactly the required size with
    /// normal strides (spec §4.1).
    pub fn reforge(&mut self, sizes: Vec<usize>, tensor_shape: TensorShape, tensor_elements: usize) {
        let required: usize = sizes.iter().product::<usize>() * tensor_elements;
        let sole_owner = self.buffer.as_ref().map(|b| Arc::strong_count(b) == 1).unwrap_or(false);
        let already_matches = sole_owner
            && self.sizes == sizes
            && self.tensor_elements == tensor_elements
            && self.has_normal_strides();
        if already_matches {
            return;
        }
        let n = sizes.len();
        self.strides = Self::normal_strides(&sizes, tensor_elements);
        self.sizes = sizes;
        self.tensor_shape = tensor_shape;
        self.tensor_elements = tensor_elements;
        self.tensor_stride = 1;
        self.origin = 0;
        self.pixel_size.resize(n, None);
        self.buffer = Some(ImageBuffer::new_zeroed(required));
    }

    fn normal_strides(sizes: &[usize], tensor_elements: usize) -> Vec<isize> {
        // Row-major (last dimension fastest-varying) strides in units of T,
        // with a stride of `tensor_elements` between successive spatial
        // positions so tensor samples of one pixel are contiguous.
        let mut strides = vec![0isize; sizes.len()];
        let mut acc = tensor_elements as isize;
        for d in (0..sizes.len()).rev() {
            strides[d] = acc;
            acc *= sizes[d] as isize;
        }
        strides
    }

    fn has_normal_strides(&self) -> bool {
        self.strides == Self::normal_strides(&self.sizes, self.tensor_elements) && self.tensor_stride == 1
    }

    /// Releases ownership, turning this into a raw image with no buffer.
    pub fn strip(&mut self) {
        self.buffer = None;
        self.origin = 0;
        self.strides = vec![0; self.sizes.len()];
    }

    /// Deep-copies sample data from `other` into `self`, reforging first if
    /// necessary.
    pub fn copy(&mut self, other: &Image<T>) -> Result<(), PfError> {
        other.require_forged("copy")?;
        self.reforge(other.sizes.clone(), other.tensor_shape, other.tensor_elements);
        let mut coords = vec![0usize; other.sizes.len()];
        self.copy_recursive(other, &mut coords, 0)
    }

    fn copy_recursive(&self, other: &Image<T>, coords: &mut [usize], dim: usize) -> Result<(), PfError> {
        if dim == coords.len() {
            for k in 0..other.tensor_elements {
                let v = other.at_tensor(coords, k)?;
                self.set(coords, k, v)?;
            }
            return Ok(());
        }
        for c in 0..self.sizes[dim] {
            coords[dim] = c;
            self.copy_recursive(other, coords, dim + 1)?;
        }
        Ok(())
    }

    /// A cheap value copy sharing the same buffer (Design Note 9's
    /// alternative to cyclic back-references: the view holds a handle to
    /// the buffer, never the reverse).
    pub fn share(&self) -> Image<T> {
        self.clone()
    }

    /// True if `self` and `other` address overlapping regions of the same
    /// buffer allocation.
    pub fn overlaps(&self, other: &Image<T>) -> bool {
        match (&self.buffer, &other.buffer) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// A view selecting, for each dimension, a `(start, len, step)` range.
    /// Never allocates.
    pub fn view(&self, ranges: &[(usize, usize, usize)]) -> Result<Image<T>, PfError> {
        if ranges.len() != self.sizes.len() {
            return Err(PfError::ArrayParameterWrongLength(format!(
                "view: expected {} ranges, got {}",
                self.sizes.len(),
                ranges.len()
            )));
        }
        let mut out = self.clone();
        let mut new_sizes = Vec::with_capacity(ranges.len());
        let mut new_strides = Vec::with_capacity(ranges.len());
        let mut origin = self.origin;
        for (d, &(start, len, step)) in ranges.iter().enumerate() {
            if step == 0 {
                return Err(PfError::InvalidParameter("view: step must be nonzero".into()));
            }
            if start + (len.saturating_sub(1)) * step >= self.sizes[d] && len > 0 {
                return Err(PfError::IndexOutOfRange(format!(
                    "view: range exceeds dimension {d} of size {}",
                    self.sizes[d]
                )));
            }
            origin += start as isize * self.strides[d];
            new_sizes.push(len);
            new_strides.push(self.strides[d] * step as isize);
        }
        out.origin = origin;
        out.sizes = new_sizes;
        out.strides = new_strides;
        Ok(out)
    }

    /// A view cropping to `[start, start+size)` along each dimension, step 1.
    pub fn crop(&self, start: &[usize], size: &[usize]) -> Result<Image<T>, PfError> {
        let ranges: Vec<_> = start.iter().zip(size.iter()).map(|(&s, &l)| (s, l, 1usize)).collect();
        self.view(&ranges)
    }

    /// A view with dimensions reordered according to `order` (a permutation
    /// of `0..n`).
    pub fn permute(&self, order: &[usize]) -> Result<Image<T>, PfError> {
        if order.len() != self.sizes.len() {
            return Err(PfError::ArrayParameterWrongLength("permute: order length mismatch".into()));
        }
        let mut seen = vec![false; order.len()];
        for &d in order {
            if d >= order.len() || seen[d] {
                return Err(PfError::InvalidParameter("permute: order is not a permutation".into()));
            }
            seen[d] = true;
        }
        let mut out = self.clone();
        out.sizes = order.iter().map(|&d| self.sizes[d]).collect();
        out.strides = order.iter().map(|&d| self.strides[d]).collect();
        out.pixel_size = order.iter().map(|&d| self.pixel_size[d]).collect();
        Ok(out)
    }

    /// A view with dimension `axis` traversed in reverse.
    pub fn flip(&self, axis: usize) -> Result<Image<T>, PfError> {
        if axis >= self.sizes.len() {
            return Err(PfError::IllegalDimension(format!("flip: axis {axis} out of range")));
        }
        let mut out = self.clone();
        let size = self.sizes[axis];
        if size > 0 {
            out.origin += (size as isize - 1) * self.strides[axis];
            out.strides[axis] = -self.strides[axis];
        }
        Ok(out)
    }

    /// Computes the permutation + origin offset that sorts strides into
    /// non-decreasing order of absolute magnitude with non-negative sign,
    /// and applies it, returning which dimensions ended up with duplicated
    /// (singleton-expanded) strides. Idempotent and iterates the same
    /// samples as the original image (spec §8).
    pub fn standardize_strides(&self) -> (Image<T>, Vec<usize>, Vec<bool>) {
        let n = self.sizes.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&d| self.strides[d].unsigned_abs());
        let mut out = self.clone();
        let mut is_singleton = vec![false; n];
        let mut new_sizes = Vec::with_capacity(n);
        let mut new_strides = Vec::with_capacity(n);
        let mut new_pixel_size = Vec::with_capacity(n);
        let mut origin = self.origin;
        for &d in &order {
            let mut stride = self.strides[d];
            let size = self.sizes[d];
            is_singleton[d] = stride == 0;
            if stride < 0 {
                if size > 0 {
                    origin += (size as isize - 1) * stride;
                }
                stride = -stride;
            }
            new_sizes.push(size);
            new_strides.push(stride);
            new_pixel_size.push(self.pixel_size[d]);
        }
        out.origin = origin;
        out.sizes = new_sizes;
        out.strides = new_strides;
        out.pixel_size = new_pixel_size;
        (out, order, is_singleton)
    }

    /// True iff strides are a permutation-free row-major layout with
    /// `tensor_stride = 1` and no duplicated (zero) strides — the fast-path
    /// condition from spec §3.1.
    pub fn has_normal_order(&self) -> bool {
        if self.tensor_stride != 1 {
            return false;
        }
        let (_, order, singleton) = self.standardize_strides();
        let sorted = (0..order.len()).collect::<Vec<_>>();
        order == sorted && !singleton.iter().any(|&s| s)
    }

    /// Moves tensor dimension to become a new trailing spatial dimension of
    /// size `tensor_elements`, leaving the tensor scalar.
    pub fn tensor_to_spatial(&self) -> Image<T> {
        let mut out = self.clone();
        out.sizes.push(self.tensor_elements);
        out.strides.push(self.tensor_stride);
        out.pixel_size.push(None);
        out.tensor_shape = TensorShape::Scalar;
        out.tensor_elements = 1;
        out.tensor_stride = 1;
        out
    }

    /// Inverse of [`Self::tensor_to_spatial`]: folds spatial dimension
    /// `dim` back into the tensor with the given logical shape.
    pub fn spatial_to_tensor(&self, dim: usize, shape: TensorShape) -> Result<Image<T>, PfError> {
        if !self.is_scalar() {
            return Err(PfError::NotScalar("spatial_to_tensor requires a scalar image".into()));
        }
        if dim >= self.sizes.len() {
            return Err(PfError::IllegalDimension(format!("spatial_to_tensor: dim {dim} out of range")));
        }
        let t = self.sizes[dim];
        shape.element_count_for(t)?;
        let mut out = self.clone();
        out.tensor_elements = t;
        out.tensor_stride = self.strides[dim];
        out.tensor_shape = shape;
        out.sizes.remove(dim);
        out.strides.remove(dim);
        out.pixel_size.remove(dim);
        Ok(out)
    }

    /// Materializes a packed tensor (`Diagonal`/`SymmetricPacked`/
    /// `UpperTriangular`/`LowerTriangular`) into full row-major matrix
    /// storage (spec §3.1, §4.7). Non-packed shapes already store every
    /// element, so they are returned unchanged.
    pub fn expand_tensor(&self) -> Result<Image<T>, PfError> {
        if !self.tensor_shape.is_packed() {
            return Ok(self.clone());
        }
        self.require_forged("expand_tensor")?;
        let (rows, cols) = self.tensor_shape.rows_cols(self.tensor_elements);
        let mut out = Image::<T>::raw(self.sizes.clone());
        out.reforge(self.sizes.clone(), TensorShape::Matrix { rows, cols }, rows * cols);
        for (d, pixel_size) in self.pixel_size.iter().enumerate() {
            out.set_pixel_size(d, *pixel_size);
        }
        out.set_color_space(self.color_space.clone());

        let mirror = matches!(self.tensor_shape, TensorShape::SymmetricPacked { .. });
        let mut coords = vec![0usize; self.sizes.len()];
        self.expand_tensor_recursive(&out, &mut coords, 0, rows, cols, mirror)?;
        Ok(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn expand_tensor_recursive(
        &self,
        out: &Image<T>,
        coords: &mut [usize],
        dim: usize,
        rows: usize,
        cols: usize,
        mirror: bool,
    ) -> Result<(), PfError> {
        if dim == coords.len() {
            for t in 0..rows * cols {
                out.set(coords, t, T::default())?;
            }
            for k in 0..self.tensor_elements {
                let (r, c) = self.tensor_shape.packed_index_to_rc(k);
                let value = self.at_tensor(coords, k)?;
                out.set(coords, r * cols + c, value)?;
                if mirror && r != c {
                    out.set(coords, c * cols + r, value)?;
                }
            }
            return Ok(());
        }
        for c in 0..self.sizes[dim] {
            coords[dim] = c;
            self.expand_tensor_recursive(out, coords, dim + 1, rows, cols, mirror)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(sizes: Vec<usize>) -> Image<u16> {
        let mut img = Image::<u16>::raw(sizes.clone());
        img.reforge(sizes.clone(), TensorShape::Scalar, 1);
        let (w, h) = (sizes[0], sizes[1]);
        for y in 0..h {
            for x in 0..w {
                img.set(&[x, y], 0, (10 * y + x) as u16).unwrap();
            }
        }
        img
    }

    #[test]
    fn at_matches_offset_formula() {
        let img = filled(vec![5, 4]);
        for y in 0..4 {
            for x in 0..5 {
                assert_eq!(img.at(&[x, y]).unwrap(), (10 * y + x) as u16);
            }
        }
    }

    #[test]
    fn reforge_is_noop_when_sole_owner_and_matching() {
        let mut img = filled(vec![3, 3]);
        let ptr_before = img.buffer_ptr();
        img.reforge(vec![3, 3], TensorShape::Scalar, 1);
        assert_eq!(img.buffer_ptr(), ptr_before);
    }

    #[test]
    fn view_never_allocates_and_shares_buffer() {
        let img = filled(vec![5, 4]);
        let view = img.crop(&[1, 1], &[2, 2]).unwrap();
        assert!(img.overlaps(&view));
        assert_eq!(view.at(&[0, 0]).unwrap(), img.at(&[1, 1]).unwrap());
    }

    #[test]
    fn flip_reverses_reads() {
        let img = filled(vec![5, 1]);
        let flipped = img.flip(0).unwrap();
        for x in 0..5 {
            assert_eq!(flipped.at(&[x, 0]).unwrap(), img.at(&[4 - x, 0]).unwrap());
        }
    }

    #[test]
    fn permute_swaps_axes() {
        let img = filled(vec![5, 4]);
        let permuted = img.permute(&[1, 0]).unwrap();
        assert_eq!(permuted.size(0), 4);
        assert_eq!(permuted.size(1), 5);
        assert_eq!(permuted.at(&[2, 3]).unwrap(), img.at(&[3, 2]).unwrap());
    }

    #[test]
    fn standardize_strides_is_idempotent_and_iterates_same_samples() {
        let img = filled(vec![5, 4]);
        let permuted = img.permute(&[1, 0]).unwrap().flip(0).unwrap();
        let (standardized, _, _) = permuted.standardize_strides();
        let (twice, _, _) = standardized.standardize_strides();
        assert_eq!(standardized.sizes(), twice.sizes());
        assert_eq!(standardized.strides(), twice.strides());
        // Same multiset of samples, in some order.
        let mut a: Vec<u16> = Vec::new();
        let mut b: Vec<u16> = Vec::new();
        for y in 0..permuted.size(1) {
            for x in 0..permuted.size(0) {
                a.push(permuted.at(&[x, y]).unwrap());
            }
        }
        for y in 0..standardized.size(1) {
            for x in 0..standardized.size(0) {
                b.push(standardized.at(&[x, y]).unwrap());
            }
        }
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn copy_duplicates_into_a_fresh_buffer() {
        let img = filled(vec![3, 3]);
        let mut dst = Image::<u16>::empty();
        dst.copy(&img).unwrap();
        assert!(!img.overlaps(&dst));
        assert_eq!(dst.at(&[1, 1]).unwrap(), img.at(&[1, 1]).unwrap());
    }

    #[test]
    fn tensor_round_trip_preserves_values() {
        let mut img = Image::<f32>::raw(vec![4]);
        img.reforge(vec![4], TensorShape::Scalar, 1);
        for i in 0..4 {
            img.set(&[i], 0, i as f32).unwrap();
        }
        let spatial = img.tensor_to_spatial();
        let back = spatial.spatial_to_tensor(0, TensorShape::ColumnVector).unwrap();
        assert_eq!(back.tensor_elements(), 4);
        for i in 0..4 {
            assert_eq!(back.at_tensor(&[], i).unwrap(), i as f32);
        }
    }

    #[test]
    fn expand_tensor_mirrors_symmetric_packed_storage() {
        // A single-pixel image holding a 2x2 symmetric matrix packed as
        // [diag0, diag1, off-diagonal] = [1, 2, 9].
        let mut img = Image::<f64>::raw(vec![1]);
        img.reforge(vec![1], TensorShape::SymmetricPacked { side: 2 }, 3);
        img.set(&[0], 0, 1.0).unwrap();
        img.set(&[0], 1, 2.0).unwrap();
        img.set(&[0], 2, 9.0).unwrap();
        let full = img.expand_tensor().unwrap();
        assert_eq!(full.tensor_shape(), TensorShape::Matrix { rows: 2, cols: 2 });
        assert_eq!(full.at_tensor(&[0], 0).unwrap(), 1.0); // (0,0)
        assert_eq!(full.at_tensor(&[0], 1).unwrap(), 9.0); // (0,1)
        assert_eq!(full.at_tensor(&[0], 2).unwrap(), 9.0); // (1,0) mirrored
        assert_eq!(full.at_tensor(&[0], 3).unwrap(), 2.0); // (1,1)
    }

    #[test]
    fn expand_tensor_is_a_no_op_for_non_packed_shapes() {
        let img = filled(vec![3, 2]);
        let expanded = img.expand_tensor().unwrap();
        assert_eq!(expanded.tensor_shape(), TensorShape::Scalar);
        assert_eq!(expanded.at(&[1, 1]).unwrap(), img.at(&[1, 1]).unwrap());
    }
}
