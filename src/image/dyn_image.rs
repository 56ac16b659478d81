//! Runtime sample-type dispatch over `Image<T>`.
//!
//! Mirrors the teacher's `VsfType` enum (`types/mod.rs`), which wraps one
//! variant per on-disk element kind and dispatches through `match` rather
//! than trait objects. An `Image` doesn't know its own sample type until a
//! file is read or a caller picks one; `DynImage` is the value that comes
//! back out of those call sites, per Design Note 9.

use num_complex::Complex;

use crate::error::PfError;
use crate::image::image::Image;
use crate::types::{SampleType, TensorShape};

/// An `Image<T>` for some `T`, with `T` resolved at runtime.
#[derive(Clone)]
pub enum DynImage {
    Bin(Image<bool>),
    U8(Image<u8>),
    U16(Image<u16>),
    U32(Image<u32>),
    I8(Image<i8>),
    I16(Image<i16>),
    I32(Image<i32>),
    F32(Image<f32>),
    F64(Image<f64>),
    C32(Image<Complex<f32>>),
    C64(Image<Complex<f64>>),
}

/// Applies `$body` with `$img` bound to the inner `Image<T>`, for every
/// variant, returning whatever `$body` evaluates to. Used instead of
/// hand-writing the same eleven-way match at each dispatch site.
macro_rules! dispatch {
    ($self:expr, $img:ident => $body:expr) => {
        match $self {
            DynImage::Bin($img) => $body,
            DynImage::U8($img) => $body,
            DynImage::U16($img) => $body,
            DynImage::U32($img) => $body,
            DynImage::I8($img) => $body,
            DynImage::I16($img) => $body,
            DynImage::I32($img) => $body,
            DynImage::F32($img) => $body,
            DynImage::F64($img) => $body,
            DynImage::C32($img) => $body,
            DynImage::C64($img) => $body,
        }
    };
}

impl DynImage {
    pub fn sample_type(&self) -> SampleType {
        match self {
            DynImage::Bin(_) => SampleType::Bin,
            DynImage::U8(_) => SampleType::U8,
            DynImage::U16(_) => SampleType::U16,
            DynImage::U32(_) => SampleType::U32,
            DynImage::I8(_) => SampleType::I8,
            DynImage::I16(_) => SampleType::I16,
            DynImage::I32(_) => SampleType::I32,
            DynImage::F32(_) => SampleType::F32,
            DynImage::F64(_) => SampleType::F64,
            DynImage::C32(_) => SampleType::C32,
            DynImage::C64(_) => SampleType::C64,
        }
    }

    pub fn dimensionality(&self) -> usize {
        dispatch!(self, img => img.dimensionality())
    }

    pub fn sizes(&self) -> Vec<usize> {
        dispatch!(self, img => img.sizes().to_vec())
    }

    pub fn tensor_shape(&self) -> TensorShape {
        dispatch!(self, img => img.tensor_shape())
    }

    pub fn tensor_elements(&self) -> usize {
        dispatch!(self, img => img.tensor_elements())
    }

    pub fn number_of_pixels(&self) -> usize {
        dispatch!(self, img => img.number_of_pixels())
    }

    pub fn is_forged(&self) -> bool {
        dispatch!(self, img => img.is_forged())
    }

    /// Reads the scalar sample at `coords`, tensor index `k`, projected to
    /// `f64` (the real part, for complex types) so callers that only care
    /// about magnitude don't need to match on sample type themselves.
    pub fn at_f64(&self, coords: &[usize], k: usize) -> Result<f64, PfError> {
        dispatch!(self, img => img.at_tensor(coords, k).map(|v| crate::types::Sample::to_f64(v)))
    }

    fn empty_of(ty: SampleType) -> DynImage {
        match ty {
            SampleType::Bin => DynImage::Bin(Image::empty()),
            SampleType::U8 => DynImage::U8(Image::empty()),
            SampleType::U16 => DynImage::U16(Image::empty()),
            SampleType::U32 => DynImage::U32(Image::empty()),
            SampleType::I8 => DynImage::I8(Image::empty()),
            SampleType::I16 => DynImage::I16(Image::empty()),
            SampleType::I32 => DynImage::I32(Image::empty()),
            SampleType::F32 => DynImage::F32(Image::empty()),
            SampleType::F64 => DynImage::F64(Image::empty()),
            SampleType::C32 => DynImage::C32(Image::empty()),
            SampleType::C64 => DynImage::C64(Image::empty()),
        }
    }

    /// Converts to a freshly forged image of sample type `to`, clamping or
    /// truncating per [`SampleType::clamp_f64`] (spec §4.1 `convert`).
    pub fn convert(&self, to: SampleType) -> DynImage {
        if self.sample_type() == to {
            return self.clone();
        }
        let sizes = self.sizes();
        let tensor_elements = self.tensor_elements();
        let tensor_shape = self.tensor_shape();
        let mut out = DynImage::empty_of(to);
        out.reforge_like(sizes.clone(), tensor_shape, tensor_elements);
        let mut coords = vec![0usize; sizes.len()];
        self.convert_recursive(&mut out, &sizes, tensor_elements, &mut coords, 0);
        out
    }

    fn reforge_like(&mut self, sizes: Vec<usize>, shape: TensorShape, t: usize) {
        dispatch!(self, img => img.reforge(sizes, shape, t))
    }

    fn convert_recursive(
        &self,
        out: &mut DynImage,
        sizes: &[usize],
        tensor_elements: usize,
        coords: &mut [usize],
        dim: usize,
    ) {
        if dim == sizes.len() {
            for k in 0..tensor_elements {
                if let Ok(value) = self.at_f64(coords, k) {
                    out.set_f64(coords, k, value);
                }
            }
            return;
        }
        for c in 0..sizes[dim] {
            coords[dim] = c;
            self.convert_recursive(out, sizes, tensor_elements, coords, dim + 1);
        }
    }

    /// Writes `value`, clamped to this image's sample type's representable
    /// range (no-op if out of bounds or not forged).
    pub fn set_f64(&self, coords: &[usize], k: usize, value: f64) {
        use crate::types::Sample;
        dispatch!(self, img => {
            let sample = Sample::from_f64(value);
            let _ = img.set(coords, k, sample);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;

    #[test]
    fn convert_widens_u8_to_f32_preserving_values() {
        let mut img = Image::<u8>::raw(vec![2, 2]);
        img.reforge(vec![2, 2], TensorShape::Scalar, 1);
        img.set(&[0, 0], 0, 200).unwrap();
        let dyn_img = DynImage::U8(img);
        let converted = dyn_img.convert(SampleType::F32);
        match converted {
            DynImage::F32(out) => assert_eq!(out.at(&[0, 0]).unwrap(), 200.0f32),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn convert_clamps_when_narrowing() {
        let mut img = Image::<i32>::raw(vec![1]);
        img.reforge(vec![1], TensorShape::Scalar, 1);
        img.set(&[0], 0, 1000).unwrap();
        let dyn_img = DynImage::I32(img);
        let converted = dyn_img.convert(SampleType::U8);
        match converted {
            DynImage::U8(out) => assert_eq!(out.at(&[0]).unwrap(), u8::MAX),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn sample_type_round_trips_through_dispatch() {
        let img: Image<f64> = Image::empty();
        let dyn_img = DynImage::F64(img);
        assert_eq!(dyn_img.sample_type(), SampleType::F64);
        assert_eq!(dyn_img.sample_type().size_in_bytes(), std::mem::size_of::<f64>());
        let _ = Sample::to_f64(1.0f64);
    }
}
