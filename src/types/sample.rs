//! Sample (element) type enumeration and dispatch helpers.
//!
//! Grounded on the teacher's `VsfType` enum (`types/vsf_type.rs`), which
//! dispatches encode/decode behavior at runtime by matching on a tag byte
//! per primitive kind (`u3`..`u7`, `i3`..`i7`, `f5`, `f6`, `j5`, `j6`, ...).
//! We keep the same shape — one tag per numeric kind — but the tag here
//! drives numeric *conversion* behavior instead of binary layout, per
//! Design Note 9 ("template dispatch over element type ... model as an enum
//! of element types plus a match that dispatches").

use num_complex::Complex;
use std::fmt;

/// Runtime tag for an image's element (sample) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Bin,
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
    C32,
    C64,
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SampleType::Bin => "bin",
            SampleType::U8 => "u8",
            SampleType::U16 => "u16",
            SampleType::U32 => "u32",
            SampleType::I8 => "i8",
            SampleType::I16 => "i16",
            SampleType::I32 => "i32",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
            SampleType::C32 => "c32",
            SampleType::C64 => "c64",
        };
        write!(f, "{s}")
    }
}

impl SampleType {
    pub fn size_in_bytes(self) -> usize {
        match self {
            SampleType::Bin => 1,
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 | SampleType::C32 => 8,
            SampleType::C64 => 16,
        }
    }

    pub fn is_binary(self) -> bool {
        matches!(self, SampleType::Bin)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, SampleType::Bin | SampleType::U8 | SampleType::U16 | SampleType::U32)
    }

    pub fn is_signed(self) -> bool {
        matches!(self, SampleType::I8 | SampleType::I16 | SampleType::I32)
    }

    pub fn is_integer(self) -> bool {
        self.is_unsigned() || self.is_signed()
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, SampleType::C32 | SampleType::C64)
    }

    /// True for every kind whose values can be represented on the real
    /// line (everything except the complex kinds). Scan/separable/full
    /// filters that declare a real-only contract check this per §4.4.
    pub fn is_real(self) -> bool {
        !self.is_complex()
    }

    /// Widest numeric range achievable by this sample's natural arithmetic
    /// result, used by accumulators and generic numeric helpers to decide
    /// what working precision to promote a sample to before summation.
    pub fn widen_for_arithmetic(self) -> SampleType {
        match self {
            SampleType::Bin | SampleType::U8 | SampleType::U16 | SampleType::U32 => SampleType::F64,
            SampleType::I8 | SampleType::I16 | SampleType::I32 => SampleType::F64,
            SampleType::F32 => SampleType::F64,
            SampleType::F64 => SampleType::F64,
            SampleType::C32 => SampleType::C64,
            SampleType::C64 => SampleType::C64,
        }
    }

    /// Minimum representable value as `f64`, for integer/binary kinds.
    pub fn min_value_f64(self) -> f64 {
        match self {
            SampleType::Bin => 0.0,
            SampleType::U8 => 0.0,
            SampleType::U16 => 0.0,
            SampleType::U32 => 0.0,
            SampleType::I8 => i8::MIN as f64,
            SampleType::I16 => i16::MIN as f64,
            SampleType::I32 => i32::MIN as f64,
            SampleType::F32 => f32::MIN as f64,
            SampleType::F64 => f64::MIN,
            SampleType::C32 | SampleType::C64 => f64::MIN,
        }
    }

    /// Maximum representable value as `f64`, for integer/binary kinds.
    pub fn max_value_f64(self) -> f64 {
        match self {
            SampleType::Bin => 1.0,
            SampleType::U8 => u8::MAX as f64,
            SampleType::U16 => u16::MAX as f64,
            SampleType::U32 => u32::MAX as f64,
            SampleType::I8 => i8::MAX as f64,
            SampleType::I16 => i16::MAX as f64,
            SampleType::I32 => i32::MAX as f64,
            SampleType::F32 => f32::MAX as f64,
            SampleType::F64 => f64::MAX,
            SampleType::C32 | SampleType::C64 => f64::MAX,
        }
    }

    /// Clamp a real value into this type's representable range, rounding
    /// to nearest for integer destinations. Used by `convert()` and by
    /// buffer copy-with-conversion in the frameworks.
    pub fn clamp_f64(self, value: f64) -> f64 {
        if self.is_complex() {
            return value;
        }
        if self.is_float() {
            return value;
        }
        let rounded = value.round();
        rounded.clamp(self.min_value_f64(), self.max_value_f64())
    }
}

/// A single sample value boxed for dynamic (runtime-typed) code paths:
/// boundary extrapolation constants, histogram bin edges, and any place the
/// measurement engine or a generic line filter needs to carry one sample
/// without knowing `T` at compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleValue {
    Bin(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
    F64(f64),
    C32(Complex<f32>),
    C64(Complex<f64>),
}

impl SampleValue {
    pub fn sample_type(&self) -> SampleType {
        match self {
            SampleValue::Bin(_) => SampleType::Bin,
            SampleValue::U8(_) => SampleType::U8,
            SampleValue::U16(_) => SampleType::U16,
            SampleValue::U32(_) => SampleType::U32,
            SampleValue::I8(_) => SampleType::I8,
            SampleValue::I16(_) => SampleType::I16,
            SampleValue::I32(_) => SampleType::I32,
            SampleValue::F32(_) => SampleType::F32,
            SampleValue::F64(_) => SampleType::F64,
            SampleValue::C32(_) => SampleType::C32,
            SampleValue::C64(_) => SampleType::C64,
        }
    }

    /// Projects onto the real line (imaginary part dropped) for contexts
    /// that only need real-valued arithmetic, e.g. accumulators.
    pub fn to_f64(self) -> f64 {
        match self {
            SampleValue::Bin(b) => b as u8 as f64,
            SampleValue::U8(v) => v as f64,
            SampleValue::U16(v) => v as f64,
            SampleValue::U32(v) => v as f64,
            SampleValue::I8(v) => v as f64,
            SampleValue::I16(v) => v as f64,
            SampleValue::I32(v) => v as f64,
            SampleValue::F32(v) => v as f64,
            SampleValue::F64(v) => v,
            SampleValue::C32(v) => v.re as f64,
            SampleValue::C64(v) => v.re,
        }
    }

    pub fn from_f64(ty: SampleType, value: f64) -> SampleValue {
        match ty {
            SampleType::Bin => SampleValue::Bin(value != 0.0),
            SampleType::U8 => SampleValue::U8(ty.clamp_f64(value) as u8),
            SampleType::U16 => SampleValue::U16(ty.clamp_f64(value) as u16),
            SampleType::U32 => SampleValue::U32(ty.clamp_f64(value) as u32),
            SampleType::I8 => SampleValue::I8(ty.clamp_f64(value) as i8),
            SampleType::I16 => SampleValue::I16(ty.clamp_f64(value) as i16),
            SampleType::I32 => SampleValue::I32(ty.clamp_f64(value) as i32),
            SampleType::F32 => SampleValue::F32(value as f32),
            SampleType::F64 => SampleValue::F64(value),
            SampleType::C32 => SampleValue::C32(Complex::new(value as f32, 0.0)),
            SampleType::C64 => SampleValue::C64(Complex::new(value, 0.0)),
        }
    }
}

/// A sample numeric kind that can participate in `Image<T>` buffers.
///
/// Monomorphic `Image<T>` code (the scan/separable/full framework bodies)
/// is generic over this trait; `DynImage` provides the runtime-dispatched
/// entry point that matches on [`SampleType`] and calls into the
/// appropriate `Image<T>` instantiation, the same two-layer structure the
/// teacher uses for its `VsfType::t_*` tensor variants over `Tensor<T>`.
pub trait Sample: Copy + Default + Send + Sync + PartialEq + 'static {
    const SAMPLE_TYPE: SampleType;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
    fn to_sample_value(self) -> SampleValue;
}

macro_rules! impl_sample_real {
    ($t:ty, $tag:expr, $variant:ident) => {
        impl Sample for $t {
            const SAMPLE_TYPE: SampleType = $tag;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                $tag.clamp_f64(value) as $t
            }

            fn to_sample_value(self) -> SampleValue {
                SampleValue::$variant(self)
            }
        }
    };
}

impl_sample_real!(u8, SampleType::U8, U8);
impl_sample_real!(u16, SampleType::U16, U16);
impl_sample_real!(u32, SampleType::U32, U32);
impl_sample_real!(i8, SampleType::I8, I8);
impl_sample_real!(i16, SampleType::I16, I16);
impl_sample_real!(i32, SampleType::I32, I32);

impl Sample for f32 {
    const SAMPLE_TYPE: SampleType = SampleType::F32;
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(value: f64) -> Self {
        value as f32
    }
    fn to_sample_value(self) -> SampleValue {
        SampleValue::F32(self)
    }
}

impl Sample for f64 {
    const SAMPLE_TYPE: SampleType = SampleType::F64;
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(value: f64) -> Self {
        value
    }
    fn to_sample_value(self) -> SampleValue {
        SampleValue::F64(self)
    }
}

impl Sample for Complex<f32> {
    const SAMPLE_TYPE: SampleType = SampleType::C32;
    fn to_f64(self) -> f64 {
        self.re as f64
    }
    fn from_f64(value: f64) -> Self {
        Complex::new(value as f32, 0.0)
    }
    fn to_sample_value(self) -> SampleValue {
        SampleValue::C32(self)
    }
}

impl Sample for Complex<f64> {
    const SAMPLE_TYPE: SampleType = SampleType::C64;
    fn to_f64(self) -> f64 {
        self.re
    }
    fn from_f64(value: f64) -> Self {
        Complex::new(value, 0.0)
    }
    fn to_sample_value(self) -> SampleValue {
        SampleValue::C64(self)
    }
}

/// `bool` stands in for the `bin` sample kind: a single bit per sample
/// packed one-`bool`-per-byte in memory (bit-packing into `bitvec` storage
/// is reserved for on-disk/transient masks; in-memory images trade the
/// extra seven bits of padding for uniform slice-based addressing like
/// every other sample kind).
impl Sample for bool {
    const SAMPLE_TYPE: SampleType = SampleType::Bin;
    fn to_f64(self) -> f64 {
        self as u8 as f64
    }
    fn from_f64(value: f64) -> Self {
        value != 0.0
    }
    fn to_sample_value(self) -> SampleValue {
        SampleValue::Bin(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rounds_and_saturates() {
        assert_eq!(SampleType::U8.clamp_f64(-5.0), 0.0);
        assert_eq!(SampleType::U8.clamp_f64(300.0), 255.0);
        assert_eq!(SampleType::U8.clamp_f64(3.4), 3.0);
        assert_eq!(SampleType::U8.clamp_f64(3.6), 4.0);
    }

    #[test]
    fn predicates_partition_the_enum() {
        for ty in [
            SampleType::Bin,
            SampleType::U8,
            SampleType::U16,
            SampleType::U32,
            SampleType::I8,
            SampleType::I16,
            SampleType::I32,
            SampleType::F32,
            SampleType::F64,
            SampleType::C32,
            SampleType::C64,
        ] {
            assert_eq!(ty.is_real(), !ty.is_complex());
        }
    }

    #[test]
    fn sample_trait_round_trips_through_f64_for_integers() {
        let v: u16 = 1234;
        assert_eq!(u16::from_f64(v.to_f64()), v);
    }
}
