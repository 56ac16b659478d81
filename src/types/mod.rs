//! Core value types: sample kinds, units, and tensor shapes.

pub mod sample;
pub mod tensor_shape;
pub mod units;

pub use sample::{Sample, SampleType, SampleValue};
pub use tensor_shape::TensorShape;
pub use units::{PixelSize, SiPrefix, Units};
