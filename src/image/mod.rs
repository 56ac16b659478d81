//! The image container: shared storage, the generic `Image<T>`, and the
//! runtime sample-type dispatch wrapper `DynImage`.

pub mod buffer;
pub mod dyn_image;
pub mod image;

pub use buffer::ImageBuffer;
pub use dyn_image::DynImage;
pub use image::Image;
