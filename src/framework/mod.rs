//! Three dispatch frameworks that apply a user filter over an image while
//! handling broadcasting, boundary extension, and thread scheduling so the
//! filter itself only has to describe one line or one neighborhood
//! (spec §4.4-§4.6).

pub mod full;
pub mod scan;
pub mod separable;

pub use full::{full, FullFilter};
pub use scan::{scan, ScanFilter};
pub use separable::{separable, SeparableFilter};
