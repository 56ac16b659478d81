//! Pixelforge: an n-dimensional scientific image container, a family of
//! processing frameworks for dispatching a filter over it, and a
//! per-object measurement engine for extracting features from labeled
//! images.
//!
//! - [`image`] is the storage layer: [`image::Image<T>`] (strided, typed,
//!   tensor-valued pixels) and [`image::DynImage`] (runtime sample-type
//!   dispatch over it).
//! - [`framework`] holds the three dispatch shapes filters are written
//!   against: [`framework::scan`] (one line at a time), [`framework::separable`]
//!   (a 1-D kernel applied dimension by dimension), and [`framework::full`]
//!   (an arbitrary-shaped neighborhood).
//! - [`boundary`] describes how those frameworks read past an image's edge.
//! - [`measurement`] extracts per-object features from a labeled image,
//!   via a [`measurement::FeatureRegistry`] and the [`measurement::measure`]
//!   dispatch.
//! - [`accumulators`], [`histogram`], and [`pixel_table`] are the supporting
//!   numerical building blocks the frameworks and measurement engine share.
//! - [`serialize`] renders a [`measurement::Measurement`] table as plain
//!   text or CSV.
//!
//! Most operations return [`error::PfResult<T>`]; see [`error::PfError`]
//! for the failure catalog.

pub mod accumulators;
pub mod boundary;
pub mod config;
pub mod error;
pub mod framework;
pub mod histogram;
pub mod image;
pub mod iterators;
pub mod measurement;
pub mod pixel_table;
pub mod serialize;
pub mod types;

pub use error::{PfError, PfResult};
pub use image::{DynImage, Image};
pub use measurement::{FeatureRegistry, Measurement};
