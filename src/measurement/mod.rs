//! Per-object feature extraction from labeled images (spec §4.10-§4.11): a
//! named [`registry::FeatureRegistry`] of [`feature::Feature`] implementors,
//! a forged [`table::Measurement`] table, and the [`engine::measure`]
//! dispatch that fills one in from the other.

pub mod chaincode;
pub mod convexhull;
pub mod engine;
pub mod feature;
pub mod features;
pub mod polygon;
pub mod registry;
pub mod table;

pub use chaincode::ChainCode;
pub use convexhull::ConvexHull;
pub use engine::measure;
pub use feature::{
    ChainCodeFeature, CompositeFeature, ConvexHullFeature, DependencyView, Feature, FeatureKind, ImageBasedFeature, LineBasedFeature,
    PolygonFeature, ValueInfo,
};
pub use polygon::Polygon;
pub use registry::{FeatureRegistry, RegisteredFeature};
pub use table::Measurement;
