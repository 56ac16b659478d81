//! The feature base contract (spec §4.10): one `name`/`description` pair
//! plus a kind-specific trait a concrete feature implements.
//!
//! Grounded on `original_source/include/diplib/measurement.h`'s `Feature`
//! class hierarchy (`Feature::Base` with `LineBased`/`ImageBased`/
//! `ChainCodeBased`/`Polygon`/`ConvexHull`/`Composite` subclasses), adapted
//! to the teacher's trait-object-over-enum-tag dispatch style
//! (`VsfType`/`DynImage`) rather than C++ virtual inheritance.

use crate::types::Units;

/// One output column a feature contributes: its name and physical units.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueInfo {
    pub name: String,
    pub units: Units,
}

impl ValueInfo {
    pub fn new(name: impl Into<String>, units: Units) -> ValueInfo {
        ValueInfo { name: name.into(), units }
    }

    pub fn dimensionless(name: impl Into<String>) -> ValueInfo {
        ValueInfo { name: name.into(), units: Units::DIMENSIONLESS }
    }
}

/// Which of the six dispatch shapes a feature implements. The engine uses
/// this tag to partition a requested feature list before running each
/// pass (spec §4.11 step 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    LineBased,
    ImageBased,
    ChainCodeBased,
    PolygonBased,
    ConvexHullBased,
    Composite,
}

/// Properties every feature declares regardless of kind.
pub trait Feature: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn kind(&self) -> FeatureKind;

    /// True if this feature reads the grey-value co-image (and the engine
    /// should reject the request when no grey image was supplied).
    fn needs_grey_value(&self) -> bool {
        false
    }
}

/// Scanned one line at a time during the single shared pass over `label`
/// (and `grey`, when present) that the engine runs for every line-based
/// feature at once (spec §4.11 step 4). Not required to be thread-safe: the
/// engine gives each tile its own boxed clone-of-state via `initialize`.
pub trait LineBasedFeature: Feature {
    /// Declares this feature's output columns for an image of the given
    /// dimensionality, and resets any per-object accumulator storage to
    /// `n_objects` empty entries.
    fn initialize(&mut self, dimensionality: usize, n_objects: usize) -> Vec<ValueInfo>;

    /// One full line of the label image along `dimension`; `position` gives
    /// the line's fixed coordinate in every other dimension (its entry at
    /// `dimension` is ignored). `grey_line` is `None` unless
    /// `needs_grey_value()` is true and a grey image was supplied.
    /// `object_index` resolves a label id to its row index in the
    /// measurement table; pixels with label `0` are background and should
    /// be skipped.
    #[allow(clippy::too_many_arguments)]
    fn scan_line(
        &mut self,
        label_line: &[u32],
        grey_line: Option<&[f64]>,
        position: &[usize],
        dimension: usize,
        object_index: &dyn Fn(u32) -> Option<usize>,
    );

    /// Called once per object after every line has been scanned, writing
    /// this feature's final values for that object.
    fn finish(&mut self, object_index: usize, out_values: &mut [f64]);

    /// Releases any per-object accumulator storage. Called once at the end
    /// of the engine's run regardless of which passes executed.
    fn cleanup(&mut self) {}
}

/// Runs once over the whole label (and optional grey) image, writing every
/// object's values directly (spec §4.11 step 5).
pub trait ImageBasedFeature: Feature {
    fn value_info(&self, dimensionality: usize) -> Vec<ValueInfo>;

    /// `object_ids` is the engine's canonical object list, in row order;
    /// the returned vector has one entry per object, each of length
    /// `value_info(..).len()`.
    fn measure(
        &self,
        label: &crate::image::Image<u32>,
        grey: Option<&crate::image::DynImage>,
        object_ids: &[u32],
    ) -> crate::error::PfResult<Vec<Vec<f64>>>;
}

/// A traced boundary, Freeman-coded, for one object (spec §3.2's run
/// representation doesn't apply here: chain codes trace a 2-D contour, not
/// an n-D neighborhood). See [`crate::measurement::chaincode::ChainCode`].
pub trait ChainCodeFeature: Feature {
    fn value_info(&self) -> Vec<ValueInfo>;

    fn measure(&self, chain_code: &crate::measurement::chaincode::ChainCode, out_values: &mut [f64]);
}

/// A polygon approximation of an object's boundary.
pub trait PolygonFeature: Feature {
    fn value_info(&self) -> Vec<ValueInfo>;

    fn measure(&self, polygon: &crate::measurement::polygon::Polygon, out_values: &mut [f64]);
}

/// The convex hull of an object's boundary polygon.
pub trait ConvexHullFeature: Feature {
    fn value_info(&self) -> Vec<ValueInfo>;

    fn measure(&self, hull: &crate::measurement::convexhull::ConvexHull, out_values: &mut [f64]);
}

/// A read-only view of one object's already-computed values for a set of
/// named dependencies, passed to [`CompositeFeature::compose`].
pub struct DependencyView<'a> {
    names: &'a [String],
    values: &'a [&'a [f64]],
}

impl<'a> DependencyView<'a> {
    pub fn new(names: &'a [String], values: &'a [&'a [f64]]) -> DependencyView<'a> {
        DependencyView { names, values }
    }

    /// The dependency's values for the current object, or `None` if `name`
    /// wasn't declared in [`CompositeFeature::dependencies`].
    pub fn get(&self, name: &str) -> Option<&'a [f64]> {
        self.names.iter().position(|n| n == name).map(|i| self.values[i])
    }
}

/// Computed from other features' already-finished values (spec §4.11 step
/// 7); the engine topologically orders composites ahead of time so every
/// dependency named here is guaranteed finished before `compose` runs.
pub trait CompositeFeature: Feature {
    fn value_info(&self) -> Vec<ValueInfo>;

    fn dependencies(&self) -> Vec<String>;

    fn compose(&self, deps: &DependencyView, out_values: &mut [f64]);
}
