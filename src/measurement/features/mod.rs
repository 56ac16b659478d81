//! Concrete feature catalog: a grounded, representative sample spanning
//! every [`super::feature::FeatureKind`], enough to exercise the registry's
//! dependency resolution and the engine's six-phase dispatch end to end.

pub mod aspect_ratio_feret;
pub mod cartesian_box;
pub mod center;
pub mod convex_hull_measures;
pub mod convexity;
pub mod feret;
pub mod gravity;
pub mod minmax;
pub mod p2a;
pub mod perimeter;
pub mod polygon_area;
pub mod size;
pub mod statistics;

pub use aspect_ratio_feret::AspectRatioFeret;
pub use cartesian_box::CartesianBox;
pub use center::Center;
pub use convex_hull_measures::{ConvexArea, ConvexPerimeter};
pub use convexity::Convexity;
pub use feret::Feret;
pub use gravity::Gravity;
pub use minmax::{Maximum, Minimum};
pub use p2a::P2A;
pub use perimeter::Perimeter;
pub use polygon_area::{PolygonArea, PolygonCenter};
pub use size::Size;
pub use statistics::Statistics;

/// Registers every feature in the catalog under its own name. Callers that
/// need a subset can build a [`super::registry::FeatureRegistry`] by hand
/// instead.
pub fn register_all(registry: &mut super::registry::FeatureRegistry) -> crate::error::PfResult<()> {
    use super::registry::RegisteredFeature;

    registry.register(RegisteredFeature::Line(Box::new(Size::new())))?;
    registry.register(RegisteredFeature::Line(Box::new(Minimum::new())))?;
    registry.register(RegisteredFeature::Line(Box::new(Maximum::new())))?;
    registry.register(RegisteredFeature::Line(Box::new(Statistics::new())))?;
    registry.register(RegisteredFeature::Line(Box::new(CartesianBox::new())))?;
    registry.register(RegisteredFeature::Line(Box::new(Center::new())))?;
    registry.register(RegisteredFeature::Image(Box::new(Gravity::new())))?;
    registry.register(RegisteredFeature::ChainCode(Box::new(Perimeter::new())))?;
    registry.register(RegisteredFeature::ConvexHull(Box::new(Feret::new())))?;
    registry.register(RegisteredFeature::Polygon(Box::new(PolygonArea::new())))?;
    registry.register(RegisteredFeature::Polygon(Box::new(PolygonCenter::new())))?;
    registry.register(RegisteredFeature::ConvexHull(Box::new(ConvexArea::new())))?;
    registry.register(RegisteredFeature::ConvexHull(Box::new(ConvexPerimeter::new())))?;
    registry.register(RegisteredFeature::Composite(Box::new(Convexity::new())))?;
    registry.register(RegisteredFeature::Composite(Box::new(P2A::new())))?;
    registry.register(RegisteredFeature::Composite(Box::new(AspectRatioFeret::new())))?;
    Ok(())
}
