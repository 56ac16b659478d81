//! Convex hull area and perimeter, grounded on
//! `original_source/src/measurement/feature_convex_area.h` and
//! `feature_convex_perimeter.h`, both thin `.Area()`/`.Perimeter()` calls on
//! a convex hull.

use crate::measurement::convexhull::ConvexHull;
use crate::measurement::feature::{ConvexHullFeature, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct ConvexArea;

impl ConvexArea {
    pub fn new() -> ConvexArea {
        ConvexArea
    }
}

impl Feature for ConvexArea {
    fn name(&self) -> &str {
        "ConvexArea"
    }
    fn description(&self) -> &str {
        "Area of the object's convex hull"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::ConvexHullBased
    }
}

impl ConvexHullFeature for ConvexArea {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("ConvexArea")]
    }

    fn measure(&self, hull: &ConvexHull, out_values: &mut [f64]) {
        out_values[0] = hull.area();
    }
}

#[derive(Default)]
pub struct ConvexPerimeter;

impl ConvexPerimeter {
    pub fn new() -> ConvexPerimeter {
        ConvexPerimeter
    }
}

impl Feature for ConvexPerimeter {
    fn name(&self) -> &str {
        "ConvexPerimeter"
    }
    fn description(&self) -> &str {
        "Perimeter of the object's convex hull"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::ConvexHullBased
    }
}

impl ConvexHullFeature for ConvexPerimeter {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("ConvexPerimeter")]
    }

    fn measure(&self, hull: &ConvexHull, out_values: &mut [f64]) {
        out_values[0] = hull.perimeter();
    }
}
