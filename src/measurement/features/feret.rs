//! Caliper (Feret) diameters, grounded on
//! `original_source/src/measurement/feature_feret.h`'s `FeretValues` struct:
//! `maxDiameter`, `minDiameter`, `maxPerpendicular`, `maxAngle`, `minAngle`,
//! here produced straight from [`crate::measurement::convexhull::ConvexHull::feret`].
//! Classified as convex-hull-based rather than chain-code-based: the
//! original computes calipers directly over the traced boundary, but
//! routing through the hull lets this crate's engine reuse one hull per
//! object across `Feret`/`ConvexArea`/`ConvexPerimeter`/`Convexity`.

use crate::measurement::convexhull::ConvexHull;
use crate::measurement::feature::{ConvexHullFeature, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct Feret;

impl Feret {
    pub fn new() -> Feret {
        Feret
    }
}

impl Feature for Feret {
    fn name(&self) -> &str {
        "Feret"
    }
    fn description(&self) -> &str {
        "Maximum and minimum caliper diameters of the object"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::ConvexHullBased
    }
}

impl ConvexHullFeature for Feret {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![
            ValueInfo::dimensionless("FeretMax"),
            ValueInfo::dimensionless("FeretMin"),
            ValueInfo::dimensionless("FeretPerpMin"),
            ValueInfo::dimensionless("FeretMaxAngle"),
            ValueInfo::dimensionless("FeretMinAngle"),
        ]
    }

    fn measure(&self, hull: &ConvexHull, out_values: &mut [f64]) {
        let feret = hull.feret();
        out_values[0] = feret.max_diameter;
        out_values[1] = feret.min_diameter;
        out_values[2] = feret.max_perpendicular;
        out_values[3] = feret.max_angle;
        out_values[4] = feret.min_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_the_five_caliper_values_in_the_declared_order() {
        let hull = ConvexHull::from_points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 3.0), (0.0, 3.0)]);
        let mut out = [0.0; 5];
        Feret::new().measure(&hull, &mut out);
        assert!((out[0] - (109.0f64).sqrt()).abs() < 1e-6);
        assert!((out[1] - 3.0).abs() < 1e-6);
    }
}
