//! Area ratio of an object to its convex hull, grounded on
//! `original_source/src/measurement/feature_convexity.h`
//! (`Size / ConvexArea`, clamped to 1 since a labeled object's pixel area is
//! never larger than its own convex hull's continuous area in practice but
//! discretization can push the ratio a hair over 1).

use crate::measurement::feature::{CompositeFeature, DependencyView, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct Convexity;

impl Convexity {
    pub fn new() -> Convexity {
        Convexity
    }
}

impl Feature for Convexity {
    fn name(&self) -> &str {
        "Convexity"
    }
    fn description(&self) -> &str {
        "Ratio of the object's area to its convex hull's area"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::Composite
    }
}

impl CompositeFeature for Convexity {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("Convexity")]
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["Size".to_string(), "ConvexArea".to_string()]
    }

    fn compose(&self, deps: &DependencyView, out_values: &mut [f64]) {
        let size = deps.get("Size").map(|v| v[0]).unwrap_or(f64::NAN);
        let convex_area = deps.get("ConvexArea").map(|v| v[0]).unwrap_or(f64::NAN);
        out_values[0] = if convex_area > 0.0 { (size / convex_area).min(1.0) } else { f64::NAN };
    }
}
