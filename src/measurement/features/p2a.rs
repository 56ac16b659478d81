//! Perimeter-squared-over-area shape factor, grounded on
//! `original_source/src/measurement/feature_p2a.h`
//! (`perimeter^2 / (4 * pi * area)`; 1.0 for a perfect circle, larger for
//! more convoluted boundaries).

use crate::measurement::feature::{CompositeFeature, DependencyView, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct P2A;

impl P2A {
    pub fn new() -> P2A {
        P2A
    }
}

impl Feature for P2A {
    fn name(&self) -> &str {
        "P2A"
    }
    fn description(&self) -> &str {
        "Perimeter squared over area, normalized so a circle measures 1"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::Composite
    }
}

impl CompositeFeature for P2A {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("P2A")]
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["Perimeter".to_string(), "PolygonArea".to_string()]
    }

    fn compose(&self, deps: &DependencyView, out_values: &mut [f64]) {
        let perimeter = deps.get("Perimeter").map(|v| v[0]).unwrap_or(f64::NAN);
        let area = deps.get("PolygonArea").map(|v| v[0]).unwrap_or(f64::NAN);
        out_values[0] = if area > 0.0 { perimeter * perimeter / (4.0 * std::f64::consts::PI * area) } else { f64::NAN };
    }
}
