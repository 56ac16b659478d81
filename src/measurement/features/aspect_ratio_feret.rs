//! Aspect ratio derived from the Feret diameters, grounded on
//! `original_source/src/measurement/feature_aspect_ratio_feret.h`
//! (`FeretPerpMin / FeretMin`, the ratio of the object's extent
//! perpendicular to its narrowest caliper direction over that narrowest
//! width itself).

use crate::measurement::feature::{CompositeFeature, DependencyView, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct AspectRatioFeret;

impl AspectRatioFeret {
    pub fn new() -> AspectRatioFeret {
        AspectRatioFeret
    }
}

impl Feature for AspectRatioFeret {
    fn name(&self) -> &str {
        "AspectRatioFeret"
    }
    fn description(&self) -> &str {
        "Ratio of perpendicular-to-minimum-caliper extent over the minimum caliper diameter"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::Composite
    }
}

impl CompositeFeature for AspectRatioFeret {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("AspectRatioFeret")]
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["Feret".to_string()]
    }

    fn compose(&self, deps: &DependencyView, out_values: &mut [f64]) {
        let feret = deps.get("Feret").unwrap_or(&[]);
        out_values[0] = if feret.len() == 5 && feret[1] > 0.0 { feret[2] / feret[1] } else { f64::NAN };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_a_long_thin_rectangle_is_large() {
        let feret = [10.0, 2.0, 2.0, 0.0, 0.0];
        let names = vec!["Feret".to_string()];
        let values: Vec<&[f64]> = vec![&feret];
        let deps = DependencyView::new(&names, &values);
        let mut out = [0.0];
        AspectRatioFeret::new().compose(&deps, &mut out);
        assert!((out[0] - 1.0).abs() < 1e-12);
    }
}
