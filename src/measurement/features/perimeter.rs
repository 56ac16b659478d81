//! Object boundary perimeter, grounded on
//! `original_source/src/measurement/feature_perimeter.h`'s
//! `chainCode.Length() + pi` (the `+ pi` term compensates for the boundary
//! walk running through pixel centers rather than around pixel edges).

use crate::measurement::chaincode::ChainCode;
use crate::measurement::feature::{ChainCodeFeature, Feature, FeatureKind, ValueInfo};

#[derive(Default)]
pub struct Perimeter;

impl Perimeter {
    pub fn new() -> Perimeter {
        Perimeter
    }
}

impl Feature for Perimeter {
    fn name(&self) -> &str {
        "Perimeter"
    }
    fn description(&self) -> &str {
        "Length of the object's boundary"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::ChainCodeBased
    }
}

impl ChainCodeFeature for Perimeter {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("Perimeter")]
    }

    fn measure(&self, chain_code: &ChainCode, out_values: &mut [f64]) {
        out_values[0] = chain_code.length() + std::f64::consts::PI;
    }
}
