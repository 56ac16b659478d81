//! Shoelace-formula area and centroid of an object's boundary polygon,
//! analogous to `original_source/src/measurement/feature_center.h`'s
//! polygon-derived centroid variant (the pixel-count variant lives in
//! [`super::cartesian_box`]/the line-based catalog instead).

use crate::measurement::feature::{Feature, FeatureKind, PolygonFeature, ValueInfo};
use crate::measurement::polygon::Polygon;

#[derive(Default)]
pub struct PolygonArea;

impl PolygonArea {
    pub fn new() -> PolygonArea {
        PolygonArea
    }
}

impl Feature for PolygonArea {
    fn name(&self) -> &str {
        "PolygonArea"
    }
    fn description(&self) -> &str {
        "Area enclosed by the object's boundary polygon"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::PolygonBased
    }
}

impl PolygonFeature for PolygonArea {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("PolygonArea")]
    }

    fn measure(&self, polygon: &Polygon, out_values: &mut [f64]) {
        out_values[0] = polygon.area();
    }
}

#[derive(Default)]
pub struct PolygonCenter;

impl PolygonCenter {
    pub fn new() -> PolygonCenter {
        PolygonCenter
    }
}

impl Feature for PolygonCenter {
    fn name(&self) -> &str {
        "PolygonCenter"
    }
    fn description(&self) -> &str {
        "Centroid of the object's boundary polygon"
    }
    fn kind(&self) -> FeatureKind {
        FeatureKind::PolygonBased
    }
}

impl PolygonFeature for PolygonCenter {
    fn value_info(&self) -> Vec<ValueInfo> {
        vec![ValueInfo::dimensionless("dim0"), ValueInfo::dimensionless("dim1")]
    }

    fn measure(&self, polygon: &Polygon, out_values: &mut [f64]) {
        let (cx, cy) = polygon.centroid();
        out_values[0] = cx;
        out_values[1] = cy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_and_center_of_a_unit_square() {
        let square = Polygon::from_points(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let mut area = [0.0];
        PolygonArea::new().measure(&square, &mut area);
        assert!((area[0] - 1.0).abs() < 1e-12);
        let mut center = [0.0; 2];
        PolygonCenter::new().measure(&square, &mut center);
        assert!((center[0] - 0.5).abs() < 1e-12);
        assert!((center[1] - 0.5).abs() < 1e-12);
    }
}
