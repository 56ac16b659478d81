//! The convex hull of an object's boundary, plus area/perimeter and the
//! rotating-calipers Feret diameters.
//!
//! Grounded on `original_source/src/measurement/feature_feret.h`'s
//! `FeretValues{maxDiameter, minDiameter, maxPerpendicular, maxAngle,
//! minAngle}` struct and its call through a `ConvexHull::Feret()` method,
//! and `feature_convex_area.h` / `feature_convex_perimeter.h`'s
//! `.Area()`/`.Perimeter()` calls. The hull-construction algorithm itself
//! (Andrew's monotone chain) isn't in the retrieved source — no
//! `convex_hull.h`/`.cpp` was present — so it's a standard implementation
//! of the documented contract.

use std::f64::consts::FRAC_PI_2;

#[derive(Debug, Clone)]
pub struct ConvexHull {
    vertices: Vec<(f64, f64)>,
}

/// The five caliper measurements DIPlib's `Feret` feature reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeretValues {
    pub max_diameter: f64,
    pub min_diameter: f64,
    pub max_perpendicular: f64,
    pub max_angle: f64,
    pub min_angle: f64,
}

fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

impl ConvexHull {
    /// Andrew's monotone chain: sorts points, then builds the lower and
    /// upper hull chains, each dropping interior points via a cross-product
    /// turn test.
    pub fn from_points(points: &[(f64, f64)]) -> ConvexHull {
        let mut pts = points.to_vec();
        pts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.partial_cmp(&b.1).unwrap()));
        pts.dedup();
        if pts.len() < 3 {
            return ConvexHull { vertices: pts };
        }

        let mut lower: Vec<(f64, f64)> = Vec::new();
        for &p in &pts {
            while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
                lower.pop();
            }
            lower.push(p);
        }
        let mut upper: Vec<(f64, f64)> = Vec::new();
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
                upper.pop();
            }
            upper.push(p);
        }
        lower.pop();
        upper.pop();
        lower.extend(upper);
        ConvexHull { vertices: lower }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let (x0, y0) = self.vertices[i];
            let (x1, y1) = self.vertices[(i + 1) % n];
            sum += x0 * y1 - x1 * y0;
        }
        sum.abs() / 2.0
    }

    pub fn perimeter(&self) -> f64 {
        let n = self.vertices.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let (x0, y0) = self.vertices[i];
                let (x1, y1) = self.vertices[(i + 1) % n];
                ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
            })
            .sum()
    }

    /// Extent of every hull vertex projected onto the unit direction at
    /// `angle`, returned as `(min, max)`.
    fn project_extent(&self, angle: f64) -> (f64, f64) {
        let (c, s) = (angle.cos(), angle.sin());
        self.vertices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, y)| {
            let p = x * c + y * s;
            (lo.min(p), hi.max(p))
        })
    }

    /// Max diameter by brute-force vertex pairing (hulls from object
    /// boundaries are small enough that O(n^2) is fine); min diameter and
    /// max-perpendicular width by rotating calipers over each hull edge's
    /// outward normal, per `feature_feret.h`'s caliper-rotation procedure.
    pub fn feret(&self) -> FeretValues {
        let n = self.vertices.len();
        if n < 2 {
            return FeretValues { max_diameter: 0.0, min_diameter: 0.0, max_perpendicular: 0.0, max_angle: 0.0, min_angle: 0.0 };
        }
        let mut max_d2 = 0.0;
        let mut max_angle = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let (x0, y0) = self.vertices[i];
                let (x1, y1) = self.vertices[j];
                let (dx, dy) = (x1 - x0, y1 - y0);
                let d2 = dx * dx + dy * dy;
                if d2 > max_d2 {
                    max_d2 = d2;
                    max_angle = dy.atan2(dx);
                }
            }
        }
        let max_diameter = max_d2.sqrt();

        let (lo, hi) = self.project_extent(max_angle + FRAC_PI_2);
        let max_perpendicular = hi - lo;

        let mut min_width = f64::INFINITY;
        let mut min_angle = 0.0;
        if n < 3 {
            min_width = max_perpendicular;
            min_angle = max_angle;
        } else {
            for i in 0..n {
                let (x0, y0) = self.vertices[i];
                let (x1, y1) = self.vertices[(i + 1) % n];
                let edge_angle = (y1 - y0).atan2(x1 - x0);
                let (lo, hi) = self.project_extent(edge_angle + FRAC_PI_2);
                let width = hi - lo;
                if width < min_width {
                    min_width = width;
                    min_angle = edge_angle;
                }
            }
        }

        FeretValues { max_diameter, min_diameter: min_width, max_perpendicular, max_angle, min_angle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_a_square_plus_interior_point_drops_the_interior_point() {
        let hull = ConvexHull::from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (2.0, 2.0)]);
        assert_eq!(hull.vertices().len(), 4);
        assert!((hull.area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn feret_max_diameter_of_a_square_is_the_diagonal() {
        let hull = ConvexHull::from_points(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let feret = hull.feret();
        assert!((feret.max_diameter - (8.0f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn feret_min_diameter_of_a_rectangle_is_the_short_side() {
        let hull = ConvexHull::from_points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 3.0), (0.0, 3.0)]);
        let feret = hull.feret();
        assert!((feret.min_diameter - 3.0).abs() < 1e-6);
    }
}
