//! Polygon approximation of an object's boundary, plus the standard
//! shoelace-formula area/perimeter/centroid computations.
//!
//! No `feature_polygon*.h` or `polygon.h` header was present in the
//! retrieved source pack, so this is a standard computational-geometry
//! implementation rather than a grounded port; `feature_center.h`'s
//! polygon-derived centroid variant motivates exposing `centroid()`
//! alongside `area()`.

#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
}

impl Polygon {
    pub fn from_points(vertices: Vec<(f64, f64)>) -> Polygon {
        Polygon { vertices }
    }

    /// Builds a polygon from a chain code's contour walk, deduplicating the
    /// closing vertex (`contour_points()` repeats the start point).
    pub fn from_chain_code(chain: &crate::measurement::chaincode::ChainCode) -> Polygon {
        let mut points = chain.contour_points();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Polygon { vertices: points }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Signed shoelace area; positive for counter-clockwise vertex order.
    fn signed_area(&self) -> f64 {
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
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
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

    /// Area-weighted centroid. Degrades to the arithmetic mean of vertices
    /// for degenerate (zero-area) polygons.
    pub fn centroid(&self) -> (f64, f64) {
        let n = self.vertices.len();
        let a = self.signed_area();
        if n < 3 || a.abs() < 1e-12 {
            if n == 0 {
                return (0.0, 0.0);
            }
            let (sx, sy) = self.vertices.iter().fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
            return (sx / n as f64, sy / n as f64);
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..n {
            let (x0, y0) = self.vertices[i];
            let (x1, y1) = self.vertices[(i + 1) % n];
            let cross = x0 * y1 - x1 * y0;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
        (cx / (6.0 * a), cy / (6.0 * a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_has_area_one_and_centroid_at_center() {
        let square = Polygon::from_points(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!((square.area() - 1.0).abs() < 1e-12);
        let (cx, cy) = square.centroid();
        assert!((cx - 0.5).abs() < 1e-12);
        assert!((cy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn perimeter_of_unit_square_is_four() {
        let square = Polygon::from_points(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!((square.perimeter() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn vertex_winding_does_not_affect_area_magnitude() {
        let ccw = Polygon::from_points(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let cw = Polygon::from_points(vec![(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        assert!((ccw.area() - cw.area()).abs() < 1e-12);
    }
}
