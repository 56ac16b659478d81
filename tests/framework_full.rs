//! Integration coverage for the full framework's neighborhood gathering and
//! weighting (spec §4.6, §8).

use pixelforge::boundary::BoundaryCondition;
use pixelforge::framework::full::{full, FullFilter};
use pixelforge::image::Image;
use pixelforge::pixel_table::{PixelTable, Shape};
use pixelforge::types::TensorShape;

struct Max;
impl FullFilter<f64> for Max {
    fn filter(&self, neighborhood: &[f64], _weights: Option<&[f64]>) -> f64 {
        neighborhood.iter().cloned().fold(f64::MIN, f64::max)
    }
}

#[test]
fn a_3x3_max_filter_spreads_a_single_bright_pixel_to_its_neighbors() {
    let mut img = Image::<f64>::raw(vec![5, 5]);
    img.reforge(vec![5, 5], TensorShape::Scalar, 1);
    img.set(&[2, 2], 0, 9.0).unwrap();
    let table = PixelTable::from_shape(Shape::Rectangle, &[3, 3]).unwrap();
    let bc = vec![BoundaryCondition::AddZeros; 2];
    let out = full(&img, &table, &bc, &Max).unwrap();
    for y in 1..=3 {
        for x in 1..=3 {
            assert_eq!(out.at(&[x, y]).unwrap(), 9.0);
        }
    }
    assert_eq!(out.at(&[0, 0]).unwrap(), 0.0);
}

#[test]
fn mismatched_pixel_table_dimensionality_is_rejected() {
    let mut img = Image::<f64>::raw(vec![4, 4, 4]);
    img.reforge(vec![4, 4, 4], TensorShape::Scalar, 1);
    let table = PixelTable::from_shape(Shape::Rectangle, &[3, 3]).unwrap();
    let bc = vec![BoundaryCondition::AddZeros; 3];
    assert!(full(&img, &table, &bc, &Max).is_err());
}
