//! Boundary extension behaviors enumerated in spec §8: mirror, periodic,
//! and constant-fill conditions applied at an image's edges.

use pixelforge::boundary::{extend_image, read_pixel_with_boundary_condition, BoundaryCondition};
use pixelforge::image::Image;
use pixelforge::types::TensorShape;

fn line(values: &[f64]) -> Image<f64> {
    let mut img = Image::<f64>::raw(vec![values.len()]);
    img.reforge(vec![values.len()], TensorShape::Scalar, 1);
    for (i, &v) in values.iter().enumerate() {
        img.set(&[i], 0, v).unwrap();
    }
    img
}

#[test]
fn symmetric_mirror_duplicates_the_edge_sample() {
    let img = line(&[1.0, 2.0, 3.0]);
    let v = read_pixel_with_boundary_condition(&img, &[-1], &[BoundaryCondition::SymmetricMirror]).unwrap();
    assert_eq!(v, vec![1.0]);
}

#[test]
fn periodic_wraps_around_to_the_opposite_edge() {
    let img = line(&[1.0, 2.0, 3.0]);
    let v = read_pixel_with_boundary_condition(&img, &[-1], &[BoundaryCondition::Periodic]).unwrap();
    assert_eq!(v, vec![3.0]);
    let v = read_pixel_with_boundary_condition(&img, &[3], &[BoundaryCondition::Periodic]).unwrap();
    assert_eq!(v, vec![1.0]);
}

#[test]
fn add_zeros_fills_outside_samples_with_zero() {
    let img = line(&[1.0, 2.0, 3.0]);
    let v = read_pixel_with_boundary_condition(&img, &[5], &[BoundaryCondition::AddZeros]).unwrap();
    assert_eq!(v, vec![0.0]);
}

#[test]
fn extend_image_grows_every_dimension_by_twice_the_border() {
    let mut img = Image::<f64>::raw(vec![3, 2]);
    img.reforge(vec![3, 2], TensorShape::Scalar, 1);
    let extended = extend_image(&img, &[2, 1], &[BoundaryCondition::AddZeros, BoundaryCondition::AddZeros], false, false).unwrap();
    assert_eq!(extended.sizes(), &[7, 4]);
}
