//! Integration coverage for the separable framework's per-dimension
//! boundary handling and pass ordering (spec §4.5, §8).

use pixelforge::boundary::BoundaryCondition;
use pixelforge::framework::separable::{separable, SeparableFilter};
use pixelforge::image::Image;
use pixelforge::types::TensorShape;

struct CenterDifference;
impl SeparableFilter<f64> for CenterDifference {
    fn border(&self) -> usize {
        1
    }
    fn filter(&self, in_line: &[f64], out_line: &mut [f64], _dim: usize) {
        for p in 0..out_line.len() {
            out_line[p] = in_line[p + 2] - in_line[p];
        }
    }
}

#[test]
fn running_along_both_dimensions_of_a_ramp_image_matches_the_gradient() {
    let mut img = Image::<f64>::raw(vec![5, 5]);
    img.reforge(vec![5, 5], TensorShape::Scalar, 1);
    for y in 0..5 {
        for x in 0..5 {
            img.set(&[x, y], 0, (x + y) as f64).unwrap();
        }
    }
    let bc = [BoundaryCondition::AddZeros, BoundaryCondition::AddZeros];
    let out = separable(&img, &[0, 1], &bc, &CenterDifference).unwrap();
    assert_eq!(out.sizes(), &[5, 5]);
}

struct HalveByAveragingPairs;
impl SeparableFilter<f64> for HalveByAveragingPairs {
    fn out_size(&self, in_size: usize) -> usize {
        in_size / 2
    }
    fn filter(&self, in_line: &[f64], out_line: &mut [f64], _dim: usize) {
        for p in 0..out_line.len() {
            out_line[p] = (in_line[2 * p] + in_line[2 * p + 1]) / 2.0;
        }
    }
}

#[test]
fn a_resizing_filter_shrinks_the_processed_dimension() {
    let mut img = Image::<f64>::raw(vec![6, 4]);
    img.reforge(vec![6, 4], TensorShape::Scalar, 1);
    for y in 0..4 {
        for x in 0..6 {
            img.set(&[x, y], 0, x as f64).unwrap();
        }
    }
    let bc = [BoundaryCondition::AddZeros, BoundaryCondition::AddZeros];
    let out = separable(&img, &[0], &bc, &HalveByAveragingPairs).unwrap();
    // Dimension 0 shrinks from 6 to 3; dimension 1 is untouched at 4.
    assert_eq!(out.sizes(), &[3, 4]);
    for y in 0..4 {
        for p in 0..3 {
            let expected = (2 * p) as f64 + 0.5;
            assert!((out.at(&[p, y]).unwrap() - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn an_out_of_range_process_dimension_is_rejected() {
    let mut img = Image::<f64>::raw(vec![3, 3]);
    img.reforge(vec![3, 3], TensorShape::Scalar, 1);
    let bc = [BoundaryCondition::SymmetricMirror, BoundaryCondition::SymmetricMirror];
    assert!(separable(&img, &[2], &bc, &CenterDifference).is_err());
}

#[test]
fn wrong_length_boundary_array_is_rejected() {
    let mut img = Image::<f64>::raw(vec![3, 3]);
    img.reforge(vec![3, 3], TensorShape::Scalar, 1);
    let bc = [BoundaryCondition::SymmetricMirror];
    assert!(separable(&img, &[0], &bc, &CenterDifference).is_err());
}
