//! End-to-end coverage of the measurement engine over labeled images with
//! more than one object, exercising every feature kind together (spec
//! §4.10-§4.11, §8).

use pixelforge::image::{DynImage, Image};
use pixelforge::measurement::features::register_all;
use pixelforge::measurement::{measure, FeatureRegistry};
use pixelforge::types::TensorShape;

/// Two disjoint rectangular objects: a 3x2 block labeled 1, a 2x4 block
/// labeled 2, in a 10x10 field. Grey value equals `x + y` everywhere.
fn two_rectangles() -> (Image<u32>, DynImage) {
    let mut label = Image::<u32>::raw(vec![10, 10]);
    label.reforge(vec![10, 10], TensorShape::Scalar, 1);
    let mut grey = Image::<f64>::raw(vec![10, 10]);
    grey.reforge(vec![10, 10], TensorShape::Scalar, 1);
    for y in 0..10 {
        for x in 0..10 {
            let id = if (1..4).contains(&x) && (1..3).contains(&y) {
                1
            } else if (6..8).contains(&x) && (4..8).contains(&y) {
                2
            } else {
                0
            };
            label.set(&[x, y], 0, id).unwrap();
            grey.set(&[x, y], 0, (x + y) as f64).unwrap();
        }
    }
    (label, DynImage::F64(grey))
}

fn registry() -> FeatureRegistry {
    let mut r = FeatureRegistry::new();
    register_all(&mut r).unwrap();
    r
}

#[test]
fn size_matches_each_rectangles_pixel_count() {
    let (label, _) = two_rectangles();
    let mut reg = registry();
    let table = measure(&label, None, &["Size".to_string()], None, &mut reg).unwrap();
    assert_eq!(table.get(1, "Size", 0).unwrap(), 6.0);
    assert_eq!(table.get(2, "Size", 0).unwrap(), 8.0);
}

#[test]
fn cartesian_box_reports_the_bounding_extent_of_each_object() {
    let (label, _) = two_rectangles();
    let mut reg = registry();
    let table = measure(&label, None, &["CartesianBox".to_string()], None, &mut reg).unwrap();
    assert_eq!(table.get(1, "CartesianBox", 0).unwrap(), 3.0);
    assert_eq!(table.get(1, "CartesianBox", 1).unwrap(), 2.0);
    assert_eq!(table.get(2, "CartesianBox", 0).unwrap(), 2.0);
    assert_eq!(table.get(2, "CartesianBox", 1).unwrap(), 4.0);
}

#[test]
fn gravity_weighs_toward_the_brighter_corner_of_each_object() {
    let (label, grey) = two_rectangles();
    let mut reg = registry();
    let table = measure(&label, Some(&grey), &["Gravity".to_string()], None, &mut reg).unwrap();
    // Grey value rises with x and y, so the weighted centroid of object 1
    // (x in [1,4), y in [1,3)) sits closer to its high-x,high-y corner than
    // its unweighted geometric center (2.5, 1.5).
    let gx = table.get(1, "Gravity", 0).unwrap();
    let gy = table.get(1, "Gravity", 1).unwrap();
    assert!(gx > 2.5);
    assert!(gy > 1.5);
}

#[test]
fn center_of_a_single_row_object_is_its_mean_coordinate() {
    // A 10x10 field with one object covering the full row y=5.
    let mut label = Image::<u32>::raw(vec![10, 10]);
    label.reforge(vec![10, 10], TensorShape::Scalar, 1);
    for x in 0..10 {
        label.set(&[x, 5], 0, 1u32).unwrap();
    }
    let mut reg = registry();
    let table = measure(&label, None, &["Size".to_string(), "Center".to_string()], None, &mut reg).unwrap();
    assert_eq!(table.get(1, "Size", 0).unwrap(), 10.0);
    assert_eq!(table.get(1, "Center", 0).unwrap(), 4.5);
    assert_eq!(table.get(1, "Center", 1).unwrap(), 5.0);
}

#[test]
fn requesting_a_subset_of_objects_only_measures_those() {
    let (label, _) = two_rectangles();
    let mut reg = registry();
    let table = measure(&label, None, &["Size".to_string()], Some(&[2]), &mut reg).unwrap();
    assert_eq!(table.n_objects(), 1);
    assert_eq!(table.get(2, "Size", 0).unwrap(), 8.0);
}

#[test]
fn the_full_catalog_resolves_and_measures_without_panicking() {
    let (label, grey) = two_rectangles();
    let mut reg = registry();
    let requested: Vec<String> = vec![
        "Size".to_string(),
        "Minimum".to_string(),
        "Maximum".to_string(),
        "Statistics".to_string(),
        "CartesianBox".to_string(),
        "Gravity".to_string(),
        "Convexity".to_string(),
        "P2A".to_string(),
        "AspectRatioFeret".to_string(),
    ];
    let table = measure(&label, Some(&grey), &requested, None, &mut reg).unwrap();
    assert_eq!(table.n_objects(), 2);
    for &id in &[1u32, 2u32] {
        assert!(table.get(id, "P2A", 0).unwrap().is_finite());
        assert!(table.get(id, "AspectRatioFeret", 0).unwrap().is_finite());
    }
}
