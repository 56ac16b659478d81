use criterion::{criterion_group, criterion_main, Criterion};

use pixelforge::boundary::BoundaryCondition;
use pixelforge::framework::full::{full, FullFilter};
use pixelforge::framework::scan::{scan, ScanFilter};
use pixelforge::framework::separable::{separable, SeparableFilter};
use pixelforge::image::{DynImage, Image};
use pixelforge::pixel_table::{PixelTable, Shape};
use pixelforge::types::TensorShape;

const SIZE: usize = 256;

fn ramp_image() -> Image<f64> {
    let mut img = Image::<f64>::raw(vec![SIZE, SIZE]);
    img.reforge(vec![SIZE, SIZE], TensorShape::Scalar, 1);
    for y in 0..SIZE {
        for x in 0..SIZE {
            img.set(&[x, y], 0, (x + y) as f64).unwrap();
        }
    }
    img
}

struct Double;
impl ScanFilter for Double {
    fn filter(&self, in_buffers: &[&[f64]], out_buffers: &mut [Vec<f64>], length: usize, _dim: usize, _pos: &[usize], _t: usize) {
        for p in 0..length {
            out_buffers[0][p] = in_buffers[0][p] * 2.0;
        }
    }
}

struct ThreeTapAverage;
impl SeparableFilter<f64> for ThreeTapAverage {
    fn border(&self) -> usize {
        1
    }
    fn filter(&self, in_line: &[f64], out_line: &mut [f64], _dim: usize) {
        for p in 0..out_line.len() {
            out_line[p] = (in_line[p] + in_line[p + 1] + in_line[p + 2]) / 3.0;
        }
    }
}

struct MeanFilter;
impl FullFilter<f64> for MeanFilter {
    fn filter(&self, neighborhood: &[f64], _weights: Option<&[f64]>) -> f64 {
        neighborhood.iter().sum::<f64>() / neighborhood.len() as f64
    }
}

fn scan_benchmark(criterion: &mut Criterion) {
    let image = DynImage::F64(ramp_image());
    criterion.bench_function("scan_double_256x256", |b| {
        b.iter(|| {
            let mut out = DynImage::F64(Image::empty());
            scan(&[&image], std::slice::from_mut(&mut out), &[1], &Double).unwrap();
        })
    });
}

fn separable_benchmark(criterion: &mut Criterion) {
    let image = ramp_image();
    let bc = [BoundaryCondition::SymmetricMirror, BoundaryCondition::SymmetricMirror];
    criterion.bench_function("separable_three_tap_average_256x256", |b| {
        b.iter(|| separable(&image, &[0, 1], &bc, &ThreeTapAverage).unwrap())
    });
}

fn full_benchmark(criterion: &mut Criterion) {
    let image = ramp_image();
    let table = PixelTable::from_shape(Shape::Rectangle, &[3, 3]).unwrap();
    let bc = vec![BoundaryCondition::AddZeros; 2];
    criterion.bench_function("full_3x3_mean_256x256", |b| b.iter(|| full(&image, &table, &bc, &MeanFilter).unwrap()));
}

criterion_group! {
    name = frameworks;
    config = Criterion::default().sample_size(20);
    targets = scan_benchmark, separable_benchmark, full_benchmark
}
criterion_main!(frameworks);
