//! Applies a 1-D filter independently along a subset of dimensions, one
//! dimension at a time, each pass consuming the previous pass's output
//! (spec §4.5).

use crate::boundary::{extend_image, BoundaryCondition};
use crate::config;
use crate::error::{PfError, PfResult, ResultExt};
use crate::image::Image;
use crate::types::{Sample, TensorShape};

/// A 1-D line operation run once per processed dimension.
///
/// `border` is how many extra samples of context the filter reads on each
/// side of the line, already present in `in_line` (length
/// `length + 2 * border`); `out_line` holds exactly `out_size(length)`
/// samples.
pub trait SeparableFilter<T>: Send + Sync {
    fn border(&self) -> usize {
        0
    }

    /// Output line length for an input line of `in_size` samples along the
    /// dimension being processed. Identity by default; a resampling filter
    /// (e.g. a resize or rotation kernel) overrides this to grow or shrink
    /// the dimension it processes.
    fn out_size(&self, in_size: usize) -> usize {
        in_size
    }

    fn filter(&self, in_line: &[T], out_line: &mut [T], dim: usize);
}

/// Runs `filter` along every dimension in `process_dims` (processed in the
/// order that minimizes the ratio `out_size[d] / in_size[d]` ascending, so
/// dimensions that shrink the image run first and dimensions that grow it
/// run last, as dictated by spec §4.5), using `boundary` to extend each
/// line's edges by `filter.border()` samples.
pub fn separable<T: Sample>(
    input: &Image<T>,
    process_dims: &[usize],
    boundary: &[BoundaryCondition],
    filter: &dyn SeparableFilter<T>,
) -> PfResult<Image<T>> {
    if !input.is_forged() {
        return Err(PfError::NotForged("separable: input not forged".into())).context("separable");
    }
    let n_dims = input.dimensionality();
    if boundary.len() != n_dims {
        return Err(PfError::ArrayParameterWrongLength("separable: boundary condition array length mismatch".into()))
            .context("separable");
    }
    if process_dims.iter().any(|&d| d >= n_dims) {
        return Err(PfError::IllegalDimension("separable: process dimension out of range".into())).context("separable");
    }

    let mut order: Vec<usize> = process_dims.to_vec();
    order.sort_by(|&a, &b| {
        let (out_a, in_a) = (filter.out_size(input.size(a)) as u128, input.size(a).max(1) as u128);
        let (out_b, in_b) = (filter.out_size(input.size(b)) as u128, input.size(b).max(1) as u128);
        (out_a * in_b).cmp(&(out_b * in_a))
    });

    let mut current = input.clone();
    for &dim in &order {
        if input.size(dim) <= 1 && filter.out_size(input.size(dim)) == input.size(dim) {
            continue;
        }
        current = run_one_dimension(&current, dim, boundary[dim], filter)?;
    }
    Ok(current)
}

fn run_one_dimension<T: Sample>(
    input: &Image<T>,
    dim: usize,
    boundary: BoundaryCondition,
    filter: &dyn SeparableFilter<T>,
) -> PfResult<Image<T>> {
    let border = filter.border();
    let mut sizes = input.sizes().to_vec();
    let length = sizes[dim];
    let out_length = filter.out_size(length);
    sizes[dim] = out_length;

    let extended = if border > 0 {
        let mut b = vec![0usize; input.sizes().len()];
        b[dim] = border;
        let bc = vec![boundary; input.sizes().len()];
        Some(extend_image(input, &b, &bc, false, false).context("separable")?)
    } else {
        None
    };
    let source = extended.as_ref().unwrap_or(input);

    let mut output = Image::<T>::raw(sizes.clone());
    output.reforge(sizes.clone(), input.tensor_shape(), input.tensor_elements());

    let n_dims = sizes.len();
    let total_ops = input.number_of_pixels();
    let run_line = |position: &[usize]| -> PfResult<()> {
        for k in 0..input.tensor_elements() {
            let mut in_line = Vec::with_capacity(length + 2 * border);
            let mut coords = position.to_vec();
            for p in 0..(length + 2 * border) {
                coords[dim] = p;
                in_line.push(source.at_tensor(&coords, k).context("separable")?);
            }
            let mut out_line = vec![in_line[0]; out_length];
            filter.filter(&in_line, &mut out_line, dim);
            let mut out_coords = position.to_vec();
            for p in 0..out_length {
                out_coords[dim] = p;
                output.set(&out_coords, k, out_line[p]).context("separable")?;
            }
        }
        Ok(())
    };

    let mut other_positions: Vec<Vec<usize>> = vec![vec![0usize; n_dims]];
    for d in 0..n_dims {
        if d == dim {
            continue;
        }
        let mut next = Vec::with_capacity(other_positions.len() * sizes[d]);
        for pos in &other_positions {
            for c in 0..sizes[d] {
                let mut p = pos.clone();
                p[d] = c;
                next.push(p);
            }
        }
        other_positions = next;
    }

    if total_ops >= config::get_minimum_parallel_operations() {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config::get_number_of_threads())
            .build()
            .map_err(|e| PfError::NotImplemented(format!("thread pool: {e}")))
            .context("separable")?;
        let results: Vec<PfResult<()>> = pool.install(|| other_positions.par_iter().map(|p| run_line(p)).collect());
        for r in results {
            r?;
        }
    } else {
        for p in &other_positions {
            run_line(p)?;
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn three_tap_average_with_mirror_boundary_matches_hand_computation() {
        let mut img = Image::<f64>::raw(vec![7]);
        img.reforge(vec![7], TensorShape::Scalar, 1);
        for (i, &v) in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0].iter().enumerate() {
            img.set(&[i], 0, v).unwrap();
        }
        let out = separable(&img, &[0], &[BoundaryCondition::SymmetricMirror], &ThreeTapAverage).unwrap();
        // Extended (mirror-duplicate edges): [1, 1,2,3,4,5,6,7, 7]
        let expected = [
            (1.0 + 1.0 + 2.0) / 3.0,
            (1.0 + 2.0 + 3.0) / 3.0,
            (2.0 + 3.0 + 4.0) / 3.0,
            (3.0 + 4.0 + 5.0) / 3.0,
            (4.0 + 5.0 + 6.0) / 3.0,
            (5.0 + 6.0 + 7.0) / 3.0,
            (6.0 + 7.0 + 7.0) / 3.0,
        ];
        for i in 0..7 {
            assert!((out.at(&[i]).unwrap() - expected[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn skips_singleton_dimensions() {
        let mut img = Image::<f64>::raw(vec![1, 5]);
        img.reforge(vec![1, 5], TensorShape::Scalar, 1);
        for i in 0..5 {
            img.set(&[0, i], 0, i as f64).unwrap();
        }
        let out = separable(
            &img,
            &[0, 1],
            &[BoundaryCondition::AddZeros, BoundaryCondition::AddZeros],
            &ThreeTapAverage,
        )
        .unwrap();
        assert_eq!(out.sizes(), &[1, 5]);
    }
}
