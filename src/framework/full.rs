//! Applies a pixel-table-shaped neighborhood filter at every pixel (spec
//! §4.6).

use crate::boundary::{extend_image, BoundaryCondition};
use crate::config;
use crate::error::{PfError, PfResult, ResultExt};
use crate::image::Image;
use crate::pixel_table::PixelTable;
use crate::types::Sample;

/// A neighborhood operation invoked once per pixel with the samples the
/// pixel table selects around it, in the table's run-then-within-run order,
/// and that table's weights (if any were set).
pub trait FullFilter<T>: Send + Sync {
    fn filter(&self, neighborhood: &[T], weights: Option<&[f64]>) -> T;
}

/// Runs `filter` over every pixel of `input`, using `table`'s shape to
/// gather each neighborhood and `boundary` to extend the image by the
/// table's required border once up front.
pub fn full<T: Sample>(
    input: &Image<T>,
    table: &PixelTable,
    boundary: &[BoundaryCondition],
    filter: &dyn FullFilter<T>,
) -> PfResult<Image<T>> {
    if !input.is_forged() {
        return Err(PfError::NotForged("full: input not forged".into())).context("full");
    }
    if table.dimensionality() != input.dimensionality() {
        return Err(PfError::DimensionalityNotSupported("full: pixel table dimensionality mismatch".into()))
            .context("full");
    }

    let border = table.boundary_size();
    let extended = extend_image(input, &border, boundary, false, false).context("full")?;
    let offsets = table.prepare(&extended).context("full")?;
    let weights = table.weights();

    let sizes = input.sizes().to_vec();
    let n_dims = sizes.len();
    let mut output = Image::<T>::raw(sizes.clone());
    output.reforge(sizes.clone(), input.tensor_shape(), input.tensor_elements());

    let mut coords: Vec<Vec<usize>> = vec![vec![0usize; n_dims]];
    for d in 0..n_dims {
        let mut next = Vec::with_capacity(coords.len() * sizes[d]);
        for c in &coords {
            for v in 0..sizes[d] {
                let mut p = c.clone();
                p[d] = v;
                next.push(p);
            }
        }
        coords = next;
    }

    let tensor_elements = input.tensor_elements();
    let run_pixel = |coord: &[usize]| {
        let shifted: Vec<usize> = coord.iter().zip(&border).map(|(&c, &b)| c + b).collect();
        for k in 0..tensor_elements {
            let base = extended.offset_of(&shifted, k);
            let neighborhood: Vec<T> = offsets.offsets().iter().map(|&o| unsafe { extended.read_unchecked(base + o) }).collect();
            let value = filter.filter(&neighborhood, weights);
            let _ = output.set(coord, k, value);
        }
    };

    let total_ops = input.number_of_pixels() * tensor_elements.max(1) * offsets.len().max(1);
    if total_ops >= config::get_minimum_parallel_operations() {
        use rayon::prelude::*;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config::get_number_of_threads())
            .build()
            .map_err(|e| PfError::NotImplemented(format!("thread pool: {e}")))
            .context("full")?;
        pool.install(|| coords.par_iter().for_each(|c| run_pixel(c)));
    } else {
        for c in &coords {
            run_pixel(c);
        }
    }
    Ok(output)
}
