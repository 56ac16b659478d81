//! Applies an elementwise line filter across broadcast-compatible input and
//! output images (spec §4.4).

use rayon::prelude::*;

use crate::config;
use crate::error::{PfError, PfResult, ResultExt};
use crate::image::DynImage;
use crate::types::TensorShape;

/// A client-supplied elementwise operation, called once per line.
///
/// Buffers are `f64` regardless of the images' native sample types: the
/// framework converts on the way in and out, per Design Note 9's
/// `to_f64`/`from_f64` convention. Each inner slice covers one line's
/// samples, `tensor_elements` values per position, position-major.
pub trait ScanFilter: Send + Sync {
    fn set_number_of_threads(&mut self, _n: usize) {}

    /// A rough operation count for one line of `length` positions, used to
    /// decide whether the line batch is worth parallelizing.
    fn operations_per_line(&self, length: usize) -> usize {
        length
    }

    fn filter(
        &self,
        in_buffers: &[&[f64]],
        out_buffers: &mut [Vec<f64>],
        length: usize,
        processing_dim: usize,
        position: &[usize],
        thread: usize,
    );
}

/// Picks the processing dimension: the input's dimension of minimum
/// absolute stride, ties broken toward the larger size (spec §4.4).
fn choose_processing_dim(sizes: &[usize], strides: &[isize]) -> usize {
    let mut best = 0;
    for d in 1..sizes.len() {
        let better = strides[d].unsigned_abs() < strides[best].unsigned_abs()
            || (strides[d].unsigned_abs() == strides[best].unsigned_abs() && sizes[d] > sizes[best]);
        if better {
            best = d;
        }
    }
    best
}

fn normal_strides_of(sizes: &[usize]) -> Vec<isize> {
    let mut strides = vec![0isize; sizes.len()];
    let mut acc = 1isize;
    for d in (0..sizes.len()).rev() {
        strides[d] = acc;
        acc *= sizes[d].max(1) as isize;
    }
    strides
}

fn broadcast_sizes(inputs: &[&DynImage]) -> PfResult<Vec<usize>> {
    let n_dims = inputs[0].dimensionality();
    if inputs.iter().any(|i| i.dimensionality() != n_dims) {
        return Err(PfError::DimensionalityNotSupported("scan: input dimensionalities differ".into())).context("scan");
    }
    let mut out = vec![1usize; n_dims];
    for img in inputs {
        for (d, &s) in img.sizes().iter().enumerate() {
            if s == out[d] || s == 1 {
                continue;
            }
            if out[d] == 1 {
                out[d] = s;
            } else {
                return Err(PfError::SizesDontMatch("scan: incompatible input sizes".into())).context("scan");
            }
        }
    }
    Ok(out)
}

/// Runs `filter` over `inputs`, writing into `outputs` (forged to the
/// broadcast shape with `output_tensor_elements[i]` samples per pixel).
pub fn scan(
    inputs: &[&DynImage],
    outputs: &mut [DynImage],
    output_tensor_elements: &[usize],
    filter: &dyn ScanFilter,
) -> PfResult<()> {
    if inputs.is_empty() {
        return Err(PfError::ArrayParameterEmpty("scan: no input images".into())).context("scan");
    }
    if outputs.len() != output_tensor_elements.len() {
        return Err(PfError::ArrayParameterWrongLength("scan: outputs/tensor_elements length mismatch".into()))
            .context("scan");
    }
    let out_sizes = broadcast_sizes(inputs)?;
    // `DynImage` doesn't expose per-variant strides, so the anchor's actual
    // memory layout isn't visible here; nominal row-major strides over the
    // broadcast shape stand in as the contiguity proxy (spec §4.4 picks the
    // dimension of minimum stride, ties toward larger size — row-major's
    // last dimension is always that minimum).
    let nominal_strides = normal_strides_of(&out_sizes);
    let processing_dim = choose_processing_dim(&out_sizes, &nominal_strides);

    for (out, &t) in outputs.iter_mut().zip(output_tensor_elements) {
        reforge_dyn(out, out_sizes.clone(), t);
    }

    let n_dims = out_sizes.len();
    let line_len = out_sizes.get(processing_dim).copied().unwrap_or(1);
    let mut other_positions: Vec<Vec<usize>> = vec![vec![0usize; n_dims]];
    for d in 0..n_dims {
        if d == processing_dim {
            continue;
        }
        let mut next = Vec::with_capacity(other_positions.len() * out_sizes[d]);
        for pos in &other_positions {
            for c in 0..out_sizes[d] {
                let mut p = pos.clone();
                p[d] = c;
                next.push(p);
            }
        }
        other_positions = next;
    }

    let total_ops = other_positions.len() * filter.operations_per_line(line_len);
    let run_one = |position: &[usize], thread: usize| -> PfResult<()> {
        let mut in_bufs_owned: Vec<Vec<f64>> = Vec::with_capacity(inputs.len());
        for img in inputs {
            let mut coords = position.to_vec();
            let t = img.tensor_elements();
            let mut buf = Vec::with_capacity(line_len * t);
            let img_sizes = img.sizes();
            for p in 0..line_len {
                if img_sizes[processing_dim] == 1 {
                    coords[processing_dim] = 0;
                } else {
                    coords[processing_dim] = p;
                }
                for d in 0..n_dims {
                    if d != processing_dim && img_sizes[d] == 1 {
                        coords[d] = 0;
                    } else if d != processing_dim {
                        coords[d] = position[d];
                    }
                }
                for k in 0..t {
                    buf.push(img.at_f64(&coords, k).context("scan")?);
                }
            }
            in_bufs_owned.push(buf);
        }
        let in_refs: Vec<&[f64]> = in_bufs_owned.iter().map(|v| v.as_slice()).collect();
        let mut out_bufs: Vec<Vec<f64>> = output_tensor_elements.iter().map(|&t| vec![0.0; line_len * t]).collect();
        filter.filter(&in_refs, &mut out_bufs, line_len, processing_dim, position, thread);
        for (out, (buf, &t)) in outputs.iter().zip(out_bufs.iter().zip(output_tensor_elements)) {
            let mut coords = position.to_vec();
            for p in 0..line_len {
                coords[processing_dim] = p;
                for k in 0..t {
                    out.set_f64(&coords, k, buf[p * t + k]);
                }
            }
        }
        Ok(())
    };

    if total_ops >= config::get_minimum_parallel_operations() && other_positions.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config::get_number_of_threads())
            .build()
            .map_err(|e| PfError::NotImplemented(format!("thread pool: {e}")))
            .context("scan")?;
        let results: Vec<PfResult<()>> = pool.install(|| {
            other_positions
                .par_iter()
                .map(|p| run_one(p, rayon::current_thread_index().unwrap_or(0)))
                .collect()
        });
        for r in results {
            r?;
        }
    } else {
        for p in &other_positions {
            run_one(p, 0)?;
        }
    }
    Ok(())
}

fn reforge_dyn(image: &mut DynImage, sizes: Vec<usize>, tensor_elements: usize) {
    macro_rules! do_reforge {
        ($variant:ident) => {
            if let DynImage::$variant(img) = image {
                img.reforge(sizes, TensorShape::Scalar, tensor_elements);
                return;
            }
        };
    }
    do_reforge!(Bin);
    do_reforge!(U8);
    do_reforge!(U16);
    do_reforge!(U32);
    do_reforge!(I8);
    do_reforge!(I16);
    do_reforge!(I32);
    do_reforge!(F32);
    do_reforge!(F64);
    do_reforge!(C32);
    do_reforge!(C64);
}
