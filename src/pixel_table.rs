//! Compact shaped-neighborhood representation: runs along one dimension,
//! optionally weighted, rebased onto an image's strides for the full
//! framework (spec §3.2, §4.3).

use crate::error::PfError;
use crate::image::Image;
use crate::types::Sample;

/// A shape descriptor used to build a [`PixelTable`] procedurally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rectangle,
    Ellipsoid,
    Diamond,
}

/// One run of contained samples: `length` consecutive positions starting at
/// `start` along the table's run dimension, with the other coordinates
/// fixed at `coord` (the run dimension's own entry in `coord` is ignored).
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub coord: Vec<isize>,
    pub start: isize,
    pub length: usize,
}

/// A shaped n-D neighborhood: a run dimension, a list of runs, and
/// (optionally) one weight per contained sample, in run-then-within-run
/// order matching [`PixelTable::offsets`].
#[derive(Debug, Clone)]
pub struct PixelTable {
    dims: usize,
    run_dimension: usize,
    runs: Vec<Run>,
    sizes: Vec<usize>,
    weights: Option<Vec<f64>>,
}

impl PixelTable {
    /// Builds a table for `shape` with the given per-dimension `sizes`
    /// (diameters), centered on the origin. `run_dimension` defaults to 0.
    pub fn from_shape(shape: Shape, sizes: &[usize]) -> Result<PixelTable, PfError> {
        if sizes.is_empty() {
            return Err(PfError::ArrayParameterEmpty("pixel table sizes".into()));
        }
        if sizes.iter().any(|&s| s == 0) {
            return Err(PfError::InvalidParameter("pixel table sizes must be positive".into()));
        }
        let dims = sizes.len();
        let run_dimension = 0;
        let radii: Vec<f64> = sizes.iter().map(|&s| (s as f64 - 1.0) / 2.0).collect();
        let mut runs = Vec::new();
        let extents: Vec<isize> = radii.iter().map(|r| r.ceil() as isize).collect();
        let mut coord = vec![0isize; dims];
        Self::walk_other_dims(&extents, run_dimension, &mut coord, 0, &mut |fixed| {
            if let Some((start, length)) = Self::run_extent(shape, &radii, run_dimension, fixed, extents[run_dimension])
            {
                runs.push(Run { coord: fixed.to_vec(), start, length });
            }
        });
        Ok(PixelTable { dims, run_dimension, runs, sizes: sizes.to_vec(), weights: None })
    }

    fn walk_other_dims(
        extents: &[isize],
        run_dimension: usize,
        coord: &mut [isize],
        dim: usize,
        visit: &mut impl FnMut(&[isize]),
    ) {
        if dim == extents.len() {
            visit(coord);
            return;
        }
        if dim == run_dimension {
            Self::walk_other_dims(extents, run_dimension, coord, dim + 1, visit);
            return;
        }
        for c in -extents[dim]..=extents[dim] {
            coord[dim] = c;
            Self::walk_other_dims(extents, run_dimension, coord, dim + 1, visit);
        }
        coord[dim] = 0;
    }

    fn run_extent(shape: Shape, radii: &[f64], run_dim: usize, fixed: &[isize], max_extent: isize) -> Option<(isize, usize)> {
        let mut start = None;
        let mut end = None;
        for c in -max_extent..=max_extent {
            if Self::contains(shape, radii, run_dim, fixed, c) {
                if start.is_none() {
                    start = Some(c);
                }
                end = Some(c);
            }
        }
        match (start, end) {
            (Some(s), Some(e)) => Some((s, (e - s + 1) as usize)),
            _ => None,
        }
    }

    fn contains(shape: Shape, radii: &[f64], run_dim: usize, fixed: &[isize], run_coord: isize) -> bool {
        let mut point = fixed.to_vec();
        point[run_dim] = run_coord;
        match shape {
            Shape::Rectangle => point.iter().zip(radii).all(|(&c, &r)| (c as f64).abs() <= r + 1e-9),
            Shape::Ellipsoid => {
                let sum: f64 = point
                    .iter()
                    .zip(radii)
                    .map(|(&c, &r)| if r > 0.0 { (c as f64 / r).powi(2) } else if c == 0 { 0.0 } else { f64::INFINITY })
                    .sum();
                sum <= 1.0 + 1e-9
            }
            Shape::Diamond => {
                let sum: f64 = point
                    .iter()
                    .zip(radii)
                    .map(|(&c, &r)| if r > 0.0 { (c as f64).abs() / r } else if c == 0 { 0.0 } else { f64::INFINITY })
                    .sum();
                sum <= 1.0 + 1e-9
            }
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.dims
    }

    pub fn run_dimension(&self) -> usize {
        self.run_dimension
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn size(&self, dim: usize) -> usize {
        self.sizes[dim]
    }

    pub fn number_of_pixels(&self) -> usize {
        self.runs.iter().map(|r| r.length).sum()
    }

    /// The border width the full framework must pad by along each
    /// dimension so this table never reads outside an extended buffer.
    pub fn boundary_size(&self) -> Vec<usize> {
        let mut border = vec![0usize; self.dims];
        for run in &self.runs {
            for (d, &c) in run.coord.iter().enumerate() {
                if d == self.run_dimension {
                    continue;
                }
                border[d] = border[d].max(c.unsigned_abs());
            }
            let far = (run.start + run.length as isize - 1).unsigned_abs().max(run.start.unsigned_abs());
            border[self.run_dimension] = border[self.run_dimension].max(far);
        }
        border
    }

    /// Attaches one weight per contained sample, in the same run-then-
    /// within-run order as [`Self::offsets`].
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<(), PfError> {
        if weights.len() != self.number_of_pixels() {
            return Err(PfError::ArrayParameterWrongLength(format!(
                "expected {} weights, got {}",
                self.number_of_pixels(),
                weights.len()
            )));
        }
        self.weights = Some(weights);
        Ok(())
    }

    /// Uniform weights summing to 1 (a mean filter kernel).
    pub fn set_uniform_weights(&mut self) {
        let n = self.number_of_pixels().max(1) as f64;
        self.weights = Some(vec![1.0 / n; self.number_of_pixels()]);
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Rebases every run onto `image`'s strides, producing a flat list of
    /// sample offsets (one per contained pixel, in the same order as
    /// [`Self::weights`]) relative to a center coordinate of all zeros.
    pub fn prepare<T: Sample>(&self, image: &Image<T>) -> Result<PixelTableOffsets, PfError> {
        if image.dimensionality() != self.dims {
            return Err(PfError::DimensionalityNotSupported(format!(
                "pixel table has {} dims, image has {}",
                self.dims,
                image.dimensionality()
            )));
        }
        let strides = image.strides();
        let mut offsets = Vec::with_capacity(self.number_of_pixels());
        for run in &self.runs {
            let mut base = 0isize;
            for (d, &c) in run.coord.iter().enumerate() {
                if d != self.run_dimension {
                    base += c * strides[d];
                }
            }
            for i in 0..run.length {
                let pos = run.start + i as isize;
                offsets.push(base + pos * strides[self.run_dimension]);
            }
        }
        Ok(PixelTableOffsets { offsets, run_dimension: self.run_dimension })
    }
}

/// The result of [`PixelTable::prepare`]: sample offsets ready to add to an
/// image's per-pixel base offset inside the full framework's line loop.
#[derive(Debug, Clone)]
pub struct PixelTableOffsets {
    offsets: Vec<isize>,
    run_dimension: usize,
}

impl PixelTableOffsets {
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    pub fn run_dimension(&self) -> usize {
        self.run_dimension
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
