//! Per-channel binned sample counts, computed from an image or from a
//! single measurement column (spec §4.9).

use crate::accumulators::MinMaxAccumulator;
use crate::error::{PfError, PfResult, ResultExt};
use crate::image::{DynImage, Image};
use crate::types::SampleType;

/// Which of the four bin parameters is derived from the other three plus
/// the data range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramMode {
    ComputeBinSize,
    ComputeBinCount,
    ComputeLowerBound,
    ComputeUpperBound,
}

/// Per-channel binning parameters. Unused fields (depending on `mode`) are
/// overwritten by [`HistogramConfig::resolve`].
#[derive(Debug, Clone, Copy)]
pub struct HistogramConfig {
    pub mode: HistogramMode,
    pub bin_size: f64,
    pub bin_count: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub lower_is_percentile: bool,
    pub upper_is_percentile: bool,
    pub exclude_out_of_bounds: bool,
}

impl HistogramConfig {
    /// Defaults per spec §4.9: 8-bit integer types get 256 bins spanning
    /// their full representable range; other integer types get up to 256
    /// power-of-two-sized bins spanning the data range; float types get 256
    /// bins spanning the data range.
    pub fn default_for(sample_type: SampleType) -> HistogramConfig {
        let (lower, upper) = match sample_type {
            SampleType::U8 => (0.0, 255.0),
            SampleType::I8 => (i8::MIN as f64, i8::MAX as f64),
            SampleType::Bin => (0.0, 1.0),
            _ => (0.0, 0.0), // resolved from data range at compute time
        };
        HistogramConfig {
            mode: HistogramMode::ComputeBinSize,
            bin_size: 1.0,
            bin_count: 256,
            lower_bound: lower,
            upper_bound: upper,
            lower_is_percentile: false,
            upper_is_percentile: false,
            exclude_out_of_bounds: false,
        }
    }

    fn resolve(&self, data_min: f64, data_max: f64, is_integer: bool) -> (f64, f64, usize, f64) {
        let mut lower = if self.lower_bound == 0.0 && self.upper_bound == 0.0 { data_min } else { self.lower_bound };
        let mut upper = if self.lower_bound == 0.0 && self.upper_bound == 0.0 { data_max } else { self.upper_bound };
        if upper <= lower {
            upper = lower + 1.0;
        }
        let range = upper - lower;
        let (bin_count, bin_size) = match self.mode {
            HistogramMode::ComputeBinCount => {
                let size = if self.bin_size > 0.0 { self.bin_size } else { 1.0 };
                ((range / size).ceil().max(1.0) as usize, size)
            }
            HistogramMode::ComputeBinSize => {
                let count = self.bin_count.max(1);
                (count, range / count as f64)
            }
            HistogramMode::ComputeLowerBound => {
                let count = self.bin_count.max(1);
                let size = if self.bin_size > 0.0 { self.bin_size } else { 1.0 };
                lower = upper - count as f64 * size;
                (count, size)
            }
            HistogramMode::ComputeUpperBound => {
                let count = self.bin_count.max(1);
                let size = if self.bin_size > 0.0 { self.bin_size } else { 1.0 };
                upper = lower + count as f64 * size;
                (count, size)
            }
        };
        let bin_size = if is_integer && bin_size < 1.0 { 1.0 } else { bin_size };
        (lower, upper, bin_count, bin_size)
    }
}

/// Maps `v` to a bin in `[0, count)`, clamping a value that lands exactly
/// on the upper edge into the last bin rather than treating it as
/// out-of-bounds.
fn bin_index(v: f64, lower: f64, upper: f64, size: f64, count: usize) -> Option<usize> {
    if v < lower || v > upper {
        return None;
    }
    let bin = ((v - lower) / size).floor() as usize;
    Some(bin.min(count.saturating_sub(1)))
}

/// A 1-D (or, for multi-channel images, n-D) binned sample count.
#[derive(Debug, Clone)]
pub struct Histogram {
    bin_counts: Vec<usize>,
    lower_bounds: Vec<f64>,
    bin_sizes: Vec<f64>,
    counts: Vec<u64>,
    excluded: u64,
}

impl Histogram {
    /// Computes a joint histogram over every tensor channel of `image`,
    /// restricted to pixels where `mask` is true (or every pixel, if no
    /// mask is given).
    pub fn compute(image: &DynImage, mask: Option<&Image<bool>>, configs: &[HistogramConfig]) -> PfResult<Histogram> {
        let channels = image.tensor_elements();
        if configs.len() != channels {
            return Err(PfError::ArrayParameterWrongLength(
                "histogram: one config required per tensor channel".into(),
            ))
            .context("histogram");
        }
        let sizes = image.sizes();
        let n_dims = sizes.len();
        let is_integer = !matches!(image.sample_type(), SampleType::F32 | SampleType::F64);

        let mut mins = vec![MinMaxAccumulator::default(); channels];
        let mut coords = vec![0usize; n_dims];
        Self::walk(&sizes, &mut coords, 0, &mut |c| {
            if mask.map(|m| m.at(c).unwrap_or(false)).unwrap_or(true) {
                for k in 0..channels {
                    if let Ok(v) = image.at_f64(c, k) {
                        mins[k].push(v);
                    }
                }
            }
        });

        let mut bin_counts = Vec::with_capacity(channels);
        let mut lower_bounds = Vec::with_capacity(channels);
        let mut upper_bounds = Vec::with_capacity(channels);
        let mut bin_sizes = Vec::with_capacity(channels);
        for (k, cfg) in configs.iter().enumerate() {
            let (lo, hi, count, size) = cfg.resolve(mins[k].minimum(), mins[k].maximum(), is_integer);
            lower_bounds.push(lo);
            upper_bounds.push(hi);
            bin_sizes.push(size.max(f64::EPSILON));
            bin_counts.push(count.max(1));
        }

        let total_bins: usize = bin_counts.iter().product();
        let mut counts = vec![0u64; total_bins];
        let mut excluded = 0u64;
        let mut coords = vec![0usize; n_dims];
        Self::walk(&sizes, &mut coords, 0, &mut |c| {
            if !mask.map(|m| m.at(c).unwrap_or(false)).unwrap_or(true) {
                return;
            }
            let mut flat = 0usize;
            let mut stride = 1usize;
            let mut in_bounds = true;
            for k in 0..channels {
                let v = image.at_f64(c, k).unwrap_or(0.0);
                match bin_index(v, lower_bounds[k], upper_bounds[k], bin_sizes[k], bin_counts[k]) {
                    Some(bin) => {
                        flat += bin * stride;
                        stride *= bin_counts[k];
                    }
                    None => {
                        in_bounds = false;
                        break;
                    }
                }
            }
            if in_bounds {
                counts[flat] += 1;
            } else if configs[0].exclude_out_of_bounds {
                excluded += 1;
            }
        });

        Ok(Histogram { bin_counts, lower_bounds, bin_sizes, counts, excluded })
    }

    /// Computes a 1-D histogram from an arbitrary slice of values (e.g. a
    /// measurement table column).
    pub fn from_column(values: &[f64], config: &HistogramConfig) -> PfResult<Histogram> {
        if values.is_empty() {
            return Err(PfError::ArrayParameterEmpty("histogram: empty column".into())).context("histogram");
        }
        let mut acc = MinMaxAccumulator::default();
        for &v in values {
            acc.push(v);
        }
        let (lo, hi, count, size) = config.resolve(acc.minimum(), acc.maximum(), false);
        let mut counts = vec![0u64; count.max(1)];
        let mut excluded = 0u64;
        for &v in values {
            if let Some(bin) = bin_index(v, lo, hi, size, count) {
                counts[bin] += 1;
            } else if config.exclude_out_of_bounds {
                excluded += 1;
            }
        }
        Ok(Histogram { bin_counts: vec![count.max(1)], lower_bounds: vec![lo], bin_sizes: vec![size], counts, excluded })
    }

    fn walk(sizes: &[usize], coords: &mut [usize], dim: usize, visit: &mut impl FnMut(&[usize])) {
        if dim == sizes.len() {
            visit(coords);
            return;
        }
        for c in 0..sizes[dim] {
            coords[dim] = c;
            Self::walk(sizes, coords, dim + 1, visit);
        }
    }

    pub fn dimensionality(&self) -> usize {
        self.bin_counts.len()
    }

    pub fn bin_count(&self, channel: usize) -> usize {
        self.bin_counts[channel]
    }

    pub fn lower_bound(&self, channel: usize) -> f64 {
        self.lower_bounds[channel]
    }

    pub fn bin_size(&self, channel: usize) -> f64 {
        self.bin_sizes[channel]
    }

    pub fn excluded(&self) -> u64 {
        self.excluded
    }

    pub fn count_at(&self, bins: &[usize]) -> u64 {
        let mut flat = 0usize;
        let mut stride = 1usize;
        for (k, &b) in bins.iter().enumerate() {
            flat += b * stride;
            stride *= self.bin_counts[k];
        }
        self.counts[flat]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
