//! Boundary conditions: how a filter reads samples outside an image's
//! domain, and how to materialize that extension into a bigger buffer.
//!
//! Grounded on `examples/original_source/include/diplib/boundary.h`: the
//! condition table in its doc comment is reproduced here as the
//! `BoundaryCondition` variants and their string names.

use std::str::FromStr;

use crate::error::PfError;
use crate::image::Image;
use crate::types::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCondition {
    SymmetricMirror,
    AsymmetricMirror,
    Periodic,
    AsymmetricPeriodic,
    AddZeros,
    AddMaxValue,
    AddMinValue,
    ZeroOrderExtrapolate,
    FirstOrderExtrapolate,
    SecondOrderExtrapolate,
    ThirdOrderExtrapolate,
    AlreadyExpanded,
}

impl Default for BoundaryCondition {
    fn default() -> Self {
        BoundaryCondition::SymmetricMirror
    }
}

impl FromStr for BoundaryCondition {
    type Err = PfError;

    fn from_str(s: &str) -> Result<Self, PfError> {
        Ok(match s {
            "" | "default" => BoundaryCondition::SymmetricMirror,
            "mirror" => BoundaryCondition::SymmetricMirror,
            "asym mirror" => BoundaryCondition::AsymmetricMirror,
            "periodic" => BoundaryCondition::Periodic,
            "asym periodic" => BoundaryCondition::AsymmetricPeriodic,
            "add zeros" => BoundaryCondition::AddZeros,
            "add max" => BoundaryCondition::AddMaxValue,
            "add min" => BoundaryCondition::AddMinValue,
            "zero order" => BoundaryCondition::ZeroOrderExtrapolate,
            "first order" => BoundaryCondition::FirstOrderExtrapolate,
            "second order" => BoundaryCondition::SecondOrderExtrapolate,
            "third order" => BoundaryCondition::ThirdOrderExtrapolate,
            "already expanded" => BoundaryCondition::AlreadyExpanded,
            other => return Err(PfError::InvalidParameter(format!("unrecognized boundary condition: {other}"))),
        })
    }
}

/// Expands an array of boundary conditions to `n_dims` entries: an empty
/// array becomes all-default, a single-element array is repeated, any other
/// length is an error (mirrors `BoundaryArrayUseParameter`).
pub fn expand_to_dims(bc: &[BoundaryCondition], n_dims: usize) -> Result<Vec<BoundaryCondition>, PfError> {
    match bc.len() {
        0 => Ok(vec![BoundaryCondition::default(); n_dims]),
        1 => Ok(vec![bc[0]; n_dims]),
        n if n == n_dims => Ok(bc.to_vec()),
        _ => Err(PfError::ArrayParameterWrongLength(format!(
            "expected 1 or {n_dims} boundary conditions, got {}",
            bc.len()
        ))),
    }
}

/// Folds an out-of-range 1-D coordinate back into `[0, size)` for the
/// reflective/periodic conditions, returning the in-bounds index to read
/// and a sign to apply to the value read there (`-1.0` for the asymmetric
/// variants, `1.0` otherwise).
fn fold_index(n: isize, size: usize, bc: BoundaryCondition) -> Option<(usize, f64)> {
    if size == 0 {
        return None;
    }
    if n >= 0 && (n as usize) < size {
        return Some((n as usize, 1.0));
    }
    let size_i = size as isize;
    match bc {
        BoundaryCondition::SymmetricMirror | BoundaryCondition::AsymmetricMirror => {
            let period = 2 * size_i;
            let m = n.rem_euclid(period);
            let idx = if m < size_i { m } else { period - 1 - m };
            let sign = if bc == BoundaryCondition::AsymmetricMirror {
                // Flips sign once per half-period crossed.
                if (m / size_i) % 2 == 1 {
                    -1.0
                } else {
                    1.0
                }
            } else {
                1.0
            };
            Some((idx as usize, sign))
        }
        BoundaryCondition::Periodic | BoundaryCondition::AsymmetricPeriodic => {
            let idx = n.rem_euclid(size_i);
            let sign = if bc == BoundaryCondition::AsymmetricPeriodic {
                let wraps = n.div_euclid(size_i);
                if wraps % 2 != 0 {
                    -1.0
                } else {
                    1.0
                }
            } else {
                1.0
            };
            Some((idx as usize, sign))
        }
        _ => None,
    }
}

/// Reads the tensor samples at `coords` (which may fall outside the image),
/// applying `bc` per dimension.
///
/// First-, second- and third-order extrapolation are not supported here:
/// per the original documentation they need the neighboring samples
/// materialized in a real buffer, which is what [`extend_image`] is for.
pub fn read_pixel_with_boundary_condition<T: Sample>(
    image: &Image<T>,
    coords: &[isize],
    bc: &[BoundaryCondition],
) -> Result<Vec<T>, PfError> {
    if coords.len() != image.dimensionality() {
        return Err(PfError::SizesDontMatch("coordinate dimensionality mismatch".into()));
    }
    let bc = expand_to_dims(bc, image.dimensionality())?;
    let mut resolved = vec![0usize; coords.len()];
    let mut sign = 1.0f64;
    for (d, (&n, &cond)) in coords.iter().zip(bc.iter()).enumerate() {
        match cond {
            BoundaryCondition::AddZeros | BoundaryCondition::AddMaxValue | BoundaryCondition::AddMinValue => {
                let size = image.size(d) as isize;
                if n < 0 || n >= size {
                    let fill = match cond {
                        BoundaryCondition::AddZeros => 0.0,
                        BoundaryCondition::AddMaxValue => T::SAMPLE_TYPE.max_value_f64(),
                        BoundaryCondition::AddMinValue => T::SAMPLE_TYPE.min_value_f64(),
                        _ => unreachable!(),
                    };
                    let mut out = Vec::with_capacity(image.tensor_elements());
                    out.resize(image.tensor_elements(), T::from_f64(fill));
                    return Ok(out);
                }
                resolved[d] = n as usize;
            }
            BoundaryCondition::AlreadyExpanded => {
                return Err(PfError::NotImplemented(
                    "already-expanded boundary condition requires a pre-extended buffer".into(),
                ));
            }
            BoundaryCondition::ZeroOrderExtrapolate
            | BoundaryCondition::FirstOrderExtrapolate
            | BoundaryCondition::SecondOrderExtrapolate
            | BoundaryCondition::ThirdOrderExtrapolate => {
                let size = image.size(d);
                let clamped = n.clamp(0, size as isize - 1);
                resolved[d] = clamped as usize;
            }
            _ => {
                let (idx, s) = fold_index(n, image.size(d), cond)
                    .ok_or_else(|| PfError::IndexOutOfRange(format!("dimension {d}: coordinate {n} unresolvable")))?;
                resolved[d] = idx;
                sign *= s;
            }
        }
    }
    let mut out = Vec::with_capacity(image.tensor_elements());
    for k in 0..image.tensor_elements() {
        let v = image.at_tensor(&resolved, k)?;
        out.push(if sign < 0.0 { T::from_f64(-v.to_f64()) } else { v });
    }
    Ok(out)
}

/// Fits a polynomial of `order` through the `order + 1` samples nearest an
/// edge and evaluates it at `distance` samples beyond that edge — the
/// extrapolation used to fill `*_ORDER_EXTRAPOLATE` borders in
/// [`extend_image`]. `edge_samples[0]` is the sample right at the edge,
/// `edge_samples[1]` the next one inward, and so on.
fn extrapolate(edge_samples: &[f64], distance: usize) -> f64 {
    let order = edge_samples.len() - 1;
    // Newton's forward-difference extrapolation using samples at relative
    // positions 0, -1, -2, ... (edge_samples is stored outward-to-inward).
    let s = -(distance as f64);
    let mut diffs = edge_samples.to_vec();
    let mut coeffs = vec![diffs[0]];
    for level in 1..=order {
        for i in 0..diffs.len() - level {
            diffs[i] = diffs[i + 1] - diffs[i];
        }
        coeffs.push(diffs[0]);
    }
    let mut result = 0.0;
    let mut term = 1.0;
    for (i, &c) in coeffs.iter().enumerate() {
        result += c * term;
        term *= (s - i as f64) / (i as f64 + 1.0);
    }
    result
}

/// Extends `image` by `border_sizes` pixels on every side of every
/// dimension, filling new pixels per `bc`. When `masked` is set, the
/// returned image is a view of the same size as the input, able to address
/// the newly written border (spec: `Option::ExtendImage::Masked`). When
/// `expand_tensor` is set, a packed tensor (symmetric/triangular) is
/// materialized to full matrix form before extension, per spec §4.7.
pub fn extend_image<T: Sample>(
    image: &Image<T>,
    border_sizes: &[usize],
    bc: &[BoundaryCondition],
    masked: bool,
    expand_tensor: bool,
) -> Result<Image<T>, PfError> {
    if !image.is_forged() {
        return Err(PfError::NotForged("extend_image".into()));
    }
    let expanded = if expand_tensor { image.expand_tensor()? } else { image.clone() };
    let image = &expanded;
    let n_dims = image.dimensionality();
    let border_sizes: Vec<usize> = match border_sizes.len() {
        0 => vec![0; n_dims],
        1 => vec![border_sizes[0]; n_dims],
        n if n == n_dims => border_sizes.to_vec(),
        _ => return Err(PfError::ArrayParameterWrongLength("extend_image: border sizes".into())),
    };
    let bc = expand_to_dims(bc, n_dims)?;

    let new_sizes: Vec<usize> = image.sizes().iter().zip(&border_sizes).map(|(&s, &b)| s + 2 * b).collect();
    let mut out = Image::<T>::raw(new_sizes.clone());
    out.reforge(new_sizes.clone(), image.tensor_shape(), image.tensor_elements());

    let mut coords = vec![0usize; n_dims];
    fill_extended(&mut out, image, &border_sizes, &bc, &mut coords, 0)?;

    if masked {
        let ranges: Vec<_> = border_sizes.iter().zip(image.sizes()).map(|(&b, &s)| (b, s, 1usize)).collect();
        out.view(&ranges)
    } else {
        Ok(out)
    }
}

fn fill_extended<T: Sample>(
    out: &mut Image<T>,
    src: &Image<T>,
    border: &[usize],
    bc: &[BoundaryCondition],
    coords: &mut [usize],
    dim: usize,
) -> Result<(), PfError> {
    if dim == coords.len() {
        let signed: Vec<isize> =
            coords.iter().zip(border).map(|(&c, &b)| c as isize - b as isize).collect();
        let out_of_range = signed.iter().zip(src.sizes()).any(|(&c, &s)| c < 0 || c as usize >= s);
        for k in 0..src.tensor_elements() {
            let value = if out_of_range {
                sample_via_boundary(src, &signed, bc, k)?
            } else {
                let in_coords: Vec<usize> = signed.iter().map(|&c| c as usize).collect();
                src.at_tensor(&in_coords, k)?
            };
            out.set(coords, k, value)?;
        }
        return Ok(());
    }
    for c in 0..out.size(dim) {
        coords[dim] = c;
        fill_extended(out, src, border, bc, coords, dim + 1)?;
    }
    Ok(())
}

fn sample_via_boundary<T: Sample>(
    src: &Image<T>,
    signed: &[isize],
    bc: &[BoundaryCondition],
    k: usize,
) -> Result<T, PfError> {
    let needs_extrapolation = signed.iter().zip(bc).zip(src.sizes()).any(|((&c, &cond), &s)| {
        matches!(
            cond,
            BoundaryCondition::ZeroOrderExtrapolate
                | BoundaryCondition::FirstOrderExtrapolate
                | BoundaryCondition::SecondOrderExtrapolate
                | BoundaryCondition::ThirdOrderExtrapolate
        ) && (c < 0 || c as usize >= s)
    });
    if !needs_extrapolation {
        return read_pixel_with_boundary_condition(src, signed, bc).map(|v| v[k]);
    }
    // Extrapolate one out-of-range dimension at a time; clamp the rest to
    // the edge so we sample a straight line out from the nearest edge.
    for (d, (&c, &cond)) in signed.iter().zip(bc).enumerate() {
        let size = src.size(d) as isize;
        if c < 0 || c >= size {
            let order = match cond {
                BoundaryCondition::ZeroOrderExtrapolate => 0,
                BoundaryCondition::FirstOrderExtrapolate => 1,
                BoundaryCondition::SecondOrderExtrapolate => 2,
                BoundaryCondition::ThirdOrderExtrapolate => 3,
                _ => 0,
            };
            let (edge, distance) = if c < 0 { (0isize, -c) } else { (size - 1, c - size + 1) };
            let mut samples = Vec::with_capacity(order + 1);
            for i in 0..=order as isize {
                let mut probe = signed.to_vec();
                let p = if c < 0 { edge + i } else { edge - i };
                probe[d] = p.clamp(0, size - 1);
                let v = read_pixel_with_boundary_condition(src, &probe, bc)?[k];
                samples.push(v.to_f64());
            }
            let value = extrapolate(&samples, distance as usize);
            return Ok(T::from_f64(value));
        }
    }
    read_pixel_with_boundary_condition(src, signed, bc).map(|v| v[k])
}

/// Fills pixels outside `[origin, origin + sizes)` in place using `bc`,
/// reading only from inside the preserved region (spec: `ExtendRegion`).
pub fn extend_region<T: Sample>(
    image: &Image<T>,
    origin: &[usize],
    sizes: &[usize],
    bc: &[BoundaryCondition],
) -> Result<(), PfError> {
    if origin.is_empty() || sizes.is_empty() {
        return Err(PfError::ArrayParameterEmpty("extend_region: origin/sizes".into()));
    }
    let n_dims = image.dimensionality();
    if origin.len() != n_dims || sizes.len() != n_dims {
        return Err(PfError::ArrayParameterWrongLength("extend_region".into()));
    }
    let bc = expand_to_dims(bc, n_dims)?;
    let inner = image.crop(origin, sizes)?;
    let mut coords = vec![0usize; n_dims];
    extend_region_recursive(image, &inner, origin, &bc, &mut coords, 0)
}

fn extend_region_recursive<T: Sample>(
    full: &Image<T>,
    inner: &Image<T>,
    origin: &[usize],
    bc: &[BoundaryCondition],
    coords: &mut [usize],
    dim: usize,
) -> Result<(), PfError> {
    if dim == coords.len() {
        let relative: Vec<isize> = coords.iter().zip(origin).map(|(&c, &o)| c as isize - o as isize).collect();
        let inside = relative.iter().zip(inner.sizes()).all(|(&c, &s)| c >= 0 && (c as usize) < s);
        if !inside {
            for k in 0..full.tensor_elements() {
                let value = read_pixel_with_boundary_condition(inner, &relative, bc)?[k];
                full.set(coords, k, value)?;
            }
        }
        return Ok(());
    }
    for c in 0..full.size(dim) {
        coords[dim] = c;
        extend_region_recursive(full, inner, origin, bc, coords, dim + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorShape;

    fn ramp(size: usize) -> Image<f64> {
        let mut img = Image::<f64>::raw(vec![size]);
        img.reforge(vec![size], TensorShape::Scalar, 1);
        for x in 0..size {
            img.set(&[x], 0, x as f64).unwrap();
        }
        img
    }

    #[test]
    fn symmetric_mirror_duplicates_edge_at_minus_one() {
        let img = ramp(4);
        let v = read_pixel_with_boundary_condition(&img, &[-1], &[BoundaryCondition::SymmetricMirror]).unwrap();
        assert_eq!(v[0], img.at(&[0]).unwrap());
    }

    #[test]
    fn periodic_wraps_to_last_pixel() {
        let img = ramp(4);
        let v = read_pixel_with_boundary_condition(&img, &[-1], &[BoundaryCondition::Periodic]).unwrap();
        assert_eq!(v[0], img.at(&[3]).unwrap());
    }

    #[test]
    fn add_zeros_fills_constant() {
        let img = ramp(4);
        let v = read_pixel_with_boundary_condition(&img, &[10], &[BoundaryCondition::AddZeros]).unwrap();
        assert_eq!(v[0], 0.0);
    }

    #[test]
    fn extend_image_preserves_interior() {
        let img = ramp(4);
        let extended = extend_image(&img, &[2], &[BoundaryCondition::SymmetricMirror], false, false).unwrap();
        assert_eq!(extended.size(0), 8);
        for x in 0..4 {
            assert_eq!(extended.at(&[x + 2]).unwrap(), img.at(&[x]).unwrap());
        }
    }

    #[test]
    fn extend_image_masked_matches_unmasked_interior() {
        let img = ramp(4);
        let masked = extend_image(&img, &[2], &[BoundaryCondition::AddZeros], true, false).unwrap();
        assert_eq!(masked.size(0), 4);
        for x in 0..4 {
            assert_eq!(masked.at(&[x]).unwrap(), img.at(&[x]).unwrap());
        }
    }

    #[test]
    fn extend_image_with_expand_tensor_widens_a_packed_tensor_first() {
        use crate::types::TensorShape;
        let mut img = Image::<f64>::raw(vec![2]);
        img.reforge(vec![2], TensorShape::SymmetricPacked { side: 2 }, 3);
        for x in 0..2 {
            img.set(&[x], 0, 1.0).unwrap();
            img.set(&[x], 1, 2.0).unwrap();
            img.set(&[x], 2, 9.0).unwrap();
        }
        let extended = extend_image(&img, &[1], &[BoundaryCondition::SymmetricMirror], false, true).unwrap();
        assert_eq!(extended.tensor_shape(), TensorShape::Matrix { rows: 2, cols: 2 });
        assert_eq!(extended.tensor_elements(), 4);
        assert_eq!(extended.at_tensor(&[1], 1).unwrap(), 9.0);
    }

    #[test]
    fn zero_order_extrapolate_repeats_edge_value() {
        let img = ramp(4);
        let v =
            read_pixel_with_boundary_condition(&img, &[5], &[BoundaryCondition::ZeroOrderExtrapolate]).unwrap();
        assert_eq!(v[0], img.at(&[3]).unwrap());
    }
}
