//! Walks the "other" coordinates of an image — every dimension except an
//! optional processing dimension — yielding a [`LineIterator`] or a bare
//! coordinate at each step (spec §4.2).

use crate::error::PfError;
use crate::image::Image;
use crate::iterators::line_iterator::LineIterator;
use crate::types::Sample;

pub struct ImageIterator<'a, T> {
    image: &'a Image<T>,
    processing_dim: Option<usize>,
    coords: Vec<usize>,
    done: bool,
}

impl<'a, T: Sample> ImageIterator<'a, T> {
    pub fn new(image: &'a Image<T>, processing_dim: Option<usize>) -> Result<Self, PfError> {
        if let Some(d) = processing_dim {
            if d >= image.dimensionality() {
                return Err(PfError::IllegalDimension(format!("image iterator: dim {d} out of range")));
            }
        }
        let done = image.sizes().iter().enumerate().any(|(d, &s)| Some(d) != processing_dim && s == 0);
        Ok(ImageIterator { image, processing_dim, coords: vec![0; image.dimensionality()], done })
    }

    pub fn coords(&self) -> &[usize] {
        &self.coords
    }

    pub fn line(&self) -> Result<LineIterator<'a, T>, PfError> {
        let dim = self.processing_dim.ok_or_else(|| {
            PfError::InvalidParameter("image iterator has no processing dimension".into())
        })?;
        LineIterator::new(self.image, dim, self.coords.clone())
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances to the next "other" coordinate in row-major order, skipping
    /// the processing dimension. Returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        for d in (0..self.coords.len()).rev() {
            if Some(d) == self.processing_dim {
                continue;
            }
            self.coords[d] += 1;
            if self.coords[d] < self.image.size(d) {
                return true;
            }
            self.coords[d] = 0;
        }
        self.done = true;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorShape;

    #[test]
    fn visits_every_other_coordinate_exactly_once() {
        let mut img = Image::<u8>::raw(vec![3, 2]);
        img.reforge(vec![3, 2], TensorShape::Scalar, 1);
        let mut it = ImageIterator::new(&img, Some(0)).unwrap();
        let mut seen = Vec::new();
        loop {
            seen.push(it.coords()[1]);
            if !it.advance() {
                break;
            }
        }
        seen.sort();
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn line_at_each_position_spans_the_processing_dimension() {
        let mut img = Image::<u8>::raw(vec![4, 2]);
        img.reforge(vec![4, 2], TensorShape::Scalar, 1);
        let it = ImageIterator::new(&img, Some(0)).unwrap();
        let line = it.line().unwrap();
        assert_eq!(line.length(), 4);
    }
}
