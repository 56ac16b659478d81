//! Walks the samples of one 1-D line within an image along a chosen
//! processing dimension (spec §4.2).

use crate::error::PfError;
use crate::image::Image;
use crate::types::Sample;

pub struct LineIterator<'a, T> {
    image: &'a Image<T>,
    dim: usize,
    fixed: Vec<usize>,
    position: usize,
}

impl<'a, T: Sample> LineIterator<'a, T> {
    /// A line along `dim`, with every other coordinate fixed to `fixed`
    /// (`fixed[dim]` is ignored).
    pub fn new(image: &'a Image<T>, dim: usize, fixed: Vec<usize>) -> Result<Self, PfError> {
        if dim >= image.dimensionality() {
            return Err(PfError::IllegalDimension(format!("line iterator: dim {dim} out of range")));
        }
        if fixed.len() != image.dimensionality() {
            return Err(PfError::SizesDontMatch("line iterator: coordinate length mismatch".into()));
        }
        Ok(LineIterator { image, dim, fixed, position: 0 })
    }

    pub fn length(&self) -> usize {
        self.image.size(self.dim)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn coords_at(&self, position: usize) -> Vec<usize> {
        let mut c = self.fixed.clone();
        c[self.dim] = position;
        c
    }

    /// Reads tensor sample `k` at the current position.
    pub fn sample(&self, k: usize) -> Result<T, PfError> {
        self.image.at_tensor(&self.coords_at(self.position), k)
    }

    /// Writes tensor sample `k` at the current position.
    pub fn set_sample(&self, k: usize, value: T) -> Result<(), PfError> {
        self.image.set(&self.coords_at(self.position), k, value)
    }

    pub fn offset(&self) -> isize {
        self.image.offset_of(&self.coords_at(self.position), 0)
    }

    /// Advances to the next position; `false` once the line is exhausted.
    pub fn advance(&mut self) -> bool {
        self.position += 1;
        self.position < self.length()
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.length()
    }

    /// Copies the whole line's scalar (tensor element 0) samples out, in
    /// position order, without disturbing iterator state.
    pub fn to_vec(&self) -> Result<Vec<T>, PfError> {
        (0..self.length()).map(|p| self.image.at_tensor(&{
            let mut c = self.fixed.clone();
            c[self.dim] = p;
            c
        }, 0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TensorShape;

    #[test]
    fn walks_a_full_line_in_order() {
        let mut img = Image::<u16>::raw(vec![4, 2]);
        img.reforge(vec![4, 2], TensorShape::Scalar, 1);
        for x in 0..4 {
            img.set(&[x, 1], 0, x as u16 * 10).unwrap();
        }
        let mut it = LineIterator::new(&img, 0, vec![0, 1]).unwrap();
        let mut seen = Vec::new();
        loop {
            seen.push(it.sample(0).unwrap());
            if !it.advance() {
                break;
            }
        }
        assert_eq!(seen, vec![0, 10, 20, 30]);
    }

    #[test]
    fn to_vec_matches_manual_walk() {
        let mut img = Image::<f32>::raw(vec![3]);
        img.reforge(vec![3], TensorShape::Scalar, 1);
        img.set(&[0], 0, 1.0).unwrap();
        img.set(&[1], 0, 2.0).unwrap();
        img.set(&[2], 0, 3.0).unwrap();
        let it = LineIterator::new(&img, 0, vec![0]).unwrap();
        assert_eq!(it.to_vec().unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
