//! Circular (angular) mean and spread, for orientation-valued measurements.
//!
//! Grounded on `accumulators.h`'s `DirectionalStatisticsAccumulator`: each
//! angle is accumulated as a unit vector `exp(i*x)`; the resultant vector's
//! argument is the mean angle and its length measures concentration.

use num_complex::Complex;
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalStatisticsAccumulator {
    n: u64,
    sum: Complex<f64>,
}

impl Default for DirectionalStatisticsAccumulator {
    fn default() -> Self {
        DirectionalStatisticsAccumulator { n: 0, sum: Complex::new(0.0, 0.0) }
    }
}

impl DirectionalStatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.n += 1;
        self.sum += Complex::new(x.cos(), x.sin());
    }

    pub fn number(&self) -> u64 {
        self.n
    }

    pub fn mean(&self) -> f64 {
        self.sum.arg()
    }

    pub fn variance(&self) -> f64 {
        if self.n > 0 {
            1.0 - self.sum.norm() / self.n as f64
        } else {
            0.0
        }
    }

    pub fn standard_deviation(&self) -> f64 {
        if self.n > 0 {
            (-2.0 * (self.sum.norm() / self.n as f64).ln()).sqrt()
        } else {
            0.0
        }
    }
}

impl AddAssign for DirectionalStatisticsAccumulator {
    fn add_assign(&mut self, b: DirectionalStatisticsAccumulator) {
        self.n += b.n;
        self.sum += b.sum;
    }
}

impl Add for DirectionalStatisticsAccumulator {
    type Output = DirectionalStatisticsAccumulator;
    fn add(mut self, rhs: DirectionalStatisticsAccumulator) -> DirectionalStatisticsAccumulator {
        self += rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn angles_clustered_near_zero_have_small_variance() {
        let mut acc = DirectionalStatisticsAccumulator::new();
        for a in [-0.05, 0.0, 0.05] {
            acc.push(a);
        }
        assert!(acc.mean().abs() < 1e-6);
        assert!(acc.variance() < 0.01);
    }

    #[test]
    fn opposite_angles_cancel_toward_zero_length() {
        let mut acc = DirectionalStatisticsAccumulator::new();
        acc.push(0.0);
        acc.push(PI);
        assert!(acc.variance() > 0.99);
    }
}
