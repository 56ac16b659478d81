//! Paired-sample covariance, correlation, and linear regression.
//!
//! Grounded on `accumulators.h`'s `CovarianceAccumulator`: Welford updates
//! for each variable plus an online cross-moment, giving covariance matrix
//! entries and a least-squares slope/intercept without a second pass.

use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CovarianceAccumulator {
    n: u64,
    mean_x: f64,
    m2x: f64,
    mean_y: f64,
    m2y: f64,
    c: f64,
}

/// Slope and intercept of `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionParameters {
    pub slope: f64,
    pub intercept: f64,
}

impl CovarianceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.n += 1;
        let dx = x - self.mean_x;
        self.mean_x += dx / self.n as f64;
        self.m2x += dx * (x - self.mean_x);
        let dy = y - self.mean_y;
        self.mean_y += dy / self.n as f64;
        let dy_new = y - self.mean_y;
        self.m2y += dy * dy_new;
        self.c += dx * dy_new;
    }

    pub fn number(&self) -> u64 {
        self.n
    }

    pub fn mean_x(&self) -> f64 {
        self.mean_x
    }

    pub fn mean_y(&self) -> f64 {
        self.mean_y
    }

    pub fn variance_x(&self) -> f64 {
        if self.n > 1 {
            self.m2x / (self.n as f64 - 1.0)
        } else {
            0.0
        }
    }

    pub fn variance_y(&self) -> f64 {
        if self.n > 1 {
            self.m2y / (self.n as f64 - 1.0)
        } else {
            0.0
        }
    }

    pub fn standard_deviation_x(&self) -> f64 {
        self.variance_x().sqrt()
    }

    pub fn standard_deviation_y(&self) -> f64 {
        self.variance_y().sqrt()
    }

    pub fn covariance(&self) -> f64 {
        if self.n > 1 {
            self.c / (self.n as f64 - 1.0)
        } else {
            0.0
        }
    }

    pub fn correlation(&self) -> f64 {
        let s = (self.m2x * self.m2y).sqrt();
        if self.n > 1 && s != 0.0 {
            self.c / s
        } else {
            0.0
        }
    }

    pub fn slope(&self) -> f64 {
        if self.m2x != 0.0 {
            self.c / self.m2x
        } else {
            0.0
        }
    }

    pub fn regression(&self) -> RegressionParameters {
        let slope = self.slope();
        RegressionParameters { slope, intercept: self.mean_y - slope * self.mean_x }
    }
}

impl AddAssign for CovarianceAccumulator {
    fn add_assign(&mut self, other: CovarianceAccumulator) {
        if self.n == 0 {
            *self = other;
        } else if other.n > 0 {
            let new_n = self.n + other.n;
            let n = new_n as f64;
            let dx = other.mean_x - self.mean_x;
            let dy = other.mean_y - self.mean_y;
            self.mean_x = (self.n as f64 * self.mean_x + other.n as f64 * other.mean_x) / n;
            self.mean_y = (self.n as f64 * self.mean_y + other.n as f64 * other.mean_y) / n;
            let f = (self.n * other.n) as f64 / n;
            self.m2x += other.m2x + dx * dx * f;
            self.m2y += other.m2y + dy * dy * f;
            self.c += other.c + dx * dy * f;
            self.n = new_n;
        }
    }
}

impl Add for CovarianceAccumulator {
    type Output = CovarianceAccumulator;
    fn add(mut self, rhs: CovarianceAccumulator) -> CovarianceAccumulator {
        self += rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfectly_linear_data_has_correlation_one() {
        let mut acc = CovarianceAccumulator::new();
        for x in 0..10 {
            acc.push(x as f64, 2.0 * x as f64 + 1.0);
        }
        assert!((acc.correlation() - 1.0).abs() < 1e-9);
        let reg = acc.regression();
        assert!((reg.slope - 2.0).abs() < 1e-9);
        assert!((reg.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn merging_matches_single_pass() {
        let pairs: Vec<(f64, f64)> = (0..8).map(|i| (i as f64, (i * i) as f64)).collect();
        let mut whole = CovarianceAccumulator::new();
        for &(x, y) in &pairs {
            whole.push(x, y);
        }
        let mut a = CovarianceAccumulator::new();
        let mut b = CovarianceAccumulator::new();
        for &(x, y) in &pairs[..4] {
            a.push(x, y);
        }
        for &(x, y) in &pairs[4..] {
            b.push(x, y);
        }
        let merged = a + b;
        assert!((merged.covariance() - whole.covariance()).abs() < 1e-6);
    }
}
