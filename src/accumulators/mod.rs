//! On-line statistics accumulators shared by the measurement engine and any
//! caller needing streaming mean/variance/moment computation over pixel
//! values without a second pass over the data.

pub mod covariance;
pub mod directional;
pub mod minmax;
pub mod moments;
pub mod statistics;
pub mod variance;

pub use covariance::{CovarianceAccumulator, RegressionParameters};
pub use directional::DirectionalStatisticsAccumulator;
pub use minmax::MinMaxAccumulator;
pub use moments::MomentAccumulator;
pub use statistics::StatisticsAccumulator;
pub use variance::{FastVarianceAccumulator, VarianceAccumulator};
