//! Weighted-sum metric oracle.

pub mod weighted;

pub use weighted::{MetricError, StatWeights, WeightedSumMetric};
