use anyhow::Result;

use crate::domain::models::Configuration;

/// Port for the stat-calculation oracle that scores a configuration.
///
/// Higher scores are better. Calls are synchronous and may be slow; a
/// failing call must return `Err` rather than a made-up score, and the
/// optimizer propagates that error unchanged.
///
/// Any `Fn(&Configuration) -> anyhow::Result<f64>` closure is an oracle:
///
/// ```
/// use treeclimb::domain::models::Configuration;
/// use treeclimb::domain::ports::MetricOracle;
///
/// let by_size = |config: &Configuration| -> anyhow::Result<f64> { Ok(config.len() as f64) };
/// let score = by_size.evaluate(&Configuration::new(1, [2, 3])).unwrap();
/// assert_eq!(score, 3.0);
/// ```
pub trait MetricOracle: Send + Sync {
    /// Score `configuration`.
    fn evaluate(&self, configuration: &Configuration) -> Result<f64>;
}

impl<F> MetricOracle for F
where
    F: Fn(&Configuration) -> Result<f64> + Send + Sync,
{
    fn evaluate(&self, configuration: &Configuration) -> Result<f64> {
        self(configuration)
    }
}
