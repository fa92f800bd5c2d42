//! Strategy trait definitions.

use serde::de::DeserializeOwned;

use crate::error::StrategyError;
use crate::types::{BarSeries, SignalSeries};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Deserialize and validate a strategy configuration mapping.
///
/// Missing required keys, unknown keys and type mismatches all surface as
/// [`StrategyError::InvalidConfig`].
pub fn parse_config<C>(params: serde_json::Value) -> Result<C, StrategyError>
where
    C: StrategyConfig + DeserializeOwned,
{
    let params = match params {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    let config: C = serde_json::from_value(params).map_err(StrategyError::config)?;
    config.validate()?;
    Ok(config)
}

/// Core strategy trait.
///
/// A strategy turns a bar series into a signal per bar. Implementations hold
/// only their configuration, so one instance can be applied to any number of
/// series.
pub trait Strategy: Send + Sync {
    /// Get the unique name of this strategy.
    fn name(&self) -> &str;

    /// Compute the signal sequence and the closes it is aligned with.
    ///
    /// The output may be shorter than `series` when leading bars are dropped.
    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError>;

    /// Get the warmup period (number of bars needed before generating signals).
    fn warmup_period(&self) -> usize;

    /// Current configuration as JSON, for reports.
    fn parameters(&self) -> serde_json::Value;

    /// Fail fast when the series cannot cover the warmup period.
    fn ensure_warmed_up(&self, series: &BarSeries) -> Result<(), StrategyError> {
        let required = self.warmup_period();
        if series.len() < required {
            return Err(StrategyError::InsufficientData {
                required,
                available: series.len(),
            });
        }
        Ok(())
    }

    /// Get a description of the strategy.
    fn description(&self) -> &str {
        ""
    }
}
