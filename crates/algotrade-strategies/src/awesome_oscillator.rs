//! Awesome Oscillator zero-line crossover.

use algotrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::AwesomeOscillator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::{strictly_crosses_above, strictly_crosses_below, CrossoverDetector};
use crate::params::ensure_ordered;

/// Configuration for the Awesome Oscillator strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwesomeOscillatorConfig {
    /// Fast SMA period over the two-bar median
    pub short_period: usize,
    /// Slow SMA period over the two-bar median
    pub long_period: usize,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl StrategyConfig for AwesomeOscillatorConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_ordered("short_period", self.short_period, "long_period", self.long_period)
    }
}

/// Awesome Oscillator Strategy.
///
/// Buys when the oscillator moves from strictly negative to strictly
/// positive and sells on the opposite move.
pub struct AwesomeOscillatorStrategy {
    config: AwesomeOscillatorConfig,
    indicator: AwesomeOscillator,
}

impl AwesomeOscillatorStrategy {
    pub fn new(config: AwesomeOscillatorConfig) -> Self {
        let indicator = AwesomeOscillator::new(config.short_period, config.long_period);
        Self { config, indicator }
    }
}

impl Strategy for AwesomeOscillatorStrategy {
    fn name(&self) -> &str {
        "Awesome Oscillator"
    }

    fn description(&self) -> &str {
        "Zero-line crossovers of the short/long median-price SMA difference"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut ao = self.indicator.calculate(&series.closes())?;
        fill_undefined(&mut ao, self.config.fill_value);

        let signals = CrossoverDetector::with_lookback(1).detect(
            ao.len(),
            |i| strictly_crosses_above(ao[i - 1], ao[i], 0.0),
            |i| strictly_crosses_below(ao[i - 1], ao[i], 0.0),
        );

        let output = SignalSeries::new(signals, series.closes(), series.timestamps());
        debug!("{}: {} signals over {} bars", self.name(), output.trigger_count(), output.len());
        Ok(output)
    }

    fn warmup_period(&self) -> usize {
        self.indicator.period()
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
