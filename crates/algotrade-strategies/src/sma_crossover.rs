//! Simple moving average crossover.
//!
//! A level comparison rather than a true cross: the latch alone keeps a
//! persisting `short > long` from re-firing.

use algotrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::Sma;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::CrossoverDetector;
use crate::params::ensure_ordered;

/// Configuration for the SMA crossover strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmaCrossoverConfig {
    /// Fast SMA period
    pub short_window: usize,
    /// Slow SMA period
    pub long_window: usize,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl StrategyConfig for SmaCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_ordered("short_window", self.short_window, "long_window", self.long_window)
    }
}

/// SMA Crossover Strategy.
pub struct SmaCrossoverStrategy {
    config: SmaCrossoverConfig,
    short: Sma,
    long: Sma,
}

impl SmaCrossoverStrategy {
    pub fn new(config: SmaCrossoverConfig) -> Self {
        let short = Sma::new(config.short_window);
        let long = Sma::new(config.long_window);
        Self {
            config,
            short,
            long,
        }
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        "SMA Crossover"
    }

    fn description(&self) -> &str {
        "Long when the short SMA is above the long SMA, short when below"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let closes = series.closes();
        let mut short = self.short.calculate(&closes)?;
        let mut long = self.long.calculate(&closes)?;
        fill_undefined(&mut short, self.config.fill_value);
        fill_undefined(&mut long, self.config.fill_value);

        let signals = CrossoverDetector::new().detect(
            closes.len(),
            |i| short[i] > long[i],
            |i| long[i] > short[i],
        );

        let output = SignalSeries::new(signals, closes, series.timestamps());
        debug!("{}: {} signals over {} bars", self.name(), output.trigger_count(), output.len());
        Ok(output)
    }

    fn warmup_period(&self) -> usize {
        self.long.period()
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
