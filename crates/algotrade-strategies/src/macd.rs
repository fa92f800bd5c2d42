//! MACD versus signal-line strategy.

use algotrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::Macd;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::CrossoverDetector;
use crate::params::{default_fast, default_slow, default_smooth, ensure_macd_periods, zero_fill};

/// Configuration for the MACD strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacdConfig {
    /// Slow EMA span
    #[serde(default = "default_slow")]
    pub slow: usize,
    /// Fast EMA span
    #[serde(default = "default_fast")]
    pub fast: usize,
    /// Signal line span
    #[serde(default = "default_smooth")]
    pub smooth: usize,
    #[serde(default = "zero_fill")]
    pub fill_value: Option<FillPolicy>,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            slow: default_slow(),
            fast: default_fast(),
            smooth: default_smooth(),
            fill_value: zero_fill(),
        }
    }
}

impl StrategyConfig for MacdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_macd_periods(self.fast, self.slow, self.smooth)
    }
}

/// MACD Strategy.
///
/// Compares the MACD line with its signal line on every bar: long while
/// above, short while below, with the latch collapsing repeats. Equal lines
/// hold.
pub struct MacdStrategy {
    config: MacdConfig,
    indicator: Macd,
}

impl MacdStrategy {
    pub fn new(config: MacdConfig) -> Self {
        let indicator = Macd::with_periods(config.fast, config.slow, config.smooth);
        Self { config, indicator }
    }
}

impl Strategy for MacdStrategy {
    fn name(&self) -> &str {
        "MACD"
    }

    fn description(&self) -> &str {
        "Long while MACD is above its signal line, short while below"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut macd = self.indicator.calculate(&series.closes())?;
        fill_undefined(&mut macd.macd, self.config.fill_value);
        fill_undefined(&mut macd.signal, self.config.fill_value);

        let (line, signal) = (&macd.macd, &macd.signal);
        let signals = CrossoverDetector::new().detect(
            line.len(),
            |i| line[i] > signal[i],
            |i| line[i] < signal[i],
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
