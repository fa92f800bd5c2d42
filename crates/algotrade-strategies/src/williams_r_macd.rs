//! Williams %R crossing its midline, confirmed by MACD.

use algotrade_core::{
    error::StrategyError,
    traits::{BarIndicator, Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::{Macd, WilliamsR};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::{crosses_above, crosses_below, CrossoverDetector};
use crate::params::{
    default_fast, default_slow, default_smooth, ensure_macd_periods, ensure_period, zero_fill,
};

/// %R midline.
pub const MIDLINE: f64 = -50.0;

/// Configuration for the Williams %R + MACD strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WilliamsRMacdConfig {
    /// Highest-high / lowest-low window
    pub lookback: usize,
    /// Slow EMA span
    #[serde(default = "default_slow")]
    pub slow: usize,
    /// Fast EMA span
    #[serde(default = "default_fast")]
    pub fast: usize,
    /// Signal line span
    #[serde(default = "default_smooth")]
    pub smooth: usize,
    /// Replacement for undefined values, zero unless overridden
    #[serde(default = "zero_fill")]
    pub fill_value: Option<FillPolicy>,
}

impl StrategyConfig for WilliamsRMacdConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("lookback", self.lookback)?;
        ensure_macd_periods(self.fast, self.slow, self.smooth)
    }
}

/// Williams %R + MACD Strategy.
///
/// Buys when %R crosses up through -50 while MACD is above its signal line;
/// sells when %R crosses down through -50 while MACD is below it.
pub struct WilliamsRMacdStrategy {
    config: WilliamsRMacdConfig,
    wr: WilliamsR,
    macd: Macd,
}

impl WilliamsRMacdStrategy {
    pub fn new(config: WilliamsRMacdConfig) -> Self {
        let wr = WilliamsR::new(config.lookback);
        let macd = Macd::with_periods(config.fast, config.slow, config.smooth);
        Self { config, wr, macd }
    }
}

impl Strategy for WilliamsRMacdStrategy {
    fn name(&self) -> &str {
        "Williams %R + MACD"
    }

    fn description(&self) -> &str {
        "Williams %R midline crossings confirmed by MACD against its signal line"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut wr = self.wr.calculate(series.bars())?;
        let mut macd = self.macd.calculate(&series.closes())?;
        for values in [&mut wr, &mut macd.macd, &mut macd.signal] {
            fill_undefined(values, self.config.fill_value);
        }

        let (line, signal) = (&macd.macd, &macd.signal);
        let signals = CrossoverDetector::with_lookback(1).detect(
            wr.len(),
            |i| crosses_above(wr[i - 1], wr[i], MIDLINE) && line[i] > signal[i],
            |i| crosses_below(wr[i - 1], wr[i], MIDLINE) && line[i] < signal[i],
        );

        let output = SignalSeries::new(signals, series.closes(), series.timestamps());
        debug!("{}: {} signals over {} bars", self.name(), output.trigger_count(), output.len());
        Ok(output)
    }

    fn warmup_period(&self) -> usize {
        self.wr.period().max(Indicator::period(&self.macd))
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
