//! Williams %R reversal strategy.
//!
//! Buys when %R rises out of the oversold zone through -80 and sells when it
//! falls out of the overbought zone through -20.

use algotrade_core::{
    error::StrategyError,
    traits::{BarIndicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::WilliamsR;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::{crosses_above, crosses_below, CrossoverDetector};
use crate::params::ensure_period;

/// Oversold boundary.
pub const OVERSOLD: f64 = -80.0;
/// Overbought boundary.
pub const OVERBOUGHT: f64 = -20.0;

/// Configuration for the Williams %R strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WilliamsRConfig {
    /// Highest-high / lowest-low window
    pub lookback: usize,
    /// Replacement for undefined %R values
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl StrategyConfig for WilliamsRConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("lookback", self.lookback)
    }
}

/// Williams %R Strategy.
pub struct WilliamsRStrategy {
    config: WilliamsRConfig,
    indicator: WilliamsR,
}

impl WilliamsRStrategy {
    pub fn new(config: WilliamsRConfig) -> Self {
        let indicator = WilliamsR::new(config.lookback);
        Self { config, indicator }
    }
}

impl Strategy for WilliamsRStrategy {
    fn name(&self) -> &str {
        "Williams %R"
    }

    fn description(&self) -> &str {
        "Trades %R exits from the oversold (-80) and overbought (-20) zones"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut wr = self.indicator.calculate(series.bars())?;
        fill_undefined(&mut wr, self.config.fill_value);

        let signals = CrossoverDetector::with_lookback(1).detect(
            wr.len(),
            |i| crosses_above(wr[i - 1], wr[i], OVERSOLD),
            |i| crosses_below(wr[i - 1], wr[i], OVERBOUGHT),
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
