//! Commodity Channel Index band strategy.

use algotrade_core::{
    error::StrategyError,
    traits::{BarIndicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::Cci;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::{crosses_above, crosses_below, CrossoverDetector};
use crate::params::ensure_period;

pub const LOWER_BAND: f64 = -150.0;
pub const UPPER_BAND: f64 = 150.0;

/// Configuration for the CCI strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CciConfig {
    /// Averaging and deviation window
    pub lookback: usize,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl StrategyConfig for CciConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("lookback", self.lookback)
    }
}

/// CCI Strategy.
///
/// Buys when CCI climbs back above -150 and sells when it drops back below
/// +150.
pub struct CciStrategy {
    config: CciConfig,
    indicator: Cci,
}

impl CciStrategy {
    pub fn new(config: CciConfig) -> Self {
        let indicator = Cci::new(config.lookback);
        Self { config, indicator }
    }
}

impl Strategy for CciStrategy {
    fn name(&self) -> &str {
        "Commodity Channel Index"
    }

    fn description(&self) -> &str {
        "Trades CCI returning inside the -150/+150 bands"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut cci = self.indicator.calculate(series.bars())?;
        fill_undefined(&mut cci, self.config.fill_value);

        let signals = CrossoverDetector::with_lookback(1).detect(
            cci.len(),
            |i| crosses_above(cci[i - 1], cci[i], LOWER_BAND),
            |i| crosses_below(cci[i - 1], cci[i], UPPER_BAND),
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
