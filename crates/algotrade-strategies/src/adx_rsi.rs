//! ADX and RSI strategies, alone or combined.
//!
//! The RSI rules fire on RSI falling through 30 (buy) and rising through 70
//! (sell). The combined rule buys on a strong trend with -DI leading and RSI
//! under 50.

use algotrade_core::{
    error::StrategyError,
    traits::{BarIndicator, Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, Signal, SignalSeries},
};
use algotrade_indicators::{Adx, AdxOutput, Rsi};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::crossover::{strictly_crosses_above, strictly_crosses_below, CrossoverDetector};
use crate::params::ensure_period;

/// ADX level a trend must cross to count on its own.
pub const ADX_TREND: f64 = 25.0;
/// ADX level required by the combined rule.
pub const ADX_STRONG_TREND: f64 = 35.0;
pub const RSI_LOWER: f64 = 30.0;
pub const RSI_UPPER: f64 = 70.0;
pub const RSI_MIDLINE: f64 = 50.0;

fn enabled() -> bool {
    true
}

/// Configuration for the ADX/RSI strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdxRsiConfig {
    /// Window shared by ADX and RSI
    pub lookback: usize,
    /// Use the ADX rule
    #[serde(default = "enabled")]
    pub adx: bool,
    /// Use the RSI rule
    #[serde(default = "enabled")]
    pub rsi: bool,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl AdxRsiConfig {
    pub fn mode(&self) -> AdxRsiMode {
        match (self.adx, self.rsi) {
            (true, true) => AdxRsiMode::Combined,
            (true, false) => AdxRsiMode::AdxOnly,
            (false, true) => AdxRsiMode::RsiOnly,
            (false, false) => AdxRsiMode::Disabled,
        }
    }
}

impl StrategyConfig for AdxRsiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("lookback", self.lookback)
    }
}

/// Rule selected by the `adx` / `rsi` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdxRsiMode {
    Combined,
    AdxOnly,
    RsiOnly,
    /// Neither rule; every bar holds.
    Disabled,
}

/// ADX/RSI Strategy.
pub struct AdxRsiStrategy {
    config: AdxRsiConfig,
    adx: Adx,
    rsi: Rsi,
}

impl AdxRsiStrategy {
    pub fn new(config: AdxRsiConfig) -> Self {
        let adx = Adx::new(config.lookback);
        let rsi = Rsi::new(config.lookback);
        Self { config, adx, rsi }
    }

    fn directional(&self, series: &BarSeries) -> Result<AdxOutput, StrategyError> {
        let mut out = self.adx.calculate(series.bars())?;
        for values in [&mut out.plus_di, &mut out.minus_di, &mut out.adx] {
            fill_undefined(values, self.config.fill_value);
        }
        Ok(out)
    }

    fn strength(&self, series: &BarSeries) -> Result<Vec<f64>, StrategyError> {
        let mut rsi = self.rsi.calculate(&series.closes())?;
        fill_undefined(&mut rsi, self.config.fill_value);
        Ok(rsi)
    }
}

/// ADX rising through 25 buys when +DI leads and sells when -DI leads.
fn adx_signals(dm: &AdxOutput) -> Vec<Signal> {
    let (pdi, ndi, adx) = (&dm.plus_di, &dm.minus_di, &dm.adx);
    let trend_starts = |i: usize| strictly_crosses_above(adx[i - 1], adx[i], ADX_TREND);

    CrossoverDetector::with_lookback(1).detect(
        adx.len(),
        |i| trend_starts(i) && pdi[i] > ndi[i],
        |i| trend_starts(i) && ndi[i] > pdi[i],
    )
}

fn rsi_signals(rsi: &[f64]) -> Vec<Signal> {
    CrossoverDetector::with_lookback(1).detect(
        rsi.len(),
        |i| strictly_crosses_below(rsi[i - 1], rsi[i], RSI_LOWER),
        |i| strictly_crosses_above(rsi[i - 1], rsi[i], RSI_UPPER),
    )
}

/// Level rule on the current bar only.
fn combined_signals(dm: &AdxOutput, rsi: &[f64]) -> Vec<Signal> {
    let (pdi, ndi, adx) = (&dm.plus_di, &dm.minus_di, &dm.adx);

    CrossoverDetector::new().detect(
        adx.len(),
        |i| adx[i] > ADX_STRONG_TREND && pdi[i] < ndi[i] && rsi[i] < RSI_MIDLINE,
        |i| adx[i] > ADX_STRONG_TREND && pdi[i] > ndi[i] && rsi[i] > RSI_MIDLINE,
    )
}

impl Strategy for AdxRsiStrategy {
    fn name(&self) -> &str {
        match self.config.mode() {
            AdxRsiMode::Combined => "ADX + RSI",
            AdxRsiMode::AdxOnly => "ADX",
            AdxRsiMode::RsiOnly => "RSI",
            AdxRsiMode::Disabled => "ADX/RSI (disabled)",
        }
    }

    fn description(&self) -> &str {
        "ADX trend onset, RSI threshold crossings, or both combined"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let signals = match self.config.mode() {
            AdxRsiMode::Combined => {
                combined_signals(&self.directional(series)?, &self.strength(series)?)
            }
            AdxRsiMode::AdxOnly => adx_signals(&self.directional(series)?),
            AdxRsiMode::RsiOnly => rsi_signals(&self.strength(series)?),
            AdxRsiMode::Disabled => {
                warn!("ADX/RSI strategy has both rules disabled; emitting no signals");
                vec![Signal::Hold; series.len()]
            }
        };

        let output = SignalSeries::new(signals, series.closes(), series.timestamps());
        debug!("{}: {} signals over {} bars", self.name(), output.trigger_count(), output.len());
        Ok(output)
    }

    fn warmup_period(&self) -> usize {
        let adx = BarIndicator::period(&self.adx);
        let rsi = Indicator::period(&self.rsi);
        match self.config.mode() {
            AdxRsiMode::Combined => adx.max(rsi),
            AdxRsiMode::AdxOnly => adx,
            AdxRsiMode::RsiOnly => rsi,
            AdxRsiMode::Disabled => 1,
        }
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
