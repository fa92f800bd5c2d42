//! Coppock Curve sign-change strategy.
//!
//! Index 0 always carries a `Buy` and the next three bars are `Hold`; the
//! latch starts long, so the first real signal is a sell.

use algotrade_core::{
    error::StrategyError,
    traits::{Indicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, Signal, SignalSeries},
};
use algotrade_indicators::CoppockCurve;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::CrossoverDetector;
use crate::params::ensure_period;

/// Bars of same-signed history required before a sign change counts.
pub const CONFIRMATION_BARS: usize = 4;

/// Configuration for the Coppock Curve strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoppockConfig {
    /// Shorter rate-of-change lookback
    pub short_roc: usize,
    /// Longer rate-of-change lookback
    pub long_roc: usize,
    /// WMA window; defaults to `short_roc + (short_roc + long_roc) / 2`
    #[serde(default)]
    pub wma_lookback: Option<usize>,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl CoppockConfig {
    /// Effective WMA window.
    pub fn wma_lookback(&self) -> usize {
        self.wma_lookback
            .unwrap_or(self.short_roc + (self.short_roc + self.long_roc) / 2)
    }
}

impl StrategyConfig for CoppockConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("short_roc", self.short_roc)?;
        ensure_period("long_roc", self.long_roc)?;
        ensure_period("wma_lookback", self.wma_lookback())
    }
}

/// Coppock Curve Strategy.
pub struct CoppockStrategy {
    config: CoppockConfig,
    indicator: CoppockCurve,
}

impl CoppockStrategy {
    pub fn new(config: CoppockConfig) -> Self {
        let indicator =
            CoppockCurve::new(config.short_roc, config.long_roc, config.wma_lookback());
        Self { config, indicator }
    }
}

/// Signals from a Coppock series: a strictly positive value after four
/// strictly negative ones buys, the mirror sells.
pub fn coppock_signals(cc: &[f64]) -> Vec<Signal> {
    let window = |i: usize| &cc[i - CONFIRMATION_BARS..i];

    CrossoverDetector::with_lookback(CONFIRMATION_BARS)
        .seeded(Signal::Buy)
        .detect(
            cc.len(),
            |i| window(i).iter().all(|v| *v < 0.0) && cc[i] > 0.0,
            |i| window(i).iter().all(|v| *v > 0.0) && cc[i] < 0.0,
        )
}

impl Strategy for CoppockStrategy {
    fn name(&self) -> &str {
        "Coppock Curve"
    }

    fn description(&self) -> &str {
        "Sign changes of the WMA-smoothed sum of two rates of change after four bars of confirmation"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let mut cc = self.indicator.calculate(&series.closes())?;
        fill_undefined(&mut cc, self.config.fill_value);

        let output = SignalSeries::new(coppock_signals(&cc), series.closes(), series.timestamps());
        debug!("{}: {} signals over {} bars", self.name(), output.trigger_count(), output.len());
        Ok(output)
    }

    fn warmup_period(&self) -> usize {
        self.indicator.period()
    }

    fn parameters(&self) -> serde_json::Value {
        let mut params = serde_json::to_value(&self.config).unwrap_or_default();
        if let Some(map) = params.as_object_mut() {
            map.insert("wma_lookback".into(), self.config.wma_lookback().into());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algotrade_core::traits::parse_config;
    use algotrade_core::types::Bar;

    fn as_ints(signals: &[Signal]) -> Vec<i8> {
        signals.iter().map(|s| s.direction()).collect()
    }

    #[test]
    fn test_seed_and_confirmed_sign_changes() {
        let cc = [
            -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 2.0,
        ];
        let signals = coppock_signals(&cc);

        // The first upturn is absorbed by the seeded long latch
        assert_eq!(as_ints(&signals), vec![1, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_unconfirmed_sign_change_holds() {
        let cc = [1.0, 1.0, 1.0, -1.0, 1.0, -1.0, -1.0];
        assert_eq!(as_ints(&coppock_signals(&cc)), vec![1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_default_wma_lookback() {
        let config: CoppockConfig =
            parse_config(serde_json::json!({ "short_roc": 11, "long_roc": 14 })).unwrap();
        assert_eq!(config.wma_lookback(), 11 + 12);

        let strategy = CoppockStrategy::new(config);
        assert_eq!(strategy.warmup_period(), 14 + 23);
        assert_eq!(strategy.parameters()["wma_lookback"], 23);
    }

    #[test]
    fn test_generate_on_rising_prices() {
        let config = parse_config(serde_json::json!({
            "short_roc": 2, "long_roc": 3, "wma_lookback": 2
        }))
        .unwrap();
        let series: BarSeries = (0..20)
            .map(|i| {
                let c = 50.0 + i as f64;
                Bar::new(i, c, c + 1.0, c - 1.0, c, 10.0)
            })
            .collect();

        let output = CoppockStrategy::new(config).generate(&series).unwrap();
        assert_eq!(output.len(), 20);
        assert_eq!(output.signals[0], Signal::Buy);
        assert_eq!(output.trigger_count(), 1);
    }
}
