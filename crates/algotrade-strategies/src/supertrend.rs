//! SuperTrend flip strategy.
//!
//! The first bar has no trend line and is dropped from the output.

use algotrade_core::{
    error::StrategyError,
    traits::{BarIndicator, Strategy, StrategyConfig},
    types::{fill_undefined, BarSeries, FillPolicy, SignalSeries},
};
use algotrade_indicators::SuperTrend;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crossover::CrossoverDetector;
use crate::params::ensure_period;

fn default_lookback() -> usize {
    10
}

fn default_multiplier() -> f64 {
    3.0
}

/// Configuration for the SuperTrend strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuperTrendConfig {
    /// ATR center of mass
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    /// ATR multiple added to / subtracted from the bar midpoint
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub fill_value: Option<FillPolicy>,
}

impl Default for SuperTrendConfig {
    fn default() -> Self {
        Self {
            lookback: default_lookback(),
            multiplier: default_multiplier(),
            fill_value: None,
        }
    }
}

impl StrategyConfig for SuperTrendConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        ensure_period("lookback", self.lookback)?;
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(StrategyError::InvalidConfig(format!(
                "multiplier must be positive, got {}",
                self.multiplier
            )));
        }
        Ok(())
    }
}

/// SuperTrend Strategy.
///
/// Buys when price moves from below the trend line to above it and sells on
/// the opposite move.
pub struct SuperTrendStrategy {
    config: SuperTrendConfig,
    indicator: SuperTrend,
}

impl SuperTrendStrategy {
    pub fn new(config: SuperTrendConfig) -> Self {
        let indicator = SuperTrend::new(config.lookback, config.multiplier);
        Self { config, indicator }
    }
}

impl Strategy for SuperTrendStrategy {
    fn name(&self) -> &str {
        "SuperTrend"
    }

    fn description(&self) -> &str {
        "Price crossings of the ATR-band SuperTrend line"
    }

    fn generate(&self, series: &BarSeries) -> Result<SignalSeries, StrategyError> {
        self.ensure_warmed_up(series)?;

        let st = self.indicator.calculate(series.bars())?;
        let mut line = st.line[1..].to_vec();
        fill_undefined(&mut line, self.config.fill_value);
        let closes = series.closes()[1..].to_vec();
        let timestamps = series.timestamps()[1..].to_vec();

        let signals = CrossoverDetector::with_lookback(1).detect(
            line.len(),
            |j| line[j - 1] > closes[j - 1] && line[j] < closes[j],
            |j| line[j - 1] < closes[j - 1] && line[j] > closes[j],
        );

        let output = SignalSeries::new(signals, closes, timestamps);
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

#[cfg(test)]
mod tests {
    use super::*;
    use algotrade_core::traits::parse_config;
    use algotrade_core::types::{Bar, Signal};

    fn series(closes: &[f64]) -> BarSeries {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(1_000 + i as i64, c, c + 1.0, c - 1.0, c, 100.0))
            .collect()
    }

    fn v_shape() -> Vec<f64> {
        let down = (0..15).map(|i| 100.0 - 2.0 * i as f64);
        let up = (1..=15).map(|i| 72.0 + 4.0 * i as f64);
        down.chain(up).collect()
    }

    #[test]
    fn test_defaults() {
        let config: SuperTrendConfig = parse_config(serde_json::json!({})).unwrap();
        assert_eq!(config.lookback, 10);
        assert_eq!(config.multiplier, 3.0);
    }

    #[test]
    fn test_first_bar_dropped() {
        let closes = v_shape();
        let output = SuperTrendStrategy::new(SuperTrendConfig {
            lookback: 3,
            multiplier: 1.0,
            fill_value: None,
        })
        .generate(&series(&closes))
        .unwrap();

        assert_eq!(output.len(), closes.len() - 1);
        assert_eq!(output.closes[0], closes[1]);
        assert_eq!(output.timestamps[0], 1_001);
    }

    #[test]
    fn test_reversal_buys_once() {
        let strategy = SuperTrendStrategy::new(SuperTrendConfig {
            lookback: 3,
            multiplier: 1.0,
            fill_value: None,
        });
        let output = strategy.generate(&series(&v_shape())).unwrap();

        let triggers: Vec<Signal> = output
            .signals
            .iter()
            .copied()
            .filter(|s| s.is_trigger())
            .collect();
        assert_eq!(triggers, vec![Signal::Buy]);
    }

    #[test]
    fn test_non_positive_multiplier_rejected() {
        let result = parse_config::<SuperTrendConfig>(serde_json::json!({ "multiplier": -1.0 }));
        assert!(matches!(result, Err(StrategyError::InvalidConfig(_))));
    }
}
