//! Strategy registry for building strategies by name.

use std::collections::BTreeMap;

use algotrade_core::{
    error::StrategyError,
    traits::{parse_config, Strategy},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AdxRsiStrategy, AwesomeOscillatorStrategy, CciStrategy, CoppockStrategy, MacdStrategy,
    SmaCrossoverStrategy, SuperTrendStrategy, WilliamsRMacdStrategy, WilliamsRStrategy,
};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub name: String,
    /// Strategy description
    pub description: String,
    /// A complete, valid configuration
    pub example_config: serde_json::Value,
}

/// Registry of the built-in strategies.
pub struct StrategyRegistry {
    strategies: BTreeMap<&'static str, StrategyInfo>,
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let entries = [
            (
                "williams_r",
                "Williams %R exits from the oversold and overbought zones",
                json!({ "lookback": 14 }),
            ),
            (
                "williams_r_macd",
                "Williams %R midline crossings confirmed by MACD",
                json!({ "lookback": 14, "slow": 26, "fast": 12, "smooth": 9 }),
            ),
            (
                "awesome_oscillator",
                "Zero-line crossovers of a median-price SMA difference",
                json!({ "short_period": 5, "long_period": 34 }),
            ),
            (
                "cci",
                "Commodity Channel Index returning inside the +/-150 bands",
                json!({ "lookback": 20 }),
            ),
            (
                "coppock",
                "Confirmed sign changes of the Coppock Curve",
                json!({ "short_roc": 11, "long_roc": 14, "wma_lookback": 10 }),
            ),
            (
                "macd",
                "MACD above or below its signal line",
                json!({ "slow": 26, "fast": 12, "smooth": 9 }),
            ),
            (
                "adx_rsi",
                "ADX trend onset, RSI threshold crossings, or both combined",
                json!({ "lookback": 14, "adx": true, "rsi": true }),
            ),
            (
                "sma_crossover",
                "Short SMA above or below the long SMA",
                json!({ "short_window": 20, "long_window": 50 }),
            ),
            (
                "supertrend",
                "Price crossings of the SuperTrend line",
                json!({ "lookback": 10, "multiplier": 3.0 }),
            ),
        ];

        let strategies = entries
            .into_iter()
            .map(|(name, description, example_config)| {
                let info = StrategyInfo {
                    name: name.to_string(),
                    description: description.to_string(),
                    example_config,
                };
                (name, info)
            })
            .collect();

        Self { strategies }
    }

    /// List all available strategies, ordered by name.
    pub fn list(&self) -> Vec<&StrategyInfo> {
        self.strategies.values().collect()
    }

    /// Get strategy info by name.
    pub fn get(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies.get(name)
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Get all strategy names.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().copied().collect()
    }

    /// Create a strategy instance from configuration.
    pub fn create(
        &self,
        name: &str,
        config: serde_json::Value,
    ) -> Result<Box<dyn Strategy>, StrategyError> {
        let strategy: Box<dyn Strategy> = match name {
            "williams_r" => Box::new(WilliamsRStrategy::new(parse_config(config)?)),
            "williams_r_macd" => Box::new(WilliamsRMacdStrategy::new(parse_config(config)?)),
            "awesome_oscillator" => {
                Box::new(AwesomeOscillatorStrategy::new(parse_config(config)?))
            }
            "cci" => Box::new(CciStrategy::new(parse_config(config)?)),
            "coppock" => Box::new(CoppockStrategy::new(parse_config(config)?)),
            "macd" => Box::new(MacdStrategy::new(parse_config(config)?)),
            "adx_rsi" => Box::new(AdxRsiStrategy::new(parse_config(config)?)),
            "sma_crossover" => Box::new(SmaCrossoverStrategy::new(parse_config(config)?)),
            "supertrend" => Box::new(SuperTrendStrategy::new(parse_config(config)?)),
            _ => return Err(StrategyError::NotFound(name.to_string())),
        };
        Ok(strategy)
    }

    /// Create a strategy with its example configuration.
    pub fn create_example(&self, name: &str) -> Result<Box<dyn Strategy>, StrategyError> {
        let info = self
            .get(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        self.create(name, info.example_config.clone())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = StrategyRegistry::new();
        let strategies = registry.list();

        assert_eq!(strategies.len(), 9);
        assert_eq!(strategies[0].name, "adx_rsi");
    }

    #[test]
    fn test_registry_get() {
        let registry = StrategyRegistry::new();

        assert!(registry.get("coppock").is_some());
        assert!(registry.exists("supertrend"));
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_every_example_config_builds() {
        let registry = StrategyRegistry::new();

        for name in registry.names() {
            let strategy = registry.create_example(name);
            assert!(strategy.is_ok(), "{name} failed to build");
        }
    }

    #[test]
    fn test_create_with_config() {
        let registry = StrategyRegistry::new();

        let strategy = registry
            .create("sma_crossover", json!({ "short_window": 2, "long_window": 4 }))
            .unwrap();
        assert_eq!(strategy.name(), "SMA Crossover");
        assert_eq!(strategy.warmup_period(), 4);
        assert_eq!(strategy.parameters()["short_window"], 2);
    }

    #[test]
    fn test_create_errors() {
        let registry = StrategyRegistry::new();

        assert!(matches!(
            registry.create_example("unknown"),
            Err(StrategyError::NotFound(_))
        ));
        assert!(matches!(
            registry.create("cci", json!({})),
            Err(StrategyError::InvalidConfig(_))
        ));
    }
}
