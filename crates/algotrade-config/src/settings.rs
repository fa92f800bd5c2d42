//! Configuration structures.

use algotrade_core::types::{FillPolicy, Position};
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
}

impl AppConfig {
    /// Range checks that deserialization cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let budget = self.backtest.initial_budget;
        if !(budget.is_finite() && budget >= 0.0) {
            return Err(format!(
                "backtest.initial_budget must be a non-negative number, got {}",
                budget
            ));
        }
        if !self.strategy.params.is_object() {
            return Err("strategy.params must be a table".to_string());
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "algotrade".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    pub initial_budget: f64,
    /// Policy for missing values in loaded bars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<FillPolicy>,
    /// Position before the first bar
    pub initial_position: Position,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            initial_budget: 100_000.0,
            fill_value: Some(FillPolicy::Mean),
            initial_position: Position::Held,
        }
    }
}

/// Default strategy selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Strategy configuration mapping
    pub params: serde_json::Value,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            name: None,
            params: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}
