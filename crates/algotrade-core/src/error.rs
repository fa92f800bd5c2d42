//! Error types for the signal framework.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// A required parameter is missing, unknown, malformed or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),
}

impl StrategyError {
    /// Wrap a configuration deserialization failure.
    pub fn config(err: impl std::fmt::Display) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

/// Position/budget simulation errors.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// A trade would be sized against a close that cannot divide the budget.
    #[error("Cannot size trade at bar {index}: close price {price} is not positive")]
    DivisionDomain { index: usize, price: f64 },

    #[error("Strategy returned {signals} signals for {closes} closes")]
    MisalignedOutput { signals: usize, closes: usize },

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No data available: {0}")]
    NoDataAvailable(String),

    #[error("Bar {index} is out of order: timestamp {current} does not follow {previous}")]
    Unordered {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("{indicator}: insufficient data, need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A ratio inside the indicator has a zero denominator.
    #[error("{indicator}: zero denominator at bar {index} ({detail})")]
    DivisionDomain {
        indicator: &'static str,
        index: usize,
        detail: &'static str,
    },
}

/// Result type alias for framework operations.
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_error_lifts_into_strategy_error() {
        let err: StrategyError = IndicatorError::DivisionDomain {
            indicator: "Williams %R",
            index: 4,
            detail: "highest high equals lowest low",
        }
        .into();

        assert!(matches!(
            err,
            StrategyError::Indicator(IndicatorError::DivisionDomain { index: 4, .. })
        ));
        assert!(err.to_string().contains("bar 4"));
    }

    #[test]
    fn test_errors_lift_into_trading_error() {
        fn load() -> TradingResult<()> {
            Err(DataError::NoDataAvailable("SPY".to_string()).into())
        }
        fn run() -> TradingResult<()> {
            Err(SimulationError::DivisionDomain { index: 3, price: 0.0 }.into())
        }

        assert!(matches!(load(), Err(TradingError::Data(_))));
        assert!(matches!(run(), Err(TradingError::Simulation(_))));
    }

    #[test]
    fn test_config_error_message() {
        let err = StrategyError::config("missing field `lookback`");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: missing field `lookback`"
        );
    }
}
