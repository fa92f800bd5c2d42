//! Core types and traits for the strategy signal framework.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries) and missing-value fill policies
//! - Signals, positions and aligned strategy output
//! - Core traits for indicators and strategies

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    DataError, IndicatorError, SimulationError, StrategyError, TradingError, TradingResult,
};
pub use traits::*;
pub use types::*;
