//! Core traits for the signal framework.

mod indicator;
mod strategy;

pub use indicator::{BarIndicator, Indicator};
pub use strategy::{parse_config, Strategy, StrategyConfig};
