//! Signal-generating strategies.
//!
//! Each strategy computes its indicators over a bar series and feeds a pair
//! of entry predicates to the shared [`CrossoverDetector`]:
//! - Williams %R, alone and with MACD confirmation
//! - Awesome Oscillator zero-line crossover
//! - Commodity Channel Index bands
//! - Coppock Curve
//! - MACD versus signal line
//! - ADX / RSI (either or both)
//! - SMA crossover
//! - SuperTrend

mod adx_rsi;
mod awesome_oscillator;
mod cci;
mod coppock;
pub mod crossover;
mod macd;
mod params;
mod registry;
mod sma_crossover;
mod supertrend;
mod williams_r;
mod williams_r_macd;

pub use adx_rsi::{AdxRsiConfig, AdxRsiMode, AdxRsiStrategy};
pub use awesome_oscillator::{AwesomeOscillatorConfig, AwesomeOscillatorStrategy};
pub use cci::{CciConfig, CciStrategy};
pub use coppock::{coppock_signals, CoppockConfig, CoppockStrategy};
pub use crossover::CrossoverDetector;
pub use macd::{MacdConfig, MacdStrategy};
pub use registry::{StrategyInfo, StrategyRegistry};
pub use sma_crossover::{SmaCrossoverConfig, SmaCrossoverStrategy};
pub use supertrend::{SuperTrendConfig, SuperTrendStrategy};
pub use williams_r::{WilliamsRConfig, WilliamsRStrategy};
pub use williams_r_macd::{WilliamsRMacdConfig, WilliamsRMacdStrategy};
