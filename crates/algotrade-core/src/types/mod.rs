//! Core data types.

mod fill;
mod ohlcv;
mod position;
mod signal;

pub use fill::{fill_undefined, FillPolicy};
pub use ohlcv::{Bar, BarSeries};
pub use position::{positions_from_signals, Position};
pub use signal::{Signal, SignalSeries};

/// An indicator output aligned index-for-index with its source bars.
///
/// Warm-up positions hold `NaN`.
pub type DerivedSeries = Vec<f64>;
