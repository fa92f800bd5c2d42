//! Technical indicators over price bars.
//!
//! Every indicator returns a series aligned index-for-index with its input,
//! with `NaN` marking warm-up positions:
//! - Moving averages (SMA, EMA, WMA) and exponential smoothing
//! - Momentum oscillators (MACD, RSI, Williams %R, ROC, Coppock, CCI)
//! - Trend indicators (ADX/DI, SuperTrend)
//! - Range helpers (true range, rolling extremes, mean absolute deviation)

pub mod momentum;
pub mod moving_average;
pub mod trend;
pub mod volatility;

pub use momentum::{
    AwesomeOscillator, Cci, CoppockCurve, Macd, MacdOutput, RateOfChange, Rsi, WilliamsR,
};
pub use moving_average::{ewm_mean, Ema, Sma, Smoothing, Wma};
pub use trend::{Adx, AdxOutput, Band, SuperTrend, SuperTrendOutput};
pub use volatility::{rolling_max, rolling_min, true_range, MeanAbsDeviation};
