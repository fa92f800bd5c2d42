//! Momentum oscillators.

use algotrade_core::error::IndicatorError;
use algotrade_core::traits::{BarIndicator, Indicator};
use algotrade_core::types::{Bar, DerivedSeries};
use serde::{Deserialize, Serialize};

use crate::moving_average::{ewm_mean, Ema, Sma, Smoothing, Wma};
use crate::volatility::{rolling_max, rolling_min, MeanAbsDeviation};

/// MACD lines, each aligned with the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: DerivedSeries,
    /// Signal line (EMA of MACD)
    pub signal: DerivedSeries,
    /// Histogram (MACD - Signal)
    pub histogram: DerivedSeries,
}

/// MACD indicator.
///
/// Uses two EMAs to identify trend direction and momentum.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, data: &[f64]) -> Result<MacdOutput, IndicatorError> {
        self.validate_data(data)?;

        let fast = Ema::new(self.fast_period).calculate(data)?;
        let slow = Ema::new(self.slow_period).calculate(data)?;
        let macd: DerivedSeries = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = Ema::new(self.signal_period).calculate(&macd)?;
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        Ok(MacdOutput {
            macd,
            signal,
            histogram,
        })
    }

    fn period(&self) -> usize {
        self.slow_period
    }

    fn name(&self) -> &'static str {
        "MACD"
    }
}

/// Relative Strength Index (RSI).
///
/// Gains and losses are smoothed separately with an exponential mean of
/// center of mass `period - 1`. The first defined value and the two after it
/// are discarded, so output starts at index 4.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Defined RSI values discarded as unreliable.
    pub const UNRELIABLE_LEADING: usize = 3;

    /// Create a new RSI indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Index of the first RSI value that is reported.
    pub fn first_defined() -> usize {
        1 + Self::UNRELIABLE_LEADING
    }
}

impl Indicator for Rsi {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        // The loss mean starts on the first bar at 0, the gain mean one bar later
        let mut gains = vec![f64::NAN; data.len()];
        let mut losses = vec![f64::NAN; data.len()];
        losses[0] = 0.0;
        for i in 1..data.len() {
            let change = data[i] - data[i - 1];
            if change < 0.0 {
                gains[i] = 0.0;
                losses[i] = -change;
            } else {
                gains[i] = change;
                losses[i] = 0.0;
            }
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gains = ewm_mean(&gains, alpha, Smoothing::Recursive);
        let avg_losses = ewm_mean(&losses, alpha, Smoothing::Recursive);

        let mut result: DerivedSeries = avg_gains
            .iter()
            .zip(&avg_losses)
            .map(|(&gain, &loss)| {
                if gain.is_nan() || loss.is_nan() {
                    f64::NAN
                } else if loss == 0.0 {
                    // No losses: saturate, or stay neutral on a flat window
                    if gain == 0.0 {
                        50.0
                    } else {
                        100.0
                    }
                } else {
                    100.0 - (100.0 / (1.0 + gain / loss))
                }
            })
            .collect();

        let cut = Self::first_defined().min(result.len());
        result[..cut].fill(f64::NAN);
        Ok(result)
    }

    fn period(&self) -> usize {
        (self.period + 1).max(Self::first_defined() + 1)
    }

    fn name(&self) -> &'static str {
        "RSI"
    }
}

/// Williams %R.
///
/// `-100 * (highest_high - close) / (highest_high - lowest_low)` over the
/// trailing `lookback` bars. A window whose high and low coincide has no
/// defined value and fails the calculation.
#[derive(Debug, Clone)]
pub struct WilliamsR {
    lookback: usize,
}

impl WilliamsR {
    /// Create a new Williams %R indicator.
    pub fn new(lookback: usize) -> Self {
        assert!(lookback > 0, "Lookback must be greater than 0");
        Self { lookback }
    }
}

impl BarIndicator for WilliamsR {
    type Output = DerivedSeries;

    fn calculate(&self, bars: &[Bar]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_bars(bars)?;

        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highest = rolling_max(&highs, self.lookback);
        let lowest = rolling_min(&lows, self.lookback);

        bars.iter()
            .enumerate()
            .map(|(i, bar)| {
                let range = highest[i] - lowest[i];
                if range == 0.0 {
                    return Err(IndicatorError::DivisionDomain {
                        indicator: self.name(),
                        index: i,
                        detail: "highest high equals lowest low",
                    });
                }
                Ok(-100.0 * (highest[i] - bar.close) / range)
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.lookback
    }

    fn name(&self) -> &'static str {
        "Williams %R"
    }
}

/// Rate of change in percent: `(x[t] - x[t-n]) / x[t-n] * 100`.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    period: usize,
}

impl RateOfChange {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for RateOfChange {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        let mut result = vec![f64::NAN; data.len()];
        for i in self.period..data.len() {
            let base = data[i - self.period];
            if base == 0.0 {
                return Err(IndicatorError::DivisionDomain {
                    indicator: self.name(),
                    index: i,
                    detail: "reference price is zero",
                });
            }
            result[i] = (data[i] - base) / base * 100.0;
        }
        Ok(result)
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &'static str {
        "ROC"
    }
}

/// Coppock Curve: WMA of the sum of a short and a long rate of change.
#[derive(Debug, Clone)]
pub struct CoppockCurve {
    short_roc: usize,
    long_roc: usize,
    wma_lookback: usize,
}

impl CoppockCurve {
    pub fn new(short_roc: usize, long_roc: usize, wma_lookback: usize) -> Self {
        assert!(short_roc > 0 && long_roc > 0 && wma_lookback > 0);
        Self {
            short_roc,
            long_roc,
            wma_lookback,
        }
    }
}

impl Indicator for CoppockCurve {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        let short = RateOfChange::new(self.short_roc).calculate(data)?;
        let long = RateOfChange::new(self.long_roc).calculate(data)?;
        let combined: DerivedSeries = long.iter().zip(&short).map(|(l, s)| l + s).collect();
        Wma::new(self.wma_lookback).calculate(&combined)
    }

    /// First defined value needs the longer ROC plus a full WMA window.
    fn period(&self) -> usize {
        self.short_roc.max(self.long_roc) + self.wma_lookback
    }

    fn name(&self) -> &'static str {
        "Coppock Curve"
    }
}

/// Awesome-Oscillator-style momentum: difference of two SMAs of the
/// two-bar median close.
#[derive(Debug, Clone)]
pub struct AwesomeOscillator {
    short_period: usize,
    long_period: usize,
}

impl AwesomeOscillator {
    pub fn new(short_period: usize, long_period: usize) -> Self {
        assert!(short_period > 0 && long_period > 0);
        Self {
            short_period,
            long_period,
        }
    }
}

impl Indicator for AwesomeOscillator {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        // Median of two values is their mean
        let mut median = vec![f64::NAN; data.len()];
        for i in 1..data.len() {
            median[i] = (data[i - 1] + data[i]) / 2.0;
        }

        let short = Sma::new(self.short_period).calculate(&median)?;
        let long = Sma::new(self.long_period).calculate(&median)?;
        Ok(short.iter().zip(&long).map(|(s, l)| s - l).collect())
    }

    fn period(&self) -> usize {
        self.short_period.max(self.long_period) + 1
    }

    fn name(&self) -> &'static str {
        "Awesome Oscillator"
    }
}

/// Commodity Channel Index.
///
/// `(typical - SMA(typical)) / (0.015 * MAD(close))` where the deviation term
/// is taken over closes. A zero deviation fails the calculation.
#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
}

impl Cci {
    /// Lambert's scaling constant.
    pub const SCALE: f64 = 0.015;

    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl BarIndicator for Cci {
    type Output = DerivedSeries;

    fn calculate(&self, bars: &[Bar]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_bars(bars)?;

        let typical: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let typical_sma = Sma::new(self.period).calculate(&typical)?;
        let deviation = MeanAbsDeviation::new(self.period).calculate(&closes)?;

        typical
            .iter()
            .enumerate()
            .map(|(i, tp)| {
                if deviation[i] == 0.0 {
                    return Err(IndicatorError::DivisionDomain {
                        indicator: self.name(),
                        index: i,
                        detail: "mean absolute deviation is zero",
                    });
                }
                Ok((tp - typical_sma[i]) / (Self::SCALE * deviation[i]))
            })
            .collect()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &'static str {
        "CCI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c, c, c, 1000.0))
            .collect()
    }

    fn ranged_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as i64, c, c + 1.0, c - 1.0, c, 1000.0))
            .collect()
    }

    #[test]
    fn test_macd_uptrend() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let result = macd.calculate(&data).unwrap();

        assert_eq!(result.macd.len(), 50);
        // Seeded EMAs coincide at the first bar
        assert!(result.macd[0].abs() < 1e-10);
        // In an uptrend, MACD should be positive and above its signal
        assert!(*result.macd.last().unwrap() > 0.0);
        assert!(*result.histogram.last().unwrap() > 0.0);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let macd = Macd::with_periods(3, 6, 2);
        let data = [10.0, 11.0, 9.0, 12.0, 13.0, 12.5, 14.0, 11.0];
        let result = macd.calculate(&data).unwrap();

        for i in 0..data.len() {
            assert!((result.histogram[i] - (result.macd[i] - result.signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rsi_bounds_and_warmup() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data).unwrap();
        assert_eq!(result.len(), 30);
        assert!(result[..4].iter().all(|v| v.is_nan()));
        for value in &result[4..] {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_and_all_losses() {
        let rsi = Rsi::new(5);
        let up = rsi.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert!((up[4] - 100.0).abs() < 1e-10);

        let down = rsi.calculate(&[7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!(down[4].abs() < 1e-10);

        let flat = rsi.calculate(&[5.0; 7]).unwrap();
        assert!((flat[6] - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_exponential_means() {
        // period 2 => alpha 0.5; changes: +2, -2, +2, +2
        let rsi = Rsi::new(2);
        let result = rsi.calculate(&[10.0, 12.0, 10.0, 12.0, 14.0]).unwrap();

        // gains: 2, 1, 1.5, 1.75 ; losses: 0, 1, 0.5, 0.25
        let expected = 100.0 - 100.0 / (1.0 + 1.75 / 0.25);
        assert!((result[4] - expected).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_loss_mean_starts_on_first_bar() {
        // period 2 => alpha 0.5; changes: -2, +1, +1, -1, +1, +1
        let rsi = Rsi::new(2);
        let result = rsi
            .calculate(&[10.0, 8.0, 9.0, 10.0, 9.0, 10.0, 11.0])
            .unwrap();

        // gains from bar 1: 0, 0.5, 0.75, 0.375, 0.6875, 0.84375
        // losses from bar 0: 0, 1, 0.5, 0.25, 0.625, 0.3125, 0.15625
        assert!((result[4] - 37.5).abs() < 1e-10);
        assert!((result[5] - 68.75).abs() < 1e-10);
        assert!((result[6] - 84.375).abs() < 1e-10);
    }

    #[test]
    fn test_williams_r() {
        let wr = WilliamsR::new(3);
        let bars = ranged_bars(&[10.0, 11.0, 12.0, 11.0, 10.0]);
        let result = wr.calculate(&bars).unwrap();

        assert!(result[1].is_nan());
        // window 0..=2: hh = 13, ll = 9, close 12 => -100 * 1 / 4
        assert!((result[2] + 25.0).abs() < 1e-10);
        // window 2..=4: hh = 13, ll = 9, close 10 => -100 * 3 / 4
        assert!((result[4] + 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_williams_r_zero_range_fails() {
        let wr = WilliamsR::new(3);
        let err = wr.calculate(&flat_bars(&[5.0, 5.0, 5.0, 5.0])).unwrap_err();

        assert!(matches!(
            err,
            IndicatorError::DivisionDomain {
                indicator: "Williams %R",
                index: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_rate_of_change() {
        let roc = RateOfChange::new(2);
        let result = roc.calculate(&[100.0, 105.0, 110.0, 99.0]).unwrap();

        assert!(result[1].is_nan());
        assert!((result[2] - 10.0).abs() < 1e-10);
        assert!((result[3] + 5.714285714285714).abs() < 1e-9);

        assert!(roc.calculate(&[0.0, 1.0, 2.0]).is_err());
    }

    #[test]
    fn test_coppock_warmup_alignment() {
        let cc = CoppockCurve::new(2, 3, 2);
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let result = cc.calculate(&data).unwrap();

        assert_eq!(result.len(), 10);
        // Longer ROC defined from index 3, WMA of 2 from index 4
        assert!(result[3].is_nan());
        assert!(result[4].is_finite());
        assert!(result[4] > 0.0);
    }

    #[test]
    fn test_awesome_oscillator() {
        let ao = AwesomeOscillator::new(2, 3);
        let result = ao.calculate(&[1.0, 3.0, 5.0, 7.0, 9.0]).unwrap();

        // medians: _, 2, 4, 6, 8
        assert!(result[2].is_nan());
        // short = (4+6)/2 = 5 ; long = (2+4+6)/3 = 4
        assert!((result[3] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cci() {
        let cci = Cci::new(3);
        let bars = ranged_bars(&[10.0, 11.0, 12.0, 13.0]);
        let result = cci.calculate(&bars).unwrap();

        // typical == close for symmetric ranges; window 1..=3 mean 12, MAD 2/3
        let expected = (13.0 - 12.0) / (0.015 * (2.0 / 3.0));
        assert!((result[3] - expected).abs() < 1e-9);
        assert!(result[1].is_nan());
    }

    #[test]
    fn test_cci_zero_deviation_fails() {
        let cci = Cci::new(3);
        let err = cci.calculate(&ranged_bars(&[10.0, 10.0, 10.0])).unwrap_err();
        assert!(matches!(err, IndicatorError::DivisionDomain { index: 2, .. }));
    }
}
