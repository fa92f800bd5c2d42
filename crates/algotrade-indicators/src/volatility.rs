//! Volatility and range helpers.

use algotrade_core::error::IndicatorError;
use algotrade_core::traits::Indicator;
use algotrade_core::types::{Bar, DerivedSeries};

/// True range per bar: `max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// The first bar has no previous close and uses `high - low`.
pub fn true_range(bars: &[Bar]) -> DerivedSeries {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let prev_close = i.checked_sub(1).map(|p| bars[p].close);
            bar.true_range(prev_close)
        })
        .collect()
}

/// Trailing maximum over `period` values; undefined if the window holds `NaN`.
pub fn rolling_max(data: &[f64], period: usize) -> DerivedSeries {
    rolling(data, period, |window| {
        window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Trailing minimum over `period` values; undefined if the window holds `NaN`.
pub fn rolling_min(data: &[f64], period: usize) -> DerivedSeries {
    rolling(data, period, |window| {
        window.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

/// Apply `f` to every full trailing window, aligned to the window's last index.
fn rolling(data: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> DerivedSeries {
    let mut result = vec![f64::NAN; data.len()];
    if period == 0 {
        return result;
    }
    for (i, window) in data.windows(period).enumerate() {
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i + period - 1] = f(window);
    }
    result
}

/// Mean absolute deviation around the window mean.
#[derive(Debug, Clone)]
pub struct MeanAbsDeviation {
    period: usize,
}

impl MeanAbsDeviation {
    /// Create a new mean absolute deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for MeanAbsDeviation {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        let period_f64 = self.period as f64;
        Ok(rolling(data, self.period, |window| {
            let mean = window.iter().sum::<f64>() / period_f64;
            window.iter().map(|x| (x - mean).abs()).sum::<f64>() / period_f64
        }))
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &'static str {
        "MAD"
    }
}
