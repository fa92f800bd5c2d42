//! Trend strength and trend-following bands.

use algotrade_core::error::IndicatorError;
use algotrade_core::traits::{BarIndicator, Indicator};
use algotrade_core::types::{Bar, DerivedSeries};
use serde::{Deserialize, Serialize};

use crate::moving_average::{ewm_mean, Sma, Smoothing};
use crate::volatility::true_range;

/// Directional indicator lines and the smoothed ADX.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdxOutput {
    pub plus_di: DerivedSeries,
    pub minus_di: DerivedSeries,
    pub adx: DerivedSeries,
}

/// Average Directional Index with +DI / -DI.
///
/// Directional movement is smoothed with an exponential mean of decay
/// `1 / lookback` and scaled by a simple-average true range. A zero true
/// range or a zero DI sum clamps the affected value to 0.
#[derive(Debug, Clone)]
pub struct Adx {
    lookback: usize,
}

impl Adx {
    pub fn new(lookback: usize) -> Self {
        assert!(lookback > 0, "Lookback must be greater than 0");
        Self { lookback }
    }
}

impl BarIndicator for Adx {
    type Output = AdxOutput;

    fn calculate(&self, bars: &[Bar]) -> Result<AdxOutput, IndicatorError> {
        self.validate_bars(bars)?;

        let n = bars.len();
        let lookback = self.lookback as f64;
        let alpha = 1.0 / lookback;

        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let up = bars[i].high - bars[i - 1].high;
            let down = bars[i].low - bars[i - 1].low;
            plus_dm[i] = up.max(0.0);
            minus_dm[i] = if down > 0.0 { 0.0 } else { down };
        }

        let atr = Sma::new(self.lookback).calculate(&true_range(bars))?;
        let plus_smooth = ewm_mean(&plus_dm, alpha, Smoothing::Adjusted);
        let minus_smooth = ewm_mean(&minus_dm, alpha, Smoothing::Adjusted);

        let scale = |smoothed: f64, atr: f64| {
            if atr == 0.0 {
                0.0
            } else {
                (100.0 * smoothed / atr).abs()
            }
        };
        let plus_di: DerivedSeries = (0..n).map(|i| scale(plus_smooth[i], atr[i])).collect();
        let minus_di: DerivedSeries = (0..n).map(|i| scale(minus_smooth[i], atr[i])).collect();

        let dx: DerivedSeries = plus_di
            .iter()
            .zip(&minus_di)
            .map(|(p, m)| {
                let sum = (p + m).abs();
                if sum == 0.0 {
                    0.0
                } else {
                    (p - m).abs() / sum * 100.0
                }
            })
            .collect();

        // One-bar-lagged blend of DX before the final smoothing
        let mut blended = vec![f64::NAN; n];
        for i in 1..n {
            blended[i] = (dx[i - 1] * (lookback - 1.0) + dx[i]) / lookback;
        }
        let adx = ewm_mean(&blended, alpha, Smoothing::Adjusted);

        Ok(AdxOutput {
            plus_di,
            minus_di,
            adx,
        })
    }

    fn period(&self) -> usize {
        self.lookback + 1
    }

    fn name(&self) -> &'static str {
        "ADX"
    }
}

/// Which final band the SuperTrend line currently follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Upper,
    Lower,
}

/// SuperTrend line with the final bands it switches between.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuperTrendOutput {
    /// Active band per bar; undefined at index 0.
    pub line: DerivedSeries,
    pub upper: DerivedSeries,
    pub lower: DerivedSeries,
}

/// SuperTrend.
///
/// Basic bands are `(high + low) / 2 +/- multiplier * ATR`, where ATR is an
/// exponential mean of true range with center of mass `lookback`.
#[derive(Debug, Clone)]
pub struct SuperTrend {
    lookback: usize,
    multiplier: f64,
}

impl SuperTrend {
    pub fn new(lookback: usize, multiplier: f64) -> Self {
        assert!(lookback > 0, "Lookback must be greater than 0");
        Self {
            lookback,
            multiplier,
        }
    }
}

impl BarIndicator for SuperTrend {
    type Output = SuperTrendOutput;

    fn calculate(&self, bars: &[Bar]) -> Result<SuperTrendOutput, IndicatorError> {
        self.validate_bars(bars)?;
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "multiplier must be positive, got {}",
                self.multiplier
            )));
        }

        let alpha = 1.0 / (1.0 + self.lookback as f64);
        let atr = ewm_mean(&true_range(bars), alpha, Smoothing::Adjusted);

        let (basic_upper, basic_lower): (Vec<f64>, Vec<f64>) = bars
            .iter()
            .zip(&atr)
            .map(|(bar, atr)| {
                let mid = bar.median_price();
                (mid + self.multiplier * atr, mid - self.multiplier * atr)
            })
            .unzip();

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let (upper, lower) = ratchet_bands(&basic_upper, &basic_lower, &closes);
        let line = trend_line(&upper, &lower, &closes);

        Ok(SuperTrendOutput { line, upper, lower })
    }

    fn period(&self) -> usize {
        self.lookback + 1
    }

    fn name(&self) -> &'static str {
        "SuperTrend"
    }
}

/// Final bands from the basic bands.
///
/// Both bands start at 0. The upper band takes the new basic value when that
/// value is lower or the previous close broke above the band, otherwise it
/// stays frozen; the lower band mirrors this.
pub fn ratchet_bands(
    basic_upper: &[f64],
    basic_lower: &[f64],
    closes: &[f64],
) -> (DerivedSeries, DerivedSeries) {
    let n = closes.len();
    let mut upper = vec![0.0; n];
    let mut lower = vec![0.0; n];

    for i in 1..n {
        upper[i] = if basic_upper[i] < upper[i - 1] || closes[i - 1] > upper[i - 1] {
            basic_upper[i]
        } else {
            upper[i - 1]
        };
        lower[i] = if basic_lower[i] > lower[i - 1] || closes[i - 1] < lower[i - 1] {
            basic_lower[i]
        } else {
            lower[i - 1]
        };
    }

    (upper, lower)
}

/// Trend line switching between the final bands.
///
/// Starts on the upper band. A close above the upper band flips to the lower
/// band and a close below the lower band flips back. A close exactly on the
/// active band keeps it.
pub fn trend_line(upper: &[f64], lower: &[f64], closes: &[f64]) -> DerivedSeries {
    let mut line = vec![f64::NAN; closes.len()];
    let mut band = Band::Upper;

    for i in 1..closes.len() {
        band = match band {
            Band::Upper if closes[i] > upper[i] => Band::Lower,
            Band::Lower if closes[i] < lower[i] => Band::Upper,
            current => current,
        };
        line[i] = match band {
            Band::Upper => upper[i],
            Band::Lower => lower[i],
        };
    }

    line
}
