//! Moving average indicators and exponential smoothing.

use algotrade_core::error::IndicatorError;
use algotrade_core::traits::Indicator;
use algotrade_core::types::DerivedSeries;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values. Undefined for the
/// first `period - 1` positions and for any window containing `NaN`.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        let mut result = vec![f64::NAN; data.len()];
        let period_f64 = self.period as f64;

        // Sliding sum over defined values; a window with any NaN stays undefined
        let mut sum = 0.0;
        let mut undefined = 0usize;
        for (i, &value) in data.iter().enumerate() {
            if value.is_nan() {
                undefined += 1;
            } else {
                sum += value;
            }

            if i >= self.period {
                let leaving = data[i - self.period];
                if leaving.is_nan() {
                    undefined -= 1;
                } else {
                    sum -= leaving;
                }
            }

            if i + 1 >= self.period && undefined == 0 {
                result[i] = sum / period_f64;
            }
        }

        Ok(result)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &'static str {
        "SMA"
    }
}

/// How an exponentially weighted mean normalises its weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    /// `y[t] = (1 - a) * y[t-1] + a * x[t]`, seeded with the first value.
    Recursive,
    /// Weighted average of all observations so far with weights `(1 - a)^k`,
    /// divided by the weight sum.
    Adjusted,
}

/// Exponentially weighted mean with decay `alpha`.
///
/// Leading `NaN` values stay undefined; the mean starts at the first defined
/// value. Only leading gaps are supported: a `NaN` after that carries the
/// previous mean forward without decaying the adjusted weights.
pub fn ewm_mean(data: &[f64], alpha: f64, smoothing: Smoothing) -> DerivedSeries {
    debug_assert!(alpha > 0.0 && alpha <= 1.0);
    let decay = 1.0 - alpha;
    let mut result = vec![f64::NAN; data.len()];

    let mut mean: Option<f64> = None;
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &value) in data.iter().enumerate() {
        if value.is_nan() {
            if let Some(prev) = mean {
                result[i] = prev;
            }
            continue;
        }

        let next = match smoothing {
            Smoothing::Recursive => match mean {
                Some(prev) => decay * prev + alpha * value,
                None => value,
            },
            Smoothing::Adjusted => {
                numerator = value + decay * numerator;
                denominator = 1.0 + decay * denominator;
                numerator / denominator
            }
        };
        mean = Some(next);
        result[i] = next;
    }

    result
}

/// Exponential Moving Average (EMA).
///
/// Span-based decay `alpha = 2 / (span + 1)`, recursive form without bias
/// adjustment, seeded with the first value.
#[derive(Debug, Clone)]
pub struct Ema {
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        let multiplier = 2.0 / (span as f64 + 1.0);
        Self { multiplier }
    }
}

impl Indicator for Ema {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;
        Ok(ewm_mean(data, self.multiplier, Smoothing::Recursive))
    }

    /// The recursion yields a value from the first point; one point suffices.
    fn period(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "EMA"
    }
}

/// Weighted Moving Average (WMA).
///
/// Weights `1..=period`, the most recent value weighted highest.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    weights_sum: f64,
}

impl Wma {
    /// Create a new WMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        // Sum of weights: 1 + 2 + ... + n = n(n+1)/2
        let weights_sum = (period * (period + 1)) as f64 / 2.0;
        Self {
            period,
            weights_sum,
        }
    }
}

impl Indicator for Wma {
    type Output = DerivedSeries;

    fn calculate(&self, data: &[f64]) -> Result<DerivedSeries, IndicatorError> {
        self.validate_data(data)?;

        let mut result = vec![f64::NAN; data.len()];
        for (i, window) in data.windows(self.period).enumerate() {
            let weighted_sum: f64 = window
                .iter()
                .enumerate()
                .map(|(w, &price)| price * (w + 1) as f64)
                .sum();
            result[i + self.period - 1] = weighted_sum / self.weights_sum;
        }

        Ok(result)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &'static str {
        "WMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let result = sma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(result.len(), 5);
        assert!(result[0].is_nan() && result[1].is_nan());
        assert!((result[2] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4] - 4.0).abs() < 1e-10); // (3+4+5)/3
    }

    #[test]
    fn test_sma_recovers_after_nan_leaves_window() {
        let sma = Sma::new(2);
        let result = sma.calculate(&[f64::NAN, 2.0, 4.0, 6.0]).unwrap();

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 3.0).abs() < 1e-10);
        assert!((result[3] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let err = sma.calculate(&[1.0, 2.0, 3.0]).unwrap_err();

        assert!(matches!(
            err,
            IndicatorError::InsufficientData {
                indicator: "SMA",
                required: 5,
                available: 3
            }
        ));
    }

    #[test]
    fn test_ema_recursive() {
        let ema = Ema::new(3);
        let result = ema.calculate(&[1.0, 2.0, 3.0, 4.0]).unwrap();

        // mult = 2/(3+1) = 0.5, seeded with the first value
        assert!((result[0] - 1.0).abs() < 1e-10);
        assert!((result[1] - 1.5).abs() < 1e-10);
        assert!((result[2] - 2.25).abs() < 1e-10);
        assert!((result[3] - 3.125).abs() < 1e-10);
    }

    #[test]
    fn test_ewm_adjusted() {
        // alpha = 0.5: y1 = (2 + 0.5*1) / (1 + 0.5)
        let result = ewm_mean(&[1.0, 2.0], 0.5, Smoothing::Adjusted);
        assert!((result[0] - 1.0).abs() < 1e-10);
        assert!((result[1] - 2.5 / 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_ewm_skips_leading_nan() {
        let result = ewm_mean(&[f64::NAN, 4.0, 8.0], 0.5, Smoothing::Recursive);
        assert!(result[0].is_nan());
        assert!((result[1] - 4.0).abs() < 1e-10);
        assert!((result[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_wma() {
        let wma = Wma::new(3);
        let result = wma.calculate(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(result.len(), 5);
        // Weights: 1, 2, 3; sum = 6
        // (1*1 + 2*2 + 3*3) / 6 = 14/6
        assert!((result[2] - 14.0 / 6.0).abs() < 1e-10);
        // (2*1 + 3*2 + 4*3) / 6 = 20/6
        assert!((result[3] - 20.0 / 6.0).abs() < 1e-10);
    }
}
