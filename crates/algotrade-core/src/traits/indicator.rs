//! Indicator trait definitions.

use crate::error::IndicatorError;
use crate::types::Bar;

/// Indicator over a single price column.
///
/// Implementations return output aligned index-for-index with `data`, using
/// `NaN` for warm-up positions.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Result<Self::Output, IndicatorError>;

    /// Get the minimum data points required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &'static str;

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        ensure_len(self.name(), self.period(), data.len())
    }
}

/// Indicator that reads high, low and close of each bar.
pub trait BarIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values from bars.
    fn calculate(&self, bars: &[Bar]) -> Result<Self::Output, IndicatorError>;

    /// Get the minimum bars required.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &'static str;

    /// Validate that there's enough data.
    fn validate_bars(&self, bars: &[Bar]) -> Result<(), IndicatorError> {
        ensure_len(self.name(), self.period(), bars.len())
    }
}

fn ensure_len(indicator: &'static str, required: usize, available: usize) -> Result<(), IndicatorError> {
    if available < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available,
        });
    }
    Ok(())
}
