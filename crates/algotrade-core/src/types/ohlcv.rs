//! OHLCV (Open, High, Low, Close, Volume) data types.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::FillPolicy;
use crate::error::DataError;

/// One OHLCV observation.
///
/// Prices are `f64` for fast indicator calculations. A missing value handed
/// over by the data layer is carried as `NaN` until
/// [`BarSeries::fill_missing`] replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Midpoint of the bar's range.
    #[inline]
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Calculate the true range against the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Whether any price or volume field is undefined.
    pub fn has_missing(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .any(|v| v.is_nan())
    }
}

/// Ordered, index-aligned sequence of bars for one symbol.
///
/// Timestamps are strictly increasing; every derived series computed from a
/// `BarSeries` has the same length and index alignment.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create a new empty bar series.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    /// Build a series from bars, rejecting non-increasing timestamps.
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        if let Some(index) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DataError::Unordered {
                index: index + 1,
                previous: bars[index].timestamp,
                current: bars[index + 1].timestamp,
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Append a bar; its timestamp must follow the last one.
    pub fn push(&mut self, bar: Bar) -> Result<(), DataError> {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return Err(DataError::Unordered {
                    index: self.bars.len(),
                    previous: last.timestamp,
                    current: bar.timestamp,
                });
            }
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get all bars as a slice.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Extract close prices as a vector.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Extract volumes as a vector.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Extract timestamps as a vector.
    pub fn timestamps(&self) -> Vec<i64> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// Replace undefined prices and volumes column by column.
    ///
    /// Returns the number of cells that were filled.
    pub fn fill_missing(&mut self, policy: FillPolicy) -> usize {
        let columns: [fn(&mut Bar) -> &mut f64; 5] = [
            |b| &mut b.open,
            |b| &mut b.high,
            |b| &mut b.low,
            |b| &mut b.close,
            |b| &mut b.volume,
        ];

        let mut filled = 0;
        for column in columns {
            let mut values: Vec<f64> = self.bars.iter_mut().map(|b| *column(b)).collect();
            let count = policy.apply(&mut values);
            if count > 0 {
                for (bar, value) in self.bars.iter_mut().zip(values) {
                    *column(bar) = value;
                }
                filled += count;
            }
        }

        if filled > 0 {
            warn!(symbol = %self.symbol, filled, ?policy, "Filled missing bar values");
        }
        filled
    }

    /// Get an iterator over the bars.
    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }
}

impl FromIterator<Bar> for BarSeries {
    /// Collect bars without order validation; use [`BarSeries::from_bars`]
    /// for untrusted input.
    fn from_iter<T: IntoIterator<Item = Bar>>(iter: T) -> Self {
        Self {
            symbol: String::new(),
            bars: iter.into_iter().collect(),
        }
    }
}
