//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-bar strategy output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Sell = -1,
    #[default]
    Hold = 0,
    Buy = 1,
}

impl Signal {
    /// Numeric direction: 1, 0 or -1.
    #[inline]
    pub fn direction(self) -> i8 {
        self as i8
    }

    /// Whether this signal changes the latched direction.
    #[inline]
    pub fn is_trigger(self) -> bool {
        self != Signal::Hold
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.direction()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(format!("signal must be -1, 0 or 1, got {other}")),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Buy => write!(f, "BUY"),
        }
    }
}

/// Strategy output: signals zipped with the closes they were computed at.
///
/// The three vectors always have equal length. A strategy may drop leading
/// bars, so the length can be shorter than the input series; consumers must
/// iterate the fields pairwise rather than index back into the bars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSeries {
    pub signals: Vec<Signal>,
    pub closes: Vec<f64>,
    pub timestamps: Vec<i64>,
}

impl SignalSeries {
    /// Assemble a series; panics if the vectors differ in length.
    pub fn new(signals: Vec<Signal>, closes: Vec<f64>, timestamps: Vec<i64>) -> Self {
        assert_eq!(signals.len(), closes.len(), "signals and closes must align");
        assert_eq!(closes.len(), timestamps.len(), "closes and timestamps must align");
        Self {
            signals,
            closes,
            timestamps,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Iterate `(signal, close)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Signal, f64)> + '_ {
        self.signals.iter().copied().zip(self.closes.iter().copied())
    }

    /// Count of non-Hold signals.
    pub fn trigger_count(&self) -> usize {
        self.signals.iter().filter(|s| s.is_trigger()).count()
    }
}
