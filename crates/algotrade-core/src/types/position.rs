//! Held/flat position timeline.

use serde::{Deserialize, Serialize};

use super::Signal;

/// Exposure at one bar: all-in on the asset or entirely in cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Flat = 0,
    Held = 1,
}

impl Position {
    /// Position after `signal`, given the position on the previous bar.
    #[inline]
    pub fn after(self, signal: Signal) -> Position {
        match signal {
            Signal::Buy => Position::Held,
            Signal::Sell => Position::Flat,
            Signal::Hold => self,
        }
    }

    #[inline]
    pub fn is_held(self) -> bool {
        self == Position::Held
    }
}

/// Map a signal sequence to a position timeline.
///
/// `initial` is the position carried into index 0 when the first signal is
/// `Hold`.
pub fn positions_from_signals(signals: &[Signal], initial: Position) -> Vec<Position> {
    signals
        .iter()
        .scan(initial, |position, &signal| {
            *position = position.after(signal);
            Some(*position)
        })
        .collect()
}
