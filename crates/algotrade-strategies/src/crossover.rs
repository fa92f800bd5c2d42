//! Edge-triggered signal detection shared by every strategy.
//!
//! A strategy supplies a pair of predicates over bar indices; the detector
//! walks the bars and latches the last direction fired so that a condition
//! holding over several bars produces a single signal.

use algotrade_core::types::Signal;

/// Latched crossover detector.
#[derive(Debug, Clone, Copy)]
pub struct CrossoverDetector {
    seed: Signal,
    warmup: usize,
}

impl CrossoverDetector {
    /// Detector that starts unlatched and evaluates from the first bar.
    pub fn new() -> Self {
        Self {
            seed: Signal::Hold,
            warmup: 0,
        }
    }

    /// Detector for predicates that read the previous bar.
    pub fn with_lookback(bars: usize) -> Self {
        Self::new().warmup(bars)
    }

    /// Emit `seed` at index 0 and start latched in its direction.
    pub fn seeded(mut self, seed: Signal) -> Self {
        self.seed = seed;
        if seed.is_trigger() {
            self.warmup = self.warmup.max(1);
        }
        self
    }

    /// Force `Hold` on the first `bars` indices.
    pub fn warmup(mut self, bars: usize) -> Self {
        self.warmup = bars;
        self
    }

    /// Number of leading indices that never evaluate the predicates.
    pub fn warmup_len(&self) -> usize {
        self.warmup
    }

    /// Produce one signal per index in `0..len`.
    ///
    /// `enter_long` takes precedence: when it holds while already latched
    /// long the bar is `Hold` and `enter_short` is not consulted.
    pub fn detect<L, S>(&self, len: usize, enter_long: L, enter_short: S) -> Vec<Signal>
    where
        L: Fn(usize) -> bool,
        S: Fn(usize) -> bool,
    {
        let mut latch = self.seed;

        (0..len)
            .map(|i| {
                if i < self.warmup {
                    return if i == 0 { self.seed } else { Signal::Hold };
                }

                let wanted = if enter_long(i) {
                    Signal::Buy
                } else if enter_short(i) {
                    Signal::Sell
                } else {
                    return Signal::Hold;
                };

                if latch == wanted {
                    Signal::Hold
                } else {
                    latch = wanted;
                    wanted
                }
            })
            .collect()
    }
}

impl Default for CrossoverDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// `prev` at or below `level` and `cur` strictly above it.
#[inline]
pub fn crosses_above(prev: f64, cur: f64, level: f64) -> bool {
    prev <= level && cur > level
}

/// `prev` at or above `level` and `cur` strictly below it.
#[inline]
pub fn crosses_below(prev: f64, cur: f64, level: f64) -> bool {
    prev >= level && cur < level
}

/// `prev` strictly below `level` and `cur` strictly above it.
#[inline]
pub fn strictly_crosses_above(prev: f64, cur: f64, level: f64) -> bool {
    prev < level && cur > level
}

/// `prev` strictly above `level` and `cur` strictly below it.
#[inline]
pub fn strictly_crosses_below(prev: f64, cur: f64, level: f64) -> bool {
    prev > level && cur < level
}
