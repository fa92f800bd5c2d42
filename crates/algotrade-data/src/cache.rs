//! Bar series caching.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use algotrade_core::error::DataError;
use algotrade_core::types::BarSeries;
use tracing::debug;

use crate::csv_source::CsvDataSource;

struct CachedSeries {
    modified: SystemTime,
    series: BarSeries,
}

/// In-memory cache of loaded series keyed by `(symbol, source path)`.
///
/// An entry is reloaded when the source file's modification time changes.
#[derive(Default)]
pub struct BarCache {
    entries: HashMap<(String, PathBuf), CachedSeries>,
}

impl BarCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the series for `symbol` from `source`, loading it on a miss or
    /// when the file changed since it was cached.
    pub fn get_or_load(
        &mut self,
        symbol: &str,
        source: &CsvDataSource,
    ) -> Result<&BarSeries, DataError> {
        let modified = std::fs::metadata(source.path())?.modified()?;
        let key = (symbol.to_string(), source.path().to_path_buf());

        let cached = match self.entries.entry(key) {
            Entry::Occupied(mut entry) => {
                if entry.get().modified != modified {
                    debug!("Reloading {} from {}", symbol, source.path().display());
                    entry.insert(CachedSeries {
                        modified,
                        series: source.load(symbol)?,
                    });
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(CachedSeries {
                modified,
                series: source.load(symbol)?,
            }),
        };

        Ok(&cached.series)
    }

    /// Check whether a series is cached, regardless of freshness.
    pub fn contains(&self, symbol: &str, source: &CsvDataSource) -> bool {
        self.entries
            .contains_key(&(symbol.to_string(), source.path().to_path_buf()))
    }

    /// Drop every cached series for a symbol.
    pub fn invalidate(&mut self, symbol: &str) {
        self.entries.retain(|(s, _), _| s != symbol);
    }

    /// Clear all cached data.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
