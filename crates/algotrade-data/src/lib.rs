//! Historical bar loading.

mod cache;
mod csv_source;

pub use cache::BarCache;
pub use csv_source::{parse_timestamp, read_bars, CsvDataSource};

use std::path::Path;

use algotrade_core::error::DataError;
use algotrade_core::types::{BarSeries, FillPolicy};

/// Load bars from a CSV file, filling missing values with `fill`.
pub fn load_csv(
    path: impl AsRef<Path>,
    symbol: &str,
    fill: Option<FillPolicy>,
) -> Result<BarSeries, DataError> {
    CsvDataSource::new(path)?.with_fill(fill).load(symbol)
}
