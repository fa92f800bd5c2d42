//! CSV data source.

use std::io::Read;
use std::path::{Path, PathBuf};

use algotrade_core::error::DataError;
use algotrade_core::types::{Bar, BarSeries, FillPolicy};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

const DATE_COLUMNS: [&str; 3] = ["date", "timestamp", "datetime"];
const CLOSE_COLUMNS: [&str; 2] = ["close", "adj close"];

/// Column positions resolved from the header row.
#[derive(Debug)]
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataError> {
        let names: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_ascii_lowercase())
            .collect();
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| names.iter().position(|n| n == c))
        };
        let require = |candidates: &[&str]| {
            find(candidates).ok_or_else(|| {
                DataError::ParseError(format!("missing column: {}", candidates.join("|")))
            })
        };

        Ok(Self {
            date: require(&DATE_COLUMNS)?,
            open: require(&["open"])?,
            high: require(&["high"])?,
            low: require(&["low"])?,
            close: require(&CLOSE_COLUMNS)?,
            volume: find(&["volume"]),
        })
    }
}

/// CSV data source for historical bars.
///
/// Empty or unparsable price cells are read as undefined and replaced with
/// the configured fill policy before the series is returned.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    path: PathBuf,
    fill: Option<FillPolicy>,
}

impl CsvDataSource {
    /// Create a new CSV data source; the file must exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::NoDataAvailable(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            fill: Some(FillPolicy::Mean),
        })
    }

    /// Set the policy for missing values; `None` keeps them undefined.
    pub fn with_fill(mut self, fill: Option<FillPolicy>) -> Self {
        self.fill = fill;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fill(&self) -> Option<FillPolicy> {
        self.fill
    }

    /// Load all bars from the file.
    pub fn load(&self, symbol: &str) -> Result<BarSeries, DataError> {
        let file = std::fs::File::open(&self.path)?;
        let series = read_bars(file, symbol, self.fill)?;
        debug!(
            "Loaded {} bars for {} from {}",
            series.len(),
            symbol,
            self.path.display()
        );
        Ok(series)
    }
}

/// Read bars from CSV input, sorted by timestamp.
pub fn read_bars<R: Read>(
    input: R,
    symbol: &str,
    fill: Option<FillPolicy>,
) -> Result<BarSeries, DataError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut bars = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let date = record.get(columns.date).unwrap_or_default();
        let timestamp = parse_timestamp(date)
            .map_err(|e| DataError::ParseError(format!("row {}: {}", row + 1, e)))?;

        let price = |index: usize| parse_price(record.get(index));
        bars.push(Bar::new(
            timestamp,
            price(columns.open),
            price(columns.high),
            price(columns.low),
            price(columns.close),
            columns.volume.map_or(0.0, price),
        ));
    }

    if bars.is_empty() {
        return Err(DataError::NoDataAvailable(symbol.to_string()));
    }

    bars.sort_by_key(|b| b.timestamp);
    if let Some(pair) = bars.windows(2).find(|p| p[0].timestamp == p[1].timestamp) {
        return Err(DataError::ParseError(format!(
            "duplicate timestamp {}",
            pair[0].timestamp
        )));
    }

    let incomplete = bars.iter().filter(|b| b.has_missing()).count();
    let mut series = BarSeries::from_bars(symbol, bars)?;
    match fill {
        Some(policy) => {
            series.fill_missing(policy);
        }
        None if incomplete > 0 => {
            warn!("{}: {} bars keep undefined values", symbol, incomplete);
        }
        None => {}
    }
    Ok(series)
}

/// Numeric cell; empty or malformed cells are undefined.
fn parse_price(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.parse::<f64>().ok()).unwrap_or(f64::NAN)
}

/// Parse a date or Unix timestamp into milliseconds since the epoch.
pub fn parse_timestamp(date_str: &str) -> Result<i64, String> {
    let date_str = date_str.trim();

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Unix timestamp; more than 10 digits means milliseconds
    if let Ok(ts) = date_str.parse::<i64>() {
        return Ok(if ts > 10_000_000_000 { ts } else { ts * 1000 });
    }

    Err(format!("could not parse date: {:?}", date_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), DAY_MS);
        assert_eq!(parse_timestamp("1970-01-01 00:00:01").unwrap(), 1000);
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000); // Unix ms
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_read_sorts_and_aliases_columns() {
        let data = "\
Date,Open,High,Low,Adj Close,Volume
2024-01-03,3,4,2,3.5,300
2024-01-02,2,3,1,2.5,200
";
        let series = read_bars(data.as_bytes(), "TEST", None).unwrap();

        assert_eq!(series.symbol, "TEST");
        assert_eq!(series.closes(), vec![2.5, 3.5]);
        assert_eq!(series.volumes(), vec![200.0, 300.0]);
        assert!(series.bars()[0].timestamp < series.bars()[1].timestamp);
    }

    #[test]
    fn test_close_preferred_over_adjusted() {
        let data = "timestamp,open,high,low,adj close,close\n1,1,1,1,9,2\n";
        let series = read_bars(data.as_bytes(), "TEST", None).unwrap();
        assert_eq!(series.closes(), vec![2.0]);
    }

    #[test]
    fn test_missing_cells_filled_with_mean() {
        let data = "\
date,open,high,low,close
2024-01-01,1,2,0.5,1
2024-01-02,2,3,1.5,
2024-01-03,3,4,2.5,5
";
        let series = read_bars(data.as_bytes(), "TEST", Some(FillPolicy::Mean)).unwrap();
        assert_eq!(series.closes(), vec![1.0, 3.0, 5.0]);
        // No volume column
        assert_eq!(series.volumes(), vec![0.0; 3]);

        let raw = read_bars(data.as_bytes(), "TEST", None).unwrap();
        assert!(raw.closes()[1].is_nan());
    }

    #[test]
    fn test_duplicate_timestamps_rejected() {
        let data = "date,open,high,low,close\n2024-01-01,1,1,1,1\n2024-01-01,2,2,2,2\n";
        assert!(matches!(
            read_bars(data.as_bytes(), "TEST", None),
            Err(DataError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_column_and_empty_input() {
        let no_close = "date,open,high,low\n2024-01-01,1,1,1\n";
        assert!(read_bars(no_close.as_bytes(), "TEST", None).is_err());

        let empty = "date,open,high,low,close\n";
        assert!(matches!(
            read_bars(empty.as_bytes(), "TEST", None),
            Err(DataError::NoDataAvailable(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CsvDataSource::new("/nonexistent/bars.csv"),
            Err(DataError::NoDataAvailable(_))
        ));
    }
}
