//! CSV file price adapter: one `<SYMBOL>.csv` per symbol in a directory.
//!
//! Header `date,open,high,low,close,volume` (any case). Only `date` and
//! `close` are needed; the other columns may be missing or empty.

use crate::domain::error::HorizonError;
use crate::domain::price::{normalize_series, PriceBar};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, HorizonError> {
        let dir = config
            .get_string("data", "csv_dir")
            .ok_or_else(|| HorizonError::ConfigMissing {
                section: "data".into(),
                key: "csv_dir".into(),
            })?;
        Ok(Self::new(PathBuf::from(dir)))
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.{}", symbol.to_uppercase(), EXTENSION))
    }

    fn load(&self, symbol: &str) -> Result<Option<Vec<PriceBar>>, HorizonError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            debug!("no price file at {}", path.display());
            return Ok(None);
        }
        read_price_file(&path).map(Some)
    }
}

/// Reads and normalizes a whole price file: unusable closes dropped, dates
/// ascending, duplicate dates collapsed to the last row.
pub fn read_price_file(path: &Path) -> Result<Vec<PriceBar>, HorizonError> {
    let file = fs::File::open(path).map_err(|e| HorizonError::Database {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    let mut bars = read_prices(file, &path.display().to_string())?;
    let dropped = normalize_series(&mut bars);
    if dropped > 0 {
        warn!(
            "{}: dropped {} rows with unusable closes or duplicate dates",
            path.display(),
            dropped
        );
    }
    Ok(bars)
}

fn read_prices<R: Read>(reader: R, origin: &str) -> Result<Vec<PriceBar>, HorizonError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|e| HorizonError::Database {
        reason: format!("{origin}: CSV header error: {e}"),
    })?;
    let lowered: csv::StringRecord = headers.iter().map(|h| h.to_lowercase()).collect();
    rdr.set_headers(lowered);

    let mut bars = Vec::new();
    let mut missing_close = 0usize;
    for result in rdr.deserialize::<CsvRow>() {
        let row = result.map_err(|e| HorizonError::Database {
            reason: format!("{origin}: CSV parse error: {e}"),
        })?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            HorizonError::Database {
                reason: format!("{origin}: invalid date '{}': {}", row.date, e),
            }
        })?;

        let Some(close) = row.close else {
            missing_close += 1;
            continue;
        };

        bars.push(PriceBar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close,
            volume: row.volume,
        });
    }

    if missing_close > 0 {
        warn!("{origin}: skipped {missing_close} rows without a close");
    }
    Ok(bars)
}

impl PricePort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError> {
        let bars = self.load(symbol)?.unwrap_or_default();
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| HorizonError::Database {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HorizonError::Database {
                reason: format!("directory entry error: {}", e),
            })?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(EXTENSION));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                symbols.push(stem.to_string_lossy().to_uppercase());
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError> {
        let Some(bars) = self.load(symbol)? else {
            return Ok(None);
        };
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, bars.len())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n";

        fs::write(path.join("SPY.csv"), csv_content).unwrap();
        fs::write(path.join("QQQ.csv"), "date,open,high,low,close,volume\n").unwrap();
        fs::write(path.join("notes.txt"), "not prices").unwrap();

        (dir, path)
    }

    #[test]
    fn fetch_prices_returns_correct_data() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_prices("SPY", d(1, 15), d(1, 17)).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, d(1, 15));
        assert_eq!(bars[0].open, Some(100.0));
        assert_eq!(bars[0].high, Some(110.0));
        assert_eq!(bars[0].low, Some(90.0));
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, Some(50_000.0));
    }

    #[test]
    fn fetch_prices_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_prices("spy", d(1, 16), d(1, 16)).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, d(1, 16));
    }

    #[test]
    fn fetch_prices_empty_for_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        let bars = adapter.fetch_prices("XYZ", d(1, 1), d(1, 31)).unwrap();
        assert!(bars.is_empty());
        assert!(adapter.get_data_range("XYZ").unwrap().is_none());
    }

    #[test]
    fn close_only_file_with_capitalized_header() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ABC.csv"),
            "Date,Close\n2024-01-03,12.5\n2024-01-02,12.0\n",
        )
        .unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_prices("ABC", d(1, 1), d(1, 31)).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, d(1, 2));
        assert_eq!(bars[0].open, None);
        assert_eq!(bars[1].close, 12.5);
    }

    #[test]
    fn unusable_rows_are_dropped() {
        let dir = TempDir::new().unwrap();
        let content = "date,open,high,low,close,volume\n\
            2024-01-02,,,,10.0,\n\
            2024-01-03,1,1,1,,100\n\
            2024-01-04,1,1,1,0,100\n\
            2024-01-05,1,1,1,-3,100\n\
            2024-01-08,1,1,1,n/a,100\n\
            2024-01-09,1,1,1,11.0,100\n\
            2024-01-09,1,1,1,11.5,100\n";
        fs::write(dir.path().join("BAD.csv"), content).unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let bars = adapter.fetch_prices("BAD", d(1, 1), d(1, 31)).unwrap();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 11.5]);
        assert_eq!(bars[0].volume, None);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ERR.csv"), "date,close\n01/02/2024,10\n").unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.fetch_prices("ERR", d(1, 1), d(1, 31)).unwrap_err();
        assert!(matches!(err, HorizonError::Database { .. }));
    }

    #[test]
    fn list_symbols_returns_csv_stems() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(adapter.list_symbols().unwrap(), vec!["QQQ", "SPY"]);
    }

    #[test]
    fn data_range_spans_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path);

        assert_eq!(
            adapter.get_data_range("SPY").unwrap(),
            Some((d(1, 15), d(1, 17), 3))
        );
        assert_eq!(adapter.get_data_range("QQQ").unwrap(), None);
    }

    #[test]
    fn from_config_requires_dir() {
        let config =
            crate::adapters::file_config_adapter::FileConfigAdapter::from_string("[data]\nsource = csv\n")
                .unwrap();
        assert!(matches!(
            CsvAdapter::from_config(&config),
            Err(HorizonError::ConfigMissing { .. })
        ));
    }
}
