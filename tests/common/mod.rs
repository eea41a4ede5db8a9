#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use horizon::adapters::file_config_adapter::FileConfigAdapter;
use horizon::domain::calendar::is_business_day;
use horizon::domain::error::HorizonError;
use horizon::domain::price::PriceBar;
use horizon::ports::price_port::PricePort;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: Cell::new(0),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(HorizonError::Database {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start && b.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per business day starting on or after `start`.
pub fn business_day_bars(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    let mut day = start;
    let mut out = Vec::with_capacity(closes.len());
    for &close in closes {
        while !is_business_day(day) {
            day += Duration::days(1);
        }
        out.push(PriceBar::from_close(day, close));
        day += Duration::days(1);
    }
    out
}

/// Deterministic oscillating series for pipeline tests.
pub fn wave_bars(start: NaiveDate, count: usize, base: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..count)
        .map(|i| base + 5.0 * ((i as f64) * 0.4).sin() + (i % 7) as f64 * 0.3)
        .collect();
    business_day_bars(start, &closes)
}

pub fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

pub fn breakout_config(symbol: &str, threshold: &str, hold_days: usize) -> FileConfigAdapter {
    config(&format!(
        "[backtest]\n\
         symbol = {symbol}\n\
         start_date = 2024-01-01\n\
         end_date = 2024-12-31\n\
         hold_days = {hold_days}\n\
         initial_equity = 10000\n\
         \n\
         [strategy]\n\
         kind = breakout\n\
         threshold = {threshold}\n"
    ))
}
