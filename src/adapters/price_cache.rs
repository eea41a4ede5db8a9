//! Time-bounded cache in front of any `PricePort`.
//!
//! Entries are keyed by `(symbol, start, end)`. A read older than the TTL is a
//! miss and refetches from the wrapped port. Symbol listings and data ranges
//! are passed through uncached.

use crate::domain::error::HorizonError;
use crate::domain::price::PriceBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

type CacheKey = (String, NaiveDate, NaiveDate);

pub struct CachedPricePort<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, (Instant, Vec<PriceBar>)>>,
}

impl<P: PricePort> CachedPricePort<P> {
    /// A zero TTL disables caching.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// TTL from `[cache] ttl_seconds`, defaulting to ten minutes.
    pub fn from_config(inner: P, config: &dyn ConfigPort) -> Self {
        let secs = config.get_int("cache", "ttl_seconds", DEFAULT_TTL.as_secs() as i64);
        Self::new(inner, Duration::from_secs(secs.max(0) as u64))
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of stored entries. Stale ones linger until the next store.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<Vec<PriceBar>> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some((stored_at, bars)) if stored_at.elapsed() <= self.ttl => Some(bars.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, key: CacheKey, bars: &[PriceBar]) {
        match self.entries.lock() {
            Ok(mut entries) => {
                let ttl = self.ttl;
                entries.retain(|_, (stored_at, _)| stored_at.elapsed() <= ttl);
                entries.insert(key, (Instant::now(), bars.to_vec()));
            }
            Err(_) => warn!("price cache lock poisoned; not caching"),
        }
    }
}

impl<P: PricePort> PricePort for CachedPricePort<P> {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError> {
        if self.ttl.is_zero() {
            return self.inner.fetch_prices(symbol, start_date, end_date);
        }

        let key = (symbol.to_uppercase(), start_date, end_date);
        if let Some(bars) = self.lookup(&key) {
            debug!("price cache hit {} {}..{}", key.0, start_date, end_date);
            return Ok(bars);
        }

        debug!("price cache miss {} {}..{}", key.0, start_date, end_date);
        let bars = self.inner.fetch_prices(symbol, start_date, end_date)?;
        self.store(key, &bars);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError> {
        self.inner.list_symbols()
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError> {
        self.inner.get_data_range(symbol)
    }
}
