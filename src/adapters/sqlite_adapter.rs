//! SQLite price store and backtest run log.

use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::error::HorizonError;
use crate::domain::price::PriceBar;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

/// One row of the `backtests` run log.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRecord {
    pub id: i64,
    pub ts: String,
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub params_json: String,
    pub metrics_json: String,
}

fn db_err(e: r2d2::Error) -> HorizonError {
    HorizonError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> HorizonError {
    HorizonError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, HorizonError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| HorizonError::Database {
        reason: format!("invalid stored date '{s}': {e}"),
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, HorizonError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| HorizonError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(db_err)?;

        debug!("opened sqlite store {} (pool size {})", db_path, pool_size);
        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    pub fn in_memory() -> Result<Self, HorizonError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager).map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS prices (
                symbol TEXT NOT NULL,
                d      TEXT NOT NULL,
                open   REAL,
                high   REAL,
                low    REAL,
                close  REAL NOT NULL,
                volume REAL,
                source TEXT NOT NULL DEFAULT 'csv',
                PRIMARY KEY (symbol, d)
            );
            CREATE TABLE IF NOT EXISTS coverage (
                symbol TEXT NOT NULL,
                start  TEXT NOT NULL,
                end    TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS backtests (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                ts           TEXT NOT NULL,
                symbol       TEXT NOT NULL,
                start        TEXT NOT NULL,
                end          TEXT NOT NULL,
                params_json  TEXT NOT NULL,
                metrics_json TEXT NOT NULL
            );",
        )
        .map_err(query_err)?;

        Ok(())
    }

    /// Inserts or replaces bars keyed by `(symbol, date)`. Returns the number
    /// of rows written.
    pub fn upsert_prices(
        &self,
        symbol: &str,
        bars: &[PriceBar],
        source: &str,
    ) -> Result<usize, HorizonError> {
        let symbol = symbol.to_uppercase();
        let mut conn = self.pool.get().map_err(db_err)?;
        let tx = conn.transaction().map_err(query_err)?;

        let mut written = 0;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO prices (symbol, d, open, high, low, close, volume, source)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(query_err)?;
            for bar in bars {
                written += stmt
                    .execute(params![
                        symbol,
                        bar.date.format(DATE_FORMAT).to_string(),
                        bar.open,
                        bar.high,
                        bar.low,
                        bar.close,
                        bar.volume,
                        source
                    ])
                    .map_err(query_err)?;
            }
        }

        tx.commit().map_err(query_err)?;
        info!("upserted {} rows for {} from {}", written, symbol, source);
        Ok(written)
    }

    /// Notes that `[start, end]` was loaded for `symbol`.
    pub fn record_coverage(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;
        conn.execute(
            "INSERT INTO coverage (symbol, start, end) VALUES (?1, ?2, ?3)",
            params![
                symbol.to_uppercase(),
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string()
            ],
        )
        .map_err(query_err)?;
        Ok(())
    }

    /// Appends a finished run to the `backtests` log and returns its id.
    pub fn record_backtest(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        params: &BacktestParams,
        result: &BacktestResult,
    ) -> Result<i64, HorizonError> {
        let to_json = |value: serde_json::Result<String>| {
            value.map_err(|e| HorizonError::Database {
                reason: format!("failed to encode run log entry: {e}"),
            })
        };
        let params_json = to_json(serde_json::to_string(params))?;
        let metrics_json = to_json(serde_json::to_string(&result.metrics))?;

        let conn = self.pool.get().map_err(db_err)?;
        conn.execute(
            "INSERT INTO backtests (ts, symbol, start, end, params_json, metrics_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                Utc::now().to_rfc3339(),
                symbol.to_uppercase(),
                start.format(DATE_FORMAT).to_string(),
                end.format(DATE_FORMAT).to_string(),
                params_json,
                metrics_json
            ],
        )
        .map_err(query_err)?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent runs first.
    pub fn recent_backtests(&self, limit: usize) -> Result<Vec<BacktestRecord>, HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;
        let mut stmt = conn
            .prepare(
                "SELECT id, ts, symbol, start, end, params_json, metrics_json
                 FROM backtests ORDER BY id DESC LIMIT ?1",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(query_err)?;

        let mut records = Vec::new();
        for row in rows {
            let (id, ts, symbol, start, end, params_json, metrics_json) =
                row.map_err(query_err)?;
            records.push(BacktestRecord {
                id,
                ts,
                symbol,
                start: parse_date(&start)?,
                end: parse_date(&end)?,
                params_json,
                metrics_json,
            });
        }
        Ok(records)
    }
}

impl PricePort for SqliteAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceBar>, HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;

        let mut stmt = conn
            .prepare(
                "SELECT d, open, high, low, close, volume
                 FROM prices
                 WHERE symbol = ?1 AND d >= ?2 AND d <= ?3
                 ORDER BY d ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(
                params![
                    symbol.to_uppercase(),
                    start_date.format(DATE_FORMAT).to_string(),
                    end_date.format(DATE_FORMAT).to_string()
                ],
                |row| {
                    let date_str: String = row.get(0)?;
                    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                    Ok(PriceBar {
                        date,
                        open: row.get(1)?,
                        high: row.get(2)?,
                        low: row.get(3)?,
                        close: row.get(4)?,
                        volume: row.get(5)?,
                    })
                },
            )
            .map_err(query_err)?;

        let mut bars = Vec::new();
        for row in rows {
            let bar = row.map_err(query_err)?;
            if bar.has_usable_close() {
                bars.push(bar);
            }
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;

        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM prices ORDER BY symbol")
            .map_err(query_err)?;

        let rows = stmt.query_map([], |row| row.get(0)).map_err(query_err)?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(row.map_err(query_err)?);
        }
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, HorizonError> {
        let conn = self.pool.get().map_err(db_err)?;

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(
                "SELECT MIN(d), MAX(d), COUNT(*) FROM prices WHERE symbol = ?1",
                params![symbol.to_uppercase()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(query_err)?;

        match result {
            (Some(min), Some(max), count) if count > 0 => {
                Ok(Some((parse_date(&min)?, parse_date(&max)?, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
