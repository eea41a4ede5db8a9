//! Realized trades.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::PriceBar;

/// A closed long position, filled at the entry and exit bar closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub pnl: f64,
    pub return_pct: f64,
}

impl Trade {
    pub fn between(entry: &PriceBar, exit: &PriceBar, position_size: f64) -> Self {
        let pnl = (exit.close - entry.close) * position_size;
        let cost = entry.close * position_size;
        let return_pct = if cost != 0.0 { pnl / cost } else { 0.0 };
        Trade {
            entry_date: entry.date,
            entry_price: entry.close,
            exit_date: exit.date,
            exit_price: exit.close,
            pnl,
            return_pct,
        }
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    /// Calendar days between entry and exit.
    pub fn duration_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}
