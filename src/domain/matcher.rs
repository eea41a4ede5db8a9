//! Trade matching: signal bars to fixed-horizon trades.
//!
//! Two modes:
//! - stacking: every signal opens its own trade, exiting exactly `hold_days`
//!   bars later; a trade whose exit would fall past the last bar is dropped.
//! - single: one position at a time, exit clipped to the last bar, scanning
//!   resumes on the bar after the exit.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::price::PriceBar;
use super::signal::count_signals;
use super::trade::Trade;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionMode {
    #[default]
    Stacking,
    Single,
}

impl PositionMode {
    pub fn from_stacking(stacking: bool) -> Self {
        if stacking {
            PositionMode::Stacking
        } else {
            PositionMode::Single
        }
    }
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionMode::Stacking => write!(f, "stacking"),
            PositionMode::Single => write!(f, "single"),
        }
    }
}

impl FromStr for PositionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stacking" | "stack" => Ok(PositionMode::Stacking),
            "single" | "legacy" => Ok(PositionMode::Single),
            other => Err(format!("unknown position mode '{other}' (expected stacking | single)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub trades: Vec<Trade>,
    /// Signal bars in the input series.
    pub signals_total: usize,
    /// Signals that became realized trades.
    pub signals_kept: usize,
}

pub fn match_trades(
    bars: &[PriceBar],
    signals: &[bool],
    hold_days: usize,
    position_size: f64,
    mode: PositionMode,
) -> MatchOutcome {
    debug_assert_eq!(bars.len(), signals.len());
    let n = bars.len().min(signals.len());
    let signals_total = count_signals(&signals[..n]);

    let trades = if hold_days < 1 || n == 0 {
        Vec::new()
    } else {
        match mode {
            PositionMode::Stacking => match_stacking(&bars[..n], &signals[..n], hold_days, position_size),
            PositionMode::Single => match_single(&bars[..n], &signals[..n], hold_days, position_size),
        }
    };

    let signals_kept = trades.len();
    debug!(
        "matched {} of {} signals ({} mode, hold {} bars)",
        signals_kept, signals_total, mode, hold_days
    );

    MatchOutcome {
        trades,
        signals_total,
        signals_kept,
    }
}

fn match_stacking(
    bars: &[PriceBar],
    signals: &[bool],
    hold_days: usize,
    position_size: f64,
) -> Vec<Trade> {
    signals
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s)
        .filter_map(|(entry, _)| {
            let exit = entry.checked_add(hold_days)?;
            bars.get(exit)
                .map(|exit_bar| Trade::between(&bars[entry], exit_bar, position_size))
        })
        .collect()
}

fn match_single(
    bars: &[PriceBar],
    signals: &[bool],
    hold_days: usize,
    position_size: f64,
) -> Vec<Trade> {
    let n = bars.len();
    let mut trades = Vec::new();
    let mut i = 0;
    while i < n {
        if signals[i] {
            let exit = i.saturating_add(hold_days).min(n - 1);
            trades.push(Trade::between(&bars[i], &bars[exit], position_size));
            i = exit + 1;
        } else {
            i += 1;
        }
    }
    trades
}

/// Realized P&L summed per exit date.
pub fn pnl_by_exit_date(trades: &[Trade]) -> BTreeMap<NaiveDate, f64> {
    let mut by_date = BTreeMap::new();
    for trade in trades {
        *by_date.entry(trade.exit_date).or_insert(0.0) += trade.pnl;
    }
    by_date
}
