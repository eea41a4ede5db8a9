//! Performance metrics and statistics.

use serde::{Deserialize, Serialize};

use super::equity::EquityPoint;
use super::matcher::MatchOutcome;
use super::trade::Trade;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_pnl: f64,
    pub win_rate: f64,
    pub avg_trade_return: f64,
    pub max_drawdown: f64,
    pub annualized_return: f64,
    pub total_return: f64,
    pub initial_equity: f64,
    pub final_equity: f64,
    pub trade_count: usize,
    pub signals_total: usize,
    pub signals_kept: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub avg_trade_duration: f64,
}

impl Metrics {
    pub fn compute(outcome: &MatchOutcome, equity_curve: &[EquityPoint], initial_equity: f64) -> Self {
        let trades = &outcome.trades;
        // A weekend-only series has no business days to carry the P&L.
        let final_equity = equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or_else(|| initial_equity + total_pnl(trades));

        let total_return = if initial_equity > 0.0 {
            (final_equity - initial_equity) / initial_equity
        } else {
            0.0
        };

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;
        let mut total_duration_days = 0i64;

        for trade in trades {
            let pnl = trade.pnl;
            if pnl > 0.0 {
                trades_won += 1;
                total_wins += pnl;
                largest_win = largest_win.max(pnl);
            } else if pnl < 0.0 {
                trades_lost += 1;
                total_losses += pnl.abs();
                largest_loss = largest_loss.max(pnl.abs());
            } else {
                trades_breakeven += 1;
            }
            total_duration_days += trade.duration_days();
        }

        let trade_count = trades.len();

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_trade_duration = if trade_count > 0 {
            total_duration_days as f64 / trade_count as f64
        } else {
            0.0
        };

        Metrics {
            total_pnl: total_pnl(trades),
            win_rate: win_rate(trades),
            avg_trade_return: avg_trade_return(trades),
            max_drawdown: max_drawdown(equity_curve),
            annualized_return: annualized_return(equity_curve, initial_equity),
            total_return,
            initial_equity,
            final_equity,
            trade_count,
            signals_total: outcome.signals_total,
            signals_kept: outcome.signals_kept,
            trades_won,
            trades_lost,
            trades_breakeven,
            profit_factor,
            largest_win,
            largest_loss,
            avg_trade_duration,
        }
    }

    /// `signals_kept / signals_total`; 0 when there were no signals.
    pub fn signal_keep_rate(&self) -> f64 {
        if self.signals_total > 0 {
            self.signals_kept as f64 / self.signals_total as f64
        } else {
            0.0
        }
    }
}

pub fn total_pnl(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.pnl).sum()
}

pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().filter(|t| t.is_win()).count() as f64 / trades.len() as f64
}

pub fn avg_trade_return(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.return_pct).sum::<f64>() / trades.len() as f64
}

/// Most negative `(equity - running_peak) / running_peak`; 0 for an empty or
/// non-decreasing curve. Points under a non-positive peak are skipped.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let Some(first) = equity_curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (point.equity - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Compound annual growth between the first and last curve dates, with the
/// span floored at one day.
pub fn annualized_return(equity_curve: &[EquityPoint], initial_equity: f64) -> f64 {
    let (Some(first), Some(last)) = (equity_curve.first(), equity_curve.last()) else {
        return 0.0;
    };
    if initial_equity <= 0.0 {
        return 0.0;
    }

    let days = (last.date - first.date).num_days().max(1);
    let years = days as f64 / DAYS_PER_YEAR;
    if years <= 0.0 {
        return 0.0;
    }

    let ann = (last.equity / initial_equity).powf(1.0 / years) - 1.0;
    if ann.is_finite() { ann } else { 0.0 }
}
