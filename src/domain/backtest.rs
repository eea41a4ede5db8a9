//! Backtest engine: prices → signals → trades → equity curve → metrics.
//!
//! `run_backtest` is a pure function of its inputs. It holds no state between
//! calls and performs no I/O, so identical inputs give identical results and
//! independent runs may execute on separate threads.

use log::debug;
use serde::{Deserialize, Serialize};

use super::equity::{build_equity_curve, EquityPoint};
use super::error::HorizonError;
use super::matcher::{match_trades, pnl_by_exit_date, MatchOutcome, PositionMode};
use super::metrics::Metrics;
use super::price::{closes, PriceBar};
use super::signal::SignalMode;
use super::strategy::Strategy;
use super::trade::Trade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestParams {
    pub strategy: Strategy,
    pub signal_mode: SignalMode,
    /// Bars between entry and exit.
    pub hold_days: usize,
    pub position_mode: PositionMode,
    /// Units bought per trade.
    pub position_size: f64,
    pub initial_equity: f64,
}

impl BacktestParams {
    /// Stacking, every-bar signals, one unit per trade.
    pub fn new(strategy: Strategy, hold_days: usize, initial_equity: f64) -> Self {
        BacktestParams {
            strategy,
            signal_mode: SignalMode::default(),
            hold_days,
            position_mode: PositionMode::default(),
            position_size: 1.0,
            initial_equity,
        }
    }

    pub fn validate(&self) -> Result<(), HorizonError> {
        self.strategy.validate()?;
        if !self.position_size.is_finite() || self.position_size < 0.0 {
            return Err(HorizonError::invalid_parameter(
                "position_size",
                format!("must be a non-negative finite number, got {}", self.position_size),
            ));
        }
        if !self.initial_equity.is_finite() {
            return Err(HorizonError::invalid_parameter(
                "initial_equity",
                "must be a finite number",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: Metrics,
}

/// Runs one backtest over `bars`, which must be date-ascending with unique
/// dates and positive closes.
pub fn run_backtest(
    bars: &[PriceBar],
    params: &BacktestParams,
) -> Result<BacktestResult, HorizonError> {
    params.validate()?;

    let closes = closes(bars);
    let signals = params.strategy.signals(&closes, params.signal_mode);
    let outcome = match_trades(
        bars,
        &signals,
        params.hold_days,
        params.position_size,
        params.position_mode,
    );

    let equity_curve = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => build_equity_curve(
            first.date,
            last.date,
            &pnl_by_exit_date(&outcome.trades),
            params.initial_equity,
        ),
        _ => Vec::new(),
    };

    let metrics = Metrics::compute(&outcome, &equity_curve, params.initial_equity);
    debug!(
        "{}: {} bars, {} trades, total pnl {:.4}",
        params.strategy,
        bars.len(),
        metrics.trade_count,
        metrics.total_pnl
    );

    let MatchOutcome { trades, .. } = outcome;
    Ok(BacktestResult {
        trades,
        equity_curve,
        metrics,
    })
}
