//! Parameter sweeps: many backtests over one price series.

use rayon::prelude::*;

use super::backtest::{run_backtest, BacktestParams, BacktestResult};
use super::error::HorizonError;
use super::price::PriceBar;
use super::strategy::Strategy;

/// Value lists to vary around a base parameter set. An empty list keeps the
/// base value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepGrid {
    pub hold_days: Vec<usize>,
    /// Fast/slow periods; only applied to SMA crossover strategies.
    pub fast: Vec<usize>,
    pub slow: Vec<usize>,
}

impl SweepGrid {
    /// Cartesian product of the grid around `base`. SMA combinations with
    /// `fast >= slow` are skipped.
    pub fn generate(&self, base: &BacktestParams) -> Vec<BacktestParams> {
        let holds = if self.hold_days.is_empty() {
            vec![base.hold_days]
        } else {
            self.hold_days.clone()
        };

        let strategies: Vec<Strategy> = match base.strategy {
            Strategy::SmaCrossover { fast, slow } => {
                let fasts = if self.fast.is_empty() { vec![fast] } else { self.fast.clone() };
                let slows = if self.slow.is_empty() { vec![slow] } else { self.slow.clone() };
                fasts
                    .iter()
                    .flat_map(|&f| slows.iter().map(move |&s| (f, s)))
                    .filter(|&(f, s)| f < s)
                    .map(|(fast, slow)| Strategy::SmaCrossover { fast, slow })
                    .collect()
            }
            ref other => vec![other.clone()],
        };

        let mut out = Vec::with_capacity(holds.len() * strategies.len());
        for strategy in &strategies {
            for &hold_days in &holds {
                out.push(BacktestParams {
                    strategy: strategy.clone(),
                    hold_days,
                    ..base.clone()
                });
            }
        }
        out
    }

    pub fn size(&self, base: &BacktestParams) -> usize {
        self.generate(base).len()
    }
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub params: BacktestParams,
    pub result: Result<BacktestResult, HorizonError>,
}

/// Runs every parameter set in parallel against the shared series. Output
/// order matches `param_sets`; failures stay attached to their entry.
pub fn run_sweep(bars: &[PriceBar], param_sets: &[BacktestParams]) -> Vec<SweepOutcome> {
    param_sets
        .par_iter()
        .map(|params| SweepOutcome {
            params: params.clone(),
            result: run_backtest(bars, params),
        })
        .collect()
}

/// Index of the successful outcome with the highest total P&L. Ties go to the
/// earlier entry.
pub fn best_by_total_pnl(outcomes: &[SweepOutcome]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, outcome) in outcomes.iter().enumerate() {
        if let Ok(result) = &outcome.result {
            let pnl = result.metrics.total_pnl;
            if best.is_none_or(|(_, b)| pnl > b) {
                best = Some((i, pnl));
            }
        }
    }
    best.map(|(i, _)| i)
}
