//! CSV report adapter.
//!
//! A backtest writes three files next to each other: the trade log at the
//! given path, plus `<stem>_equity.csv` and `<stem>_metrics.csv`. A sweep
//! writes one row per parameter set.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::adapters::create_parent_dirs;
use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::error::HorizonError;
use crate::domain::sweep::SweepOutcome;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct SweepCsvRow {
    strategy: String,
    signal_mode: String,
    position_mode: String,
    hold_days: usize,
    trade_count: Option<usize>,
    signals_total: Option<usize>,
    signals_kept: Option<usize>,
    total_pnl: Option<f64>,
    win_rate: Option<f64>,
    avg_trade_return: Option<f64>,
    max_drawdown: Option<f64>,
    annualized_return: Option<f64>,
    final_equity: Option<f64>,
    error: Option<String>,
}

fn report_err(e: csv::Error) -> HorizonError {
    HorizonError::Report {
        reason: format!("failed to write CSV report: {e}"),
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    path.with_file_name(format!("{stem}_{suffix}.csv"))
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<(), HorizonError> {
    let mut wtr = csv::Writer::from_path(path).map_err(report_err)?;
    for row in rows {
        wtr.serialize(row).map_err(report_err)?;
    }
    wtr.flush().map_err(HorizonError::Io)
}

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Paths of the equity curve and metrics files written alongside the
    /// trade log at `output_path`.
    pub fn companion_paths(output_path: &str) -> (PathBuf, PathBuf) {
        let path = Path::new(output_path);
        (sibling(path, "equity"), sibling(path, "metrics"))
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        symbol: &str,
        params: &BacktestParams,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), HorizonError> {
        let path = Path::new(output_path);
        create_parent_dirs(path)?;
        let (equity_path, metrics_path) = Self::companion_paths(output_path);

        write_rows(path, &result.trades)?;
        write_rows(&equity_path, &result.equity_curve)?;

        let m = &result.metrics;
        let metrics: Vec<(&str, String)> = vec![
            ("symbol", symbol.to_string()),
            ("strategy", params.strategy.to_string()),
            ("signal_mode", params.signal_mode.to_string()),
            ("position_mode", params.position_mode.to_string()),
            ("hold_days", params.hold_days.to_string()),
            ("position_size", params.position_size.to_string()),
            ("initial_equity", m.initial_equity.to_string()),
            ("final_equity", m.final_equity.to_string()),
            ("total_pnl", m.total_pnl.to_string()),
            ("total_return", m.total_return.to_string()),
            ("annualized_return", m.annualized_return.to_string()),
            ("max_drawdown", m.max_drawdown.to_string()),
            ("win_rate", m.win_rate.to_string()),
            ("avg_trade_return", m.avg_trade_return.to_string()),
            ("trade_count", m.trade_count.to_string()),
            ("signals_total", m.signals_total.to_string()),
            ("signals_kept", m.signals_kept.to_string()),
            ("profit_factor", m.profit_factor.to_string()),
        ];

        let mut wtr = csv::Writer::from_path(&metrics_path).map_err(report_err)?;
        wtr.write_record(["metric", "value"]).map_err(report_err)?;
        for (name, value) in &metrics {
            wtr.write_record([*name, value.as_str()]).map_err(report_err)?;
        }
        wtr.flush().map_err(HorizonError::Io)
    }

    fn write_sweep(
        &self,
        _symbol: &str,
        outcomes: &[SweepOutcome],
        output_path: &str,
    ) -> Result<(), HorizonError> {
        let path = Path::new(output_path);
        create_parent_dirs(path)?;

        let rows = outcomes.iter().map(|o| {
            let m = o.result.as_ref().ok().map(|r| &r.metrics);
            SweepCsvRow {
                strategy: o.params.strategy.to_string(),
                signal_mode: o.params.signal_mode.to_string(),
                position_mode: o.params.position_mode.to_string(),
                hold_days: o.params.hold_days,
                trade_count: m.map(|m| m.trade_count),
                signals_total: m.map(|m| m.signals_total),
                signals_kept: m.map(|m| m.signals_kept),
                total_pnl: m.map(|m| m.total_pnl),
                win_rate: m.map(|m| m.win_rate),
                avg_trade_return: m.map(|m| m.avg_trade_return),
                max_drawdown: m.map(|m| m.max_drawdown),
                annualized_return: m.map(|m| m.annualized_return),
                final_equity: m.map(|m| m.final_equity),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            }
        });
        write_rows(path, rows)
    }
}
