//! JSON report adapter: the full backtest result as one document.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::adapters::create_parent_dirs;
use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::equity::EquityPoint;
use crate::domain::error::HorizonError;
use crate::domain::metrics::Metrics;
use crate::domain::sweep::SweepOutcome;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

#[derive(Serialize)]
struct ReportDocument<'a> {
    symbol: &'a str,
    strategy: String,
    params: &'a BacktestParams,
    metrics: &'a Metrics,
    signal_keep_rate: f64,
    trades: &'a [Trade],
    equity_curve: &'a [EquityPoint],
}

#[derive(Serialize)]
struct SweepRow<'a> {
    strategy: String,
    params: &'a BacktestParams,
    metrics: Option<&'a Metrics>,
    error: Option<String>,
}

#[derive(Serialize)]
struct SweepDocument<'a> {
    symbol: &'a str,
    runs: Vec<SweepRow<'a>>,
}

pub struct JsonReportAdapter {
    pretty: bool,
}

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write_document<T: Serialize>(&self, doc: &T, output_path: &str) -> Result<(), HorizonError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        }
        .map_err(|e| HorizonError::Report {
            reason: format!("failed to encode JSON report: {e}"),
        })?;

        let path = Path::new(output_path);
        create_parent_dirs(path)?;
        fs::write(path, encoded).map_err(HorizonError::Io)
    }
}

impl Default for JsonReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        symbol: &str,
        params: &BacktestParams,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), HorizonError> {
        let doc = ReportDocument {
            symbol,
            strategy: params.strategy.to_string(),
            params,
            metrics: &result.metrics,
            signal_keep_rate: result.metrics.signal_keep_rate(),
            trades: &result.trades,
            equity_curve: &result.equity_curve,
        };
        self.write_document(&doc, output_path)
    }

    fn write_sweep(
        &self,
        symbol: &str,
        outcomes: &[SweepOutcome],
        output_path: &str,
    ) -> Result<(), HorizonError> {
        let runs = outcomes
            .iter()
            .map(|o| SweepRow {
                strategy: o.params.strategy.to_string(),
                params: &o.params,
                metrics: o.result.as_ref().ok().map(|r| &r.metrics),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        self.write_document(&SweepDocument { symbol, runs }, output_path)
    }
}
