//! Report output port.

use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::error::HorizonError;
use crate::domain::sweep::SweepOutcome;

/// Port for writing backtest reports.
pub trait ReportPort {
    fn write(
        &self,
        symbol: &str,
        params: &BacktestParams,
        result: &BacktestResult,
        output_path: &str,
    ) -> Result<(), HorizonError>;

    fn write_sweep(
        &self,
        symbol: &str,
        outcomes: &[SweepOutcome],
        output_path: &str,
    ) -> Result<(), HorizonError>;
}
