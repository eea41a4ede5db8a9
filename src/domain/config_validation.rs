//! Configuration validation and reading of backtest parameters.
//!
//! Everything here runs before any price data is processed. Problems with the
//! INI contents surface as `ConfigMissing` / `ConfigInvalid`, including
//! strategy parameters that the engine itself would reject.

use crate::domain::backtest::BacktestParams;
use crate::domain::error::HorizonError;
use crate::domain::matcher::PositionMode;
use crate::domain::price::PriceBar;
use crate::domain::price_stats::{auto_initial_equity, PriceStats};
use crate::domain::signal::SignalMode;
use crate::domain::strategy::{ReversionMethod, Strategy, StrategyKind};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

const AUTO: &str = "auto";

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), HorizonError> {
    read_symbol(config)?;
    read_date_range(config)?;
    read_hold_days(config)?;
    read_position_size(config)?;
    read_initial_equity(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), HorizonError> {
    read_signal_mode(config)?;
    // An automatic threshold only exists once prices are loaded.
    let strategy = read_strategy(config, || Ok(0.0))?;
    strategy.validate().map_err(into_config_error)
}

/// Threshold as written in the INI file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdSetting {
    Fixed(f64),
    /// 75th percentile of the loaded closes.
    Auto,
}

/// Initial equity as written in the INI file; omitted means automatic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EquitySetting {
    Fixed(f64),
    Auto,
}

impl EquitySetting {
    pub fn resolve(self, bars: &[PriceBar]) -> f64 {
        match self {
            EquitySetting::Fixed(v) => v,
            EquitySetting::Auto => auto_initial_equity(bars),
        }
    }
}

pub fn read_symbol(config: &dyn ConfigPort) -> Result<String, HorizonError> {
    non_empty(config, "backtest", "symbol")
        .map(|s| s.to_uppercase())
        .ok_or_else(|| missing("backtest", "symbol"))
}

pub fn read_date_range(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), HorizonError> {
    let start = read_date(config, "start_date")?;
    let end = read_date(config, "end_date")?;
    if start > end {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok((start, end))
}

fn read_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, HorizonError> {
    let raw = non_empty(config, "backtest", key).ok_or_else(|| missing("backtest", key))?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            key,
            &format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

pub fn read_hold_days(config: &dyn ConfigPort) -> Result<usize, HorizonError> {
    let raw = non_empty(config, "backtest", "hold_days")
        .ok_or_else(|| missing("backtest", "hold_days"))?;
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n as usize),
        Ok(_) => Err(invalid("backtest", "hold_days", "hold_days must be at least 1")),
        Err(_) => Err(invalid("backtest", "hold_days", "hold_days must be an integer")),
    }
}

pub fn read_position_size(config: &dyn ConfigPort) -> Result<f64, HorizonError> {
    let value = optional_double(config, "backtest", "position_size")?.unwrap_or(1.0);
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "backtest",
            "position_size",
            "position_size must be non-negative",
        ));
    }
    Ok(value)
}

pub fn read_initial_equity(config: &dyn ConfigPort) -> Result<EquitySetting, HorizonError> {
    match non_empty(config, "backtest", "initial_equity") {
        None => Ok(EquitySetting::Auto),
        Some(s) if s.eq_ignore_ascii_case(AUTO) => Ok(EquitySetting::Auto),
        Some(s) => match s.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(EquitySetting::Fixed(v)),
            _ => Err(invalid(
                "backtest",
                "initial_equity",
                "initial_equity must be a positive number or 'auto'",
            )),
        },
    }
}

pub fn read_position_mode(config: &dyn ConfigPort) -> PositionMode {
    PositionMode::from_stacking(config.get_bool("backtest", "stacking", true))
}

pub fn read_signal_mode(config: &dyn ConfigPort) -> Result<SignalMode, HorizonError> {
    parse_optional(config, "strategy", "signal_mode").map(Option::unwrap_or_default)
}

pub fn read_threshold(config: &dyn ConfigPort) -> Result<ThresholdSetting, HorizonError> {
    let raw = non_empty(config, "strategy", "threshold")
        .ok_or_else(|| missing("strategy", "threshold"))?;
    if raw.eq_ignore_ascii_case(AUTO) {
        return Ok(ThresholdSetting::Auto);
    }
    raw.parse::<f64>()
        .map(ThresholdSetting::Fixed)
        .map_err(|_| invalid("strategy", "threshold", "threshold must be a number or 'auto'"))
}

/// Builds the strategy named by `[strategy] kind`. `auto_threshold` is called
/// only for a breakout strategy configured with `threshold = auto`.
pub fn read_strategy<F>(config: &dyn ConfigPort, auto_threshold: F) -> Result<Strategy, HorizonError>
where
    F: FnOnce() -> Result<f64, HorizonError>,
{
    let kind: StrategyKind =
        parse_optional(config, "strategy", "kind")?.ok_or_else(|| missing("strategy", "kind"))?;

    let strategy = match kind {
        StrategyKind::Breakout => {
            let threshold = match read_threshold(config)? {
                ThresholdSetting::Fixed(v) => v,
                ThresholdSetting::Auto => auto_threshold()?,
            };
            Strategy::Breakout { threshold }
        }
        StrategyKind::Sma => Strategy::SmaCrossover {
            fast: required_period(config, "fast")?,
            slow: required_period(config, "slow")?,
        },
        StrategyKind::MeanReversion => {
            let method: ReversionMethod =
                parse_optional(config, "strategy", "method")?.unwrap_or_default();
            match method {
                ReversionMethod::ZScore => Strategy::ZScoreReversion {
                    lookback: required_period(config, "lookback")?,
                    k_sigma: required_double(config, "strategy", "k_sigma")?,
                },
                ReversionMethod::Drop => Strategy::PercentDrop {
                    drop_pct: required_double(config, "strategy", "drop_pct")?,
                },
            }
        }
    };
    Ok(strategy)
}

/// Full parameter set for a run over `bars`, resolving automatic values
/// against the loaded prices.
pub fn read_backtest_params(
    config: &dyn ConfigPort,
    bars: &[PriceBar],
) -> Result<BacktestParams, HorizonError> {
    let strategy = read_strategy(config, || {
        PriceStats::compute(bars)
            .map(|stats| stats.suggested_threshold)
            .ok_or_else(|| invalid("strategy", "threshold", "threshold = auto needs price data"))
    })?;
    strategy.validate().map_err(into_config_error)?;

    Ok(BacktestParams {
        strategy,
        signal_mode: read_signal_mode(config)?,
        hold_days: read_hold_days(config)?,
        position_mode: read_position_mode(config),
        position_size: read_position_size(config)?,
        initial_equity: read_initial_equity(config)?.resolve(bars),
    })
}

fn required_period(config: &dyn ConfigPort, key: &str) -> Result<usize, HorizonError> {
    let raw = non_empty(config, "strategy", key).ok_or_else(|| missing("strategy", key))?;
    raw.parse::<usize>()
        .map_err(|_| invalid("strategy", key, &format!("{key} must be a non-negative integer")))
}

fn required_double(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, HorizonError> {
    optional_double(config, section, key)?.ok_or_else(|| missing(section, key))
}

fn optional_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, HorizonError> {
    non_empty(config, section, key)
        .map(|raw| {
            raw.parse::<f64>()
                .map_err(|_| invalid(section, key, &format!("{key} must be a number")))
        })
        .transpose()
}

fn parse_optional<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, HorizonError>
where
    T: FromStr<Err = String>,
{
    non_empty(config, section, key)
        .map(|raw| raw.parse::<T>().map_err(|reason| invalid(section, key, &reason)))
        .transpose()
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn missing(section: &str, key: &str) -> HorizonError {
    HorizonError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> HorizonError {
    HorizonError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn into_config_error(err: HorizonError) -> HorizonError {
    match err {
        HorizonError::InvalidParameter { name, reason } => HorizonError::ConfigInvalid {
            section: "strategy".to_string(),
            key: name,
            reason,
        },
        other => other,
    }
}
