//! Strategy selection and parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::HorizonError;
use super::signal::{self, SignalMode};

/// Strategy family as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Breakout,
    Sma,
    MeanReversion,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakout" => Ok(StrategyKind::Breakout),
            "sma" | "sma_crossover" => Ok(StrategyKind::Sma),
            "mean_reversion" | "mean-reversion" | "meanrev" => Ok(StrategyKind::MeanReversion),
            other => Err(format!(
                "unknown strategy '{other}' (expected breakout | sma | mean_reversion)"
            )),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Breakout => write!(f, "breakout"),
            StrategyKind::Sma => write!(f, "sma"),
            StrategyKind::MeanReversion => write!(f, "mean_reversion"),
        }
    }
}

/// Mean-reversion trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReversionMethod {
    #[default]
    ZScore,
    Drop,
}

impl FromStr for ReversionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zscore" | "z_score" | "z-score" => Ok(ReversionMethod::ZScore),
            "drop" | "pct_drop" | "percent_drop" => Ok(ReversionMethod::Drop),
            other => Err(format!("unknown method '{other}' (expected zscore | drop)")),
        }
    }
}

/// A strategy together with the parameters it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Breakout { threshold: f64 },
    SmaCrossover { fast: usize, slow: usize },
    ZScoreReversion { lookback: usize, k_sigma: f64 },
    PercentDrop { drop_pct: f64 },
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Breakout { .. } => StrategyKind::Breakout,
            Strategy::SmaCrossover { .. } => StrategyKind::Sma,
            Strategy::ZScoreReversion { .. } | Strategy::PercentDrop { .. } => {
                StrategyKind::MeanReversion
            }
        }
    }

    /// Rejects parameter values no series could make meaningful.
    pub fn validate(&self) -> Result<(), HorizonError> {
        match *self {
            Strategy::Breakout { threshold } => {
                if !threshold.is_finite() {
                    return Err(HorizonError::invalid_parameter(
                        "threshold",
                        "must be a finite number",
                    ));
                }
            }
            Strategy::SmaCrossover { fast, slow } => {
                if fast == 0 {
                    return Err(HorizonError::invalid_parameter("fast", "must be at least 1"));
                }
                if fast >= slow {
                    return Err(HorizonError::invalid_parameter(
                        "slow",
                        format!("must be greater than fast ({fast}), got {slow}"),
                    ));
                }
            }
            Strategy::ZScoreReversion { lookback, k_sigma } => {
                if lookback == 0 {
                    return Err(HorizonError::invalid_parameter(
                        "lookback",
                        "must be at least 1",
                    ));
                }
                if !k_sigma.is_finite() {
                    return Err(HorizonError::invalid_parameter(
                        "k_sigma",
                        "must be a finite number",
                    ));
                }
            }
            Strategy::PercentDrop { drop_pct } => {
                if !(0.0..100.0).contains(&drop_pct) {
                    return Err(HorizonError::invalid_parameter(
                        "drop_pct",
                        format!("must be in [0, 100), got {drop_pct}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Entry signals for `closes`. Percentage drop ignores `mode`.
    pub fn signals(&self, closes: &[f64], mode: SignalMode) -> Vec<bool> {
        match *self {
            Strategy::Breakout { threshold } => signal::breakout(closes, threshold, mode),
            Strategy::SmaCrossover { fast, slow } => signal::sma_crossover(closes, fast, slow, mode),
            Strategy::ZScoreReversion { lookback, k_sigma } => {
                signal::zscore_reversion(closes, lookback, k_sigma, mode)
            }
            Strategy::PercentDrop { drop_pct } => signal::percent_drop(closes, drop_pct),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Breakout { threshold } => write!(f, "BREAKOUT({threshold})"),
            Strategy::SmaCrossover { fast, slow } => write!(f, "SMA({fast},{slow})"),
            Strategy::ZScoreReversion { lookback, k_sigma } => {
                write!(f, "ZSCORE({lookback},{k_sigma})")
            }
            Strategy::PercentDrop { drop_pct } => write!(f, "DROP({drop_pct}%)"),
        }
    }
}
