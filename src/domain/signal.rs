//! Entry signal generators.
//!
//! Each generator maps closing prices to a `Vec<bool>` of the same length,
//! where `true` marks a bar on which a new long position may be opened. Values
//! at position `i` depend only on bars `0..=i`. Undefined inputs (NaN closes,
//! unfilled rolling windows, zero standard deviation) never signal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::indicator::{sma, zscore};

/// Whether a generator fires on every qualifying bar or only when a
/// qualifying episode begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    #[default]
    EveryBar,
    Cross,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::EveryBar => write!(f, "every_bar"),
            SignalMode::Cross => write!(f, "cross"),
        }
    }
}

impl FromStr for SignalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "every_bar" | "every" => Ok(SignalMode::EveryBar),
            "cross" | "transition" => Ok(SignalMode::Cross),
            other => Err(format!("unknown signal mode '{other}' (expected every_bar | cross)")),
        }
    }
}

/// Breakout above a fixed price level.
///
/// Cross: `close[i-1] <= threshold < close[i]`. Every bar: `close[i] >= threshold`.
pub fn breakout(closes: &[f64], threshold: f64, mode: SignalMode) -> Vec<bool> {
    match mode {
        SignalMode::EveryBar => closes.iter().map(|&c| c >= threshold).collect(),
        SignalMode::Cross => (0..closes.len())
            .map(|i| i > 0 && closes[i - 1] <= threshold && threshold < closes[i])
            .collect(),
    }
}

/// Fast SMA at or above slow SMA.
///
/// Cross fires on the bar where `fast >= slow` after a bar with `fast < slow`.
pub fn sma_crossover(closes: &[f64], fast: usize, slow: usize, mode: SignalMode) -> Vec<bool> {
    let fast_ma = sma(closes, fast);
    let slow_ma = sma(closes, slow);

    // NaN comparisons are false, so unfilled windows never qualify.
    let above: Vec<bool> = fast_ma
        .iter()
        .zip(slow_ma.iter())
        .map(|(f, s)| f >= s)
        .collect();

    match mode {
        SignalMode::EveryBar => above,
        SignalMode::Cross => (0..closes.len())
            .map(|i| i > 0 && above[i] && fast_ma[i - 1] < slow_ma[i - 1])
            .collect(),
    }
}

/// Close at least `k_sigma` population standard deviations below its
/// `lookback`-bar rolling mean.
///
/// Cross fires only on the first bar of each contiguous qualifying run.
pub fn zscore_reversion(
    closes: &[f64],
    lookback: usize,
    k_sigma: f64,
    mode: SignalMode,
) -> Vec<bool> {
    let in_zone: Vec<bool> = zscore(closes, lookback)
        .into_iter()
        .map(|z| z <= -k_sigma)
        .collect();

    match mode {
        SignalMode::EveryBar => in_zone,
        SignalMode::Cross => rising_edges(&in_zone),
    }
}

/// Close at least `drop_pct` percent below the previous close. Fires on every
/// qualifying bar, including consecutive ones.
pub fn percent_drop(closes: &[f64], drop_pct: f64) -> Vec<bool> {
    let factor = 1.0 - drop_pct / 100.0;
    (0..closes.len())
        .map(|i| i > 0 && closes[i] <= closes[i - 1] * factor)
        .collect()
}

/// `true` where `flags` turns on; the first element counts as a turn-on.
pub fn rising_edges(flags: &[bool]) -> Vec<bool> {
    (0..flags.len())
        .map(|i| flags[i] && (i == 0 || !flags[i - 1]))
        .collect()
}

/// Number of `true` entries.
pub fn count_signals(signals: &[bool]) -> usize {
    signals.iter().filter(|&&s| s).count()
}
