//! Rolling-window indicators over closing prices.
//!
//! Every indicator returns a `Vec<f64>` aligned 1:1 with its input. Positions
//! where the value is undefined (window not yet full, a non-finite sample inside
//! the window, division by zero) hold `f64::NAN`; signal generators treat NaN
//! as "no signal".
//!
//! Windows are evaluated by a sliding accumulator rather than recomputed per
//! bar. Sums are kept relative to a shift value that is re-based onto the
//! window mean once per window length, which bounds the drift from repeated
//! add/remove and keeps the variance subtraction well conditioned.

pub mod sma;
pub mod stddev;

pub use sma::sma;
pub use stddev::zscore;

/// Variances at or below this fraction of the squared window mean are
/// floating-point residue of a constant window and are reported as zero.
const RELATIVE_VARIANCE_FLOOR: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowStats {
    pub mean: f64,
    /// Population variance (divides by the window length).
    pub variance: f64,
}

pub(crate) fn rolling_stats(values: &[f64], period: usize) -> Vec<Option<WindowStats>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let n = period as f64;
    let mut out = Vec::with_capacity(values.len());
    let mut shift = 0.0_f64;
    let mut sum = 0.0_f64;
    let mut sum_sq = 0.0_f64;
    let mut non_finite = 0usize;

    for (i, &v) in values.iter().enumerate() {
        if v.is_finite() {
            let x = v - shift;
            sum += x;
            sum_sq += x * x;
        } else {
            non_finite += 1;
        }

        if i >= period {
            let old = values[i - period];
            if old.is_finite() {
                let x = old - shift;
                sum -= x;
                sum_sq -= x * x;
            } else {
                non_finite -= 1;
            }
        }

        let start = (i + 1).saturating_sub(period);
        if (i + 1) % period == 0 {
            (shift, sum, sum_sq) = rebase(&values[start..=i]);
        }

        if i + 1 < period || non_finite > 0 {
            out.push(None);
            continue;
        }

        let shifted_mean = sum / n;
        let mean = shift + shifted_mean;
        let mut variance = (sum_sq / n - shifted_mean * shifted_mean).max(0.0);
        if variance <= RELATIVE_VARIANCE_FLOOR * mean * mean {
            variance = 0.0;
        }
        out.push(Some(WindowStats { mean, variance }));
    }

    out
}

/// Exact sums of the finite samples in `window`, relative to their mean.
fn rebase(window: &[f64]) -> (f64, f64, f64) {
    let (count, total) = window
        .iter()
        .filter(|v| v.is_finite())
        .fold((0usize, 0.0_f64), |(c, s), v| (c + 1, s + v));
    let shift = if count > 0 { total / count as f64 } else { 0.0 };

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for v in window.iter().filter(|v| v.is_finite()) {
        let x = v - shift;
        sum += x;
        sum_sq += x * x;
    }
    (shift, sum, sum_sq)
}
