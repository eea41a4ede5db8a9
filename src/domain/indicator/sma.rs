//! Simple moving average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]); NaN for the first n-1 bars.

use super::rolling_stats;

pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    rolling_stats(values, period)
        .into_iter()
        .map(|s| s.map_or(f64::NAN, |s| s.mean))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup_is_nan() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[2] - 2.0).abs() < 1e-12);
        assert!((out[3] - 3.0).abs() < 1e-12);
        assert!((out[4] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn sma_period_one_is_identity() {
        let values = [3.0, 1.5, 7.25];
        let out = sma(&values, 1);
        for (a, b) in out.iter().zip(values.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn sma_longer_than_series() {
        let out = sma(&[1.0, 2.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }
}
