//! Rolling z-score.
//!
//! Uses the population standard deviation over n closing prices:
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) bars are NaN.

use super::rolling_stats;

/// z[i] = (C[i] - mean[i]) / std[i]. NaN while the window is filling and
/// wherever the standard deviation is zero.
pub fn zscore(values: &[f64], period: usize) -> Vec<f64> {
    rolling_stats(values, period)
        .into_iter()
        .zip(values.iter())
        .map(|(stats, &v)| match stats {
            Some(s) if s.variance > 0.0 => (v - s.mean) / s.variance.sqrt(),
            _ => f64::NAN,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::{naive_stats, random_walk};

    #[test]
    fn zscore_known_values() {
        // Window mean 5, population std 2.
        let out = zscore(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        assert!(out[..7].iter().all(|v| v.is_nan()));
        assert!((out[7] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn zscore_basic_calculation() {
        let out = zscore(&[10.0, 20.0, 30.0], 3);
        let sma: f64 = 20.0;
        let std = (((10.0 - sma).powi(2) + (20.0 - sma).powi(2) + (30.0 - sma).powi(2))
            / 3.0)
            .sqrt();
        assert!((out[2] - (30.0 - sma) / std).abs() < 1e-10);
    }

    #[test]
    fn zscore_constant_window_is_nan() {
        let out = zscore(&[100.0, 100.0, 100.0, 100.0], 3);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn zscore_matches_definition() {
        let values = random_walk(300, 11);
        let out = zscore(&values, 10);
        for i in 9..values.len() {
            let (mean, var) = naive_stats(&values[i - 9..=i]);
            if var > 0.0 {
                let expected = (values[i] - mean) / var.sqrt();
                assert!((out[i] - expected).abs() < 1e-6, "z mismatch at {i}");
            }
        }
    }

    #[test]
    fn zscore_of_sharp_drop_is_negative() {
        let out = zscore(&[10.0, 10.0, 10.0, 10.0, 5.0], 5);
        // mean 9, population std 2
        assert!((out[4] - (-2.0)).abs() < 1e-12);
    }
}
