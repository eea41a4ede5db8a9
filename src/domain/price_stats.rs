//! Summary statistics over a price series, used to pick defaults.

use serde::Serialize;

use super::price::PriceBar;

/// Median close at or below which the small account size is chosen.
pub const SMALL_ACCOUNT_MEDIAN_CEILING: f64 = 5_000.0;
pub const SMALL_ACCOUNT_EQUITY: f64 = 5_000.0;
pub const LARGE_ACCOUNT_EQUITY: f64 = 50_000.0;

const SUGGESTED_THRESHOLD_PERCENTILE: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub rows: usize,
    pub min_close: f64,
    pub median_close: f64,
    pub max_close: f64,
    /// 75th percentile of closes.
    pub suggested_threshold: f64,
}

impl PriceStats {
    /// `None` for an empty series.
    pub fn compute(bars: &[PriceBar]) -> Option<Self> {
        let mut sorted: Vec<f64> = bars.iter().map(|b| b.close).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(PriceStats {
            rows: sorted.len(),
            min_close: sorted[0],
            median_close: percentile_sorted(&sorted, 50.0),
            max_close: sorted[sorted.len() - 1],
            suggested_threshold: percentile_sorted(&sorted, SUGGESTED_THRESHOLD_PERCENTILE),
        })
    }
}

/// Percentile of an ascending slice, interpolating linearly between the two
/// closest ranks. `pct` is clamped to `[0, 100]`.
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => return f64::NAN,
        1 => return sorted[0],
        _ => {}
    }
    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Starting equity sized to the instrument's price level.
pub fn auto_initial_equity(bars: &[PriceBar]) -> f64 {
    match PriceStats::compute(bars) {
        Some(stats) if stats.median_close > SMALL_ACCOUNT_MEDIAN_CEILING => LARGE_ACCOUNT_EQUITY,
        _ => SMALL_ACCOUNT_EQUITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::from_close(start + chrono::Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn stats_of_unsorted_series() {
        let stats = PriceStats::compute(&bars(&[4.0, 1.0, 3.0, 2.0])).unwrap();
        assert_eq!(stats.rows, 4);
        assert_eq!(stats.min_close, 1.0);
        assert_eq!(stats.max_close, 4.0);
        assert_relative_eq!(stats.median_close, 2.5);
        // rank 0.75 * 3 = 2.25 -> 3 + 0.25
        assert_relative_eq!(stats.suggested_threshold, 3.25);
    }

    #[test]
    fn empty_series_has_no_stats() {
        assert!(PriceStats::compute(&[]).is_none());
    }

    #[test]
    fn percentile_edges() {
        assert!(percentile_sorted(&[], 50.0).is_nan());
        assert_eq!(percentile_sorted(&[7.0], 75.0), 7.0);
        assert_eq!(percentile_sorted(&[1.0, 2.0, 3.0], 0.0), 1.0);
        assert_eq!(percentile_sorted(&[1.0, 2.0, 3.0], 100.0), 3.0);
        assert_eq!(percentile_sorted(&[1.0, 2.0, 3.0], 150.0), 3.0);
        assert_eq!(percentile_sorted(&[1.0, 2.0, 3.0], 50.0), 2.0);
    }

    #[test]
    fn auto_equity_by_median() {
        assert_eq!(auto_initial_equity(&bars(&[100.0, 200.0, 300.0])), 5_000.0);
        assert_eq!(auto_initial_equity(&bars(&[4_000.0, 5_000.0, 9_000.0])), 5_000.0);
        assert_eq!(auto_initial_equity(&bars(&[6_000.0, 7_000.0])), 50_000.0);
        assert_eq!(auto_initial_equity(&[]), 5_000.0);
    }
}
