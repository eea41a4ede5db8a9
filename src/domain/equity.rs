//! Equity curve reconstruction from realized trade P&L.
//!
//! Equity is cash-based: it starts at the initial equity and only moves on the
//! business days on which trades exit. Open positions are not marked to market.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::calendar::business_days;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// One point per business day in `[first, last]`.
///
/// The first day is written once before and once after applying its P&L; the
/// later write wins when duplicate dates are collapsed. P&L dated on a
/// non-business day is booked on the next calendar day, or on the last day
/// when none follows. P&L dated before the first calendar day is booked on the
/// second one, so the curve still opens at `initial_equity`.
pub fn build_equity_curve(
    first: NaiveDate,
    last: NaiveDate,
    pnl_by_date: &BTreeMap<NaiveDate, f64>,
    initial_equity: f64,
) -> Vec<EquityPoint> {
    let calendar = business_days(first, last);
    let booked = book_onto_calendar(&calendar, pnl_by_date);

    let mut equity = initial_equity;
    let mut points: Vec<EquityPoint> = Vec::with_capacity(calendar.len() + 1);
    for (i, &date) in calendar.iter().enumerate() {
        if i == 0 {
            points.push(EquityPoint { date, equity });
        }
        equity += booked.get(&date).copied().unwrap_or(0.0);
        points.push(EquityPoint { date, equity });
    }

    dedup_keep_last(points)
}

fn book_onto_calendar(
    calendar: &[NaiveDate],
    pnl_by_date: &BTreeMap<NaiveDate, f64>,
) -> BTreeMap<NaiveDate, f64> {
    let mut booked = BTreeMap::new();
    let (Some(&first_day), Some(&last_day)) = (calendar.first(), calendar.last()) else {
        return booked;
    };
    for (&date, &pnl) in pnl_by_date {
        let idx = match calendar.partition_point(|d| *d < date) {
            0 if date < first_day => 1,
            idx => idx,
        };
        let day = calendar.get(idx).copied().unwrap_or(last_day);
        *booked.entry(day).or_insert(0.0) += pnl;
    }
    booked
}

fn dedup_keep_last(points: Vec<EquityPoint>) -> Vec<EquityPoint> {
    let mut out: Vec<EquityPoint> = Vec::with_capacity(points.len());
    for point in points {
        match out.last_mut() {
            Some(prev) if prev.date == point.date => *prev = point,
            _ => out.push(point),
        }
    }
    out
}
