//! Business-day calendar (Monday through Friday, no holiday table).

use chrono::{Datelike, NaiveDate, Weekday};

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every business day in `[start, end]`, ascending. Empty if `start > end`.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d))
        .collect()
}

/// Number of business days in `[start, end]`, computed without iterating.
pub fn count_business_days(start: NaiveDate, end: NaiveDate) -> usize {
    if start > end {
        return 0;
    }
    let total = (end - start).num_days() + 1;
    let full_weeks = total / 7;
    let mut count = full_weeks * 5;
    let mut day = start + chrono::Duration::days(full_weeks * 7);
    while day <= end {
        if is_business_day(day) {
            count += 1;
        }
        day = day + chrono::Duration::days(1);
    }
    count as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekends_are_not_business_days() {
        // 2024-01-06 is a Saturday.
        assert!(is_business_day(d(2024, 1, 5)));
        assert!(!is_business_day(d(2024, 1, 6)));
        assert!(!is_business_day(d(2024, 1, 7)));
        assert!(is_business_day(d(2024, 1, 8)));
    }

    #[test]
    fn business_days_span_inclusive() {
        let days = business_days(d(2024, 1, 4), d(2024, 1, 9));
        assert_eq!(
            days,
            vec![d(2024, 1, 4), d(2024, 1, 5), d(2024, 1, 8), d(2024, 1, 9)]
        );
    }

    #[test]
    fn single_day_and_reversed_ranges() {
        assert_eq!(business_days(d(2024, 1, 8), d(2024, 1, 8)), vec![d(2024, 1, 8)]);
        assert!(business_days(d(2024, 1, 6), d(2024, 1, 7)).is_empty());
        assert!(business_days(d(2024, 1, 9), d(2024, 1, 8)).is_empty());
    }

    #[test]
    fn count_matches_enumeration() {
        let start = d(2023, 12, 28);
        for len in 0..40 {
            let end = start + chrono::Duration::days(len);
            assert_eq!(
                count_business_days(start, end),
                business_days(start, end).len(),
                "span of {len} days"
            );
        }
        assert_eq!(count_business_days(d(2024, 1, 9), d(2024, 1, 8)), 0);
    }
}
