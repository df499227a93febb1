// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Consecutive-day logging streaks.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Number of consecutive days with at least one trip, ending at `today`.
///
/// If `today` has no entry yet the streak may end yesterday instead. That
/// grace applies only to the most recent date: any later gap ends the run.
/// Dates after `today` end the scan immediately.
///
/// Each date is compared with the previously counted day, not with the
/// running count. Comparing `today - date` against the count would stop
/// every streak at two days, so don't "simplify" this back to that form.
/// A run of yesterday and the day before is a streak of 2.
pub fn calculate_streak_on<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut streak = 0;
    let mut cursor = today;

    for date in unique.into_iter().rev() {
        let gap = (cursor - date).num_days();
        // Distance from the last counted day; the first date is compared to today.
        let expected = if streak == 0 { 0 } else { 1 };

        if gap == expected || (gap == expected + 1 && streak == 0) {
            streak += 1;
            cursor = date;
        } else {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn days_ago(offsets: &[i64]) -> Vec<NaiveDate> {
        offsets.iter().map(|d| today() - Duration::days(*d)).collect()
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(calculate_streak_on(Vec::new(), today()), 0);
    }

    #[test]
    fn test_three_days_ending_today() {
        assert_eq!(calculate_streak_on(days_ago(&[0, 1, 2]), today()), 3);
    }

    #[test]
    fn test_today_missing_counts_from_yesterday() {
        assert_eq!(calculate_streak_on(days_ago(&[1, 2]), today()), 2);
        assert_eq!(calculate_streak_on(days_ago(&[1, 2, 3, 4]), today()), 4);
    }

    #[test]
    fn test_gap_after_today_ends_streak() {
        assert_eq!(calculate_streak_on(days_ago(&[0, 2]), today()), 1);
    }

    #[test]
    fn test_grace_only_applies_to_most_recent_day() {
        // yesterday, then a one-day hole
        assert_eq!(calculate_streak_on(days_ago(&[1, 3, 4]), today()), 1);
    }

    #[test]
    fn test_last_entry_two_days_ago_is_broken() {
        assert_eq!(calculate_streak_on(days_ago(&[2, 3, 4]), today()), 0);
    }

    #[test]
    fn test_duplicates_and_order_ignored() {
        let dates = days_ago(&[2, 0, 1, 0, 1, 6]);
        assert_eq!(calculate_streak_on(dates, today()), 3);
    }

    #[test]
    fn test_week_long_streak() {
        let dates = days_ago(&[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(calculate_streak_on(dates, today()), 7);
    }

    #[test]
    fn test_future_date_ends_scan() {
        let dates = days_ago(&[-1, 0, 1]);
        assert_eq!(calculate_streak_on(dates, today()), 0);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        ];
        assert_eq!(calculate_streak_on(dates, today), 3);
    }
}
