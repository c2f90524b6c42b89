// 🗓️ Calendar Arithmetic - Annual recurrence around a reference date
// Records carry (month, day) only; the year always comes from "today".

use crate::error::{CalendarError, Result};
use chrono::{Datelike, Days, NaiveDate};

// ============================================================================
// DATE CONSTRUCTION
// ============================================================================

/// Place (month, day) in `year`, rolling overflowing days forward
///
/// Feb 29 in a common year lands on Mar 1, Apr 31 on May 1. Records are
/// validated to 1..=31, so every validated item has a date in every year.
pub fn annual_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    if day == 0 {
        return Err(CalendarError::InvalidDate { month, day });
    }

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day) - 1)))
        .ok_or(CalendarError::InvalidDate { month, day })
}

/// The next occurrence of (month, day) on or after `reference`
pub fn next_occurrence(month: u32, day: u32, reference: NaiveDate) -> Result<NaiveDate> {
    let candidate = annual_date(reference.year(), month, day)?;
    if candidate < reference {
        annual_date(reference.year() + 1, month, day)
    } else {
        Ok(candidate)
    }
}

// ============================================================================
// DISTANCE FROM REFERENCE
// ============================================================================

/// Signed day offset of (month, day) from `reference`
///
/// Dates later this year are positive. Dates that passed at most
/// `past_window_days` ago stay negative so they sort ahead of the future.
/// Anything older counts as next year's occurrence.
pub fn days_from_reference(
    month: u32,
    day: u32,
    reference: NaiveDate,
    past_window_days: i64,
) -> Result<i64> {
    let this_year = annual_date(reference.year(), month, day)?;
    let offset = this_year.signed_duration_since(reference).num_days();

    if offset >= 0 || -offset <= past_window_days {
        return Ok(offset);
    }

    let next_year = annual_date(reference.year() + 1, month, day)?;
    Ok(next_year.signed_duration_since(reference).num_days())
}

// ============================================================================
// ISO WEEK
// ============================================================================

/// ISO-8601 week number of the upcoming occurrence of (month, day)
///
/// The week belongs to the year holding its Thursday; week 1 is the one
/// containing that year's first Thursday.
pub fn iso_week_number(month: u32, day: u32, reference: NaiveDate) -> Result<u32> {
    let date = next_occurrence(month, day, reference)?;
    Ok(iso_week_of(date))
}

/// ISO-8601 week number of a concrete date
pub fn iso_week_of(date: NaiveDate) -> u32 {
    let weekday = date.weekday().num_days_from_monday() as i64;
    let thursday = date + chrono::Duration::days(3 - weekday);
    thursday.ordinal0() / 7 + 1
}

/// Machine-readable `MM-DD` attribute for a (month, day) label
pub fn datetime_attribute(month: u32, day: u32) -> String {
    format!("{:02}-{:02}", month, day)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_annual_date_rolls_overflow_forward() {
        assert_eq!(annual_date(2025, 2, 29).unwrap(), date(2025, 3, 1));
        assert_eq!(annual_date(2024, 2, 29).unwrap(), date(2024, 2, 29));
        assert_eq!(annual_date(2024, 4, 31).unwrap(), date(2024, 5, 1));
        assert_eq!(annual_date(2024, 12, 31).unwrap(), date(2024, 12, 31));
    }

    #[test]
    fn test_annual_date_rejects_impossible_input() {
        assert!(annual_date(2024, 0, 1).is_err());
        assert!(annual_date(2024, 13, 1).is_err());
        assert!(annual_date(2024, 1, 0).is_err());
    }

    #[test]
    fn test_days_from_reference_future() {
        let today = date(2024, 1, 1);
        assert_eq!(days_from_reference(1, 1, today, 0).unwrap(), 0);
        assert_eq!(days_from_reference(1, 5, today, 0).unwrap(), 4);
        assert_eq!(days_from_reference(2, 1, today, 0).unwrap(), 31);
    }

    #[test]
    fn test_days_from_reference_rolls_elapsed_dates() {
        let today = date(2024, 3, 10);
        // Mar 1 2025 is 356 days after Mar 10 2024
        assert_eq!(days_from_reference(3, 1, today, 0).unwrap(), 356);
    }

    #[test]
    fn test_days_from_reference_past_window() {
        let today = date(2024, 3, 10);
        assert_eq!(days_from_reference(3, 8, today, 7).unwrap(), -2);
        assert_eq!(days_from_reference(3, 3, today, 7).unwrap(), -7);
        // Eight days ago is outside a seven day window
        assert!(days_from_reference(3, 2, today, 7).unwrap() > 0);
    }

    #[test]
    fn test_iso_week_reference_values() {
        assert_eq!(iso_week_number(1, 1, date(2024, 1, 1)).unwrap(), 1);
        assert_eq!(iso_week_number(12, 31, date(2023, 12, 31)).unwrap(), 52);
    }

    #[test]
    fn test_iso_week_year_boundaries() {
        // 2026-01-01 is a Thursday: week 1 of 2026
        assert_eq!(iso_week_number(1, 1, date(2026, 1, 1)).unwrap(), 1);
        // 2024-12-30 is a Monday in 2025-W01
        assert_eq!(iso_week_number(12, 30, date(2024, 12, 1)).unwrap(), 1);
        // 2021-01-03 is a Sunday in 2020-W53
        assert_eq!(iso_week_number(1, 3, date(2021, 1, 1)).unwrap(), 53);
    }

    #[test]
    fn test_iso_week_uses_upcoming_occurrence() {
        // Jan 1 seen from mid-2024 is Jan 1 2025, a Wednesday in 2025-W01
        assert_eq!(iso_week_number(1, 1, date(2024, 6, 1)).unwrap(), 1);
        // Jun 3 seen from Jun 4 2024 is Jun 3 2025, 2025-W23
        assert_eq!(iso_week_number(6, 3, date(2024, 6, 4)).unwrap(), 23);
    }

    #[test]
    fn test_datetime_attribute_padding() {
        assert_eq!(datetime_attribute(1, 5), "01-05");
        assert_eq!(datetime_attribute(12, 31), "12-31");
    }

    proptest! {
        #[test]
        fn prop_iso_week_matches_chrono(days in 0i64..(366 * 40)) {
            let day = date(1995, 1, 1) + chrono::Duration::days(days);
            prop_assert_eq!(iso_week_of(day), day.iso_week().week());
        }

        #[test]
        fn prop_days_from_reference_nonnegative_without_window(
            month in 1u32..=12,
            day in 1u32..=31,
            offset in 0i64..3650,
        ) {
            let today = date(2020, 1, 1) + chrono::Duration::days(offset);
            let distance = days_from_reference(month, day, today, 0).unwrap();
            prop_assert!(distance >= 0);
            prop_assert!(distance <= 366);
        }
    }
}
