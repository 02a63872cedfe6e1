use chrono::{Datelike, NaiveDate, Weekday};
use proptest::prelude::*;
use sunclock::dst::{
    TimeZoneOffset, days_in_month, is_summer_time_in_effect, last_sunday_of_month, resolve_offset,
    transitions,
};

fn year_strategy() -> impl Strategy<Value = i32> {
    1901..=2099i32
}

fn month_strategy() -> impl Strategy<Value = u32> {
    1..=12u32
}

proptest! {
    /// The computed day is a Sunday and no later Sunday exists in the month
    #[test]
    fn test_last_sunday_is_last_sunday(year in year_strategy(), month in month_strategy()) {
        let day = last_sunday_of_month(year, month);
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();

        prop_assert_eq!(date.weekday(), Weekday::Sun);
        prop_assert!(day + 7 > days_in_month(year, month));
    }

    /// Summer time is one contiguous block per year starting in March and
    /// ending in October
    #[test]
    fn test_single_summer_block(year in year_strategy()) {
        let mut changes = Vec::new();
        let mut previous = false;
        let mut date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        while date.year() == year {
            let summer = is_summer_time_in_effect(year, date.month(), date.day());
            if summer != previous {
                changes.push((date.month(), date.day(), summer));
                previous = summer;
            }
            date = date.succ_opt().unwrap();
        }

        let (starts, ends) = transitions(year);
        prop_assert_eq!(
            changes,
            vec![(3, starts.day, true), (10, ends.day, false)]
        );
    }

    #[test]
    fn test_changeover_days_inclusive_exclusive(year in year_strategy()) {
        let march = last_sunday_of_month(year, 3);
        let october = last_sunday_of_month(year, 10);

        prop_assert_eq!(resolve_offset(year, 3, march - 1), TimeZoneOffset::Standard);
        prop_assert_eq!(resolve_offset(year, 3, march), TimeZoneOffset::Summer);
        prop_assert_eq!(resolve_offset(year, 10, october - 1), TimeZoneOffset::Summer);
        prop_assert_eq!(resolve_offset(year, 10, october), TimeZoneOffset::Standard);
    }

    #[test]
    fn test_months_outside_changeover_are_fixed(
        year in year_strategy(),
        day in 1..=28u32
    ) {
        for month in [1, 2, 11, 12] {
            prop_assert!(!is_summer_time_in_effect(year, month, day));
        }
        for month in 4..=9 {
            prop_assert!(is_summer_time_in_effect(year, month, day));
        }
    }
}

#[test]
fn test_documented_dates() {
    assert!(!is_summer_time_in_effect(2024, 1, 15));
    assert!(is_summer_time_in_effect(2024, 7, 1));
    assert!(!is_summer_time_in_effect(2024, 12, 31));
    assert!(is_summer_time_in_effect(2024, 3, 31));
    assert!(!is_summer_time_in_effect(2024, 10, 28));

    // The day before each changeover still has the old offset
    assert!(!is_summer_time_in_effect(2024, 3, 30));
    assert!(is_summer_time_in_effect(2024, 10, 26));
    assert!(!is_summer_time_in_effect(2024, 10, 27));
}

#[test]
fn test_offset_hours() {
    assert_eq!(resolve_offset(2024, 1, 15).hours(), 1);
    assert_eq!(resolve_offset(2024, 7, 1).hours(), 2);
}
