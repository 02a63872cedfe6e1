use super::solar::sun_crosses_horizon;
use super::*;
use crate::dst::{CalendarDate, TimeZoneOffset};
use chrono::NaiveDate;

const SVALBARD: Location = Location::new(78.2232, 15.6267);

fn event(kind: SunEventKind, date: CalendarDate, location: Location) -> Option<SunTime> {
    SunriseCalculator.sun_event(kind, date, date.offset().minutes(), location)
}

#[test]
fn test_summer_solstice_at_default_location() {
    let date = CalendarDate::new(2024, 6, 21);
    assert_eq!(date.offset(), TimeZoneOffset::Summer);

    let sunrise = event(SunEventKind::Sunrise, date, Location::default()).unwrap();
    let sunset = event(SunEventKind::Sunset, date, Location::default()).unwrap();

    assert!((6..=7).contains(&sunrise.hour), "sunrise {sunrise}");
    assert!((21..=22).contains(&sunset.hour), "sunset {sunset}");
}

#[test]
fn test_winter_solstice_at_default_location() {
    let date = CalendarDate::new(2024, 12, 21);
    assert_eq!(date.offset(), TimeZoneOffset::Standard);

    let sunrise = event(SunEventKind::Sunrise, date, Location::default()).unwrap();
    let sunset = event(SunEventKind::Sunset, date, Location::default()).unwrap();

    assert!((8..=9).contains(&sunrise.hour), "sunrise {sunrise}");
    assert!((17..=18).contains(&sunset.hour), "sunset {sunset}");
    assert!(sunrise.minutes_since_midnight() < sunset.minutes_since_midnight());
}

#[test]
fn test_offset_shifts_event_time() {
    let date = CalendarDate::new(2024, 5, 1);
    let standard = SunriseCalculator
        .sun_event(SunEventKind::Sunset, date, 60, Location::default())
        .unwrap();
    let summer = SunriseCalculator
        .sun_event(SunEventKind::Sunset, date, 120, Location::default())
        .unwrap();

    assert_eq!(
        summer.minutes_since_midnight() - standard.minutes_since_midnight(),
        60
    );
}

#[test]
fn test_polar_night_has_no_events() {
    let date = CalendarDate::new(2024, 12, 21);
    assert_eq!(event(SunEventKind::Sunrise, date, SVALBARD), None);
    assert_eq!(event(SunEventKind::Sunset, date, SVALBARD), None);
}

#[test]
fn test_polar_day_has_no_events() {
    let date = CalendarDate::new(2024, 6, 21);
    assert_eq!(event(SunEventKind::Sunrise, date, SVALBARD), None);
    assert_eq!(event(SunEventKind::Sunset, date, SVALBARD), None);
}

#[test]
fn test_invalid_inputs_have_no_events() {
    let bad_date = CalendarDate::new(2024, 2, 30);
    assert_eq!(event(SunEventKind::Sunrise, bad_date, Location::default()), None);

    let bad_location = Location::new(123.0, 0.0);
    let date = CalendarDate::new(2024, 6, 21);
    assert_eq!(event(SunEventKind::Sunrise, date, bad_location), None);
}

#[test]
fn test_sun_crosses_horizon() {
    let june = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let december = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();

    assert!(sun_crosses_horizon(0.0, june));
    assert!(sun_crosses_horizon(42.86, june));
    assert!(sun_crosses_horizon(42.86, december));
    assert!(!sun_crosses_horizon(78.22, june));
    assert!(!sun_crosses_horizon(-78.22, december));
    assert!(!sun_crosses_horizon(90.0, june));
}

#[test]
fn test_sun_time_display() {
    assert_eq!(SunTime::new(7, 5).to_string(), "7:5");
    assert_eq!(SunTime::new(18, 0).minutes_since_midnight(), 1080);
    assert_eq!(SunEventKind::Sunset.to_string(), "Sunset");
}
