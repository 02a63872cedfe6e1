//! Sunrise and sunset times for a fixed location.
//!
//! Event times come from the `sunrise` crate in UTC and are shifted into the
//! requested offset. Days on which the sun stays above or below the horizon
//! report no event.

use chrono::{Duration, Timelike};
use std::fmt;

use crate::dst::CalendarDate;

/// Horizon altitude used for sunrise/sunset (refraction plus solar radius).
const HORIZON_DEGREES: f64 = -0.833;

/// Maximum solar declination (axial tilt).
const AXIAL_TILT_DEGREES: f64 = 23.44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunEventKind {
    Sunrise,
    Sunset,
}

impl fmt::Display for SunEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SunEventKind::Sunrise => write!(f, "Sunrise"),
            SunEventKind::Sunset => write!(f, "Sunset"),
        }
    }
}

/// Local time of a solar event, minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTime {
    pub hour: u32,
    pub minute: u32,
}

impl SunTime {
    pub const fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub const fn minutes_since_midnight(&self) -> i32 {
        (self.hour * 60 + self.minute) as i32
    }
}

impl fmt::Display for SunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hour, self.minute)
    }
}

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_LATITUDE,
            crate::constants::DEFAULT_LONGITUDE,
        )
    }
}

/// Source of daily sunrise/sunset times.
///
/// `None` means the event does not happen on that date at that location.
#[cfg_attr(test, mockall::automock)]
pub trait SunCalculator {
    fn sun_event(
        &self,
        kind: SunEventKind,
        date: CalendarDate,
        tz_offset_minutes: i32,
        location: Location,
    ) -> Option<SunTime>;
}

/// `SunCalculator` backed by the `sunrise` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SunriseCalculator;

impl SunCalculator for SunriseCalculator {
    fn sun_event(
        &self,
        kind: SunEventKind,
        date: CalendarDate,
        tz_offset_minutes: i32,
        location: Location,
    ) -> Option<SunTime> {
        use sunrise::{Coordinates, SolarDay, SolarEvent};

        let naive_date = date.to_naive()?;
        let coord = Coordinates::new(location.latitude, location.longitude)?;

        if !sun_crosses_horizon(location.latitude, naive_date) {
            return None;
        }

        let event = match kind {
            SunEventKind::Sunrise => SolarEvent::Sunrise,
            SunEventKind::Sunset => SolarEvent::Sunset,
        };
        let utc = SolarDay::new(coord, naive_date).event_time(event);
        let local = utc.naive_utc() + Duration::minutes(tz_offset_minutes as i64);

        // Events that spill into a neighbouring day are not today's event
        if local.date() != naive_date {
            return None;
        }

        Some(SunTime::new(local.hour(), local.minute()))
    }
}

/// Whether the sun rises and sets at all on `date` at `latitude`.
///
/// Uses the cosine of the sunrise hour angle; outside [-1, 1] the sun
/// stays up (polar day) or down (polar night) the whole day.
pub fn sun_crosses_horizon(latitude: f64, date: chrono::NaiveDate) -> bool {
    use chrono::Datelike;

    let day_of_year = date.ordinal() as f64;
    let declination = -AXIAL_TILT_DEGREES.to_radians()
        * ((360.0 / 365.0) * (day_of_year + 10.0)).to_radians().cos();
    let phi = latitude.to_radians();

    let cos_hour_angle = (HORIZON_DEGREES.to_radians().sin() - phi.sin() * declination.sin())
        / (phi.cos() * declination.cos());

    cos_hour_angle.is_finite() && (-1.0..=1.0).contains(&cos_hour_angle)
}
