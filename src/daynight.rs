//! Day/night classification against today's sunrise and sunset.
//!
//! Every classification re-resolves today's summer time offset, asks the
//! astronomical function for today's sunrise and sunset, caches the results
//! in [`DayNightState`], and compares the current minute of the day against
//! them.
//!
//! ## Cold start
//!
//! Before the first successful lookup both cached values are `0`. With that
//! window every minute after 00:00 counts as "after sunset", so the
//! classifier reports night for every minute except midnight itself. This is
//! the device's long-standing cold-start behaviour and is kept as is.
//!
//! ## Polar conditions
//!
//! When the sun does not rise or set on a given day the previous cached
//! value is kept. Stale-but-valid data is preferred over a sentinel.

use std::fmt;

use crate::constants::MINUTES_PER_DAY;
use crate::dst::{CalendarDate, TimeZoneOffset};
use crate::geo::{Location, SunCalculator, SunEventKind};
use crate::time_source::Clock;

/// Cached sunrise/sunset window plus the settings that shape it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayNightState {
    /// Minutes since midnight of the most recent sunrise lookup.
    pub sunrise_minutes: i32,
    /// Minutes since midnight of the most recent sunset lookup, offset applied.
    pub sunset_minutes: i32,
    /// Fixed sunrise that replaces the computed one when set.
    pub sunrise_override: Option<i32>,
    /// Minutes subtracted from the computed sunset.
    pub sunset_offset_minutes: i32,
    /// Offset resolved on the last classification.
    pub offset: TimeZoneOffset,
}

impl DayNightState {
    /// Pure comparison of a minute of the day against the cached window.
    pub fn is_night_at(&self, current_minutes: i32) -> bool {
        current_minutes > self.sunset_minutes || current_minutes < self.sunrise_minutes
    }
}

impl fmt::Display for DayNightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sunrise: {} Sunset: {}",
            self.sunrise_minutes, self.sunset_minutes
        )
    }
}

/// What the last refresh managed to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    pub sunrise_updated: bool,
    pub sunset_updated: bool,
}

/// Classifies the current time as day or night at a fixed location.
pub struct DayNightClassifier<S: SunCalculator> {
    calculator: S,
    location: Location,
    state: DayNightState,
}

impl<S: SunCalculator> DayNightClassifier<S> {
    pub fn new(calculator: S, location: Location) -> Self {
        Self {
            calculator,
            location,
            state: DayNightState::default(),
        }
    }

    pub fn state(&self) -> &DayNightState {
        &self.state
    }

    pub fn calculator(&self) -> &S {
        &self.calculator
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Minutes taken off the computed sunset, effective on the next call.
    pub fn set_sunset_offset_minutes(&mut self, minutes: i32) {
        self.state.sunset_offset_minutes = minutes;
    }

    /// Fixed sunrise in minutes since midnight, effective on the next call.
    ///
    /// Values of zero or below clear the override.
    pub fn set_sunrise_override_minutes(&mut self, minutes: i32) {
        self.state.sunrise_override = (minutes > 0).then_some(minutes);
    }

    pub fn clear_sunrise_override(&mut self) {
        self.state.sunrise_override = None;
    }

    /// Resolve the offset for `date` and update the cached window.
    pub fn refresh(&mut self, date: CalendarDate) -> Refresh {
        let offset = date.offset();
        self.state.offset = offset;

        let sunrise = self.calculator.sun_event(
            SunEventKind::Sunrise,
            date,
            offset.minutes(),
            self.location,
        );
        if let Some(sunrise) = sunrise {
            log_debug!("Sunrise: {sunrise}");
            self.state.sunrise_minutes = self
                .state
                .sunrise_override
                .unwrap_or_else(|| sunrise.minutes_since_midnight());
        } else {
            log_debug!("No sunrise on {date}, keeping {}", self.state.sunrise_minutes);
        }

        let sunset = self.calculator.sun_event(
            SunEventKind::Sunset,
            date,
            offset.minutes(),
            self.location,
        );
        if let Some(sunset) = sunset {
            log_debug!("Sunset: {sunset}");
            self.state.sunset_minutes = (sunset.minutes_since_midnight()
                - self.state.sunset_offset_minutes)
                .clamp(0, MINUTES_PER_DAY - 1);
        } else {
            log_debug!("No sunset on {date}, keeping {}", self.state.sunset_minutes);
        }

        Refresh {
            sunrise_updated: sunrise.is_some(),
            sunset_updated: sunset.is_some(),
        }
    }

    /// Refresh for the clock's current date and classify its current minute.
    pub fn is_night(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.now();
        self.refresh(now.date());
        self.state.is_night_at(now.minutes_since_midnight())
    }

    /// Classify a minute of the day against the cached window without a lookup.
    pub fn classify(&self, current_minutes: i32) -> bool {
        self.state.is_night_at(current_minutes)
    }

    /// "Sunrise: <min> Sunset: <min>" status line.
    pub fn summary(&self) -> String {
        self.state.to_string()
    }
}
