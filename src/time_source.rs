//! Process clock abstraction.
//!
//! The device keeps its own notion of local wall-clock time: an epoch value
//! installed by the last successful NTP sync, advanced by a monotonic timer
//! in between. The `Clock` trait lets the runtime use that clock while tests
//! and the `simulate` command drive a manually stepped one.
//!
//! Epoch values handled here are *local* epoch seconds, i.e. UTC seconds with
//! the CET/CEST offset already added, so broken-down fields read directly as
//! local wall-clock time.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::dst::CalendarDate;

/// Broken-down reading of the process clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl ClockReading {
    /// Break down a local epoch value. Out-of-range values clamp to the epoch.
    pub fn from_epoch(epoch: i64) -> Self {
        let dt = DateTime::from_timestamp(epoch, 0)
            .unwrap_or_default()
            .naive_utc();
        Self::from_naive(dt)
    }

    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            second: dt.second(),
            minute: dt.minute(),
            hour: dt.hour(),
            day: dt.day(),
            month: dt.month(),
            year: dt.year(),
        }
    }

    pub fn date(&self) -> CalendarDate {
        CalendarDate::new(self.year, self.month, self.day)
    }

    pub fn minutes_since_midnight(&self) -> i32 {
        (self.hour * 60 + self.minute) as i32
    }

    /// `d/m/yyyy h:m:s`, unpadded, as the device status line shows it.
    pub fn status_line(&self) -> String {
        format!(
            "{}/{}/{} {}:{}:{}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

/// Trait for the process-wide clock.
pub trait Clock: Send + Sync {
    /// Current local epoch seconds.
    fn epoch(&self) -> i64;

    /// Install a new local epoch value.
    fn set(&self, epoch: i64);

    /// Whether `set` has been called at least once.
    fn is_set(&self) -> bool;

    fn now(&self) -> ClockReading {
        ClockReading::from_epoch(self.epoch())
    }
}

#[derive(Debug)]
struct Anchor {
    epoch: i64,
    at: Instant,
    synced: bool,
}

/// Clock advanced by the host's monotonic timer between syncs.
///
/// Until the first sync it runs off the host's UTC time shifted by the
/// CET/CEST offset in effect, so readings are plausible even when the
/// network is down.
#[derive(Debug)]
pub struct SystemClock {
    anchor: Mutex<Anchor>,
}

impl SystemClock {
    pub fn new() -> Self {
        let epoch = crate::sync::to_local_epoch(Utc::now().timestamp());
        Self {
            anchor: Mutex::new(Anchor {
                epoch,
                at: Instant::now(),
                synced: false,
            }),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn epoch(&self) -> i64 {
        let anchor = self.anchor.lock().unwrap_or_else(|e| e.into_inner());
        anchor.epoch + anchor.at.elapsed().as_secs() as i64
    }

    fn set(&self, epoch: i64) {
        let mut anchor = self.anchor.lock().unwrap_or_else(|e| e.into_inner());
        anchor.epoch = epoch;
        anchor.at = Instant::now();
        anchor.synced = true;
    }

    fn is_set(&self) -> bool {
        self.anchor.lock().map(|a| a.synced).unwrap_or(false)
    }
}

/// Manually stepped clock for tests and simulation.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch: Mutex<i64>,
    synced: Mutex<bool>,
}

impl ManualClock {
    pub fn new(epoch: i64) -> Self {
        Self {
            epoch: Mutex::new(epoch),
            synced: Mutex::new(false),
        }
    }

    /// Start at a local wall-clock time.
    pub fn at(dt: NaiveDateTime) -> Self {
        Self::new(dt.and_utc().timestamp())
    }

    pub fn advance(&self, by: Duration) {
        let mut epoch = self.epoch.lock().unwrap_or_else(|e| e.into_inner());
        *epoch += by.as_secs() as i64;
    }
}

impl Clock for ManualClock {
    fn epoch(&self) -> i64 {
        *self.epoch.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set(&self, epoch: i64) {
        *self.epoch.lock().unwrap_or_else(|e| e.into_inner()) = epoch;
        *self.synced.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }

    fn is_set(&self) -> bool {
        *self.synced.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parse a local datetime string in the format "YYYY-MM-DD HH:MM"
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map_err(|e| format!("Invalid datetime format: {e}. Use YYYY-MM-DD HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_reading_from_epoch() {
        let reading = ClockReading::from_epoch(local(2024, 3, 31, 7, 5, 9).and_utc().timestamp());
        assert_eq!(
            reading,
            ClockReading {
                second: 9,
                minute: 5,
                hour: 7,
                day: 31,
                month: 3,
                year: 2024,
            }
        );
        assert_eq!(reading.minutes_since_midnight(), 425);
        assert_eq!(reading.date(), CalendarDate::new(2024, 3, 31));
        assert_eq!(reading.status_line(), "31/3/2024 7:5:9");
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::at(local(2024, 6, 1, 23, 59, 0));
        assert!(!clock.is_set());

        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now().date(), CalendarDate::new(2024, 6, 2));
        assert_eq!(clock.now().minutes_since_midnight(), 0);

        clock.set(local(2025, 1, 1, 12, 0, 0).and_utc().timestamp());
        assert!(clock.is_set());
        assert_eq!(clock.now().hour, 12);
    }

    #[test]
    fn test_system_clock_set_installs_epoch() {
        let clock = SystemClock::new();
        assert!(!clock.is_set());

        let epoch = local(2024, 10, 27, 1, 0, 0).and_utc().timestamp();
        clock.set(epoch);
        assert!(clock.is_set());
        let drift = clock.epoch() - epoch;
        assert!((0..=1).contains(&drift));
    }

    #[test]
    fn test_system_clock_starts_on_local_time() {
        let before = crate::sync::to_local_epoch(Utc::now().timestamp());
        let clock = SystemClock::new();
        let after = crate::sync::to_local_epoch(Utc::now().timestamp());

        let epoch = clock.epoch();
        assert!(!clock.is_set());
        assert!((before..=after + 1).contains(&epoch), "{epoch}");
    }

    #[test]
    fn test_parse_datetime() {
        assert_eq!(
            parse_datetime("2024-03-31 06:30").unwrap(),
            local(2024, 3, 31, 6, 30, 0)
        );
        assert_eq!(
            parse_datetime("2024-03-31 06:30:15").unwrap(),
            local(2024, 3, 31, 6, 30, 15)
        );
        assert!(parse_datetime("31/03/2024").is_err());
    }
}
