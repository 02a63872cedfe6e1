//! Clock synchronisation against an NTP server.
//!
//! A resync fetches UTC seconds, applies the CET/CEST offset that applies on
//! that UTC date, and installs the result as the process clock. Any failure
//! leaves the clock untouched.

use chrono::DateTime;
use std::fmt;
use std::time::Duration;

use crate::dst::{CalendarDate, TimeZoneOffset};
use crate::ntp::{TimeQuery, ntp_to_unix};
use crate::time_source::Clock;

/// Failures of a single resync attempt. None of them are fatal.
#[derive(Debug)]
pub enum SyncError {
    /// No usable reply before the deadline.
    Timeout { server: String, timeout: Duration },
    /// The server name did not resolve to a usable address.
    Resolve { server: String, reason: String },
    /// The server reported a time before 1970.
    PreEpoch { ntp_seconds: u32 },
    /// Socket error while sending or receiving.
    Io(std::io::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Timeout { server, timeout } => write!(
                f,
                "No NTP response from {server} within {}ms",
                timeout.as_millis()
            ),
            SyncError::Resolve { server, reason } => {
                write!(f, "Could not resolve {server}: {reason}")
            }
            SyncError::PreEpoch { ntp_seconds } => {
                write!(f, "NTP time {ntp_seconds} is before 1970")
            }
            SyncError::Io(e) => write!(f, "NTP socket error: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(e: std::io::Error) -> Self {
        SyncError::Io(e)
    }
}

/// Offset in force at a UTC instant, judged by its UTC calendar date.
pub fn offset_for_utc(unix_seconds: i64) -> TimeZoneOffset {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| CalendarDate::from(dt.date_naive()).offset())
        .unwrap_or_default()
}

/// Converts UTC seconds into local epoch seconds.
pub fn to_local_epoch(unix_seconds: i64) -> i64 {
    unix_seconds + offset_for_utc(unix_seconds).seconds()
}

/// Periodically resyncs the process clock from one server.
pub struct ClockSync<Q: TimeQuery> {
    client: Q,
    server: String,
    timeout: Duration,
}

impl<Q: TimeQuery> ClockSync<Q> {
    pub fn new(client: Q, server: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            server: server.into(),
            timeout,
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the time and install it. Returns the new local epoch.
    pub fn resync(&self, clock: &dyn Clock) -> Result<i64, SyncError> {
        let ntp_seconds = self.client.query(&self.server, self.timeout)?;
        let unix = ntp_to_unix(ntp_seconds).ok_or(SyncError::PreEpoch { ntp_seconds })?;
        let local = to_local_epoch(unix);
        clock.set(local);
        Ok(local)
    }

    /// Resync and log the outcome, keeping the previous clock on failure.
    pub fn resync_or_keep(&self, clock: &dyn Clock) -> Option<i64> {
        match self.resync(clock) {
            Ok(epoch) => {
                let now = clock.now();
                log_decorated!(
                    "Clock synced from {}: {} {}",
                    self.server,
                    now.status_line(),
                    now.date().offset().abbreviation()
                );
                Some(epoch)
            }
            Err(e) => {
                log_warning!("{e}");
                log_indented!("Keeping previous clock: {}", clock.now().status_line());
                None
            }
        }
    }
}
