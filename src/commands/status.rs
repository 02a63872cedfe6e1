//! `status`: one resync and one classification, then exit.
//!
//! Prints the synced local date and time ("d/m/yyyy h:m:s") followed by the
//! sunrise/sunset window that produced the day/night answer.

use anyhow::Result;

use crate::config::Config;
use crate::daynight::DayNightClassifier;
use crate::dst::TimeZoneOffset;
use crate::geo::SunCalculator;
use crate::ntp::TimeQuery;
use crate::sync::ClockSync;
use crate::time_source::{Clock, ClockReading, SystemClock};

/// Snapshot produced by a status run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// False when the time server did not answer and the host clock was used.
    pub synced: bool,
    pub reading: ClockReading,
    pub offset: TimeZoneOffset,
    pub night: bool,
    pub summary: String,
}

/// Resync once and classify the resulting clock.
pub fn collect_status<Q: TimeQuery, S: SunCalculator>(
    sync: &ClockSync<Q>,
    classifier: &mut DayNightClassifier<S>,
    clock: &dyn Clock,
) -> StatusReport {
    let synced = match sync.resync(clock) {
        Ok(_) => true,
        Err(e) => {
            log_warning!("{e}");
            false
        }
    };
    let night = classifier.is_night(clock);
    let reading = clock.now();

    StatusReport {
        synced,
        reading,
        offset: reading.date().offset(),
        night,
        summary: classifier.summary(),
    }
}

pub fn handle_status_command(config: &Config) -> Result<()> {
    let sync = super::build_clock_sync(config)?;
    let mut classifier = super::default_classifier(config);
    let clock = SystemClock::new();

    let report = collect_status(&sync, &mut classifier, &clock);

    log_version!();
    log_block_start!(
        "{} {}",
        report.reading.status_line(),
        report.offset.abbreviation()
    );
    if !report.synced {
        log_indented!("Not synced, using host clock");
    }
    log_indented!("{}", report.summary);
    log_indented!("It is {}", if report.night { "night" } else { "day" });
    log_end!();
    Ok(())
}
