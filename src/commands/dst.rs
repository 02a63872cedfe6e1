//! `dst <year>`: print the EU summer time changeover days of a year.

use crate::dst::{TimeZoneOffset, transitions};

/// Changeover summary for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DstReport {
    pub year: i32,
    pub starts: String,
    pub ends: String,
}

pub fn dst_report(year: i32) -> DstReport {
    let (starts, ends) = transitions(year);
    DstReport {
        year,
        starts: starts.to_string(),
        ends: ends.to_string(),
    }
}

pub fn handle_dst_command(year: i32) {
    let report = dst_report(year);

    log_version!();
    log_block_start!("Summer time in {}", report.year);
    log_indented!(
        "{} → {} from {}",
        TimeZoneOffset::Standard,
        TimeZoneOffset::Summer,
        report.starts
    );
    log_indented!(
        "{} → {} from {}",
        TimeZoneOffset::Summer,
        TimeZoneOffset::Standard,
        report.ends
    );
    log_end!();
}
