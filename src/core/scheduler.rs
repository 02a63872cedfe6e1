//! Next-due bookkeeping for the device loop.
//!
//! Two independent periodic jobs share one loop: clock resyncs and day/night
//! checks. The scheduler only answers "what is due at this instant" and "how
//! long until something is due"; the loop owns the clock and does the work.

use std::time::{Duration, Instant};

/// Jobs due at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Due {
    pub sync: bool,
    pub check: bool,
}

impl Due {
    pub fn any(&self) -> bool {
        self.sync || self.check
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    sync_interval: Duration,
    check_interval: Duration,
    // None means due immediately
    next_sync: Option<Instant>,
    next_check: Option<Instant>,
}

impl Scheduler {
    /// Both jobs start out due.
    pub fn new(sync_interval: Duration, check_interval: Duration) -> Self {
        Self {
            sync_interval,
            check_interval,
            next_sync: None,
            next_check: None,
        }
    }

    pub fn sync_interval(&self) -> Duration {
        self.sync_interval
    }

    pub fn check_interval(&self) -> Duration {
        self.check_interval
    }

    pub fn due(&self, now: Instant) -> Due {
        Due {
            sync: self.next_sync.is_none_or(|at| now >= at),
            check: self.next_check.is_none_or(|at| now >= at),
        }
    }

    pub fn mark_synced(&mut self, now: Instant) {
        self.next_sync = Some(now + self.sync_interval);
    }

    pub fn mark_checked(&mut self, now: Instant) {
        self.next_check = Some(now + self.check_interval);
    }

    /// Make the next resync due immediately. The check schedule is kept.
    pub fn force_sync(&mut self) {
        self.next_sync = None;
    }

    /// Make the next check due immediately.
    pub fn force_check(&mut self) {
        self.next_check = None;
    }

    /// Time until the earliest job becomes due. Zero if one already is.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        match (self.next_sync, self.next_check) {
            (Some(sync), Some(check)) => sync.min(check).saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }
}
