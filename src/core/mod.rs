//! Device loop.
//!
//! `Core` keeps the process clock in step with the time server and
//! classifies the current minute as day or night:
//!
//! - Resync at startup, then every `sync_interval`
//! - Classify every `check_interval`, logging when the state flips
//! - SIGUSR1 forces an immediate resync
//! - SIGINT, SIGTERM and SIGHUP stop the loop
//!
//! Between ticks the loop blocks on the signal channel with `recv_timeout`,
//! so signals are handled without waiting for the next tick.

pub mod scheduler;

use anyhow::Result;
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use crate::core::scheduler::Scheduler;
use crate::daynight::DayNightClassifier;
use crate::geo::SunCalculator;
use crate::ntp::TimeQuery;
use crate::signals::{SignalMessage, SignalState};
use crate::sync::ClockSync;
use crate::time_source::Clock;

/// Wait used when the signal channel is gone and the loop falls back to sleeping.
const DISCONNECTED_POLL: Duration = Duration::from_secs(1);

/// Parameters for creating a Core instance.
pub struct CoreParams<Q: TimeQuery, S: SunCalculator> {
    pub sync: ClockSync<Q>,
    pub classifier: DayNightClassifier<S>,
    pub clock: Arc<dyn Clock>,
    pub signal_state: SignalState,
    pub sync_interval: Duration,
    pub check_interval: Duration,
}

/// Outcome of one pass over the due jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tick {
    /// Local epoch installed by a successful resync.
    pub synced_epoch: Option<i64>,
    /// Day/night result when a check ran.
    pub night: Option<bool>,
    /// True when the check disagreed with the previous one.
    pub changed: bool,
}

pub struct Core<Q: TimeQuery, S: SunCalculator> {
    sync: ClockSync<Q>,
    classifier: DayNightClassifier<S>,
    clock: Arc<dyn Clock>,
    signal_state: SignalState,
    scheduler: Scheduler,
    last_night: Option<bool>,
}

impl<Q: TimeQuery, S: SunCalculator> Core<Q, S> {
    pub fn new(params: CoreParams<Q, S>) -> Self {
        Self {
            sync: params.sync,
            classifier: params.classifier,
            clock: params.clock,
            signal_state: params.signal_state,
            scheduler: Scheduler::new(params.sync_interval, params.check_interval),
            last_night: None,
        }
    }

    /// Run until a shutdown signal arrives.
    pub fn execute(mut self) -> Result<()> {
        log_block_start!(
            "Syncing from {} every {}s",
            self.sync.server(),
            self.scheduler.sync_interval().as_secs()
        );
        log_indented!(
            "Checking day/night every {}s",
            self.scheduler.check_interval().as_secs()
        );
        self.main_loop();
        log_block_start!("Shutting down");
        log_indented!("Last clock reading: {}", self.clock.now().status_line());
        log_end!();
        Ok(())
    }

    /// Perform whatever is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let due = self.scheduler.due(now);
        let mut tick = Tick::default();

        if due.sync {
            tick.synced_epoch = self.sync.resync_or_keep(self.clock.as_ref());
            self.scheduler.mark_synced(now);
            // A new clock may land on another day, so classify straight away
            if tick.synced_epoch.is_some() {
                self.scheduler.force_check();
            }
        }

        if self.scheduler.due(now).check {
            let night = self.classifier.is_night(self.clock.as_ref());
            tick.changed = self.last_night != Some(night);
            tick.night = Some(night);
            self.scheduler.mark_checked(now);

            if tick.changed {
                let reading = self.clock.now();
                log_block_start!(
                    "{} at {}",
                    if night { "Night" } else { "Day" },
                    reading.status_line()
                );
                log_indented!("{}", self.classifier.summary());
            } else {
                log_debug!(
                    "Still {} ({})",
                    if night { "night" } else { "day" },
                    self.classifier.summary()
                );
            }
            self.last_night = Some(night);
        }

        tick
    }

    /// Apply a signal. Returns false when the loop should stop.
    pub fn handle_signal(&mut self, message: SignalMessage) -> bool {
        match message {
            SignalMessage::Shutdown => {
                log_pipe!();
                log_info!("Shutdown requested");
                false
            }
            SignalMessage::Resync => {
                log_pipe!();
                log_info!("Resync requested");
                self.scheduler.force_sync();
                true
            }
        }
    }

    pub fn last_night(&self) -> Option<bool> {
        self.last_night
    }

    fn main_loop(&mut self) {
        while self.signal_state.is_running() {
            self.tick(Instant::now());

            let wait = self.scheduler.time_until_next(Instant::now());
            match self.signal_state.signal_receiver.recv_timeout(wait) {
                Ok(message) => {
                    if !self.handle_signal(message) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if !self.signal_state.is_running() {
                        break;
                    }
                    log_pipe!();
                    log_error!("Signal handler disconnected unexpectedly");
                    log_indented!("Signals will no longer be processed");
                    std::thread::sleep(wait.max(DISCONNECTED_POLL));
                }
            }
        }
    }
}
