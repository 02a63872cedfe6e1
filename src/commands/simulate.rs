//! `simulate <start> <hours> [step-minutes]`: replay the classifier offline.
//!
//! A [`ManualClock`] starts at the given local time and is stepped forward.
//! Every step is classified and each day/night change is logged, so sunrise,
//! sunset and the summer time changeovers can be checked without a network.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::time::Duration;

use crate::config::Config;
use crate::daynight::DayNightClassifier;
use crate::geo::SunCalculator;
use crate::logger::Log;
use crate::time_source::{Clock, ClockReading, ManualClock};

pub const DEFAULT_STEP_MINUTES: u32 = 1;

/// A day/night change seen during a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flip {
    pub reading: ClockReading,
    pub night: bool,
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// State at the first step.
    pub initial_night: bool,
    pub flips: Vec<Flip>,
    pub steps: u64,
}

/// Step `clock` through `hours` hours, classifying at every step.
pub fn run_simulation<S: SunCalculator>(
    classifier: &mut DayNightClassifier<S>,
    clock: &ManualClock,
    hours: u32,
    step_minutes: u32,
) -> SimulationReport {
    let step_minutes = step_minutes.max(1);
    let total_steps = u64::from(hours) * 60 / u64::from(step_minutes);
    let step = Duration::from_secs(u64::from(step_minutes) * 60);

    let initial_night = classifier.is_night(clock);
    let mut previous = initial_night;
    let mut flips = Vec::new();

    for _ in 0..total_steps {
        clock.advance(step);
        let night = classifier.is_night(clock);
        if night != previous {
            flips.push(Flip {
                reading: clock.now(),
                night,
            });
            previous = night;
        }
    }

    SimulationReport {
        initial_night,
        flips,
        steps: total_steps,
    }
}

pub fn handle_simulate_command(
    config: &Config,
    start: NaiveDateTime,
    hours: u32,
    step_minutes: u32,
) -> Result<()> {
    let mut classifier = super::default_classifier(config);
    let clock = ManualClock::at(start);

    log_version!();
    log_block_start!(
        "Simulating {} hour(s) from {} in {}-minute steps",
        hours,
        clock.now().status_line(),
        step_minutes.max(1)
    );

    // Per-step lookups log at debug level; keep them out of the report
    let was_enabled = Log::is_enabled();
    Log::set_enabled(false);
    let report = run_simulation(&mut classifier, &clock, hours, step_minutes);
    Log::set_enabled(was_enabled);

    log_indented!(
        "Starts at {}",
        if report.initial_night { "night" } else { "day" }
    );
    for flip in &report.flips {
        log_decorated!(
            "{} {}: {}",
            flip.reading.status_line(),
            flip.reading.date().offset().abbreviation(),
            if flip.night { "night" } else { "day" }
        );
    }
    log_block_start!(
        "{} change(s) over {} step(s)",
        report.flips.len(),
        report.steps
    );
    log_indented!("{}", classifier.summary());
    log_end!();
    Ok(())
}
