//! Command-line command handlers for sunclock.
//!
//! The long-running loop lives in `run`; `status`, `dst` and `simulate` are
//! one-shot commands. Each command is implemented in its own submodule.

pub mod dst;
pub mod run;
pub mod simulate;
pub mod status;

use anyhow::Result;

use crate::config::Config;
use crate::daynight::DayNightClassifier;
use crate::geo::{SunCalculator, SunriseCalculator};
use crate::ntp::UdpNtpClient;
use crate::sync::ClockSync;

/// Build the resync driver described by `config`, binding its UDP socket.
pub(crate) fn build_clock_sync(config: &Config) -> Result<ClockSync<UdpNtpClient>> {
    let client = UdpNtpClient::bind(config.local_port(), config.ntp_port())?;
    Ok(ClockSync::new(
        client,
        config.ntp_server(),
        config.sync_timeout(),
    ))
}

/// Build a classifier with the configured offset and override applied.
pub(crate) fn build_classifier<S: SunCalculator>(
    config: &Config,
    calculator: S,
) -> DayNightClassifier<S> {
    let mut classifier = DayNightClassifier::new(calculator, config.location());
    classifier.set_sunset_offset_minutes(config.sunset_offset());
    if let Some(minutes) = config.sunrise_override {
        classifier.set_sunrise_override_minutes(minutes);
    }
    classifier
}

/// Classifier backed by the astronomical calculator.
pub(crate) fn default_classifier(config: &Config) -> DayNightClassifier<SunriseCalculator> {
    build_classifier(config, SunriseCalculator)
}
