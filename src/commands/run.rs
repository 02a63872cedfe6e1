//! Default command: the long-running device loop.

use anyhow::Result;
use std::sync::Arc;

use crate::config::{self, Config};
use crate::core::{Core, CoreParams};
use crate::logger::Log;
use crate::signals::setup_signal_handler;
use crate::time_source::{Clock, SystemClock};

/// Set up the clock, signals and sync driver, then run until shutdown.
pub fn handle_run_command(config: Config) -> Result<()> {
    log_version!();
    if Log::is_debug() {
        log_pipe!();
        log_debug!("Debug mode enabled");
    }

    if let Some(custom_dir) = config::get_custom_config_dir() {
        log_block_start!("Base directory: {}", custom_dir.display());
    }
    config.log_config("configuration");

    let signal_state = setup_signal_handler()?;
    let sync = super::build_clock_sync(&config)?;
    let classifier = super::default_classifier(&config);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    Log::set_clock(clock.clone());

    Core::new(CoreParams {
        sync,
        classifier,
        clock,
        signal_state,
        sync_interval: config.sync_interval(),
        check_interval: config.check_interval(),
    })
    .execute()
}
