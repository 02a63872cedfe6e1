//! Main application entry point.
//!
//! Parses the command line, sets up logging and configuration, and hands
//! off to the matching command in `sunclock::commands`:
//!
//! 1. Argument parsing and early exit for help/version
//! 2. Optional file logging (`--log <file>`) and debug mode
//! 3. Configuration loading from the standard or `--config` directory
//! 4. Command dispatch: device loop, status, dst or simulate

use anyhow::Result;

use sunclock::args::{self, CliAction, ParsedArgs};
use sunclock::commands;
use sunclock::config::{self, Config};
use sunclock::constants::EXIT_FAILURE;
use sunclock::logger::{Log, LoggerGuard};
use sunclock::log_error_exit;

fn main() {
    let parsed_args = ParsedArgs::parse(std::env::args());

    if let Err(e) = run(parsed_args.action) {
        log_error_exit!("{e:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Dst { year } => {
            commands::dst::handle_dst_command(year);
            Ok(())
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
            log_file,
        } => {
            let _guard = setup(debug_enabled, config_dir, log_file)?;
            commands::run::handle_run_command(Config::load()?)
        }
        CliAction::Status {
            debug_enabled,
            config_dir,
            log_file,
        } => {
            let _guard = setup(debug_enabled, config_dir, log_file)?;
            commands::status::handle_status_command(&Config::load()?)
        }
        CliAction::Simulate {
            debug_enabled,
            config_dir,
            log_file,
            start,
            hours,
            step_minutes,
        } => {
            let _guard = setup(debug_enabled, config_dir, log_file)?;
            commands::simulate::handle_simulate_command(
                &Config::load()?,
                start,
                hours,
                step_minutes,
            )
        }
    }
}

/// Shared setup for commands that read the configuration.
///
/// The returned guard keeps the log file writer alive and must be held until
/// the command finishes.
fn setup(
    debug_enabled: bool,
    config_dir: Option<String>,
    log_file: Option<String>,
) -> Result<Option<LoggerGuard>> {
    Log::set_debug(debug_enabled);
    config::set_config_dir(config_dir)?;
    log_file.map(Log::start_file_logging).transpose()
}
