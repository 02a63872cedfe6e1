//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. Global flags may appear anywhere;
//! the first positional argument selects the command.

use chrono::NaiveDateTime;

use crate::time_source::parse_datetime;

/// Longest simulation accepted, one leap year of hours.
const MAXIMUM_SIMULATE_HOURS: u32 = 366 * 24;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the device loop with these settings
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
        log_file: Option<String>,
    },
    /// Resync once, classify once and print the result
    Status {
        debug_enabled: bool,
        config_dir: Option<String>,
        log_file: Option<String>,
    },
    /// Print the summer time changeover days of a year
    Dst { year: i32 },
    /// Replay the classifier over simulated time
    Simulate {
        debug_enabled: bool,
        config_dir: Option<String>,
        log_file: Option<String>,
        start: NaiveDateTime,
        hours: u32,
        step_minutes: u32,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut unknown_arg_found = false;
        let mut config_dir: Option<String> = None;
        let mut log_file: Option<String> = None;
        let mut positionals: Vec<String> = Vec::new();

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = &args_vec[i];
            match arg_str.as_str() {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--config" | "-c" => {
                    // Parse: --config <directory>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        unknown_arg_found = true;
                    }
                }
                "--log" | "-l" => {
                    // Parse: --log <file>
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        log_file = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing file for --log. Usage: --log <file>");
                        unknown_arg_found = true;
                    }
                }
                _ => {
                    // Negative numbers are values, not options
                    if arg_str.starts_with('-') && arg_str.parse::<i64>().is_err() {
                        log_warning!("Unknown option: {arg_str}");
                        unknown_arg_found = true;
                    } else {
                        positionals.push(arg_str.clone());
                    }
                }
            }
            i += 1;
        }

        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if unknown_arg_found {
            return ParsedArgs {
                action: CliAction::ShowHelpDueToError,
            };
        }
        if display_help {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let action = match positionals.split_first() {
            None => CliAction::Run {
                debug_enabled,
                config_dir,
                log_file,
            },
            Some((command, rest)) => match command.as_str() {
                "status" | "st" if rest.is_empty() => CliAction::Status {
                    debug_enabled,
                    config_dir,
                    log_file,
                },
                "dst" => match rest {
                    [year] => match year.parse::<i32>() {
                        Ok(year) if (1..=9999).contains(&year) => CliAction::Dst { year },
                        _ => {
                            log_warning!("Invalid year: {year}. Must be between 1 and 9999");
                            CliAction::ShowHelpDueToError
                        }
                    },
                    _ => {
                        log_warning!("Usage: sunclock dst <year>");
                        CliAction::ShowHelpDueToError
                    }
                },
                "simulate" | "sim" => match parse_simulate(rest) {
                    Some((start, hours, step_minutes)) => CliAction::Simulate {
                        debug_enabled,
                        config_dir,
                        log_file,
                        start,
                        hours,
                        step_minutes,
                    },
                    None => CliAction::ShowHelpDueToError,
                },
                "status" | "st" => {
                    log_warning!("status takes no arguments");
                    CliAction::ShowHelpDueToError
                }
                _ => {
                    log_warning!("Unknown command: {command}");
                    CliAction::ShowHelpDueToError
                }
            },
        };

        ParsedArgs { action }
    }
}

/// Parse `<YYYY-MM-DD HH:MM> <hours> [step-minutes]`.
fn parse_simulate(rest: &[String]) -> Option<(NaiveDateTime, u32, u32)> {
    const USAGE: &str = "Usage: sunclock simulate \"YYYY-MM-DD HH:MM\" <hours> [step-minutes]";

    let (start, hours, step) = match rest {
        [start, hours] => (start, hours, None),
        [start, hours, step] => (start, hours, Some(step)),
        _ => {
            log_warning!("{USAGE}");
            return None;
        }
    };

    let start = match parse_datetime(start) {
        Ok(start) => start,
        Err(e) => {
            log_error!("{e}");
            return None;
        }
    };

    let hours = match hours.parse::<u32>() {
        Ok(h) if (1..=MAXIMUM_SIMULATE_HOURS).contains(&h) => h,
        _ => {
            log_error!("Invalid hours: {hours}. Must be between 1 and {MAXIMUM_SIMULATE_HOURS}");
            return None;
        }
    };

    let step_minutes = match step {
        None => crate::commands::simulate::DEFAULT_STEP_MINUTES,
        Some(step) => match step.parse::<u32>() {
            Ok(s) if (1..=1440).contains(&s) => s,
            _ => {
                log_error!("Invalid step: {step}. Must be between 1 and 1440 minutes");
                return None;
            }
        },
    };

    Some((start, hours, step_minutes))
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("sunclock [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-l, --log <file>       Also write output to a file");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("(none)                 Keep the clock synced and track day/night");
    log_indented!("status, st             Sync once and print time and day/night");
    log_indented!("dst <year>             Print the summer time changeover days");
    log_indented!("simulate, sim <start> <hours> [step-minutes]");
    log_indented!("                       Replay day/night over simulated time");
    log_indented!("                       <start> is \"YYYY-MM-DD HH:MM\" local time");
    log_end!();
}
