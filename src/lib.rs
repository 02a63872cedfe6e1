//! # Sunclock Library
//!
//! Internal library for the sunclock binary.
//!
//! This library exists to enable testing of the internals and provide clean
//! separation between CLI dispatch (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Calendar**: `dst` decides CET/CEST for a date from the EU changeover rule
//! - **Clock**: `time_source` holds the process clock, `ntp` queries a time
//!   server and `sync` installs its answer with the right offset
//! - **Sun**: `geo` computes sunrise/sunset, `daynight` caches them and
//!   classifies the current minute
//! - **Runtime**: `core` runs the periodic loop, `signals` feeds it SIGUSR1
//!   and shutdown requests
//! - **Entry points**: `args` parses the command line, `commands` implements
//!   each command, `config` loads `sunclock.toml`, `logger` prints

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod daynight;
pub mod dst;
pub mod geo;
pub mod ntp;
pub mod signals;
pub mod sync;
pub mod time_source;
