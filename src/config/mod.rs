//! Configuration system for sunclock.
//!
//! Settings are read once at startup from `sunclock.toml`:
//! 1. `<dir>/sunclock.toml` when a directory is given with `--config <dir>`
//! 2. **XDG_CONFIG_HOME**/sunclock/sunclock.toml otherwise
//!
//! A default file is written when the standard location has none. Every key
//! is optional:
//!
//! ```toml
//! #[Time source]
//! ntp_server = "europe.pool.ntp.org" # NTP server hostname
//! ntp_port = 123                     # NTP server UDP port
//! local_port = 8888                  # Local UDP port (0 = ephemeral)
//! sync_timeout_ms = 1500             # Reply deadline in milliseconds (100-60000)
//! sync_interval = 300                # Seconds between clock resyncs (10-86400)
//!
//! #[Day/night]
//! check_interval = 60                # Seconds between day/night checks (1-3600)
//! sunset_offset = 0                  # Minutes before sunset that night starts (-720-720)
//! sunrise_override = 420             # Fixed sunrise, minutes since midnight (0-1439)
//!
//! #[Location]
//! latitude = 42.859009               # Degrees, north positive
//! longitude = -8.650020              # Degrees, east positive
//! ```
//!
//! The location is a property of the deployment and is never changed while
//! running.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::geo::Location;

// Re-export public API
pub use builder::create_default_config;
pub use loading::{
    get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir,
};

/// Raw settings as they appear in `sunclock.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// NTP server hostname.
    pub ntp_server: Option<String>,
    /// NTP server UDP port.
    pub ntp_port: Option<u16>,
    /// Local UDP port to bind. 0 picks an ephemeral port.
    pub local_port: Option<u16>,
    /// How long to wait for an NTP reply, in milliseconds.
    pub sync_timeout_ms: Option<u64>,
    /// Seconds between periodic resyncs.
    pub sync_interval: Option<u64>,
    /// Seconds between day/night classifications.
    pub check_interval: Option<u64>,
    /// Deployment latitude in degrees.
    pub latitude: Option<f64>,
    /// Deployment longitude in degrees.
    pub longitude: Option<f64>,
    /// Minutes subtracted from the computed sunset.
    pub sunset_offset: Option<i32>,
    /// Fixed sunrise in minutes since midnight. 0 means none.
    pub sunrise_override: Option<i32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        loading::load()
    }

    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        loading::load_from_path(path)
    }

    pub fn ntp_server(&self) -> &str {
        self.ntp_server.as_deref().unwrap_or(DEFAULT_NTP_SERVER)
    }

    pub fn ntp_port(&self) -> u16 {
        self.ntp_port.unwrap_or(DEFAULT_NTP_PORT)
    }

    pub fn local_port(&self) -> u16 {
        self.local_port.unwrap_or(DEFAULT_LOCAL_PORT)
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms.unwrap_or(DEFAULT_SYNC_TIMEOUT_MS))
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval.unwrap_or(DEFAULT_SYNC_INTERVAL))
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval.unwrap_or(DEFAULT_CHECK_INTERVAL))
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.latitude.unwrap_or(DEFAULT_LATITUDE),
            self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        )
    }

    pub fn sunset_offset(&self) -> i32 {
        self.sunset_offset.unwrap_or(DEFAULT_SUNSET_OFFSET)
    }

    /// Log the effective configuration.
    pub fn log_config(&self, source: &str) {
        let location = self.location();
        let lat_dir = if location.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if location.longitude >= 0.0 { "E" } else { "W" };

        log_block_start!("Loaded {source}");
        log_indented!(
            "Time source: {}:{} (timeout {}ms, every {}s)",
            self.ntp_server(),
            self.ntp_port(),
            self.sync_timeout().as_millis(),
            self.sync_interval().as_secs()
        );
        log_indented!(
            "Location: {:.4}°{}, {:.4}°{}",
            location.latitude.abs(),
            lat_dir,
            location.longitude.abs(),
            lon_dir
        );
        log_indented!("Day/night check: every {}s", self.check_interval().as_secs());
        if self.sunset_offset() != 0 {
            log_indented!("Sunset offset: {} minutes", self.sunset_offset());
        }
        if let Some(minutes) = self.sunrise_override
            && minutes > 0
        {
            log_indented!("Sunrise override: {:02}:{:02}", minutes / 60, minutes % 60);
        }
    }
}

#[cfg(test)]
mod tests;
