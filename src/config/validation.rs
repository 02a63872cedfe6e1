//! Configuration validation functionality.
//!
//! Rejects values the device cannot work with before anything is started.

use anyhow::Result;

use super::Config;
use crate::constants::*;

/// Validate every configured value against its allowed range.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(server) = &config.ntp_server
        && server.trim().is_empty()
    {
        anyhow::bail!("ntp_server must not be empty");
    }

    if config.ntp_port == Some(0) {
        anyhow::bail!("ntp_port must be between 1 and 65535");
    }

    if let Some(timeout) = config.sync_timeout_ms
        && !(MINIMUM_SYNC_TIMEOUT_MS..=MAXIMUM_SYNC_TIMEOUT_MS).contains(&timeout)
    {
        anyhow::bail!(
            "sync_timeout_ms ({} ms) must be between {} and {} milliseconds",
            timeout,
            MINIMUM_SYNC_TIMEOUT_MS,
            MAXIMUM_SYNC_TIMEOUT_MS
        );
    }

    if let Some(interval) = config.sync_interval
        && !(MINIMUM_SYNC_INTERVAL..=MAXIMUM_SYNC_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "sync_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_SYNC_INTERVAL,
            MAXIMUM_SYNC_INTERVAL
        );
    }

    if let Some(interval) = config.check_interval
        && !(MINIMUM_CHECK_INTERVAL..=MAXIMUM_CHECK_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "check_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_CHECK_INTERVAL,
            MAXIMUM_CHECK_INTERVAL
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(offset) = config.sunset_offset
        && !(MINIMUM_SUNSET_OFFSET..=MAXIMUM_SUNSET_OFFSET).contains(&offset)
    {
        anyhow::bail!(
            "sunset_offset ({} minutes) must be between {} and {} minutes",
            offset,
            MINIMUM_SUNSET_OFFSET,
            MAXIMUM_SUNSET_OFFSET
        );
    }

    if let Some(minutes) = config.sunrise_override
        && !(0..MINUTES_PER_DAY).contains(&minutes)
    {
        anyhow::bail!(
            "sunrise_override ({}) must be between 0 and {} minutes since midnight",
            minutes,
            MINUTES_PER_DAY - 1
        );
    }

    Ok(())
}
