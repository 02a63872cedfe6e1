//! Default configuration file creation.
//!
//! Writes a commented `sunclock.toml` with every default spelled out, aligned
//! so the comments line up.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Create a default config file at `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

/// Text of the default configuration.
pub fn default_config_content() -> String {
    let mut content = ConfigBuilder::new()
        .add_section("Time source")
        .add_setting(
            "ntp_server",
            &format!("\"{DEFAULT_NTP_SERVER}\""),
            "NTP server hostname",
        )
        .add_setting(
            "ntp_port",
            &DEFAULT_NTP_PORT.to_string(),
            "NTP server UDP port",
        )
        .add_setting(
            "local_port",
            &DEFAULT_LOCAL_PORT.to_string(),
            "Local UDP port (0 = ephemeral)",
        )
        .add_setting(
            "sync_timeout_ms",
            &DEFAULT_SYNC_TIMEOUT_MS.to_string(),
            &format!(
                "Reply deadline in milliseconds ({MINIMUM_SYNC_TIMEOUT_MS}-{MAXIMUM_SYNC_TIMEOUT_MS})"
            ),
        )
        .add_setting(
            "sync_interval",
            &DEFAULT_SYNC_INTERVAL.to_string(),
            &format!(
                "Seconds between clock resyncs ({MINIMUM_SYNC_INTERVAL}-{MAXIMUM_SYNC_INTERVAL})"
            ),
        )
        .add_section("Day/night")
        .add_setting(
            "check_interval",
            &DEFAULT_CHECK_INTERVAL.to_string(),
            &format!(
                "Seconds between day/night checks ({MINIMUM_CHECK_INTERVAL}-{MAXIMUM_CHECK_INTERVAL})"
            ),
        )
        .add_setting(
            "sunset_offset",
            &DEFAULT_SUNSET_OFFSET.to_string(),
            "Minutes before sunset that night starts",
        )
        .add_comment("sunrise_override = 420", "Fixed sunrise, minutes since midnight")
        .add_section("Location")
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE:.6}"),
            "Degrees, north positive",
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE:.6}"),
            "Degrees, east positive",
        )
        .build();
    content.push('\n');
    content
}

struct ConfigBuilder {
    entries: Vec<Entry>,
}

enum Entry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(Entry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// A setting left commented out, shown as an example.
    fn add_comment(mut self, example: &str, comment: &str) -> Self {
        self.entries.push(Entry::Setting {
            line: format!("# {example}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        let width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Setting { line, .. } => Some(line.len()),
                Entry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                Entry::Section(title) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(title);
                }
                Entry::Setting { line, comment } => {
                    lines.push(format!("{line:<width$}{comment}"));
                }
            }
        }

        lines.join("\n")
    }
}
