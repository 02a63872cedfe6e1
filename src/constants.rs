//! Application-wide constants and default values.
//!
//! Defaults mirror the deployment the device was built for: a controller in
//! Galicia syncing against the European NTP pool on a five minute cadence.

// # Time Source Defaults
pub const DEFAULT_NTP_SERVER: &str = "europe.pool.ntp.org";
pub const DEFAULT_NTP_PORT: u16 = 123;
pub const DEFAULT_LOCAL_PORT: u16 = 8888;
pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 1500; // reply deadline
pub const DEFAULT_SYNC_INTERVAL: u64 = 300; // seconds between resyncs
pub const DEFAULT_CHECK_INTERVAL: u64 = 60; // seconds between day/night checks

// # Location Defaults
pub const DEFAULT_LATITUDE: f64 = 42.859009;
pub const DEFAULT_LONGITUDE: f64 = -8.650020;

// # Day/Night Defaults
pub const DEFAULT_SUNSET_OFFSET: i32 = 0;

// # Validation Limits
pub const MINIMUM_SYNC_TIMEOUT_MS: u64 = 100;
pub const MAXIMUM_SYNC_TIMEOUT_MS: u64 = 60_000;
pub const MINIMUM_SYNC_INTERVAL: u64 = 10;
pub const MAXIMUM_SYNC_INTERVAL: u64 = 86_400;
pub const MINIMUM_CHECK_INTERVAL: u64 = 1;
pub const MAXIMUM_CHECK_INTERVAL: u64 = 3_600;
pub const MINIMUM_SUNSET_OFFSET: i32 = -720;
pub const MAXIMUM_SUNSET_OFFSET: i32 = 720;

// # Calendar
pub const MINUTES_PER_DAY: i32 = 1440;
pub const SECONDS_PER_HOUR: i64 = 3600;

// # NTP Wire Format
pub const NTP_PACKET_SIZE: usize = 48;
pub const NTP_TRANSMIT_SECONDS_OFFSET: usize = 40;
pub const NTP_UNIX_EPOCH_DIFF: i64 = 2_208_988_800; // 1900-01-01 to 1970-01-01
pub const NTP_ERA_SECONDS: i64 = 1 << 32;

// # Exit Codes
pub const EXIT_FAILURE: i32 = 1;
