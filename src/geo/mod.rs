//! Geographic location and sunrise/sunset lookups.
//!
//! ## Module Structure
//!
//! - [`solar`]: the astronomical function, wrapped behind [`SunCalculator`] so the
//!   day/night classifier can be exercised against fixed sun times in tests

pub mod solar;

pub use solar::{Location, SunCalculator, SunEventKind, SunTime, SunriseCalculator};

#[cfg(test)]
pub use solar::MockSunCalculator;

#[cfg(test)]
mod tests;
