//! Clock abstraction for forecasts and weight snapshots
//!
//! Forecasts report weeks until breach relative to "now", and weight
//! snapshots are stamped with the export time. Both take the current time
//! from a [`TimeSource`] so tests can pin it.

use crate::constants::time::{MS_PER_DAY, MS_PER_WEEK};

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Source of wall-clock time
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Fixed time source for testing
#[derive(Debug, Clone)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

/// Convert a millisecond span to fractional days
pub fn ms_to_days(ms: f64) -> f64 {
    ms / MS_PER_DAY as f64
}

/// Convert fractional days to milliseconds
pub fn days_to_ms(days: f64) -> f64 {
    days * MS_PER_DAY as f64
}

/// Convert a millisecond span to fractional weeks
pub fn ms_to_weeks(ms: f64) -> f64 {
    ms / MS_PER_WEEK as f64
}
