//! Time-Related Constants
//!
//! Timestamps in HydroGuard are milliseconds since the Unix epoch.

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

/// Milliseconds per hour.
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Milliseconds per day.
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Milliseconds per week.
pub const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;

/// Days per (non-leap) year, used for annualised rates.
pub const DAYS_PER_YEAR: f64 = 365.0;
