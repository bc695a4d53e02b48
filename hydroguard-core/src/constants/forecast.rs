//! Breach Forecast Parameters
//!
//! Constants for the regression forecaster and its failure probability
//! mapping.

/// Minimum number of `(timestamp, value)` points for a forecast.
pub const MIN_FORECAST_SAMPLES: usize = 5;

/// |t| at which the slope confidence saturates at 1.0 (`min(1, |t| / 3)`).
pub const T_STAT_FULL_CONFIDENCE: f64 = 3.0;

/// Slope magnitude (units per day) treated as no trend at all.
pub const NEGLIGIBLE_SLOPE_PER_DAY: f64 = 1e-9;

/// Sample count at which the count-only confidence of a flat series
/// saturates.
pub const FULL_CONFIDENCE_SAMPLE_COUNT: usize = 30;

/// Residual standard deviation considered acceptable scatter. The failure
/// probability is 50% when the observed residual sigma equals this value.
pub const ACCEPTABLE_SIGMA: f64 = 0.5;

/// Lower clamp of the failure probability (percent).
pub const MIN_FAILURE_PROBABILITY_PCT: f64 = 0.01;

/// Upper clamp of the failure probability (percent).
pub const MAX_FAILURE_PROBABILITY_PCT: f64 = 99.99;

/// Failure probability (percent) above which a work order is suggested.
pub const WORK_ORDER_PROBABILITY_PCT: f64 = 50.0;

/// Days until breach below which a forecast is CRITICAL.
pub const CRITICAL_BREACH_DAYS: f64 = 30.0;

/// Days until breach below which a forecast is HIGH.
pub const HIGH_BREACH_DAYS: f64 = 90.0;

/// Days until breach below which a forecast is MEDIUM.
pub const MEDIUM_BREACH_DAYS: f64 = 180.0;
