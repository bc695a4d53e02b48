//! Trend Classification Thresholds
//!
//! Thresholds applied to the regression summary of a signal window. Slopes
//! are expressed per sample index, variances in squared signal units.

/// Minimum absolute slope (units per sample) for a window to be classified
/// as RISING or FALLING.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.05;

/// Population variance above which a window is classified as VOLATILE,
/// overriding any slope-based classification.
pub const TREND_VOLATILITY_VARIANCE: f64 = 2.0;

/// Confidence reported for any trend computed from two or more samples.
pub const TREND_REGRESSION_CONFIDENCE: f64 = 0.9;

/// Minimum number of samples for a trend to carry information.
pub const MIN_TREND_SAMPLES: usize = 2;
