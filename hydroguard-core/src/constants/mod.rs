//! Constants for HydroGuard Core
//!
//! This module provides centralized, documented constants used throughout
//! the HydroGuard diagnostics engine. Most of the probability mappings below
//! are empirically chosen tuning values; every one of them can be overridden
//! at runtime through the matching config struct in [`crate::config`].
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Trend**: Regression classification thresholds
//! - **Kernel**: Pattern-matching emission and boost parameters
//! - **Learning**: Operator feedback and federated merge factors
//! - **Forecast**: Breach prediction and failure probability mapping
//! - **Risk**: Multi-signal detector thresholds, RUL and prescription bands
//! - **Physics**: Hydraulic and thermodynamic constants
//! - **Time**: Time unit conversions
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Include units in names where the value has one
//! 3. Keep tunable values out of algorithm bodies

/// Trend classification thresholds.
pub mod trend;

/// Pattern-matching kernel parameters.
pub mod kernel;

/// Reinforcement and federation factors for pattern weights.
pub mod learning;

/// Breach forecasting parameters.
pub mod forecast;

/// Risk detector, RUL and prescription thresholds.
pub mod risk;

/// Physical constants for hydraulic models.
pub mod physics;

/// Time unit conversions.
pub mod time;

pub use trend::{TREND_SLOPE_THRESHOLD, TREND_VOLATILITY_VARIANCE, TREND_REGRESSION_CONFIDENCE};

pub use kernel::{
    EMISSION_THRESHOLD, COUPLING_BOOST_BASE, DEFAULT_SIGMA_MULTIPLIER,
};

pub use learning::{CONFIRM_FACTOR, REJECT_FACTOR, LOCAL_BLEND_SHARE, DEFAULT_PATTERN_WEIGHT};

pub use forecast::{MIN_FORECAST_SAMPLES, ACCEPTABLE_SIGMA, T_STAT_FULL_CONFIDENCE};

pub use physics::{GRAVITY_M_PER_S2, WATER_DENSITY_KG_PER_M3, ATMOSPHERIC_PRESSURE_KPA};

pub use time::{MS_PER_MINUTE, MS_PER_HOUR, MS_PER_DAY, MS_PER_WEEK};
