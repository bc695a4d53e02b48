//! Runtime Configuration
//!
//! Every empirically chosen constant in [`crate::constants`] has a matching
//! field here so deployments (and tests) can override it. Each struct's
//! `Default` is built from the constants, and `with_*` builders change one
//! value at a time.
//!
//! [`SentinelConfig`] aggregates the core configs and loads from JSON. Keys
//! left out of the document keep their defaults:
//!
//! ```rust
//! use hydroguard_core::SentinelConfig;
//!
//! let config = SentinelConfig::from_json(r#"{ "kernel": { "emission_threshold": 0.7 } }"#).unwrap();
//! assert_eq!(config.kernel.emission_threshold, 0.7);
//! assert_eq!(config.kernel.coupling_boost_base, 1.15);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{kernel, learning, trend};
use crate::errors::{SentinelError, SentinelResult};

/// Trend classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub slope_threshold: f64,
    pub volatility_variance: f64,
    /// Confidence reported for trends over two or more samples
    pub confidence: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: trend::TREND_SLOPE_THRESHOLD,
            volatility_variance: trend::TREND_VOLATILITY_VARIANCE,
            confidence: trend::TREND_REGRESSION_CONFIDENCE,
        }
    }
}

impl TrendConfig {
    pub fn with_slope_threshold(mut self, threshold: f64) -> Self {
        self.slope_threshold = threshold.abs();
        self
    }

    pub fn with_volatility_variance(mut self, variance: f64) -> Self {
        self.volatility_variance = variance.abs();
        self
    }
}

/// Pattern-matching kernel parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Probability an insight must strictly exceed
    pub emission_threshold: f64,
    pub coupling_boost_base: f64,
    pub min_synchronized_trends: usize,
    pub trend: TrendConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            emission_threshold: kernel::EMISSION_THRESHOLD,
            coupling_boost_base: kernel::COUPLING_BOOST_BASE,
            min_synchronized_trends: kernel::MIN_SYNCHRONIZED_TRENDS,
            trend: TrendConfig::default(),
        }
    }
}

impl KernelConfig {
    pub fn with_emission_threshold(mut self, threshold: f64) -> Self {
        self.emission_threshold = threshold;
        self
    }

    pub fn with_coupling_boost(mut self, base: f64) -> Self {
        self.coupling_boost_base = base;
        self
    }

    pub fn with_trend(mut self, trend: TrendConfig) -> Self {
        self.trend = trend;
        self
    }
}

/// Operator feedback and federation factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub confirm_factor: f64,
    pub reject_factor: f64,
    /// Share of the local multiplier in a federated merge
    pub local_share: f64,
    pub default_weight: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            confirm_factor: learning::CONFIRM_FACTOR,
            reject_factor: learning::REJECT_FACTOR,
            local_share: learning::LOCAL_BLEND_SHARE,
            default_weight: learning::DEFAULT_PATTERN_WEIGHT,
        }
    }
}

impl LearningConfig {
    pub fn with_factors(mut self, confirm: f64, reject: f64) -> Self {
        self.confirm_factor = confirm;
        self.reject_factor = reject;
        self
    }

    pub fn with_local_share(mut self, share: f64) -> Self {
        self.local_share = share;
        self
    }
}

/// Per-asset window sizing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub window_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            window_capacity: kernel::DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl HistoryConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }
}

/// Aggregate configuration of the core engine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    pub kernel: KernelConfig,
    pub learning: LearningConfig,
    pub history: HistoryConfig,
}

impl SentinelConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> SentinelResult<Self> {
        let config: SentinelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SentinelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make evaluation meaningless
    pub fn validate(&self) -> SentinelResult<()> {
        let k = &self.kernel;
        if !(k.emission_threshold > 0.0 && k.emission_threshold <= 1.0) {
            return Err(invalid("kernel.emission_threshold", "must be in (0, 1]"));
        }
        if !(k.coupling_boost_base.is_finite() && k.coupling_boost_base >= 1.0) {
            return Err(invalid("kernel.coupling_boost_base", "must be finite and >= 1"));
        }
        if k.min_synchronized_trends < 2 {
            return Err(invalid("kernel.min_synchronized_trends", "must be >= 2"));
        }
        if !(k.trend.slope_threshold.is_finite() && k.trend.slope_threshold >= 0.0) {
            return Err(invalid("kernel.trend.slope_threshold", "must be finite and >= 0"));
        }
        if !(k.trend.volatility_variance.is_finite() && k.trend.volatility_variance >= 0.0) {
            return Err(invalid("kernel.trend.volatility_variance", "must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&k.trend.confidence) {
            return Err(invalid("kernel.trend.confidence", "must be in [0, 1]"));
        }

        let l = &self.learning;
        if !(l.confirm_factor.is_finite() && l.confirm_factor > 0.0) {
            return Err(invalid("learning.confirm_factor", "must be finite and > 0"));
        }
        if !(l.reject_factor.is_finite() && l.reject_factor > 0.0) {
            return Err(invalid("learning.reject_factor", "must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&l.local_share) {
            return Err(invalid("learning.local_share", "must be in [0, 1]"));
        }
        if !(l.default_weight.is_finite() && l.default_weight > 0.0) {
            return Err(invalid("learning.default_weight", "must be finite and > 0"));
        }

        if self.history.window_capacity == 0 {
            return Err(invalid("history.window_capacity", "must be >= 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SentinelError {
    SentinelError::InvalidConfig { field, reason }
}
