//! # HydroGuard Core
//!
//! Explainable predictive diagnostics for hydro turbine units.
//!
//! ## Overview
//!
//! This crate holds the data model and the pattern-matching side of
//! HydroGuard:
//!
//! - **Telemetry**: normalized samples over a closed [`Signal`] schema
//! - **History**: bounded per-asset ring buffers
//! - **Trend primitives**: OLS slope, variance and classification
//! - **Kernel**: weighted multi-variate matching of declarative patterns
//! - **Weights**: learned per-pattern multipliers with federated merge
//! - **Monitor**: one evaluation task per asset
//!
//! Forecasting and risk models live in `hydroguard-predict`; the pattern
//! library lives in `hydroguard-patterns`.
//!
//! ## Quick Start
//!
//! ```rust
//! use hydroguard_core::{
//!     HeuristicPattern, HistoryStore, MatrixCondition, SentinelContext, SentinelKernel,
//!     Severity, Signal, TelemetrySample,
//! };
//!
//! let pattern = HeuristicPattern::new("hot-bearing", "Hot bearing", Severity::High)
//!     .with_condition(MatrixCondition::greater("bearingTemp", 80.0, 1.0));
//!
//! let mut store = HistoryStore::with_capacity(30);
//! store.push(TelemetrySample::new("unit-1", 0).with(Signal::BearingTemp, 84.0));
//!
//! let window = store.window("unit-1").unwrap();
//! let insights = SentinelKernel::default().evaluate(
//!     &window.signal_map(),
//!     &[pattern],
//!     &SentinelContext::new(),
//! );
//! assert_eq!(insights[0].pattern_id, "hot-bearing");
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` (default): emit `log` records for emissions, skipped patterns,
//!   baseline fallbacks and weight feedback

#![deny(unsafe_code)]

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            drop(format!($($arg)*));
        }
    };
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            drop(format!($($arg)*));
        }
    };
}

pub mod config;
pub mod constants;
pub mod errors;
pub mod history;
pub mod monitor;
pub mod pattern;
pub mod sentinel;
pub mod telemetry;
pub mod time;
pub mod trend;
pub mod weights;

pub use config::{HistoryConfig, KernelConfig, LearningConfig, SentinelConfig, TrendConfig};
pub use errors::{SentinelError, SentinelResult};
pub use history::{HistoryStore, SignalMap, TelemetryWindow};
pub use monitor::AssetMonitor;
pub use pattern::{
    ConditionOperator, ExposureBoost, HeuristicPattern, HistoricalPrecedent, MatrixCondition,
    Severity, TacticalAction, TacticalActionKind,
};
pub use sentinel::{
    BaselineProvider, BaselineStat, PatternScore, SentinelContext, SentinelInsight,
    SentinelKernel,
};
pub use telemetry::{RawSample, Signal, TelemetrySample};
pub use time::{FixedTime, SystemTime, TimeSource, Timestamp};
pub use trend::{compute_trend, compute_trend_with, linear_regression, sanitize, Regression, Trend, TrendKind};
pub use weights::{merge_weights, SharedWeightStore, WeightSnapshot, WeightStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
