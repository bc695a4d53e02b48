//! # HydroGuard Predict
//!
//! Forecasting and risk scoring over per-asset telemetry history.
//!
//! ## Overview
//!
//! Where `hydroguard-core` answers "which failure pattern is emerging", this
//! crate answers "when will it matter and what should be done":
//!
//! ```text
//! TelemetryWindow ──┬──> forecast      ──> ForecastResult (weeks until breach)
//!                   ├──> synergetic    ──> SynergeticRisk
//!                   ├──> cavitation    ──> CavitationRisk (Thoma sigma)
//!                   ├──> thermal       ──> ThermalRisk (time to bearing limit)
//!                   ├──> efficiency    ──> EfficiencyDecay
//!                   ├──> aging         ──> AgingResult
//!                   ├──> rul           ──> RulEstimate
//!                   └──> incident      ──> IncidentMatch
//!                                              │
//!                     failure probability ─────┴──> prescription ──> PrescriptiveRecommendation
//! ```
//!
//! Every model is a pure function of its inputs. Short or degenerate input is
//! an ordinary outcome: models return `None` or zero confidence instead of an
//! error, and non-finite arithmetic is sanitized to zero.
//!
//! ## Quick Start
//!
//! ```rust
//! use hydroguard_predict::{forecast_at, ForecastConfig};
//!
//! const DAY: u64 = 86_400_000;
//! let points: Vec<(u64, f64)> = (0..6).map(|d| (d * DAY, 95.0 - 1.5 * d as f64)).collect();
//!
//! let result = forecast_at(&points, 80.0, 5 * DAY, &ForecastConfig::default());
//! assert!(result.weeks_until.is_some());
//! assert!(result.confidence > 0.9);
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` (default): emit `log` records for detections and catalogue loads

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
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if false {
            drop(format!($($arg)*));
        }
    };
}

pub mod aging;
pub mod cavitation;
pub mod config;
pub mod efficiency;
pub mod forecast;
pub mod incident;
pub mod prescription;
pub mod rul;
pub mod synergetic;
pub mod thermal;

pub use aging::{
    annual_degradation_rate, evaluate_aging, hydraulic_efficiency, revenue_loss_per_hour,
    AgingContext, AgingResult, CurvePoint, EfficiencyCurve, WarningLevel,
};
pub use cavitation::{
    assess_cavitation, cavitation_from_sample, vapor_pressure_kpa, CavitationBasis,
    CavitationInputs, CavitationRisk, CavitationRiskLevel,
};
pub use config::{
    CavitationConfig, EfficiencyDecayConfig, ForecastConfig, RulConfig, SynergeticConfig,
    ThermalConfig,
};
pub use efficiency::{detect_efficiency_decay, DecayCause, EfficiencyDecay};
pub use forecast::{
    failure_probability_pct, forecast, forecast_at, forecast_excluding_dates, BreachSeverity,
    ForecastResult, TrendDirection, WorkOrderSuggestion,
};
pub use incident::{
    series_similarity, IncidentCatalogue, IncidentKind, IncidentMatch, IncidentSignature,
    SignalSignature, TriggerCondition,
};
pub use prescription::{
    prescribe, ActionPriority, ActionType, PrescriptionBand, PrescriptiveAction,
    PrescriptiveRecommendation,
};
pub use rul::{estimate_rul, Component, RulEstimate, StressFactors};
pub use synergetic::{detect_synergetic_risk, SynergeticRisk, SynergeticTriggers};
pub use thermal::{bearing_time_to_threshold, thermal_from_window, ThermalRisk};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
