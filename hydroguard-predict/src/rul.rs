//! Remaining useful life
//!
//! ```text
//! stress    = 0.2 · starts / 100  +  0.3 · cavitation_h / operating_h  +  0.5 · |alignment| / 0.5
//! remaining = base_life · (1 − min(stress, 0.95))
//! ```
//!
//! The stress cap keeps the estimate at or above 5 % of base life however
//! extreme the inputs.

use core::fmt;

use hydroguard_core::constants::risk::MAX_STRESS;
use hydroguard_core::{sanitize, Signal, TelemetryWindow};
use serde::{Deserialize, Serialize};

use crate::config::RulConfig;

/// Component families with a nominal base life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Bearing,
    Seal,
    Hose,
    WicketGate,
    HydraulicSystem,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Bearing,
        Component::Seal,
        Component::Hose,
        Component::WicketGate,
        Component::HydraulicSystem,
    ];

    /// Nominal life in operating hours
    pub const fn base_life_hours(&self) -> f64 {
        match self {
            Component::Bearing => 30_000.0,
            Component::Seal => 15_000.0,
            // hoses dominate the hydraulic system's wear
            Component::Hose | Component::HydraulicSystem => 8_000.0,
            Component::WicketGate => 50_000.0,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Component::Bearing => "bearing",
            Component::Seal => "seal",
            Component::Hose => "hose",
            Component::WicketGate => "wicket_gate",
            Component::HydraulicSystem => "hydraulic_system",
        }
    }

    pub fn from_name(name: &str) -> Option<Component> {
        Component::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressFactors {
    /// Output changes larger than the sudden-start delta
    pub sudden_starts: usize,
    pub cavitation_hours: f64,
    /// Latest foundation displacement (mm)
    pub alignment_deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulEstimate {
    pub component_id: String,
    pub component: Component,
    pub remaining_hours: f64,
    pub stress_factors: StressFactors,
    /// Combined stress before the cap
    pub stress: f64,
    pub confidence: f64,
    /// Remaining hours at which replacement becomes critical
    pub critical_threshold: f64,
}

impl RulEstimate {
    pub fn is_critical(&self) -> bool {
        self.remaining_hours <= self.critical_threshold
    }
}

impl StressFactors {
    /// Derive stress factors from a window
    ///
    /// Cavitation hours are the share of samples above the cavitation-zone
    /// intensity, scaled to the operating hours.
    pub fn from_window(window: &TelemetryWindow, operating_hours: f64, config: &RulConfig) -> Self {
        let output = window.values(Signal::Output);
        let sudden_starts = output
            .windows(2)
            .filter(|pair| (pair[1] - pair[0]).abs() > config.sudden_start_delta_mw)
            .count();

        let intensity = window.values(Signal::CavitationIntensity);
        let cavitation_hours = if intensity.is_empty() {
            0.0
        } else {
            let cavitating = intensity
                .iter()
                .filter(|v| **v > config.cavitation_zone_intensity)
                .count();
            sanitize(cavitating as f64 / intensity.len() as f64 * operating_hours.max(0.0))
        };

        let alignment_deviation = window
            .values(Signal::FoundationDisplacement)
            .last()
            .copied()
            .unwrap_or(0.0);

        Self {
            sudden_starts,
            cavitation_hours,
            alignment_deviation,
        }
    }

    /// Weighted stress, clamped to be non-negative
    pub fn stress(&self, operating_hours: f64, config: &RulConfig) -> f64 {
        let starts = self.sudden_starts as f64 / config.sudden_start_normaliser.max(f64::MIN_POSITIVE);
        let cavitation = if operating_hours > 0.0 {
            self.cavitation_hours / operating_hours
        } else {
            0.0
        };
        let alignment = self.alignment_deviation.abs() / config.max_alignment_mm.max(f64::MIN_POSITIVE);

        let stress = config.weight_starts * starts
            + config.weight_cavitation * cavitation
            + config.weight_alignment * alignment;
        sanitize(stress).max(0.0)
    }
}

/// Estimate remaining useful life for one component of an asset
pub fn estimate_rul(
    component: Component,
    window: &TelemetryWindow,
    operating_hours: f64,
    config: &RulConfig,
) -> RulEstimate {
    let stress_factors = StressFactors::from_window(window, operating_hours, config);
    let stress = stress_factors.stress(operating_hours, config);

    let base = component.base_life_hours();
    let cap = config.max_stress.clamp(0.0, MAX_STRESS);
    let remaining_hours = (base * (1.0 - stress.min(cap))).max(0.0);

    let full = config.full_confidence_samples.max(1) as f64;
    let confidence = (window.len() as f64 / full).min(config.max_confidence);

    RulEstimate {
        component_id: format!("{}-{}", window.asset_id(), component),
        component,
        remaining_hours,
        stress_factors,
        stress,
        confidence,
        critical_threshold: base * config.critical_share,
    }
}
