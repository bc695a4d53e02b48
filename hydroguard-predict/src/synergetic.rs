//! Synergetic risk detection
//!
//! Flags simultaneous oscillation across three independent signal families.
//! Any one of them misbehaving is common; all three at once is treated as
//! much stronger evidence.
//!
//! | Family    | Signal                  | Metric                      | Trigger  |
//! |-----------|-------------------------|-----------------------------|----------|
//! | Acoustic  | cavitation intensity    | `std / mean`                | > 0.30   |
//! | Thermal   | temperature             | `(last − first) / (n·0.1)`  | > 0.5    |
//! | Hydraulic | hydraulic pressure      | `MAD / mean · 100`          | > 15 %   |
//!
//! Only when all three fire is the risk "detected", with a fixed 80 %
//! probability.

use hydroguard_core::trend::{mean, variance};
use hydroguard_core::{sanitize, Signal, TelemetryWindow, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::SynergeticConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergeticTriggers {
    pub acoustic: bool,
    pub thermal: bool,
    pub hydraulic: bool,
}

impl SynergeticTriggers {
    pub fn all(&self) -> bool {
        self.acoustic && self.thermal && self.hydraulic
    }

    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.acoustic, "Acoustic"),
            (self.thermal, "Thermal"),
            (self.hydraulic, "Hydraulic"),
        ]
        .into_iter()
        .filter_map(|(fired, name)| fired.then_some(name))
        .collect()
    }
}

/// Result of one synergetic check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergeticRisk {
    pub detected: bool,
    /// 0-100
    pub probability: f64,
    pub triggers: SynergeticTriggers,
    pub acoustic_oscillation: f64,
    pub thermal_growth: f64,
    pub hydraulic_instability_pct: f64,
    /// Timestamp of the newest sample, 0 for an empty window
    pub timestamp: Timestamp,
    pub message: String,
}

/// Check a window for simultaneous acoustic, thermal and hydraulic oscillation
///
/// A family whose signal has fewer than `min_samples` readings never fires.
pub fn detect_synergetic_risk(window: &TelemetryWindow, config: &SynergeticConfig) -> SynergeticRisk {
    let timestamp = window.last().map(|s| s.timestamp).unwrap_or_default();

    if window.len() < config.min_samples {
        return SynergeticRisk {
            detected: false,
            probability: 0.0,
            triggers: SynergeticTriggers::default(),
            acoustic_oscillation: 0.0,
            thermal_growth: 0.0,
            hydraulic_instability_pct: 0.0,
            timestamp,
            message: "Insufficient data for synergetic analysis".to_string(),
        };
    }

    let acoustic = window.values(Signal::CavitationIntensity);
    let thermal = window.values(Signal::Temperature);
    let hydraulic = window.values(Signal::HydraulicPressure);

    let acoustic_oscillation = oscillation_ratio(&acoustic);
    let thermal_growth = growth_rate(&thermal, config.thermal_growth_interval);
    let hydraulic_instability_pct = mad_ratio(&hydraulic) * 100.0;

    let enough = |values: &[f64]| values.len() >= config.min_samples;
    let triggers = SynergeticTriggers {
        acoustic: enough(&acoustic) && acoustic_oscillation > config.acoustic_trigger,
        thermal: enough(&thermal) && thermal_growth > config.thermal_growth_trigger,
        hydraulic: enough(&hydraulic) && hydraulic_instability_pct > config.hydraulic_trigger_pct,
    };

    let detected = triggers.all();
    let message = if detected {
        log_info!(
            "synergetic risk on {}: acoustic {:.2}, thermal {:.2}, hydraulic {:.1}%",
            window.asset_id(),
            acoustic_oscillation,
            thermal_growth,
            hydraulic_instability_pct
        );
        "SYNERGETIC RISK DETECTED: All three parameters showing simultaneous oscillation patterns!"
            .to_string()
    } else {
        format!("Partial triggers: {}", triggers.names().join(", "))
    };

    SynergeticRisk {
        detected,
        probability: if detected { config.probability_pct } else { 0.0 },
        triggers,
        acoustic_oscillation,
        thermal_growth,
        hydraulic_instability_pct,
        timestamp,
        message,
    }
}

fn oscillation_ratio(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    sanitize(libm::sqrt(variance(values)) / m)
}

fn growth_rate(values: &[f64], interval: f64) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => sanitize((last - first) / (values.len() as f64 * interval)),
        _ => 0.0,
    }
}

/// Mean absolute deviation over mean
fn mad_ratio(values: &[f64]) -> f64 {
    let m = mean(values);
    if values.is_empty() || m == 0.0 {
        return 0.0;
    }
    let mad = values.iter().map(|v| (v - m).abs()).sum::<f64>() / values.len() as f64;
    sanitize(mad / m)
}
