//! Thoma-sigma cavitation risk
//!
//! ## Model
//!
//! ```text
//! p_v      = 0.61078 · exp(17.27·T / (T + 237.3))        kPa (Magnus–Tetens)
//! NPSH_a   = (p_atm − p_v) · 1000 / (ρ·g) + H_s          m
//! sigma    = NPSH_a / H
//! n_q      = n · √Q / H^0.75
//! limit    = max(0.08, (n_q / 200)^1.33)
//! P        = 1 / (1 + exp(8 · (sigma / limit − 1)))
//! ```
//!
//! Fast-running, high specific-speed runners tolerate less suction margin, so
//! the limit tightens as `n_q` rises. Sigma well above the limit maps to a
//! probability near 0 and sigma below it to a probability near 1.
//!
//! Without head or flow the model falls back to the measured cavitation
//! intensity at reduced confidence. With neither, it reports probability 0
//! and confidence 0.

use hydroguard_core::constants::physics::{MAGNUS_A, MAGNUS_B_C, MAGNUS_PREFACTOR_KPA};
use hydroguard_core::constants::risk::CAVITATION_FALLBACK_CONFIDENCE;
use hydroguard_core::{sanitize, Signal, TelemetrySample};
use serde::{Deserialize, Serialize};

use crate::config::CavitationConfig;

/// Confidence with every input measured
const FULL_CONFIDENCE: f64 = 0.9;
/// Confidence when speed or water temperature had to be assumed
const PARTIAL_CONFIDENCE: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CavitationRiskLevel {
    Safe,
    Caution,
    Danger,
    Critical,
}

impl CavitationRiskLevel {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.75 {
            CavitationRiskLevel::Critical
        } else if probability >= 0.5 {
            CavitationRiskLevel::Danger
        } else if probability >= 0.25 {
            CavitationRiskLevel::Caution
        } else {
            CavitationRiskLevel::Safe
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            CavitationRiskLevel::Safe => "Continue normal operation. Monitor sigma if load changes.",
            CavitationRiskLevel::Caution => {
                "Consider reducing load to operate closer to BEP. Monitor for crackling sounds."
            }
            CavitationRiskLevel::Danger => {
                "Reduce flow to raise sigma. Increase tailwater level if possible. Inspect runner at next shutdown."
            }
            CavitationRiskLevel::Critical => {
                "Reduce load immediately. Runner pitting is likely occurring. Plan a shutdown for inspection."
            }
        }
    }
}

/// Which evidence the probability was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CavitationBasis {
    Thoma,
    Intensity,
    None,
}

/// Operating point for the cavitation model
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CavitationInputs {
    pub head_m: Option<f64>,
    pub flow_m3s: Option<f64>,
    pub rpm: Option<f64>,
    pub water_temp_c: Option<f64>,
    /// Measured cavitation intensity, used when head or flow is missing
    pub intensity: Option<f64>,
}

impl CavitationInputs {
    pub fn from_sample(sample: &TelemetrySample) -> Self {
        Self {
            head_m: sample.get(Signal::Head),
            flow_m3s: sample.get(Signal::Flow),
            rpm: sample.get(Signal::Rpm),
            water_temp_c: sample.get(Signal::WaterTemp),
            intensity: sample.get(Signal::CavitationIntensity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CavitationRisk {
    /// 0-1
    pub probability: f64,
    pub confidence: f64,
    pub risk_level: CavitationRiskLevel,
    pub basis: CavitationBasis,
    pub sigma: Option<f64>,
    pub sigma_limit: Option<f64>,
    pub npsh_available: Option<f64>,
    pub npsh_required: Option<f64>,
    pub specific_speed: Option<f64>,
    pub vapor_pressure_kpa: Option<f64>,
    pub recommendation: String,
}

impl CavitationRisk {
    fn from_probability(probability: f64, confidence: f64, basis: CavitationBasis) -> Self {
        let risk_level = CavitationRiskLevel::from_probability(probability);
        Self {
            probability,
            confidence,
            risk_level,
            basis,
            sigma: None,
            sigma_limit: None,
            npsh_available: None,
            npsh_required: None,
            specific_speed: None,
            vapor_pressure_kpa: None,
            recommendation: risk_level.recommendation().to_string(),
        }
    }
}

/// Saturation vapor pressure of water in kPa
pub fn vapor_pressure_kpa(temp_c: f64) -> f64 {
    sanitize(MAGNUS_PREFACTOR_KPA * libm::exp(MAGNUS_A * temp_c / (temp_c + MAGNUS_B_C)))
}

/// Assess cavitation risk at one operating point
pub fn assess_cavitation(inputs: &CavitationInputs, config: &CavitationConfig) -> CavitationRisk {
    let positive = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);

    let (Some(head), Some(flow)) = (positive(inputs.head_m), positive(inputs.flow_m3s)) else {
        return match inputs.intensity.filter(|v| v.is_finite()) {
            Some(intensity) => {
                let scale = config.intensity_full_scale.max(f64::MIN_POSITIVE);
                let probability = (intensity / scale).clamp(0.0, 1.0);
                CavitationRisk::from_probability(
                    probability,
                    CAVITATION_FALLBACK_CONFIDENCE,
                    CavitationBasis::Intensity,
                )
            }
            None => CavitationRisk::from_probability(0.0, 0.0, CavitationBasis::None),
        };
    };

    let rpm = positive(inputs.rpm);
    let temp = inputs.water_temp_c.filter(|t| t.is_finite());
    let vapor = vapor_pressure_kpa(temp.unwrap_or(config.default_water_temp_c));

    let npsh_available = sanitize(
        (config.atmospheric_pressure_kpa - vapor) * 1000.0 / (config.water_density * config.gravity)
            + config.submergence_m,
    );
    let sigma = sanitize(npsh_available / head);

    let specific_speed = rpm
        .map(|n| sanitize(n * libm::sqrt(flow) / libm::pow(head, 0.75)))
        .unwrap_or(0.0);
    let speed_factor = libm::pow(
        specific_speed / config.specific_speed_reference,
        config.sigma_limit_exponent,
    );
    let speed_factor = sanitize(speed_factor);
    let npsh_required = speed_factor * head;
    let sigma_limit = speed_factor.max(config.sigma_limit_floor).max(f64::MIN_POSITIVE);

    let ratio = sigma / sigma_limit;
    let probability =
        sanitize(1.0 / (1.0 + libm::exp(config.logistic_steepness * (ratio - 1.0)))).clamp(0.0, 1.0);

    let confidence = if rpm.is_some() && temp.is_some() {
        FULL_CONFIDENCE
    } else {
        PARTIAL_CONFIDENCE
    };

    let mut risk = CavitationRisk::from_probability(probability, confidence, CavitationBasis::Thoma);
    risk.sigma = Some(sigma);
    risk.sigma_limit = Some(sigma_limit);
    risk.npsh_available = Some(npsh_available);
    risk.npsh_required = Some(npsh_required);
    risk.specific_speed = Some(specific_speed);
    risk.vapor_pressure_kpa = Some(vapor);
    risk
}

/// Assess cavitation risk from the signals of one sample
pub fn cavitation_from_sample(sample: &TelemetrySample, config: &CavitationConfig) -> CavitationRisk {
    assess_cavitation(&CavitationInputs::from_sample(sample), config)
}
