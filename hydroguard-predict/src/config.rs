//! Model configuration
//!
//! One struct per model, following the core config layer: `Default` is built
//! from [`hydroguard_core::constants`] and `with_*` builders override single
//! values. All structs deserialize with `#[serde(default)]`, so a partial
//! JSON document only changes the keys it names.

use hydroguard_core::constants::{forecast, physics, risk};
use hydroguard_core::{SentinelError, SentinelResult};
use serde::{Deserialize, Serialize};

/// Allowed drift of the RUL stress weights from a sum of 1
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Breach forecast parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Fewer points yield a null forecast
    pub min_samples: usize,
    /// `|t|` at which confidence reaches 1
    pub t_stat_full_confidence: f64,
    /// Slopes (per day) at or below this magnitude never cross
    pub negligible_slope_per_day: f64,
    /// Sample count at which a flat-line forecast reaches confidence 1
    pub full_confidence_samples: usize,
    /// Residual sigma considered healthy
    pub acceptable_sigma: f64,
    /// Failure probability (%) above which a work order is suggested
    pub work_order_probability_pct: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_samples: forecast::MIN_FORECAST_SAMPLES,
            t_stat_full_confidence: forecast::T_STAT_FULL_CONFIDENCE,
            negligible_slope_per_day: forecast::NEGLIGIBLE_SLOPE_PER_DAY,
            full_confidence_samples: forecast::FULL_CONFIDENCE_SAMPLE_COUNT,
            acceptable_sigma: forecast::ACCEPTABLE_SIGMA,
            work_order_probability_pct: forecast::WORK_ORDER_PROBABILITY_PCT,
        }
    }
}

impl ForecastConfig {
    pub fn with_min_samples(mut self, samples: usize) -> Self {
        // OLS needs two degrees of freedom for a slope error
        self.min_samples = samples.max(3);
        self
    }

    pub fn with_acceptable_sigma(mut self, sigma: f64) -> Self {
        self.acceptable_sigma = sigma.abs();
        self
    }

    pub fn with_t_stat_full_confidence(mut self, t: f64) -> Self {
        self.t_stat_full_confidence = t.abs();
        self
    }
}

/// Synergetic (acoustic + thermal + hydraulic) detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergeticConfig {
    pub min_samples: usize,
    /// Oscillation ratio (std / mean) of the acoustic signal
    pub acoustic_trigger: f64,
    /// Thermal growth in units per interval
    pub thermal_growth_trigger: f64,
    /// Sample interval the thermal growth is expressed in
    pub thermal_growth_interval: f64,
    /// Mean absolute deviation over mean, in percent
    pub hydraulic_trigger_pct: f64,
    /// Probability (%) reported when all three trigger
    pub probability_pct: f64,
}

impl Default for SynergeticConfig {
    fn default() -> Self {
        Self {
            min_samples: risk::SYNERGETIC_MIN_SAMPLES,
            acoustic_trigger: risk::ACOUSTIC_OSCILLATION_TRIGGER,
            thermal_growth_trigger: risk::THERMAL_GROWTH_TRIGGER,
            thermal_growth_interval: risk::THERMAL_GROWTH_INTERVAL,
            hydraulic_trigger_pct: risk::HYDRAULIC_INSTABILITY_TRIGGER_PCT,
            probability_pct: risk::SYNERGETIC_PROBABILITY_PCT,
        }
    }
}

impl SynergeticConfig {
    pub fn with_triggers(mut self, acoustic: f64, thermal: f64, hydraulic_pct: f64) -> Self {
        self.acoustic_trigger = acoustic;
        self.thermal_growth_trigger = thermal;
        self.hydraulic_trigger_pct = hydraulic_pct;
        self
    }
}

/// Thoma-sigma cavitation model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavitationConfig {
    pub atmospheric_pressure_kpa: f64,
    pub water_density: f64,
    pub gravity: f64,
    /// Static suction head added to NPSH available (m)
    pub submergence_m: f64,
    /// Water temperature used when none is measured
    pub default_water_temp_c: f64,
    pub specific_speed_reference: f64,
    pub sigma_limit_exponent: f64,
    pub sigma_limit_floor: f64,
    pub logistic_steepness: f64,
    /// Intensity mapped to probability 1 in the fallback path
    pub intensity_full_scale: f64,
}

impl Default for CavitationConfig {
    fn default() -> Self {
        Self {
            atmospheric_pressure_kpa: physics::ATMOSPHERIC_PRESSURE_KPA,
            water_density: physics::WATER_DENSITY_KG_PER_M3,
            gravity: physics::GRAVITY_M_PER_S2,
            submergence_m: 0.0,
            default_water_temp_c: physics::DEFAULT_WATER_TEMP_C,
            specific_speed_reference: risk::SPECIFIC_SPEED_REFERENCE,
            sigma_limit_exponent: risk::SIGMA_LIMIT_EXPONENT,
            sigma_limit_floor: risk::SIGMA_LIMIT_FLOOR,
            logistic_steepness: risk::CAVITATION_LOGISTIC_STEEPNESS,
            intensity_full_scale: risk::CAVITATION_INTENSITY_FULL_SCALE,
        }
    }
}

impl CavitationConfig {
    pub fn with_submergence(mut self, meters: f64) -> Self {
        self.submergence_m = meters;
        self
    }

    pub fn with_sigma_limit_floor(mut self, floor: f64) -> Self {
        self.sigma_limit_floor = floor.abs();
        self
    }
}

/// Bearing thermal time-to-threshold parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    pub min_samples: usize,
    /// Hard bearing limit (°C)
    pub absolute_limit_c: f64,
    /// Allowed rise over ambient (°C)
    pub rise_over_ambient_c: f64,
    pub default_ambient_c: f64,
    /// Projected minutes at or below which risk is elevated
    pub short_time_min: f64,
    /// Slope (°C/min) that saturates the slope term
    pub fast_slope_c_per_min: f64,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            min_samples: risk::THERMAL_MIN_SAMPLES,
            absolute_limit_c: risk::BEARING_ABSOLUTE_LIMIT_C,
            rise_over_ambient_c: risk::BEARING_RISE_OVER_AMBIENT_C,
            default_ambient_c: risk::DEFAULT_AMBIENT_C,
            short_time_min: risk::SHORT_TIME_TO_LIMIT_MIN,
            fast_slope_c_per_min: risk::FAST_THERMAL_SLOPE_C_PER_MIN,
        }
    }
}

impl ThermalConfig {
    pub fn with_absolute_limit(mut self, limit_c: f64) -> Self {
        self.absolute_limit_c = limit_c;
        self
    }
}

/// Efficiency decay detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyDecayConfig {
    /// Drop (percentage points) that flags decay
    pub trigger_pp: f64,
    /// Drop mapped to probability 1
    pub full_scale_pp: f64,
    pub eccentricity_limit: f64,
    pub seepage_limit: f64,
}

impl Default for EfficiencyDecayConfig {
    fn default() -> Self {
        Self {
            trigger_pp: risk::EFFICIENCY_DECAY_TRIGGER_PP,
            full_scale_pp: risk::EFFICIENCY_DECAY_FULL_SCALE_PP,
            eccentricity_limit: risk::ECCENTRICITY_INDICATOR_LIMIT,
            seepage_limit: risk::SEEPAGE_INDICATOR_LIMIT,
        }
    }
}

impl EfficiencyDecayConfig {
    pub fn with_trigger(mut self, drop_pp: f64) -> Self {
        self.trigger_pp = drop_pp.abs();
        self
    }
}

/// Remaining-useful-life parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulConfig {
    pub sudden_start_delta_mw: f64,
    pub cavitation_zone_intensity: f64,
    pub sudden_start_normaliser: f64,
    pub max_alignment_mm: f64,
    pub weight_starts: f64,
    pub weight_cavitation: f64,
    pub weight_alignment: f64,
    /// Remaining life never drops below `1 - max_stress` of base life
    pub max_stress: f64,
    pub max_confidence: f64,
    pub full_confidence_samples: usize,
    pub critical_share: f64,
}

impl Default for RulConfig {
    fn default() -> Self {
        Self {
            sudden_start_delta_mw: risk::SUDDEN_START_DELTA_MW,
            cavitation_zone_intensity: risk::CAVITATION_ZONE_INTENSITY,
            sudden_start_normaliser: risk::SUDDEN_START_NORMALISER,
            max_alignment_mm: risk::MAX_ALIGNMENT_DEVIATION_MM,
            weight_starts: risk::STRESS_WEIGHT_STARTS,
            weight_cavitation: risk::STRESS_WEIGHT_CAVITATION,
            weight_alignment: risk::STRESS_WEIGHT_ALIGNMENT,
            max_stress: risk::MAX_STRESS,
            max_confidence: risk::MAX_RUL_CONFIDENCE,
            full_confidence_samples: risk::RUL_FULL_CONFIDENCE_SAMPLES,
            critical_share: risk::RUL_CRITICAL_SHARE,
        }
    }
}

impl RulConfig {
    pub fn with_weights(mut self, starts: f64, cavitation: f64, alignment: f64) -> Self {
        self.weight_starts = starts;
        self.weight_cavitation = cavitation;
        self.weight_alignment = alignment;
        self
    }

    /// Cap is clamped to `[0, MAX_STRESS]`
    pub fn with_max_stress(mut self, max_stress: f64) -> Self {
        self.max_stress = max_stress.clamp(0.0, risk::MAX_STRESS);
        self
    }

    /// Decode a partial JSON document and validate the result
    pub fn from_json(json: &str) -> SentinelResult<Self> {
        let config: RulConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SentinelResult<()> {
        if !(0.0..=risk::MAX_STRESS).contains(&self.max_stress) {
            return Err(invalid("rul.max_stress", "must be in [0, 0.95]"));
        }
        let weights = [self.weight_starts, self.weight_cavitation, self.weight_alignment];
        if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            return Err(invalid("rul.weights", "must be finite and >= 0"));
        }
        if (weights.iter().sum::<f64>() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid("rul.weights", "must sum to 1"));
        }
        if !(self.sudden_start_normaliser.is_finite() && self.sudden_start_normaliser > 0.0) {
            return Err(invalid("rul.sudden_start_normaliser", "must be finite and > 0"));
        }
        if !(self.max_alignment_mm.is_finite() && self.max_alignment_mm > 0.0) {
            return Err(invalid("rul.max_alignment_mm", "must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.max_confidence) {
            return Err(invalid("rul.max_confidence", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.critical_share) {
            return Err(invalid("rul.critical_share", "must be in [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SentinelError {
    SentinelError::InvalidConfig { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let forecast = ForecastConfig::default();
        assert_eq!(forecast.min_samples, 5);
        assert_eq!(forecast.acceptable_sigma, 0.5);

        let rul = RulConfig::default();
        assert_eq!(rul.weight_starts + rul.weight_cavitation + rul.weight_alignment, 1.0);
        assert_eq!(rul.max_stress, 0.95);

        assert_eq!(CavitationConfig::default().submergence_m, 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SynergeticConfig =
            serde_json::from_str(r#"{ "acoustic_trigger": 0.25 }"#).unwrap();
        assert_eq!(config.acoustic_trigger, 0.25);
        assert_eq!(config.hydraulic_trigger_pct, 15.0);
    }

    #[test]
    fn test_builders() {
        assert_eq!(ForecastConfig::default().with_min_samples(1).min_samples, 3);
        assert_eq!(RulConfig::default().with_max_stress(1.4).max_stress, 0.95);
        assert_eq!(ThermalConfig::default().with_absolute_limit(80.0).absolute_limit_c, 80.0);
    }

    #[test]
    fn test_rul_config_validation() {
        assert!(RulConfig::default().validate().is_ok());
        assert!(RulConfig::from_json(r#"{ "weight_alignment": 0.5 }"#).is_ok());

        assert!(matches!(
            RulConfig::from_json(r#"{ "max_stress": 1.0 }"#),
            Err(SentinelError::InvalidConfig { field: "rul.max_stress", .. })
        ));
        assert!(matches!(
            RulConfig::from_json(r#"{ "weight_starts": 0.4 }"#),
            Err(SentinelError::InvalidConfig { field: "rul.weights", .. })
        ));
        assert!(RulConfig::default().with_weights(1.2, -0.2, 0.0).validate().is_err());
        assert!(RulConfig::from_json(r#"{ "max_stress": "high" }"#).is_err());
    }
}
