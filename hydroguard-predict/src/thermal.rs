//! Bearing thermal time-to-threshold
//!
//! Regresses bearing temperature against minutes and projects when it will
//! reach the critical value `min(90 °C, ambient + 50 °C)`. A rising slope
//! raises the probability; a short projected time raises it further even
//! when the slope itself is modest.

use hydroguard_core::{linear_regression, sanitize, Signal, TelemetryWindow, Timestamp};
use hydroguard_core::constants::time::MS_PER_MINUTE;
use serde::{Deserialize, Serialize};

use crate::config::ThermalConfig;

/// Probability once the bearing is at or above its critical temperature
const AT_LIMIT_PROBABILITY: f64 = 0.95;
/// Base probability for any rising trend
const RISING_BASE_PROBABILITY: f64 = 0.3;
/// Extra probability at the saturating slope
const RISING_SLOPE_PROBABILITY: f64 = 0.4;
/// Probability floor when the limit is imminent, decaying to 0.7 at the horizon
const IMMINENT_PROBABILITY: f64 = 0.9;
const IMMINENT_DECAY: f64 = 0.2;
/// Samples at which confidence saturates
const FULL_CONFIDENCE_SAMPLES: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalRisk {
    /// 0-1
    pub probability: f64,
    pub confidence: f64,
    /// °C per minute
    pub slope_c_per_min: f64,
    pub current_c: Option<f64>,
    pub critical_c: f64,
    /// `None` when the temperature is not rising
    pub minutes_to_limit: Option<f64>,
    pub sample_count: usize,
}

/// Project when bearing temperature reaches its ambient-adjusted limit
pub fn bearing_time_to_threshold(
    points: &[(Timestamp, f64)],
    ambient_c: Option<f64>,
    config: &ThermalConfig,
) -> ThermalRisk {
    let ambient = ambient_c
        .filter(|t| t.is_finite())
        .unwrap_or(config.default_ambient_c);
    let critical_c = config
        .absolute_limit_c
        .min(ambient + config.rise_over_ambient_c);

    let mut points: Vec<(Timestamp, f64)> = points
        .iter()
        .copied()
        .filter(|(_, t)| t.is_finite())
        .collect();
    points.sort_by_key(|(ts, _)| *ts);

    let mut risk = ThermalRisk {
        probability: 0.0,
        confidence: 0.0,
        slope_c_per_min: 0.0,
        current_c: points.last().map(|(_, t)| *t),
        critical_c,
        minutes_to_limit: None,
        sample_count: points.len(),
    };

    if points.len() < config.min_samples.max(2) {
        return risk;
    }

    let origin = points[0].0;
    let xs: Vec<f64> = points
        .iter()
        .map(|(ts, _)| (ts - origin) as f64 / MS_PER_MINUTE as f64)
        .collect();
    let ys: Vec<f64> = points.iter().map(|(_, t)| *t).collect();
    let Some(fit) = linear_regression(&xs, &ys) else {
        return risk;
    };

    risk.slope_c_per_min = fit.slope;
    risk.confidence = (points.len() as f64 / FULL_CONFIDENCE_SAMPLES).min(1.0);
    let current = ys[ys.len() - 1];

    if current >= critical_c {
        risk.probability = AT_LIMIT_PROBABILITY;
        risk.minutes_to_limit = Some(0.0);
        return risk;
    }

    if fit.slope > 0.0 {
        let minutes = sanitize((critical_c - current) / fit.slope);
        let fast = config.fast_slope_c_per_min.max(f64::MIN_POSITIVE);
        let mut probability =
            RISING_BASE_PROBABILITY + RISING_SLOPE_PROBABILITY * (fit.slope / fast).min(1.0);

        if minutes <= config.short_time_min {
            let horizon = config.short_time_min.max(f64::MIN_POSITIVE);
            probability = probability.max(IMMINENT_PROBABILITY - IMMINENT_DECAY * minutes / horizon);
        }

        risk.minutes_to_limit = Some(minutes);
        risk.probability = probability.clamp(0.0, 1.0);
    }

    risk
}

/// Run the thermal projection over a window's bearing temperature
///
/// Ambient temperature is taken from the newest sample that carries one.
pub fn thermal_from_window(window: &TelemetryWindow, config: &ThermalConfig) -> ThermalRisk {
    let ambient = window
        .iter()
        .filter_map(|s| s.get(Signal::AmbientTemp))
        .last();
    bearing_time_to_threshold(&window.points(Signal::BearingTemp), ambient, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroguard_core::TelemetrySample;

    fn minutes(values: &[f64]) -> Vec<(Timestamp, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as u64 * MS_PER_MINUTE, *v))
            .collect()
    }

    #[test]
    fn test_too_few_points() {
        let risk = bearing_time_to_threshold(&minutes(&[60.0, 61.0]), None, &ThermalConfig::default());
        assert_eq!(risk.probability, 0.0);
        assert_eq!(risk.confidence, 0.0);
        assert_eq!(risk.minutes_to_limit, None);
    }

    #[test]
    fn test_critical_value_follows_ambient() {
        let config = ThermalConfig::default();
        let cool = bearing_time_to_threshold(&minutes(&[50.0; 3]), Some(20.0), &config);
        assert_eq!(cool.critical_c, 70.0);
        let hot = bearing_time_to_threshold(&minutes(&[50.0; 3]), Some(45.0), &config);
        assert_eq!(hot.critical_c, 90.0);
        let default = bearing_time_to_threshold(&minutes(&[50.0; 3]), None, &config);
        assert_eq!(default.critical_c, 75.0);
    }

    #[test]
    fn test_slow_rise_far_from_limit() {
        // 0.1 °C/min, 24 °C below the limit: four hours away
        let risk = bearing_time_to_threshold(&minutes(&[50.6, 50.7, 50.8, 50.9, 51.0]), None, &ThermalConfig::default());
        let minutes = risk.minutes_to_limit.unwrap();
        assert!((minutes - 240.0).abs() < 1e-6);
        assert!((risk.probability - 0.38).abs() < 1e-9);
        assert!((risk.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_imminent_limit_raises_probability() {
        // slow slope but only 10 minutes from the limit
        let risk = bearing_time_to_threshold(&minutes(&[73.6, 73.7, 73.8, 73.9, 74.0]), None, &ThermalConfig::default());
        let minutes = risk.minutes_to_limit.unwrap();
        assert!((minutes - 10.0).abs() < 1e-6);
        assert!(risk.probability > 0.85);
    }

    #[test]
    fn test_at_limit() {
        let risk = bearing_time_to_threshold(&minutes(&[70.0, 74.0, 76.0]), None, &ThermalConfig::default());
        assert_eq!(risk.probability, 0.95);
        assert_eq!(risk.minutes_to_limit, Some(0.0));
    }

    #[test]
    fn test_cooling_bearing() {
        let risk = bearing_time_to_threshold(&minutes(&[60.0, 59.0, 58.0]), None, &ThermalConfig::default());
        assert_eq!(risk.probability, 0.0);
        assert_eq!(risk.minutes_to_limit, None);
        assert!(risk.confidence > 0.0);
    }

    #[test]
    fn test_from_window_uses_ambient() {
        let mut window = TelemetryWindow::new("unit-1", 10);
        for (i, temp) in [60.0, 62.0, 64.0].iter().enumerate() {
            window.push(
                TelemetrySample::new("unit-1", i as u64 * MS_PER_MINUTE)
                    .with(Signal::BearingTemp, *temp)
                    .with(Signal::AmbientTemp, 15.0),
            );
        }
        let risk = thermal_from_window(&window, &ThermalConfig::default());
        assert_eq!(risk.critical_c, 65.0);
        assert!((risk.slope_c_per_min - 2.0).abs() < 1e-9);
        assert!(risk.probability >= 0.7);
    }
}
