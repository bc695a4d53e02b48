//! Efficiency decay detection
//!
//! Compares efficiency at the start and end of the window. A drop of more
//! than 1.5 percentage points is flagged as probable decay, and auxiliary
//! indicators attribute a cause:
//!
//! - eccentricity (grind index) above 0.1: runner erosion
//! - seepage (leak index) above 1.0: seal wear
//!
//! When both exceed their limits, the larger relative exceedance wins.

use hydroguard_core::{sanitize, Signal, TelemetryWindow};
use serde::{Deserialize, Serialize};

use crate::config::EfficiencyDecayConfig;

const KNOWN_CAUSE_CONFIDENCE: f64 = 0.9;
const UNKNOWN_CAUSE_CONFIDENCE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecayCause {
    RunnerErosion,
    SealWear,
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyDecay {
    pub decaying: bool,
    /// 0-1
    pub probability: f64,
    pub confidence: f64,
    /// Percentage points lost between the first and last sample
    pub drop_pp: f64,
    pub cause: DecayCause,
}

/// Check a window for efficiency decay and attribute a probable cause
pub fn detect_efficiency_decay(window: &TelemetryWindow, config: &EfficiencyDecayConfig) -> EfficiencyDecay {
    let efficiency = window.values(Signal::Efficiency);

    if efficiency.len() < 2 {
        return EfficiencyDecay {
            decaying: false,
            probability: 0.0,
            confidence: 0.0,
            drop_pp: 0.0,
            cause: DecayCause::Undetermined,
        };
    }
    let first = efficiency[0];
    let last = efficiency[efficiency.len() - 1];

    let drop_pp = sanitize(first - last);
    let decaying = drop_pp > config.trigger_pp;
    if !decaying {
        return EfficiencyDecay {
            decaying,
            probability: 0.0,
            confidence: UNKNOWN_CAUSE_CONFIDENCE,
            drop_pp,
            cause: DecayCause::Undetermined,
        };
    }

    let full_scale = config.full_scale_pp.max(f64::MIN_POSITIVE);
    let probability = (drop_pp / full_scale).clamp(0.0, 1.0);

    let latest = |signal| window.values(signal).last().copied();
    let cause = attribute(latest(Signal::Eccentricity), latest(Signal::Seepage), config);
    let confidence = if cause == DecayCause::Undetermined {
        UNKNOWN_CAUSE_CONFIDENCE
    } else {
        KNOWN_CAUSE_CONFIDENCE
    };

    log_debug!(
        "efficiency decay on {}: -{:.2} pp, cause {:?}",
        window.asset_id(),
        drop_pp,
        cause
    );

    EfficiencyDecay {
        decaying,
        probability,
        confidence,
        drop_pp,
        cause,
    }
}

fn attribute(eccentricity: Option<f64>, seepage: Option<f64>, config: &EfficiencyDecayConfig) -> DecayCause {
    let exceedance = |value: Option<f64>, limit: f64| {
        value
            .filter(|v| *v > limit && limit > 0.0)
            .map(|v| v / limit)
    };

    match (
        exceedance(eccentricity, config.eccentricity_limit),
        exceedance(seepage, config.seepage_limit),
    ) {
        (Some(erosion), Some(wear)) if wear > erosion => DecayCause::SealWear,
        (Some(_), _) => DecayCause::RunnerErosion,
        (None, Some(_)) => DecayCause::SealWear,
        (None, None) => DecayCause::Undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroguard_core::TelemetrySample;

    fn window(rows: &[(f64, Option<f64>, Option<f64>)]) -> TelemetryWindow {
        let mut window = TelemetryWindow::new("unit-1", 30);
        for (i, (eta, eccentricity, seepage)) in rows.iter().enumerate() {
            let mut sample = TelemetrySample::new("unit-1", i as u64).with(Signal::Efficiency, *eta);
            if let Some(e) = eccentricity {
                sample = sample.with(Signal::Eccentricity, *e);
            }
            if let Some(s) = seepage {
                sample = sample.with(Signal::Seepage, *s);
            }
            window.push(sample);
        }
        window
    }

    #[test]
    fn test_small_drop_is_not_decay() {
        let decay = detect_efficiency_decay(&window(&[(92.0, None, None), (91.0, None, None)]), &EfficiencyDecayConfig::default());
        assert!(!decay.decaying);
        assert_eq!(decay.probability, 0.0);
        assert!((decay.drop_pp - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_erosion_attributed() {
        let decay = detect_efficiency_decay(
            &window(&[(92.0, None, None), (90.0, None, None), (89.5, Some(0.15), Some(0.4))]),
            &EfficiencyDecayConfig::default(),
        );
        assert!(decay.decaying);
        assert!((decay.probability - 0.5).abs() < 1e-12);
        assert_eq!(decay.cause, DecayCause::RunnerErosion);
        assert_eq!(decay.confidence, 0.9);
    }

    #[test]
    fn test_larger_exceedance_wins() {
        // eccentricity 1.2x over, seepage 3x over
        let decay = detect_efficiency_decay(
            &window(&[(93.0, None, None), (88.0, Some(0.12), Some(3.0))]),
            &EfficiencyDecayConfig::default(),
        );
        assert_eq!(decay.cause, DecayCause::SealWear);
        assert_eq!(decay.probability, 1.0);
    }

    #[test]
    fn test_undetermined_cause() {
        let decay = detect_efficiency_decay(&window(&[(92.0, None, None), (89.0, None, None)]), &EfficiencyDecayConfig::default());
        assert!(decay.decaying);
        assert_eq!(decay.cause, DecayCause::Undetermined);
        assert_eq!(decay.confidence, 0.6);
    }

    #[test]
    fn test_single_sample() {
        let decay = detect_efficiency_decay(&window(&[(92.0, None, None)]), &EfficiencyDecayConfig::default());
        assert_eq!(decay.confidence, 0.0);
        assert!(!decay.decaying);
    }
}
