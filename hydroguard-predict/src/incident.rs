//! Historical incident matching
//!
//! ## Overview
//!
//! Each stored incident keeps the waveforms its signals traced before the
//! failure. The recent window is compared against them signal by signal:
//!
//! ```text
//! recent   ──tail m──> min-max normalize ─┐
//!                                         ├─> Pearson r ──> (r + 1) · 50  ∈ [0, 100]
//! incident ──head m──> min-max normalize ─┘
//! ```
//!
//! where `m` is the shorter of the two lengths. An incident's similarity is
//! the mean over its signatures. A match is reported only when the
//! incident's trigger precondition holds and the similarity exceeds 85.

use core::fmt;

use hydroguard_core::constants::risk::{INCIDENT_MIN_SAMPLES, INCIDENT_SIMILARITY_THRESHOLD};
use hydroguard_core::trend::mean;
use hydroguard_core::{sanitize, SentinelError, SentinelResult, Signal, TelemetryWindow};
use serde::{Deserialize, Serialize};

const DEFAULT_TRIGGER_TOLERANCE: f64 = 1e-6;

fn default_tolerance() -> f64 {
    DEFAULT_TRIGGER_TOLERANCE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentKind {
    HydraulicRunaway,
    BearingSeizure,
    CavitationCollapse,
    AlignmentDrift,
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IncidentKind::HydraulicRunaway => "HYDRAULIC RUNAWAY",
            IncidentKind::BearingSeizure => "BEARING SEIZURE",
            IncidentKind::CavitationCollapse => "CAVITATION COLLAPSE",
            IncidentKind::AlignmentDrift => "ALIGNMENT DRIFT",
        };
        f.write_str(label)
    }
}

/// Precondition that must hold before an incident is compared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerCondition {
    Always,
    /// Latest reading of `signal` equals `value`
    SignalEquals {
        signal: Signal,
        value: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
}

impl TriggerCondition {
    pub fn holds(&self, window: &TelemetryWindow) -> bool {
        match self {
            TriggerCondition::Always => true,
            TriggerCondition::SignalEquals {
                signal,
                value,
                tolerance,
            } => window
                .values(*signal)
                .last()
                .is_some_and(|latest| (latest - value).abs() <= *tolerance),
        }
    }
}

/// Reference waveform of one signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSignature {
    pub signal: Signal,
    pub values: Vec<f64>,
}

/// A stored historical failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSignature {
    pub id: String,
    pub kind: IncidentKind,
    pub description: String,
    pub signatures: Vec<SignalSignature>,
    pub trigger: TriggerCondition,
}

impl IncidentSignature {
    pub fn new(
        id: impl Into<String>,
        kind: IncidentKind,
        description: impl Into<String>,
        trigger: TriggerCondition,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            description: description.into(),
            signatures: Vec::new(),
            trigger,
        }
    }

    pub fn with_signature(mut self, signal: Signal, values: &[f64]) -> Self {
        self.signatures.push(SignalSignature {
            signal,
            values: values.to_vec(),
        });
        self
    }

    pub fn validate(&self) -> SentinelResult<()> {
        let invalid = |reason: &str| SentinelError::InvalidPattern {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("incident id is empty"));
        }
        if self.signatures.is_empty() {
            return Err(invalid("incident has no signatures"));
        }
        if self
            .signatures
            .iter()
            .any(|s| s.values.len() < 2 || s.values.iter().any(|v| !v.is_finite()))
        {
            return Err(invalid("signature needs at least two finite values"));
        }
        Ok(())
    }

    /// Mean similarity (0-100) of the window against every signature
    pub fn similarity(&self, window: &TelemetryWindow) -> f64 {
        if self.signatures.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .signatures
            .iter()
            .map(|s| series_similarity(&window.values(s.signal), &s.values))
            .sum();
        total / self.signatures.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentMatch {
    pub incident_id: String,
    pub kind: IncidentKind,
    /// 0-100
    pub similarity: f64,
    pub description: String,
    pub warning_message: String,
}

/// Collection of reference incidents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCatalogue {
    incidents: Vec<IncidentSignature>,
    #[serde(default = "default_threshold")]
    similarity_threshold: f64,
    #[serde(default = "default_min_samples")]
    min_samples: usize,
}

fn default_threshold() -> f64 {
    INCIDENT_SIMILARITY_THRESHOLD
}

fn default_min_samples() -> usize {
    INCIDENT_MIN_SAMPLES
}

impl Default for IncidentCatalogue {
    fn default() -> Self {
        let runaway = IncidentSignature::new(
            "2024-KM-HC-001",
            IncidentKind::HydraulicRunaway,
            "Hydraulic runaway after 12 mm to 16 mm hose replacement",
            TriggerCondition::SignalEquals {
                signal: Signal::PipeDiameter,
                value: 16.0,
                tolerance: DEFAULT_TRIGGER_TOLERANCE,
            },
        )
        .with_signature(
            Signal::HydraulicPressure,
            &[45.0, 46.0, 48.0, 52.0, 58.0, 75.0, 95.0, 120.0, 145.0, 180.0],
        )
        .with_signature(
            Signal::HoseTension,
            &[25.0, 26.0, 28.0, 35.0, 50.0, 80.0, 120.0, 200.0, 350.0, 450.0],
        );

        let seizure = IncidentSignature::new(
            "2023-VJ-BRG-003",
            IncidentKind::BearingSeizure,
            "Main bearing seizure due to lubrication failure",
            TriggerCondition::Always,
        )
        .with_signature(
            Signal::Temperature,
            &[55.0, 56.0, 58.0, 62.0, 68.0, 75.0, 85.0, 98.0, 110.0, 125.0],
        )
        .with_signature(
            Signal::Vibration,
            &[0.02, 0.025, 0.03, 0.04, 0.055, 0.07, 0.082, 0.09, 0.095, 0.1],
        );

        Self::new(vec![runaway, seizure])
    }
}

impl IncidentCatalogue {
    pub fn new(incidents: Vec<IncidentSignature>) -> Self {
        Self {
            incidents,
            similarity_threshold: INCIDENT_SIMILARITY_THRESHOLD,
            min_samples: INCIDENT_MIN_SAMPLES,
        }
    }

    /// Load and validate a catalogue from JSON
    ///
    /// Accepts either a bare array of incidents or a full catalogue object.
    pub fn from_json(json: &str) -> SentinelResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let catalogue = if value.is_array() {
            Self::new(serde_json::from_value(value)?)
        } else {
            serde_json::from_value(value)?
        };
        for incident in &catalogue.incidents {
            incident.validate()?;
        }
        log_info!("loaded incident catalogue with {} incidents", catalogue.incidents.len());
        Ok(catalogue)
    }

    pub fn with_threshold(mut self, similarity: f64) -> Self {
        self.similarity_threshold = similarity.clamp(0.0, 100.0);
        self
    }

    pub fn incidents(&self) -> &[IncidentSignature] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Best incident match above the similarity threshold, if any
    pub fn best_match(&self, window: &TelemetryWindow) -> Option<IncidentMatch> {
        if window.len() < self.min_samples {
            return None;
        }

        let mut best: Option<(&IncidentSignature, f64)> = None;
        for incident in &self.incidents {
            if !incident.trigger.holds(window) {
                continue;
            }
            let similarity = incident.similarity(window);
            let improves = best.map_or(true, |(_, s)| similarity > s);
            if similarity > self.similarity_threshold && improves {
                best = Some((incident, similarity));
            }
        }

        best.map(|(incident, similarity)| {
            log_info!(
                "incident match on {}: {} at {:.1}%",
                window.asset_id(),
                incident.id,
                similarity
            );
            IncidentMatch {
                incident_id: incident.id.clone(),
                kind: incident.kind,
                similarity,
                description: incident.description.clone(),
                warning_message: format!(
                    "PATTERN MATCH: Possible {} Detected! \"{}\" Similarity: {:.1}%",
                    incident.kind, incident.description, similarity
                ),
            }
        })
    }
}

/// Correlation similarity of two series on a 0-100 scale
///
/// The tail of `current` is aligned with the head of `reference`. Series
/// shorter than two points score 0; a flat series scores 50.
pub fn series_similarity(current: &[f64], reference: &[f64]) -> f64 {
    let m = current.len().min(reference.len());
    if m < 2 {
        return 0.0;
    }
    let a = normalize(&current[current.len() - m..]);
    let b = normalize(&reference[..m]);

    let (mean_a, mean_b) = (mean(&a), mean(&b));
    let (mut covariance, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(&b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = var_a * var_b;
    let correlation = if denominator > 0.0 {
        sanitize(covariance / libm::sqrt(denominator))
    } else {
        0.0
    };
    ((correlation + 1.0) * 50.0).clamp(0.0, 100.0)
}

fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    values.iter().map(|v| (v - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroguard_core::TelemetrySample;

    fn runaway_window(pipe_diameter: f64) -> TelemetryWindow {
        let pressure = [45.0, 46.0, 48.0, 52.0, 58.0, 75.0, 95.0, 120.0, 145.0, 180.0];
        let tension = [25.0, 26.0, 28.0, 35.0, 50.0, 80.0, 120.0, 200.0, 350.0, 450.0];
        let mut window = TelemetryWindow::new("unit-2", 10);
        for i in 0..10 {
            window.push(
                TelemetrySample::new("unit-2", i as u64)
                    .with(Signal::HydraulicPressure, pressure[i] * 1.1 + 3.0)
                    .with(Signal::HoseTension, tension[i] * 0.9)
                    .with(Signal::PipeDiameter, pipe_diameter)
                    .with(Signal::Temperature, 50.0)
                    .with(Signal::Vibration, 0.02),
            );
        }
        window
    }

    #[test]
    fn test_similarity_scale() {
        assert!((series_similarity(&[1.0, 2.0, 3.0], &[10.0, 20.0, 30.0]) - 100.0).abs() < 1e-9);
        assert!(series_similarity(&[3.0, 2.0, 1.0], &[10.0, 20.0, 30.0]).abs() < 1e-9);
        assert_eq!(series_similarity(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), 50.0);
        assert_eq!(series_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_hydraulic_runaway_match() {
        let found = IncidentCatalogue::default().best_match(&runaway_window(16.0)).unwrap();
        assert_eq!(found.incident_id, "2024-KM-HC-001");
        assert_eq!(found.kind, IncidentKind::HydraulicRunaway);
        assert!(found.similarity > 99.0);
        assert!(found.warning_message.starts_with("PATTERN MATCH: Possible HYDRAULIC RUNAWAY Detected!"));
    }

    #[test]
    fn test_trigger_precondition_blocks_match() {
        assert!(IncidentCatalogue::default().best_match(&runaway_window(12.0)).is_none());
    }

    #[test]
    fn test_short_window_never_matches() {
        let mut window = TelemetryWindow::new("unit-2", 10);
        for i in 0..4 {
            window.push(TelemetrySample::new("unit-2", i).with(Signal::Temperature, 55.0 + i as f64 * 10.0));
        }
        assert!(IncidentCatalogue::default().best_match(&window).is_none());
    }

    #[test]
    fn test_catalogue_from_json() {
        let catalogue = IncidentCatalogue::from_json(
            r#"[{
                "id": "2022-X-ALN-001",
                "kind": "ALIGNMENT_DRIFT",
                "description": "Shaft alignment drift after foundation settling",
                "signatures": [{ "signal": "foundationDisplacement", "values": [0.1, 0.15, 0.2, 0.3, 0.45] }],
                "trigger": { "type": "ALWAYS" }
            }]"#,
        )
        .unwrap();
        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.incidents()[0].kind, IncidentKind::AlignmentDrift);

        let err = IncidentCatalogue::from_json(
            r#"[{ "id": "x", "kind": "BEARING_SEIZURE", "description": "", "signatures": [], "trigger": { "type": "ALWAYS" } }]"#,
        )
        .unwrap_err();
        assert!(matches!(err, SentinelError::InvalidPattern { .. }));
        assert!(IncidentCatalogue::from_json("not json").is_err());
    }
}
