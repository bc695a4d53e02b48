//! Telemetry Samples and Signal Normalization
//!
//! ## Overview
//!
//! Field names arrive from many collaborators: a SCADA export writes
//! `flowRate`, a hand-built test fixture writes `Q`, a legacy historian
//! writes `GrossHead`. Every detector in HydroGuard reads signals through a
//! single closed [`Signal`] enum instead, and the mapping from free-form
//! names to signals happens exactly once, in [`TelemetrySample::normalize`].
//!
//! ## Normalization Rules
//!
//! 1. Names are matched case-insensitively against each signal's canonical
//!    id and its aliases. The canonical id wins over an alias when both are
//!    present.
//! 2. Non-finite values (NaN, ±∞) are dropped.
//! 3. Efficiency reported as a fraction (`<= 1.0`) is converted to percent.
//! 4. Names that match no signal are kept verbatim in `extra`, so custom
//!    pattern conditions can still reference them.
//!
//! ## Units
//!
//! | Signal | Unit |
//! |---|---|
//! | vibration | mm/s |
//! | temperatures | °C |
//! | flow | m³/s |
//! | head | m |
//! | pressures | bar |
//! | efficiency | % |
//! | output | MW |
//! | foundation displacement | mm |
//! | pipe diameter | mm |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Known hydro-unit signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Signal {
    Vibration,
    Temperature,
    BearingTemp,
    AmbientTemp,
    WaterTemp,
    Flow,
    Head,
    HydraulicPressure,
    DraftTubePressure,
    Efficiency,
    Output,
    Rpm,
    GuideVane,
    CavitationIntensity,
    HoseTension,
    FoundationDisplacement,
    PipeDiameter,
    Eccentricity,
    Seepage,
}

impl Signal {
    /// Every known signal, in declaration order
    pub const ALL: [Signal; 19] = [
        Signal::Vibration,
        Signal::Temperature,
        Signal::BearingTemp,
        Signal::AmbientTemp,
        Signal::WaterTemp,
        Signal::Flow,
        Signal::Head,
        Signal::HydraulicPressure,
        Signal::DraftTubePressure,
        Signal::Efficiency,
        Signal::Output,
        Signal::Rpm,
        Signal::GuideVane,
        Signal::CavitationIntensity,
        Signal::HoseTension,
        Signal::FoundationDisplacement,
        Signal::PipeDiameter,
        Signal::Eccentricity,
        Signal::Seepage,
    ];

    /// Canonical id, as referenced by pattern conditions
    pub const fn id(&self) -> &'static str {
        match self {
            Signal::Vibration => "vibration",
            Signal::Temperature => "temperature",
            Signal::BearingTemp => "bearingTemp",
            Signal::AmbientTemp => "ambientTemp",
            Signal::WaterTemp => "waterTemp",
            Signal::Flow => "flow",
            Signal::Head => "head",
            Signal::HydraulicPressure => "hydraulicPressure",
            Signal::DraftTubePressure => "draftTubePressure",
            Signal::Efficiency => "efficiency",
            Signal::Output => "output",
            Signal::Rpm => "rpm",
            Signal::GuideVane => "guideVane",
            Signal::CavitationIntensity => "cavitationIntensity",
            Signal::HoseTension => "hoseTension",
            Signal::FoundationDisplacement => "foundationDisplacement",
            Signal::PipeDiameter => "pipeDiameter",
            Signal::Eccentricity => "eccentricity",
            Signal::Seepage => "seepage",
        }
    }

    /// Alternative field names accepted at ingestion
    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Signal::Vibration => &["vib", "vibrationMmS"],
            Signal::Temperature => &["temp"],
            Signal::BearingTemp => &["bearingTemperature", "bearing_temp"],
            Signal::AmbientTemp => &["ambientTemperature", "ambient_temp"],
            Signal::WaterTemp => &["waterTemperature", "water_temp"],
            Signal::Flow => &["flowRate", "flow_rate", "Q"],
            Signal::Head => &["grossHead", "netHead", "H"],
            Signal::HydraulicPressure => &["pressure", "cylinderPressure", "hydraulic_pressure"],
            Signal::DraftTubePressure => &["draftTube", "draft_tube_pressure"],
            Signal::Efficiency => &["eta"],
            Signal::Output => &["power", "outputPower", "output_power", "activePower"],
            Signal::Rpm => &["speed"],
            Signal::GuideVane => &["guideVaneOpening", "wicketGate", "guide_vane"],
            Signal::CavitationIntensity => &["cavitation", "acoustic", "cavitation_intensity"],
            Signal::HoseTension => &["hose_tension"],
            Signal::FoundationDisplacement => &["alignment", "alignmentDeviation", "foundation_displacement"],
            Signal::PipeDiameter => &["hoseDiameter", "pipe_diameter"],
            Signal::Eccentricity => &["grindIndex", "grind_index"],
            Signal::Seepage => &["leakIndex", "leakage", "leak_index"],
        }
    }

    /// Resolve a field name (canonical id or alias, any case) to a signal
    pub fn from_name(name: &str) -> Option<Signal> {
        Signal::ALL.iter().copied().find(|signal| signal.matches(name))
    }

    fn matches(&self, name: &str) -> bool {
        self.id().eq_ignore_ascii_case(name)
            || self.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Ingestion contract: one reading as delivered by a collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    pub asset_id: String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub fields: BTreeMap<String, f64>,
}

impl RawSample {
    pub fn new(asset_id: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            asset_id: asset_id.into(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Add a named field
    pub fn field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// One normalized reading for one asset
///
/// Immutable once stored in a window. Any signal may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub asset_id: String,
    pub timestamp: Timestamp,
    signals: BTreeMap<Signal, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, f64>,
}

impl TelemetrySample {
    /// Empty sample, to be filled with [`with`](Self::with)
    pub fn new(asset_id: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            asset_id: asset_id.into(),
            timestamp,
            signals: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Normalize a raw sample into the closed signal schema
    pub fn normalize(raw: RawSample) -> Self {
        let mut sample = Self::new(raw.asset_id, raw.timestamp);

        for signal in Signal::ALL {
            let canonical = raw
                .fields
                .iter()
                .find(|(name, value)| value.is_finite() && signal.id().eq_ignore_ascii_case(name));
            let found = canonical.or_else(|| {
                raw.fields
                    .iter()
                    .find(|(name, value)| value.is_finite() && signal.matches(name))
            });

            if let Some((_, &value)) = found {
                let value = match signal {
                    Signal::Efficiency if value <= 1.0 => value * 100.0,
                    _ => value,
                };
                sample = sample.with(signal, value);
            }
        }

        for (name, value) in raw.fields {
            if value.is_finite() && Signal::from_name(&name).is_none() {
                sample.extra.insert(name, value);
            }
        }

        sample
    }

    /// Set a signal value as given. Non-finite values are ignored.
    pub fn with(mut self, signal: Signal, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }
        self.signals.insert(signal, value);
        self
    }

    /// Set an unrecognised field. Non-finite values are ignored.
    pub fn with_extra(mut self, name: impl Into<String>, value: f64) -> Self {
        if value.is_finite() {
            self.extra.insert(name.into(), value);
        }
        self
    }

    pub fn get(&self, signal: Signal) -> Option<f64> {
        self.signals.get(&signal).copied()
    }

    /// Look up a value by condition id: known signals first, then `extra`
    pub fn get_by_id(&self, id: &str) -> Option<f64> {
        match Signal::from_name(id) {
            Some(signal) => self.get(signal),
            None => self.extra.get(id).copied(),
        }
    }

    /// Iterate over present known signals
    pub fn signals(&self) -> impl Iterator<Item = (Signal, f64)> + '_ {
        self.signals.iter().map(|(signal, value)| (*signal, *value))
    }

    /// Iterate over unrecognised fields
    pub fn extra(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.extra.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl From<RawSample> for TelemetrySample {
    fn from(raw: RawSample) -> Self {
        TelemetrySample::normalize(raw)
    }
}
