//! Default hydro-unit failure patterns
//!
//! Each pattern is authored as JSON and decoded through the same serde path
//! as user-supplied libraries, so the defaults exercise the loader. The
//! decoded library is built once and shared read-only; a decode failure is
//! kept and returned to every caller.

use hydroguard_core::{HeuristicPattern, SentinelError, SentinelResult};
use serde_json::json;

/// Cavitation precursor: rising vibration, oscillating draft-tube pressure
/// and a guide vane closed to part load
pub fn cavitation_complex() -> SentinelResult<HeuristicPattern> {
    let pattern = json!({
        "id": "cavitation-complex",
        "name": "Cavitation Precursor (Level 4)",
        "description": "Multi-variate correlation indicating implosion damage.",
        "baseSeverity": "CRITICAL",
        "slogan": "Cavitation: rapid implosion of vapor bubbles causing erosive damage.",
        "physicsNarrative": "Flow turbulence detected: differential pressure in the draft tube suggests vortex rope formation, transferring destructive energy to the runner linkage.",
        "conditions": [
            { "signal": "vibration", "operator": "TREND_MATCH", "targetTrend": "RISING", "weight": 0.35 },
            { "signal": "draftTubePressure", "operator": "VARIANCE_MATCH", "threshold": 1.0, "weight": 0.35 },
            { "signal": "guideVane", "operator": "LESS", "threshold": 40.0, "weight": 0.3 }
        ],
        "exposureBoost": { "minMinutes": 15.0, "factor": 1.2 },
        "precedent": {
            "date": "12 Oct 2024",
            "event": "Guide Vane Erosion (WO-921)",
            "confidence": 0.88
        },
        "actions": [
            { "type": "FOCUS_3D", "label": "Inspect Draft Tube", "targetId": "Mesh_DraftTube_Liner", "icon": "Box" },
            { "type": "OPEN_SOP", "label": "Drainage Protocol", "targetId": "Francis_SOP_Drainage_Pumps", "icon": "FileText" }
        ]
    });

    Ok(serde_json::from_value(pattern)?)
}

/// Bearing thermal instability: temperature above its loaded baseline,
/// rising fast, at high speed
pub fn bearing_thermal_instability() -> SentinelResult<HeuristicPattern> {
    let pattern = json!({
        "id": "bearing-thermal-instability",
        "name": "Bearing Thermal Instability",
        "description": "Rapid thermal rise under high load.",
        "baseSeverity": "HIGH",
        "slogan": "Thermal runaway: friction coefficient escalation exceeding cooling capacity.",
        "physicsNarrative": "Anomaly detected: kinetic energy at the runner is dissipating as friction-induced heat in bearing #2. Efficiency loss projected at {efficiency_loss}%.",
        "conditions": [
            {
                "signal": "bearingTemp",
                "operator": "DYNAMIC_THRESHOLD",
                "baselineId": "bearingTemp_Loaded",
                "sigmaMultiplier": 2.5,
                "weight": 0.4
            },
            { "signal": "rpm", "operator": "GREATER", "threshold": 300.0, "weight": 0.2 },
            { "signal": "bearingTemp", "operator": "SLOPE_GREATER", "threshold": 2.0, "weight": 0.4 }
        ],
        "precedent": {
            "date": "04 Mar 2023",
            "event": "Bearing Pad 3 Scuffing (WO-104)",
            "confidence": 0.92
        },
        "actions": [
            { "type": "FOCUS_3D", "label": "Focus Guide Bearing", "targetId": "Mesh_GuideBearing_Pad3", "icon": "Box" },
            { "type": "OPEN_SOP", "label": "Active Cooling Reset", "targetId": "Francis_SOP_Cooling", "icon": "FileText" }
        ]
    });

    Ok(serde_json::from_value(pattern)?)
}

lazy_static::lazy_static! {
    static ref DEFAULT_LIBRARY: SentinelResult<Vec<HeuristicPattern>> = {
        let library = decode_defaults();
        if let Err(err) = &library {
            log_warn!("default pattern library failed to decode: {}", err);
        }
        library
    };
}

fn decode_defaults() -> SentinelResult<Vec<HeuristicPattern>> {
    Ok(vec![cavitation_complex()?, bearing_thermal_instability()?])
}

/// The default library
pub fn default_library() -> SentinelResult<Vec<HeuristicPattern>> {
    DEFAULT_LIBRARY.clone()
}

/// Decode and validate a JSON array of patterns
pub fn parse_library(json: &str) -> SentinelResult<Vec<HeuristicPattern>> {
    let patterns: Vec<HeuristicPattern> = serde_json::from_str(json)?;
    for pattern in &patterns {
        pattern.validate()?;
    }
    if patterns.is_empty() {
        return Err(SentinelError::Parse("pattern library is empty".into()));
    }
    Ok(patterns)
}
