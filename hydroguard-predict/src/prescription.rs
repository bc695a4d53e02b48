//! Prescriptive recommendations
//!
//! Maps a component's failure probability to an ordered action plan:
//!
//! | Probability | Band     | Actions                                         |
//! |-------------|----------|-------------------------------------------------|
//! | ≥ 90 %      | Critical | component specific, immediate then scheduled    |
//! | ≥ 70 %      | High     | inspection within 48 h, denser monitoring       |
//! | ≥ 50 %      | Medium   | monitor trends                                  |
//! | otherwise   | Nominal  | none                                            |
//!
//! Executable actions can be applied by a control system directly; the rest
//! are advisory and need a maintenance crew.

use hydroguard_core::constants::risk::{
    PRESCRIPTION_CRITICAL_PCT, PRESCRIPTION_HIGH_PCT, PRESCRIPTION_MEDIUM_PCT,
};
use serde::{Deserialize, Serialize};

use crate::rul::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Immediate,
    Scheduled,
    Monitoring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionBand {
    Nominal,
    Medium,
    High,
    Critical,
}

impl PrescriptionBand {
    pub fn from_probability(probability_pct: f64) -> Self {
        if probability_pct >= PRESCRIPTION_CRITICAL_PCT {
            PrescriptionBand::Critical
        } else if probability_pct >= PRESCRIPTION_HIGH_PCT {
            PrescriptionBand::High
        } else if probability_pct >= PRESCRIPTION_MEDIUM_PCT {
            PrescriptionBand::Medium
        } else {
            PrescriptionBand::Nominal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptiveAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub action: String,
    /// Signed setpoint change in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe_hours: Option<u32>,
    pub priority: ActionPriority,
    pub executable: bool,
}

impl PrescriptiveAction {
    fn new(action_type: ActionType, action: &str, priority: ActionPriority, executable: bool) -> Self {
        Self {
            action_type,
            action: action.to_string(),
            value: None,
            timeframe_hours: None,
            priority,
            executable,
        }
    }

    fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    fn within(mut self, hours: u32) -> Self {
        self.timeframe_hours = Some(hours);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptiveRecommendation {
    pub component: Component,
    pub failure_probability: f64,
    pub band: PrescriptionBand,
    pub message: String,
    /// Empty in the nominal band
    pub actions: Vec<PrescriptiveAction>,
}

impl PrescriptiveRecommendation {
    pub fn executable_actions(&self) -> impl Iterator<Item = &PrescriptiveAction> + '_ {
        self.actions.iter().filter(|a| a.executable)
    }
}

/// Build the action plan for `component` at `failure_probability` percent
pub fn prescribe(component: Component, failure_probability: f64) -> PrescriptiveRecommendation {
    use ActionPriority::*;
    use ActionType::*;

    let band = PrescriptionBand::from_probability(failure_probability);
    let (message, actions) = match band {
        PrescriptionBand::Critical => {
            let (actions, hours) = critical_actions(component);
            (
                format!(
                    "CRITICAL: Failure probability of {component} is {failure_probability:.0}%. Reduce pressure/load immediately and schedule replacement within {hours} hours."
                ),
                actions,
            )
        }
        PrescriptionBand::High => (
            format!(
                "HIGH RISK: {component} shows signs of degradation ({failure_probability:.0}%). Schedule an inspection within 48 hours."
            ),
            vec![
                PrescriptiveAction::new(Scheduled, "SCHEDULE_INSPECTION", High, false).within(48),
                PrescriptiveAction::new(Monitoring, "INCREASE_MONITORING_FREQUENCY", High, true),
            ],
        ),
        PrescriptionBand::Medium => (
            format!(
                "MEDIUM RISK: {component} shows minor anomalies ({failure_probability:.0}%). Continue monitoring."
            ),
            vec![PrescriptiveAction::new(Monitoring, "MONITOR_TRENDS", Medium, true)],
        ),
        PrescriptionBand::Nominal => (
            format!("{component} is operating in its optimal regime."),
            Vec::new(),
        ),
    };

    PrescriptiveRecommendation {
        component,
        failure_probability,
        band,
        message,
        actions,
    }
}

fn critical_actions(component: Component) -> (Vec<PrescriptiveAction>, u32) {
    use ActionPriority::Critical;
    use ActionType::*;

    match component {
        Component::Hose | Component::HydraulicSystem => (
            vec![
                PrescriptiveAction::new(Immediate, "REDUCE_PRESSURE", Critical, true).value(-10.0),
                PrescriptiveAction::new(Scheduled, "REPLACE_COMPONENT", Critical, false).within(12),
            ],
            12,
        ),
        Component::Bearing => (
            vec![
                PrescriptiveAction::new(Immediate, "ACTIVATE_HYDROSTATIC_LIFT", Critical, true),
                PrescriptiveAction::new(Immediate, "REDUCE_LOAD", Critical, true).value(-20.0),
                PrescriptiveAction::new(Scheduled, "INSPECT_AND_REPLACE", Critical, false).within(6),
            ],
            6,
        ),
        Component::Seal | Component::WicketGate => (
            vec![PrescriptiveAction::new(Scheduled, "INSPECT_AND_REPLACE", Critical, false).within(12)],
            12,
        ),
    }
}
