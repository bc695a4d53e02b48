//! Declarative Failure Patterns
//!
//! ## Overview
//!
//! A [`HeuristicPattern`] is a named failure signature: a set of weighted
//! [`MatrixCondition`]s, each testing one signal's recent history. The
//! kernel in [`crate::sentinel`] turns the matched weights into a
//! probability.
//!
//! The condition operator is a sum type. Each variant carries exactly the
//! parameters it needs, so a `TREND_MATCH` can never lack its target and a
//! `GREATER` can never lack its threshold.
//!
//! ## JSON Shape
//!
//! Patterns are authored as JSON. The operator tag and its parameters sit
//! flat beside the signal id and weight:
//!
//! ```json
//! { "signal": "guideVane", "operator": "LESS", "threshold": 40, "weight": 0.3 }
//! { "signal": "vibration", "operator": "TREND_MATCH", "targetTrend": "RISING", "weight": 0.35 }
//! { "signal": "bearingTemp", "operator": "DYNAMIC_THRESHOLD",
//!   "baselineId": "bearingTemp_Loaded", "sigmaMultiplier": 2.5, "weight": 0.4 }
//! ```
//!
//! `variableId` is accepted as an alias of `signal`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::kernel::DEFAULT_SIGMA_MULTIPLIER;
use crate::errors::{SentinelError, SentinelResult};
use crate::trend::TrendKind;

/// Pattern severity, copied verbatim into emitted insights
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Low => "LOW",
            Severity::Moderate => "MODERATE",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        })
    }
}

fn default_sigma_multiplier() -> f64 {
    DEFAULT_SIGMA_MULTIPLIER
}

/// The six condition operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOperator {
    /// Latest value > threshold
    Greater { threshold: f64 },
    /// Latest value < threshold
    Less { threshold: f64 },
    /// Trend classification equals target
    TrendMatch {
        #[serde(rename = "targetTrend")]
        target: TrendKind,
    },
    /// Trend variance > threshold
    VarianceMatch { threshold: f64 },
    /// Trend slope > threshold
    SlopeGreater { threshold: f64 },
    /// Latest value > baseline mean + multiplier * baseline sigma
    DynamicThreshold {
        /// Baseline key; the condition's signal id when absent
        #[serde(rename = "baselineId", default, skip_serializing_if = "Option::is_none")]
        baseline_id: Option<String>,
        #[serde(rename = "sigmaMultiplier", default = "default_sigma_multiplier")]
        sigma_multiplier: f64,
    },
}

impl ConditionOperator {
    /// Trend-type operators count toward the coupling boost
    pub fn is_trend_based(&self) -> bool {
        matches!(
            self,
            ConditionOperator::TrendMatch { .. }
                | ConditionOperator::VarianceMatch { .. }
                | ConditionOperator::SlopeGreater { .. }
        )
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ConditionOperator::Greater { .. } => "GREATER",
            ConditionOperator::Less { .. } => "LESS",
            ConditionOperator::TrendMatch { .. } => "TREND_MATCH",
            ConditionOperator::VarianceMatch { .. } => "VARIANCE_MATCH",
            ConditionOperator::SlopeGreater { .. } => "SLOPE_GREATER",
            ConditionOperator::DynamicThreshold { .. } => "DYNAMIC_THRESHOLD",
        }
    }
}

/// One weighted predicate within a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixCondition {
    /// Signal id (canonical [`Signal`](crate::Signal) id or extra field name)
    #[serde(alias = "variableId")]
    pub signal: String,
    #[serde(flatten)]
    pub operator: ConditionOperator,
    pub weight: f64,
}

impl MatrixCondition {
    pub fn new(signal: impl Into<String>, operator: ConditionOperator, weight: f64) -> Self {
        Self {
            signal: signal.into(),
            operator,
            weight,
        }
    }

    pub fn greater(signal: impl Into<String>, threshold: f64, weight: f64) -> Self {
        Self::new(signal, ConditionOperator::Greater { threshold }, weight)
    }

    pub fn less(signal: impl Into<String>, threshold: f64, weight: f64) -> Self {
        Self::new(signal, ConditionOperator::Less { threshold }, weight)
    }

    pub fn trend(signal: impl Into<String>, target: TrendKind, weight: f64) -> Self {
        Self::new(signal, ConditionOperator::TrendMatch { target }, weight)
    }

    pub fn variance(signal: impl Into<String>, threshold: f64, weight: f64) -> Self {
        Self::new(signal, ConditionOperator::VarianceMatch { threshold }, weight)
    }

    pub fn slope(signal: impl Into<String>, threshold: f64, weight: f64) -> Self {
        Self::new(signal, ConditionOperator::SlopeGreater { threshold }, weight)
    }

    pub fn dynamic(
        signal: impl Into<String>,
        baseline_id: Option<&str>,
        sigma_multiplier: f64,
        weight: f64,
    ) -> Self {
        Self::new(
            signal,
            ConditionOperator::DynamicThreshold {
                baseline_id: baseline_id.map(str::to_string),
                sigma_multiplier,
            },
            weight,
        )
    }

    /// Baseline key for dynamic thresholds
    pub fn baseline_key(&self) -> Option<&str> {
        match &self.operator {
            ConditionOperator::DynamicThreshold { baseline_id, .. } => {
                Some(baseline_id.as_deref().unwrap_or(&self.signal))
            }
            _ => None,
        }
    }
}

/// Kind of UI action attached to a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TacticalActionKind {
    #[serde(rename = "FOCUS_3D")]
    Focus3d,
    #[serde(rename = "OPEN_SOP")]
    OpenSop,
    #[serde(rename = "SHOW_SCHEMA")]
    ShowSchema,
}

/// A contextual action offered alongside an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TacticalAction {
    #[serde(rename = "type")]
    pub kind: TacticalActionKind,
    pub label: String,
    pub target_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

/// An archived event similar to the current pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPrecedent {
    pub date: String,
    pub event: String,
    pub confidence: f64,
}

/// Multiplicative boost applied once time-in-state exceeds a duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposureBoost {
    pub min_minutes: f64,
    pub factor: f64,
}

/// A named failure signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeuristicPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_severity: Severity,
    #[serde(default)]
    pub slogan: String,
    pub conditions: Vec<MatrixCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<TacticalAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedent: Option<HistoricalPrecedent>,
    /// Narrative template. `{probability}` and `{efficiency_loss}` are
    /// substituted on emission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physics_narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure_boost: Option<ExposureBoost>,
}

impl HeuristicPattern {
    pub fn new(id: impl Into<String>, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            base_severity: severity,
            slogan: String::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
            precedent: None,
            physics_narrative: None,
            exposure_boost: None,
        }
    }

    pub fn with_condition(mut self, condition: MatrixCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_exposure_boost(mut self, min_minutes: f64, factor: f64) -> Self {
        self.exposure_boost = Some(ExposureBoost { min_minutes, factor });
        self
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.physics_narrative = Some(narrative.into());
        self
    }

    pub fn with_precedent(mut self, precedent: HistoricalPrecedent) -> Self {
        self.precedent = Some(precedent);
        self
    }

    pub fn total_weight(&self) -> f64 {
        self.conditions.iter().map(|c| c.weight).sum()
    }

    /// A pattern whose weights sum to zero has no defined probability
    pub fn is_evaluable(&self) -> bool {
        self.total_weight() > 0.0
    }

    /// Check the definition for values the kernel cannot work with
    pub fn validate(&self) -> SentinelResult<()> {
        let fail = |reason: String| SentinelError::InvalidPattern {
            id: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(fail("id is empty".into()));
        }
        if self.conditions.is_empty() {
            return Err(fail("no conditions".into()));
        }
        for (index, condition) in self.conditions.iter().enumerate() {
            if condition.signal.trim().is_empty() {
                return Err(fail(format!("condition {index} has no signal")));
            }
            if !(condition.weight.is_finite() && condition.weight >= 0.0) {
                return Err(fail(format!("condition {index} weight must be finite and >= 0")));
            }
            if let ConditionOperator::DynamicThreshold { sigma_multiplier, .. } = &condition.operator {
                if !(sigma_multiplier.is_finite() && *sigma_multiplier >= 0.0) {
                    return Err(fail(format!("condition {index} sigma multiplier must be >= 0")));
                }
            }
        }
        if !self.is_evaluable() {
            return Err(fail("total condition weight must be > 0".into()));
        }
        if let Some(boost) = self.exposure_boost {
            if !(boost.factor.is_finite() && boost.factor > 0.0 && boost.min_minutes.is_finite()) {
                return Err(fail("exposure boost must have a finite positive factor".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_json_shape() {
        let condition: MatrixCondition = serde_json::from_str(
            r#"{ "variableId": "guideVane", "operator": "LESS", "threshold": 40, "weight": 0.3 }"#,
        )
        .unwrap();
        assert_eq!(condition, MatrixCondition::less("guideVane", 40.0, 0.3));

        let condition: MatrixCondition = serde_json::from_str(
            r#"{ "signal": "vibration", "operator": "TREND_MATCH", "targetTrend": "RISING", "weight": 0.35 }"#,
        )
        .unwrap();
        assert_eq!(condition.operator, ConditionOperator::TrendMatch { target: TrendKind::Rising });
        assert!(condition.operator.is_trend_based());
    }

    #[test]
    fn test_dynamic_threshold_defaults() {
        let condition: MatrixCondition = serde_json::from_str(
            r#"{ "signal": "bearingTemp", "operator": "DYNAMIC_THRESHOLD", "weight": 0.4 }"#,
        )
        .unwrap();
        assert_eq!(
            condition.operator,
            ConditionOperator::DynamicThreshold { baseline_id: None, sigma_multiplier: 2.0 }
        );
        assert_eq!(condition.baseline_key(), Some("bearingTemp"));

        let keyed = MatrixCondition::dynamic("bearingTemp", Some("bearingTemp_Loaded"), 2.5, 0.4);
        assert_eq!(keyed.baseline_key(), Some("bearingTemp_Loaded"));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let result = serde_json::from_str::<MatrixCondition>(
            r#"{ "signal": "x", "operator": "DELTA_GREATER", "threshold": 5, "weight": 1 }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let pattern = HeuristicPattern::new("p", "P", Severity::High)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.5));
        assert!(pattern.validate().is_ok());

        let zero = HeuristicPattern::new("z", "Z", Severity::Low)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.0));
        assert!(!zero.is_evaluable());
        assert!(matches!(zero.validate(), Err(SentinelError::InvalidPattern { .. })));

        let negative = HeuristicPattern::new("n", "N", Severity::Low)
            .with_condition(MatrixCondition::greater("vibration", 5.0, -1.0));
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_action_kind_names() {
        let action: TacticalAction = serde_json::from_str(
            r#"{ "type": "FOCUS_3D", "label": "Inspect", "targetId": "Mesh_1" }"#,
        )
        .unwrap();
        assert_eq!(action.kind, TacticalActionKind::Focus3d);
        assert!(action.icon.is_empty());
    }
}
