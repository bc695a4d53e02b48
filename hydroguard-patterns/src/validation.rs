//! Pattern Linting
//!
//! [`HeuristicPattern::validate`] rejects definitions the kernel cannot
//! evaluate. Linting goes further and reports definitions that evaluate but
//! probably do not do what their author meant: conditions on signals no
//! sample will ever carry, zero-weight conditions, baselines keyed on
//! nothing, duplicate ids across a library.

use std::collections::BTreeSet;

use hydroguard_core::{ConditionOperator, HeuristicPattern, Signal};
use serde::Serialize;

/// Category of a lint finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// The kernel would skip or reject the pattern
    NotEvaluable,
    /// Signal id is neither a known signal nor an alias
    UnknownSignal,
    /// Condition has zero weight and only affects coupling
    ZeroWeight,
    /// Dynamic threshold relies on a baseline keyed by the signal id
    ImplicitBaseline,
    /// The same condition appears twice
    DuplicateCondition,
    /// Two patterns share an id
    DuplicateId,
}

/// Issue levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueLevel {
    /// Informational only
    Info,
    /// Should be reviewed
    Warning,
    /// Must be fixed
    Error,
}

/// Individual lint finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintIssue {
    pub pattern_id: String,
    pub kind: IssueKind,
    pub level: IssueLevel,
    /// Index of the offending condition, if any
    pub condition: Option<usize>,
    pub message: String,
}

/// Lint result for a pattern or library
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LintReport {
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// No error-level findings
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(|i| i.level == IssueLevel::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &LintIssue> + '_ {
        self.issues.iter().filter(|i| i.level == IssueLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LintIssue> + '_ {
        self.issues.iter().filter(|i| i.level == IssueLevel::Warning)
    }

    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    fn push(
        &mut self,
        pattern: &HeuristicPattern,
        kind: IssueKind,
        level: IssueLevel,
        condition: Option<usize>,
        message: String,
    ) {
        self.issues.push(LintIssue {
            pattern_id: pattern.id.clone(),
            kind,
            level,
            condition,
            message,
        });
    }
}

/// Lint a single pattern
pub fn lint_pattern(pattern: &HeuristicPattern) -> LintReport {
    let mut report = LintReport::new();

    if let Err(err) = pattern.validate() {
        report.push(pattern, IssueKind::NotEvaluable, IssueLevel::Error, None, err.to_string());
    }

    let mut seen = Vec::new();
    for (index, condition) in pattern.conditions.iter().enumerate() {
        if Signal::from_name(&condition.signal).is_none() {
            report.push(
                pattern,
                IssueKind::UnknownSignal,
                IssueLevel::Warning,
                Some(index),
                format!("`{}` must be supplied as an extra telemetry field", condition.signal),
            );
        }

        if condition.weight == 0.0 {
            report.push(
                pattern,
                IssueKind::ZeroWeight,
                IssueLevel::Info,
                Some(index),
                "zero weight: contributes only to trend coupling".into(),
            );
        }

        if let ConditionOperator::DynamicThreshold { baseline_id: None, .. } = &condition.operator {
            report.push(
                pattern,
                IssueKind::ImplicitBaseline,
                IssueLevel::Info,
                Some(index),
                format!("baseline looked up by signal id `{}`", condition.signal),
            );
        }

        if seen.contains(&condition) {
            report.push(
                pattern,
                IssueKind::DuplicateCondition,
                IssueLevel::Warning,
                Some(index),
                "condition repeats an earlier one".into(),
            );
        }
        seen.push(condition);
    }

    report
}

/// Lint a whole library, including duplicate ids
pub fn lint_library(patterns: &[HeuristicPattern]) -> LintReport {
    let mut report = LintReport::new();
    let mut ids = BTreeSet::new();

    for pattern in patterns {
        if !ids.insert(pattern.id.as_str()) {
            report.push(
                pattern,
                IssueKind::DuplicateId,
                IssueLevel::Error,
                None,
                format!("id `{}` used more than once", pattern.id),
            );
        }
        report.issues.extend(lint_pattern(pattern).issues);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::default_library;
    use hydroguard_core::{MatrixCondition, Severity};

    #[test]
    fn test_defaults_are_clean() {
        let report = lint_library(&default_library().unwrap());
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_unknown_signal_and_zero_weight() {
        let pattern = HeuristicPattern::new("p", "P", Severity::Low)
            .with_condition(MatrixCondition::greater("statorTemp", 120.0, 1.0))
            .with_condition(MatrixCondition::slope("vibration", 0.5, 0.0));
        let report = lint_pattern(&pattern);
        assert!(report.has(IssueKind::UnknownSignal));
        assert!(report.has(IssueKind::ZeroWeight));
        assert!(report.is_valid());
    }

    #[test]
    fn test_duplicates() {
        let pattern = HeuristicPattern::new("p", "P", Severity::Low)
            .with_condition(MatrixCondition::greater("rpm", 300.0, 1.0))
            .with_condition(MatrixCondition::greater("rpm", 300.0, 1.0));
        let report = lint_library(&[pattern.clone(), pattern]);
        assert!(report.has(IssueKind::DuplicateCondition));
        assert!(report.has(IssueKind::DuplicateId));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_not_evaluable() {
        let pattern = HeuristicPattern::new("p", "P", Severity::Low)
            .with_condition(MatrixCondition::greater("rpm", 300.0, 0.0));
        let report = lint_pattern(&pattern);
        assert!(report.has(IssueKind::NotEvaluable));
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_implicit_baseline() {
        let pattern = HeuristicPattern::new("p", "P", Severity::Low)
            .with_condition(MatrixCondition::dynamic("bearingTemp", None, 2.0, 1.0));
        assert!(lint_pattern(&pattern).has(IssueKind::ImplicitBaseline));
    }
}
