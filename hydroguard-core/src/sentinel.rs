//! Weighted Multi-Variate Pattern-Matching Kernel
//!
//! ## Overview
//!
//! The kernel evaluates every [`HeuristicPattern`] in a library against the
//! recent history of each signal and emits a [`SentinelInsight`] for the
//! patterns whose probability clears the emission threshold.
//!
//! ## Probability Pipeline
//!
//! ```text
//! raw       = Σ matched weights / Σ evaluated weights
//! coupling  = raw * 1.15^(synchronized - 1)      if synchronized >= 2
//! exposure  = coupling * factor                  if time in state > min
//! learned   = exposure * pattern multiplier      if the context has one
//! emit      = learned > 0.60
//! ```
//!
//! Every multiplicative step is capped at 1.0. "Synchronized" counts the
//! matched trend-type conditions (`TREND_MATCH`, `VARIANCE_MATCH`,
//! `SLOPE_GREATER`).
//!
//! ## Missing Data
//!
//! - A condition whose signal has no history is skipped and does not count
//!   toward the total weight.
//! - A `DYNAMIC_THRESHOLD` condition without a baseline counts toward the
//!   total weight and never matches.
//! - A pattern whose evaluated weight is zero is skipped with a warning.
//!
//! ## Explainability
//!
//! Each insight carries one vector string per matched condition plus one per
//! applied boost, and a proof string that reproduces the arithmetic:
//!
//! ```text
//! Prob = [vibration[6.0] * w(0.50) + vibration[6.0] * w(0.00)] / Total(1.00) = 66.1%
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::KernelConfig;
use crate::errors::SentinelResult;
use crate::history::SignalMap;
use crate::pattern::{ConditionOperator, HeuristicPattern, HistoricalPrecedent, MatrixCondition, Severity, TacticalAction};
use crate::trend::{compute_trend_with, sanitize};
use crate::weights::WeightStore;

/// Expected mean and sigma of a signal under an operating regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineStat {
    pub signal_id: String,
    pub mean: f64,
    pub sigma: f64,
}

impl BaselineStat {
    /// Negative sigma is taken as its magnitude
    pub fn new(signal_id: impl Into<String>, mean: f64, sigma: f64) -> Self {
        Self {
            signal_id: signal_id.into(),
            mean,
            sigma: sigma.abs(),
        }
    }

    pub fn limit(&self, sigma_multiplier: f64) -> f64 {
        self.mean + sigma_multiplier * self.sigma
    }
}

/// Supplies baselines for an asset, typically from an analytics store
pub trait BaselineProvider {
    fn baselines(&self, asset_id: &str) -> SentinelResult<Vec<BaselineStat>>;
}

/// Optional evaluation inputs beyond the signal histories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentinelContext {
    /// Minutes the asset has spent in its current operating state
    pub time_at_state_minutes: Option<f64>,
    pub baselines: BTreeMap<String, BaselineStat>,
    /// Learned per-pattern multipliers
    pub weights: BTreeMap<String, f64>,
}

impl SentinelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_at_state(mut self, minutes: f64) -> Self {
        self.time_at_state_minutes = Some(minutes);
        self
    }

    pub fn with_baseline(mut self, baseline: BaselineStat) -> Self {
        self.baselines.insert(baseline.signal_id.clone(), baseline);
        self
    }

    pub fn with_baselines(mut self, baselines: impl IntoIterator<Item = BaselineStat>) -> Self {
        for baseline in baselines {
            self.baselines.insert(baseline.signal_id.clone(), baseline);
        }
        self
    }

    pub fn with_weight(mut self, pattern_id: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(pattern_id.into(), weight);
        self
    }

    /// Copy the current multipliers of a weight store
    pub fn with_weight_store(mut self, store: &WeightStore) -> Self {
        self.weights = store.weights().clone();
        self
    }
}

/// One detected pattern match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentinelInsight {
    pub pattern_id: String,
    pub name: String,
    /// In (emission threshold, 1.0]
    pub probability: f64,
    pub severity: Severity,
    pub slogan: String,
    pub vectors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precedent: Option<HistoricalPrecedent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<TacticalAction>,
    pub math_proof: String,
    pub physics_narrative: String,
}

/// Score of one pattern before the emission threshold is applied
#[derive(Debug, Clone, PartialEq)]
pub struct PatternScore {
    /// Matched weight over evaluated weight
    pub raw_probability: f64,
    /// After coupling, exposure and learned multipliers
    pub probability: f64,
    pub matched_weight: f64,
    pub total_weight: f64,
    pub synchronized_trends: usize,
    pub vectors: Vec<String>,
    proof_terms: Vec<String>,
}

impl PatternScore {
    pub fn math_proof(&self) -> String {
        format!(
            "Prob = [{}] / Total({:.2}) = {:.1}%",
            self.proof_terms.join(" + "),
            self.total_weight,
            self.probability * 100.0
        )
    }
}

struct ConditionOutcome {
    reason: String,
    value: f64,
}

/// The pattern-matching kernel
#[derive(Debug, Clone, Default)]
pub struct SentinelKernel {
    config: KernelConfig,
}

impl SentinelKernel {
    pub fn new(config: KernelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Evaluate a pattern library, returning insights by descending
    /// probability
    pub fn evaluate(
        &self,
        signals: &SignalMap,
        patterns: &[HeuristicPattern],
        context: &SentinelContext,
    ) -> Vec<SentinelInsight> {
        let mut insights: Vec<SentinelInsight> = patterns
            .iter()
            .filter_map(|pattern| self.evaluate_pattern(pattern, signals, context))
            .collect();

        insights.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        insights
    }

    /// Evaluate after fetching baselines from a provider
    ///
    /// Provider baselines override context baselines for the same signal. A
    /// provider failure is logged and evaluation continues with the context
    /// baselines alone.
    pub fn evaluate_with_provider<P: BaselineProvider + ?Sized>(
        &self,
        asset_id: &str,
        signals: &SignalMap,
        patterns: &[HeuristicPattern],
        context: &SentinelContext,
        provider: &P,
    ) -> Vec<SentinelInsight> {
        match provider.baselines(asset_id) {
            Ok(baselines) => {
                let context = context.clone().with_baselines(baselines);
                self.evaluate(signals, patterns, &context)
            }
            Err(err) => {
                log_warn!(
                    "baselines unavailable for {}: {}; using {} context baseline(s)",
                    asset_id,
                    err,
                    context.baselines.len()
                );
                self.evaluate(signals, patterns, context)
            }
        }
    }

    /// Evaluate one pattern and build its insight if it clears the threshold
    pub fn evaluate_pattern(
        &self,
        pattern: &HeuristicPattern,
        signals: &SignalMap,
        context: &SentinelContext,
    ) -> Option<SentinelInsight> {
        let score = self.score(pattern, signals, context)?;

        if score.probability <= self.config.emission_threshold {
            return None;
        }

        log_debug!(
            "pattern {} emitted at {:.3} ({} vectors)",
            pattern.id,
            score.probability,
            score.vectors.len()
        );

        Some(SentinelInsight {
            pattern_id: pattern.id.clone(),
            name: pattern.name.clone(),
            probability: score.probability,
            severity: pattern.base_severity,
            slogan: pattern.slogan.clone(),
            math_proof: score.math_proof(),
            physics_narrative: narrative(pattern, score.probability),
            vectors: score.vectors,
            precedent: pattern.precedent.clone(),
            actions: pattern.actions.clone(),
        })
    }

    /// Score a pattern without applying the emission threshold
    ///
    /// Returns `None` when no condition with positive weight could be
    /// evaluated.
    pub fn score(
        &self,
        pattern: &HeuristicPattern,
        signals: &SignalMap,
        context: &SentinelContext,
    ) -> Option<PatternScore> {
        let mut total_weight = 0.0;
        let mut matched_weight = 0.0;
        let mut synchronized_trends = 0;
        let mut vectors = Vec::new();
        let mut proof_terms = Vec::new();

        for condition in &pattern.conditions {
            let history = match signals.get(&condition.signal) {
                Some(history) if !history.is_empty() => history,
                _ => continue,
            };

            if let Some(outcome) = self.check(condition, history, context) {
                matched_weight += condition.weight;
                if condition.operator.is_trend_based() {
                    synchronized_trends += 1;
                }
                proof_terms.push(format!(
                    "{}[{:.1}] * w({:.2})",
                    condition.signal, outcome.value, condition.weight
                ));
                vectors.push(outcome.reason);
            }
            total_weight += condition.weight;
        }

        if !(total_weight > 0.0) {
            log_warn!("pattern {} skipped: no evaluable weight", pattern.id);
            return None;
        }

        let raw_probability = sanitize(matched_weight / total_weight);
        let mut probability = raw_probability;

        if synchronized_trends >= self.config.min_synchronized_trends.max(2) {
            let boost = libm::pow(self.config.coupling_boost_base, (synchronized_trends - 1) as f64);
            probability = cap(probability * boost);
            vectors.push(format!(
                "Exponential coupling: {synchronized_trends} vectors synchronized"
            ));
        }

        if let (Some(boost), Some(minutes)) = (pattern.exposure_boost, context.time_at_state_minutes) {
            if minutes > boost.min_minutes {
                probability = cap(probability * boost.factor);
                vectors.push(format!("Prolonged exposure: {minutes:.0} min in critical zone"));
            }
        }

        if let Some(&weight) = context.weights.get(&pattern.id) {
            if weight.is_finite() && weight > 0.0 {
                probability = cap(probability * weight);
                if weight != 1.0 {
                    vectors.push(format!("Learned feedback applied: {weight:.2}x weight"));
                }
            }
        }

        Some(PatternScore {
            raw_probability,
            probability,
            matched_weight,
            total_weight,
            synchronized_trends,
            vectors,
            proof_terms,
        })
    }

    fn check(
        &self,
        condition: &MatrixCondition,
        history: &[f64],
        context: &SentinelContext,
    ) -> Option<ConditionOutcome> {
        let value = *history.last()?;
        let id = &condition.signal;
        let matched = |reason: String| Some(ConditionOutcome { reason, value });

        match &condition.operator {
            ConditionOperator::Greater { threshold } => {
                if value > *threshold {
                    matched(format!("{id} > {threshold}"))
                } else {
                    None
                }
            }
            ConditionOperator::Less { threshold } => {
                if value < *threshold {
                    matched(format!("{id} < {threshold}"))
                } else {
                    None
                }
            }
            ConditionOperator::TrendMatch { target } => {
                let trend = compute_trend_with(history, &self.config.trend);
                if trend.kind == *target {
                    matched(format!("{id} is {} (dy/dx: {:.2})", trend.kind.as_str(), trend.slope))
                } else {
                    None
                }
            }
            ConditionOperator::VarianceMatch { threshold } => {
                let trend = compute_trend_with(history, &self.config.trend);
                if trend.variance > *threshold {
                    matched(format!("{id} VOLATILE (σ²: {:.1})", trend.variance))
                } else {
                    None
                }
            }
            ConditionOperator::SlopeGreater { threshold } => {
                let trend = compute_trend_with(history, &self.config.trend);
                if trend.slope > *threshold {
                    matched(format!("{id} RISING FAST (dy/dx {:.2} > {threshold})", trend.slope))
                } else {
                    None
                }
            }
            ConditionOperator::DynamicThreshold { sigma_multiplier, .. } => {
                let key = condition.baseline_key()?;
                let baseline = context.baselines.get(key)?;
                let limit = baseline.limit(*sigma_multiplier);
                if value > limit {
                    matched(format!(
                        "{id} ({value:.1}) > expected baseline ({limit:.1}) [{sigma_multiplier}σ]"
                    ))
                } else {
                    None
                }
            }
        }
    }
}

#[inline]
fn cap(probability: f64) -> f64 {
    sanitize(probability).min(1.0)
}

fn narrative(pattern: &HeuristicPattern, probability: f64) -> String {
    match &pattern.physics_narrative {
        Some(template) => template
            .replace("{probability}", &format!("{:.0}", probability * 100.0))
            .replace("{efficiency_loss}", &format!("{:.1}", probability * 3.5)),
        None => format!(
            "System deviation detected. Energy transformation efficiency is compromised with {:.0}% confidence.",
            probability * 100.0
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SentinelError;
    use crate::trend::TrendKind;

    fn signals(entries: &[(&str, &[f64])]) -> SignalMap {
        entries
            .iter()
            .map(|(id, values)| (id.to_string(), values.to_vec()))
            .collect()
    }

    fn two_condition_pattern() -> HeuristicPattern {
        HeuristicPattern::new("overheat", "Overheat", Severity::High)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.5))
            .with_condition(MatrixCondition::greater("temperature", 80.0, 0.5))
    }

    #[test]
    fn test_half_match_is_suppressed() {
        let kernel = SentinelKernel::default();
        let data = signals(&[("vibration", &[6.0, 6.0]), ("temperature", &[60.0, 60.0])]);
        let pattern = two_condition_pattern();

        let score = kernel.score(&pattern, &data, &SentinelContext::new()).unwrap();
        assert_eq!(score.raw_probability, 0.5);
        assert!(kernel.evaluate(&data, &[pattern], &SentinelContext::new()).is_empty());
    }

    #[test]
    fn test_full_match_emits_with_proof() {
        let kernel = SentinelKernel::default();
        let data = signals(&[("vibration", &[6.0]), ("temperature", &[85.0])]);
        let insights = kernel.evaluate(&data, &[two_condition_pattern()], &SentinelContext::new());

        assert_eq!(insights.len(), 1);
        let insight = &insights[0];
        assert_eq!(insight.probability, 1.0);
        assert_eq!(insight.severity, Severity::High);
        assert_eq!(insight.vectors, vec!["vibration > 5", "temperature > 80"]);
        assert_eq!(
            insight.math_proof,
            "Prob = [vibration[6.0] * w(0.50) + temperature[85.0] * w(0.50)] / Total(1.00) = 100.0%"
        );
        assert!(insight.physics_narrative.contains("100% confidence"));
    }

    #[test]
    fn test_missing_signal_not_counted() {
        let kernel = SentinelKernel::default();
        // temperature absent: only vibration counts, and it matches
        let data = signals(&[("vibration", &[6.0])]);
        let score = kernel
            .score(&two_condition_pattern(), &data, &SentinelContext::new())
            .unwrap();
        assert_eq!(score.total_weight, 0.5);
        assert_eq!(score.probability, 1.0);
    }

    #[test]
    fn test_no_history_at_all_skips_pattern() {
        let kernel = SentinelKernel::default();
        let score = kernel.score(&two_condition_pattern(), &SignalMap::new(), &SentinelContext::new());
        assert!(score.is_none());
    }

    #[test]
    fn test_dynamic_threshold_without_baseline_counts_but_never_matches() {
        let kernel = SentinelKernel::default();
        let pattern = HeuristicPattern::new("bt", "Bearing", Severity::High)
            .with_condition(MatrixCondition::dynamic("bearingTemp", Some("loaded"), 2.5, 0.4))
            .with_condition(MatrixCondition::greater("rpm", 300.0, 0.6));
        let data = signals(&[("bearingTemp", &[95.0]), ("rpm", &[310.0])]);

        let score = kernel.score(&pattern, &data, &SentinelContext::new()).unwrap();
        assert_eq!(score.total_weight, 1.0);
        assert!((score.probability - 0.6).abs() < 1e-12);

        let context = SentinelContext::new().with_baseline(BaselineStat::new("loaded", 60.0, 4.0));
        let score = kernel.score(&pattern, &data, &context).unwrap();
        assert_eq!(score.probability, 1.0);
        assert!(score.vectors[0].contains("expected baseline (70.0)"));
    }

    #[test]
    fn test_coupling_boost() {
        let kernel = SentinelKernel::default();
        let pattern = HeuristicPattern::new("c", "Coupled", Severity::Moderate)
            .with_condition(MatrixCondition::trend("vibration", TrendKind::Rising, 0.3))
            .with_condition(MatrixCondition::slope("vibration", 0.5, 0.3))
            .with_condition(MatrixCondition::less("guideVane", 40.0, 0.4));
        let data = signals(&[("vibration", &[1.0, 2.0, 3.0]), ("guideVane", &[60.0])]);

        let score = kernel.score(&pattern, &data, &SentinelContext::new()).unwrap();
        assert_eq!(score.synchronized_trends, 2);
        assert!((score.raw_probability - 0.6).abs() < 1e-12);
        assert!((score.probability - 0.69).abs() < 1e-9);
        assert!(score.vectors.last().unwrap().contains("2 vectors synchronized"));
    }

    #[test]
    fn test_exposure_boost_and_learned_weight() {
        let kernel = SentinelKernel::default();
        let pattern = HeuristicPattern::new("cav", "Cavitation", Severity::Critical)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.5))
            .with_condition(MatrixCondition::greater("temperature", 80.0, 0.5))
            .with_exposure_boost(15.0, 1.2);
        let data = signals(&[("vibration", &[6.0]), ("temperature", &[60.0])]);

        let short = SentinelContext::new().with_time_at_state(10.0);
        assert!((kernel.score(&pattern, &data, &short).unwrap().probability - 0.5).abs() < 1e-12);

        let long = SentinelContext::new().with_time_at_state(20.0);
        assert!((kernel.score(&pattern, &data, &long).unwrap().probability - 0.6).abs() < 1e-12);

        let weighted = long.with_weight("cav", 1.1);
        let insights = kernel.evaluate(&data, &[pattern], &weighted);
        assert_eq!(insights.len(), 1);
        assert!((insights[0].probability - 0.66).abs() < 1e-9);
        assert!(insights[0].vectors.iter().any(|v| v.contains("1.10x")));
    }

    #[test]
    fn test_emission_threshold_is_tunable() {
        let kernel = SentinelKernel::new(KernelConfig::default().with_emission_threshold(0.4));
        let data = signals(&[("vibration", &[6.0]), ("temperature", &[60.0])]);
        let insights = kernel.evaluate(&data, &[two_condition_pattern()], &SentinelContext::new());
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_insights_sorted_by_probability() {
        let kernel = SentinelKernel::default();
        let low = HeuristicPattern::new("low", "Low", Severity::Low)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.7))
            .with_condition(MatrixCondition::greater("temperature", 80.0, 0.3));
        let high = HeuristicPattern::new("high", "High", Severity::Low)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 1.0));
        let data = signals(&[("vibration", &[6.0]), ("temperature", &[60.0])]);

        let insights = kernel.evaluate(&data, &[low, high], &SentinelContext::new());
        let ids: Vec<_> = insights.iter().map(|i| i.pattern_id.as_str()).collect();
        assert_eq!(ids, vec!["high", "low"]);
    }

    #[test]
    fn test_narrative_template() {
        let kernel = SentinelKernel::default();
        let pattern = two_condition_pattern().with_narrative("Loss projected at {efficiency_loss}%.");
        let data = signals(&[("vibration", &[6.0]), ("temperature", &[85.0])]);
        let insights = kernel.evaluate(&data, &[pattern], &SentinelContext::new());
        assert_eq!(insights[0].physics_narrative, "Loss projected at 3.5%.");
    }

    struct FailingProvider;

    impl BaselineProvider for FailingProvider {
        fn baselines(&self, _asset_id: &str) -> SentinelResult<Vec<BaselineStat>> {
            Err(SentinelError::BaselineUnavailable("timeout".into()))
        }
    }

    struct FixedProvider;

    impl BaselineProvider for FixedProvider {
        fn baselines(&self, _asset_id: &str) -> SentinelResult<Vec<BaselineStat>> {
            Ok(vec![BaselineStat::new("bearingTemp", 60.0, 5.0)])
        }
    }

    #[test]
    fn test_provider_fallback() {
        let kernel = SentinelKernel::default();
        let pattern = HeuristicPattern::new("bt", "Bearing", Severity::High)
            .with_condition(MatrixCondition::dynamic("bearingTemp", None, 2.0, 1.0));
        let data = signals(&[("bearingTemp", &[75.0])]);

        let bare = SentinelContext::new();
        let ok = kernel.evaluate_with_provider("u1", &data, &[pattern.clone()], &bare, &FixedProvider);
        assert_eq!(ok.len(), 1);
        let failed = kernel.evaluate_with_provider("u1", &data, &[pattern.clone()], &bare, &FailingProvider);
        assert!(failed.is_empty());
    }

    #[test]
    fn test_provider_failure_keeps_context_baselines() {
        let kernel = SentinelKernel::default();
        let pattern = HeuristicPattern::new("bt", "Bearing", Severity::High)
            .with_condition(MatrixCondition::dynamic("bearingTemp", None, 2.0, 1.0));
        let data = signals(&[("bearingTemp", &[75.0])]);
        // 70 + 2·5 = 80 is above the reading
        let context = SentinelContext::new().with_baseline(BaselineStat::new("bearingTemp", 70.0, 5.0));

        let fallback = kernel.evaluate_with_provider("u1", &data, &[pattern.clone()], &context, &FailingProvider);
        assert!(fallback.is_empty());

        let context = SentinelContext::new().with_baseline(BaselineStat::new("bearingTemp", 50.0, 5.0));
        let fallback = kernel.evaluate_with_provider("u1", &data, &[pattern.clone()], &context, &FailingProvider);
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback, kernel.evaluate(&data, &[pattern], &context));
    }
}
