//! Per-Asset Evaluation Task
//!
//! An [`AssetMonitor`] owns exactly one asset's window and re-evaluates the
//! pattern library on every ingested sample. Samples are appended in arrival
//! order. The only state it may share is the weight store, which is either
//! private to the monitor or a [`SharedWeightStore`] handle for a site.

use std::sync::Arc;

use crate::config::SentinelConfig;
use crate::errors::SentinelResult;
use crate::history::TelemetryWindow;
use crate::pattern::HeuristicPattern;
use crate::sentinel::{BaselineStat, SentinelContext, SentinelInsight, SentinelKernel};
use crate::telemetry::TelemetrySample;
use crate::weights::{SharedWeightStore, WeightStore};

/// Window, kernel and weights for one asset
#[derive(Debug, Clone)]
pub struct AssetMonitor {
    window: TelemetryWindow,
    kernel: SentinelKernel,
    patterns: Arc<[HeuristicPattern]>,
    weights: SharedWeightStore,
    baselines: Vec<BaselineStat>,
    time_at_state_minutes: Option<f64>,
}

impl AssetMonitor {
    /// Monitor with a private weight store keyed by the asset id
    pub fn new(
        asset_id: impl Into<String>,
        patterns: impl Into<Arc<[HeuristicPattern]>>,
        config: &SentinelConfig,
    ) -> Self {
        let asset_id = asset_id.into();
        let weights = WeightStore::with_config(asset_id.clone(), config.learning);
        Self {
            window: TelemetryWindow::new(asset_id, config.history.window_capacity),
            kernel: SentinelKernel::new(config.kernel),
            patterns: patterns.into(),
            weights: weights.into(),
            baselines: Vec::new(),
            time_at_state_minutes: None,
        }
    }

    /// Use a site-wide weight store instead of the private one
    pub fn with_weights(mut self, weights: SharedWeightStore) -> Self {
        self.weights = weights;
        self
    }

    pub fn asset_id(&self) -> &str {
        self.window.asset_id()
    }

    pub fn window(&self) -> &TelemetryWindow {
        &self.window
    }

    pub fn weights(&self) -> &SharedWeightStore {
        &self.weights
    }

    pub fn set_baselines(&mut self, baselines: Vec<BaselineStat>) {
        self.baselines = baselines;
    }

    pub fn set_time_at_state(&mut self, minutes: Option<f64>) {
        self.time_at_state_minutes = minutes;
    }

    /// Append a sample and re-evaluate
    ///
    /// Samples addressed to another asset are ignored.
    pub fn ingest(&mut self, sample: TelemetrySample) -> SentinelResult<Vec<SentinelInsight>> {
        if sample.asset_id != self.window.asset_id() {
            log_warn!(
                "monitor {} ignoring sample for asset {}",
                self.window.asset_id(),
                sample.asset_id
            );
            return Ok(Vec::new());
        }
        self.window.push(sample);
        self.evaluate()
    }

    /// Evaluate the current window
    pub fn evaluate(&self) -> SentinelResult<Vec<SentinelInsight>> {
        let mut context = SentinelContext::new().with_baselines(self.baselines.iter().cloned());
        context.weights = self.weights.snapshot()?;
        context.time_at_state_minutes = self.time_at_state_minutes;

        Ok(self
            .kernel
            .evaluate(&self.window.signal_map(), &self.patterns, &context))
    }

    pub fn confirm(&self, pattern_id: &str) -> SentinelResult<f64> {
        self.weights.confirm(pattern_id)
    }

    pub fn reject(&self, pattern_id: &str) -> SentinelResult<f64> {
        self.weights.reject(pattern_id)
    }

    /// Drop buffered history, e.g. after maintenance
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{MatrixCondition, Severity};
    use crate::telemetry::Signal;

    fn monitor() -> AssetMonitor {
        let patterns = vec![HeuristicPattern::new("vib", "Vibration", Severity::High)
            .with_condition(MatrixCondition::greater("vibration", 5.0, 0.5))
            .with_condition(MatrixCondition::greater("temperature", 80.0, 0.5))];
        AssetMonitor::new("unit-1", patterns, &SentinelConfig::default())
    }

    fn sample(ts: u64, vibration: f64, temperature: f64) -> TelemetrySample {
        TelemetrySample::new("unit-1", ts)
            .with(Signal::Vibration, vibration)
            .with(Signal::Temperature, temperature)
    }

    #[test]
    fn test_ingest_evaluates() {
        let mut monitor = monitor();
        assert!(monitor.ingest(sample(1, 2.0, 60.0)).unwrap().is_empty());
        let insights = monitor.ingest(sample(2, 6.0, 85.0)).unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(monitor.window().len(), 2);
    }

    #[test]
    fn test_foreign_samples_ignored() {
        let mut monitor = monitor();
        let foreign = TelemetrySample::new("unit-2", 1).with(Signal::Vibration, 9.0);
        assert!(monitor.ingest(foreign).unwrap().is_empty());
        assert!(monitor.window().is_empty());
    }

    #[test]
    fn test_feedback_changes_outcome() {
        let mut monitor = monitor();
        // half match: 0.5, below the threshold
        assert!(monitor.ingest(sample(1, 6.0, 60.0)).unwrap().is_empty());

        for _ in 0..3 {
            monitor.confirm("vib").unwrap();
        }
        // 0.5 * 1.1^3 = 0.6655
        let insights = monitor.evaluate().unwrap();
        assert_eq!(insights.len(), 1);
        assert!((insights[0].probability - 0.6655).abs() < 1e-9);
    }

    #[test]
    fn test_shared_weights() {
        let shared = SharedWeightStore::new(WeightStore::new("site"));
        let a = monitor().with_weights(shared.clone());
        let b = monitor().with_weights(shared.clone());
        a.confirm("vib").unwrap();
        b.confirm("vib").unwrap();
        assert!((shared.get("vib").unwrap() - 1.21).abs() < 1e-12);
    }
}
