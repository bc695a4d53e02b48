//! Learned Pattern Weights and Federated Merge
//!
//! ## Overview
//!
//! Operators confirm or reject insights. Each decision nudges a per-pattern
//! multiplier that the kernel applies on the next evaluation:
//!
//! ```text
//! confirm: w ← w * 1.10
//! reject:  w ← w * 0.90
//! ```
//!
//! Sites may share what they have learned. A [`WeightSnapshot`] carries only
//! `{site_id, timestamp, weights}` and never any sensor data. A received
//! snapshot is blended into the local map 70/30 in favour of local
//! experience, with missing local entries taken as 1.0.
//!
//! ## Concurrency
//!
//! [`WeightStore`] is a plain owned value for single-asset use.
//! [`SharedWeightStore`] wraps one in an `RwLock` for the federated case:
//! feedback and merges take the write lock, so they are serialized, and
//! readers take a cloned snapshot.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::LearningConfig;
use crate::constants::learning::MIN_PATTERN_WEIGHT;
use crate::errors::{SentinelError, SentinelResult};
use crate::time::{TimeSource, Timestamp};

/// Privacy-safe export of learned multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSnapshot {
    pub site_id: String,
    pub timestamp: Timestamp,
    pub weights: BTreeMap<String, f64>,
}

impl WeightSnapshot {
    pub fn to_json(&self) -> SentinelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SentinelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Blend a local and a received weight map
///
/// `merged[k] = local[k] * local_share + global[k] * (1 - local_share)`,
/// with `local[k]` defaulting to `default_weight`. Keys only present
/// locally are kept unchanged.
pub fn merge_weights(
    local: &BTreeMap<String, f64>,
    global: &BTreeMap<String, f64>,
    local_share: f64,
    default_weight: f64,
) -> BTreeMap<String, f64> {
    let mut merged = local.clone();
    for (pattern_id, global_weight) in global {
        let local_weight = local.get(pattern_id).copied().unwrap_or(default_weight);
        merged.insert(
            pattern_id.clone(),
            local_weight * local_share + global_weight * (1.0 - local_share),
        );
    }
    merged
}

fn check_weight(pattern_id: &str, weight: f64) -> SentinelResult<()> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(SentinelError::InvalidWeight {
            pattern_id: pattern_id.to_string(),
            weight,
        })
    }
}

/// Per-site pattern multipliers
#[derive(Debug, Clone, PartialEq)]
pub struct WeightStore {
    site_id: String,
    weights: BTreeMap<String, f64>,
    config: LearningConfig,
}

impl WeightStore {
    pub fn new(site_id: impl Into<String>) -> Self {
        Self::with_config(site_id, LearningConfig::default())
    }

    pub fn with_config(site_id: impl Into<String>, config: LearningConfig) -> Self {
        Self {
            site_id: site_id.into(),
            weights: BTreeMap::new(),
            config,
        }
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Multiplier for a pattern, the default for unseen patterns
    pub fn get(&self, pattern_id: &str) -> f64 {
        self.weights
            .get(pattern_id)
            .copied()
            .unwrap_or(self.config.default_weight)
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    /// Operator confirmed an insight. Returns the new multiplier.
    pub fn confirm(&mut self, pattern_id: &str) -> f64 {
        let factor = self.config.confirm_factor;
        self.scale(pattern_id, factor)
    }

    /// Operator rejected an insight. Returns the new multiplier.
    pub fn reject(&mut self, pattern_id: &str) -> f64 {
        let factor = self.config.reject_factor;
        self.scale(pattern_id, factor)
    }

    fn scale(&mut self, pattern_id: &str, factor: f64) -> f64 {
        let current = self.get(pattern_id);
        let mut next = current * factor;
        if !next.is_finite() {
            next = current;
        }
        let next = next.max(MIN_PATTERN_WEIGHT);
        self.weights.insert(pattern_id.to_string(), next);
        log_debug!("weight {} -> {:.4} (x{})", pattern_id, next, factor);
        next
    }

    /// Set a multiplier directly
    pub fn set(&mut self, pattern_id: &str, weight: f64) -> SentinelResult<()> {
        check_weight(pattern_id, weight)?;
        self.weights.insert(pattern_id.to_string(), weight);
        Ok(())
    }

    /// Export a snapshot stamped with the given clock
    pub fn export(&self, clock: &dyn TimeSource) -> WeightSnapshot {
        WeightSnapshot {
            site_id: self.site_id.clone(),
            timestamp: clock.now(),
            weights: self.weights.clone(),
        }
    }

    /// Blend a received weight map into this store
    ///
    /// The whole map is rejected if any weight is non-positive or not
    /// finite.
    pub fn merge(&mut self, global: &BTreeMap<String, f64>) -> SentinelResult<()> {
        for (pattern_id, weight) in global {
            check_weight(pattern_id, *weight)?;
        }
        self.weights = merge_weights(
            &self.weights,
            global,
            self.config.local_share,
            self.config.default_weight,
        );
        log_debug!("merged {} federated weights into {}", global.len(), self.site_id);
        Ok(())
    }

    /// Blend a snapshot received from another site
    pub fn import(&mut self, snapshot: &WeightSnapshot) -> SentinelResult<()> {
        log_debug!("importing weights from site {}", snapshot.site_id);
        self.merge(&snapshot.weights)
    }
}

/// `RwLock`-guarded weight store shared between assets of one site
#[derive(Debug, Clone)]
pub struct SharedWeightStore {
    inner: Arc<RwLock<WeightStore>>,
}

impl SharedWeightStore {
    pub fn new(store: WeightStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub fn get(&self, pattern_id: &str) -> SentinelResult<f64> {
        let store = self.inner.read().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(store.get(pattern_id))
    }

    /// Cloned view of all multipliers
    pub fn snapshot(&self) -> SentinelResult<BTreeMap<String, f64>> {
        let store = self.inner.read().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(store.weights().clone())
    }

    pub fn confirm(&self, pattern_id: &str) -> SentinelResult<f64> {
        let mut store = self.inner.write().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(store.confirm(pattern_id))
    }

    pub fn reject(&self, pattern_id: &str) -> SentinelResult<f64> {
        let mut store = self.inner.write().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(store.reject(pattern_id))
    }

    pub fn set(&self, pattern_id: &str, weight: f64) -> SentinelResult<()> {
        let mut store = self.inner.write().map_err(|_| SentinelError::LockPoisoned)?;
        store.set(pattern_id, weight)
    }

    pub fn merge(&self, global: &BTreeMap<String, f64>) -> SentinelResult<()> {
        let mut store = self.inner.write().map_err(|_| SentinelError::LockPoisoned)?;
        store.merge(global)
    }

    pub fn import(&self, snapshot: &WeightSnapshot) -> SentinelResult<()> {
        let mut store = self.inner.write().map_err(|_| SentinelError::LockPoisoned)?;
        store.import(snapshot)
    }

    pub fn export(&self, clock: &dyn TimeSource) -> SentinelResult<WeightSnapshot> {
        let store = self.inner.read().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(store.export(clock))
    }
}

impl From<WeightStore> for SharedWeightStore {
    fn from(store: WeightStore) -> Self {
        SharedWeightStore::new(store)
    }
}
