//! Bounded Per-Asset Telemetry History
//!
//! ## Overview
//!
//! Every detector works on a sliding window of recent samples. This module
//! provides that window as a ring buffer with a runtime capacity, and an
//! explicit [`HistoryStore`] that owns one window per asset.
//!
//! There is no global history. Callers own their store and pass it (or a
//! single window) to the kernel and the predictors, so two stores never
//! share state.
//!
//! ## Ring Layout
//!
//! ```text
//! TelemetryWindow with capacity 5 after 7 pushes (s0..s6):
//! ┌────┬────┬────┬────┬────┐
//! │ s5 │ s6 │ s2 │ s3 │ s4 │  ← slots
//! └────┴────┴────┴────┴────┘
//!         ↑
//!         └── write_pos = 2 (oldest sample lives here)
//!
//! Logical order (get(0)..get(4)): s2, s3, s4, s5, s6
//! ```
//!
//! ## Ordering
//!
//! Samples are kept in arrival order. Out-of-order timestamps are accepted
//! and never re-sorted; callers that need strict time order sort upstream.

use std::collections::{BTreeMap, HashMap};

use crate::config::HistoryConfig;
use crate::telemetry::{Signal, TelemetrySample};
use crate::time::Timestamp;

/// Kernel input: signal id → values, oldest first
pub type SignalMap = BTreeMap<String, Vec<f64>>;

/// Fixed-capacity FIFO window of samples for one asset
///
/// ## Internal Invariants
///
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - When full, `data[write_pos]` holds the oldest sample
#[derive(Debug, Clone)]
pub struct TelemetryWindow {
    asset_id: String,
    data: Vec<Option<TelemetrySample>>,
    write_pos: usize,
    len: usize,
}

impl TelemetryWindow {
    /// Create an empty window. A capacity of 0 is raised to 1.
    pub fn new(asset_id: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            asset_id: asset_id.into(),
            data: vec![None; capacity],
            write_pos: 0,
            len: 0,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// Append a sample, returning the evicted oldest sample when full
    pub fn push(&mut self, sample: TelemetrySample) -> Option<TelemetrySample> {
        let capacity = self.capacity();
        let evicted = self.data[self.write_pos].replace(sample);
        self.write_pos = (self.write_pos + 1) % capacity;

        if self.len < capacity {
            self.len += 1;
            None
        } else {
            evicted
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Sample at logical index (0 = oldest)
    pub fn get(&self, index: usize) -> Option<&TelemetrySample> {
        if index >= self.len {
            return None;
        }
        let capacity = self.capacity();
        let start = (self.write_pos + capacity - self.len) % capacity;
        self.data[(start + index) % capacity].as_ref()
    }

    pub fn first(&self) -> Option<&TelemetrySample> {
        self.get(0)
    }

    /// Most recent sample
    pub fn last(&self) -> Option<&TelemetrySample> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> + '_ {
        (0..self.len).filter_map(move |index| self.get(index))
    }

    /// Values of one signal, oldest first, skipping samples without it
    pub fn values(&self, signal: Signal) -> Vec<f64> {
        self.iter().filter_map(|sample| sample.get(signal)).collect()
    }

    /// Values of a signal or extra field referenced by id
    pub fn values_by_id(&self, id: &str) -> Vec<f64> {
        self.iter().filter_map(|sample| sample.get_by_id(id)).collect()
    }

    /// `(timestamp, value)` pairs of one signal, oldest first
    pub fn points(&self, signal: Signal) -> Vec<(Timestamp, f64)> {
        self.iter()
            .filter_map(|sample| sample.get(signal).map(|value| (sample.timestamp, value)))
            .collect()
    }

    /// Build the kernel input map for every signal present in the window
    pub fn signal_map(&self) -> SignalMap {
        let mut map = SignalMap::new();
        for sample in self.iter() {
            for (signal, value) in sample.signals() {
                map.entry(signal.id().to_string()).or_default().push(value);
            }
            for (name, value) in sample.extra() {
                map.entry(name.to_string()).or_default().push(value);
            }
        }
        map
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|slot| *slot = None);
        self.write_pos = 0;
        self.len = 0;
    }
}

/// Per-asset windows, created lazily on the first sample for an asset
#[derive(Debug, Clone)]
pub struct HistoryStore {
    windows: HashMap<String, TelemetryWindow>,
    config: HistoryConfig,
}

impl HistoryStore {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            windows: HashMap::new(),
            config,
        }
    }

    /// Store with the given window capacity and default settings otherwise
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(HistoryConfig::default().with_capacity(capacity))
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Append a sample to its asset's window
    pub fn push(&mut self, sample: TelemetrySample) -> Option<TelemetrySample> {
        let capacity = self.config.window_capacity;
        self.windows
            .entry(sample.asset_id.clone())
            .or_insert_with(|| TelemetryWindow::new(sample.asset_id.clone(), capacity))
            .push(sample)
    }

    pub fn window(&self, asset_id: &str) -> Option<&TelemetryWindow> {
        self.windows.get(asset_id)
    }

    /// Number of buffered samples for an asset (0 if unknown)
    pub fn len(&self, asset_id: &str) -> usize {
        self.windows.get(asset_id).map_or(0, TelemetryWindow::len)
    }

    /// Drop an asset's history, e.g. after maintenance. Returns whether the
    /// asset had a window.
    pub fn clear(&mut self, asset_id: &str) -> bool {
        match self.windows.get_mut(asset_id) {
            Some(window) => {
                window.clear();
                true
            }
            None => false,
        }
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> + '_ {
        self.windows.keys().map(String::as_str)
    }

    pub fn asset_count(&self) -> usize {
        self.windows.len()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: Timestamp, vibration: f64) -> TelemetrySample {
        TelemetrySample::new("unit-1", ts).with(Signal::Vibration, vibration)
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = TelemetryWindow::new("unit-1", 3);
        assert!(window.push(sample(1, 1.0)).is_none());
        assert!(window.push(sample(2, 2.0)).is_none());
        assert!(window.push(sample(3, 3.0)).is_none());

        let evicted = window.push(sample(4, 4.0)).unwrap();
        assert_eq!(evicted.timestamp, 1);
        assert_eq!(window.len(), 3);
        assert_eq!(window.values(Signal::Vibration), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.first().unwrap().timestamp, 2);
        assert_eq!(window.last().unwrap().timestamp, 4);
    }

    #[test]
    fn test_out_of_order_not_resorted() {
        let mut window = TelemetryWindow::new("unit-1", 4);
        window.push(sample(30, 3.0));
        window.push(sample(10, 1.0));
        window.push(sample(20, 2.0));
        let stamps: Vec<_> = window.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![30, 10, 20]);
    }

    #[test]
    fn test_zero_capacity_raised() {
        let mut window = TelemetryWindow::new("a", 0);
        assert_eq!(window.capacity(), 1);
        window.push(sample(1, 1.0));
        assert_eq!(window.push(sample(2, 2.0)).unwrap().timestamp, 1);
    }

    #[test]
    fn test_projections_skip_missing() {
        let mut window = TelemetryWindow::new("unit-1", 5);
        window.push(sample(1, 1.0));
        window.push(TelemetrySample::new("unit-1", 2).with(Signal::Temperature, 50.0));
        window.push(sample(3, 3.0).with_extra("statorTemp", 70.0));

        assert_eq!(window.points(Signal::Vibration), vec![(1, 1.0), (3, 3.0)]);
        let map = window.signal_map();
        assert_eq!(map["vibration"], vec![1.0, 3.0]);
        assert_eq!(map["temperature"], vec![50.0]);
        assert_eq!(map["statorTemp"], vec![70.0]);
        assert_eq!(window.values_by_id("statorTemp"), vec![70.0]);
    }

    #[test]
    fn test_store_is_per_asset() {
        let mut store = HistoryStore::with_capacity(2);
        store.push(sample(1, 1.0));
        store.push(TelemetrySample::new("unit-2", 1).with(Signal::Vibration, 9.0));
        store.push(sample(2, 2.0));

        assert_eq!(store.len("unit-1"), 2);
        assert_eq!(store.len("unit-2"), 1);
        assert_eq!(store.len("unit-3"), 0);
        assert_eq!(store.asset_count(), 2);

        assert!(store.clear("unit-1"));
        assert_eq!(store.len("unit-1"), 0);
        assert!(!store.clear("unit-3"));
    }
}
