//! Common test utilities for HydroGuard integration tests
//!
//! This module provides:
//! - Deterministic telemetry generators for hydro units
//! - Signal-map builders for direct kernel calls
//! - Small assertion helpers

#![allow(dead_code)]

use hydroguard_core::{Signal, SignalMap, TelemetrySample, Timestamp};

pub mod generators;

/// One minute in milliseconds
pub const MINUTE_MS: u64 = 60_000;

/// Build a kernel input map from literal series
pub fn signal_map(entries: &[(&str, &[f64])]) -> SignalMap {
    entries
        .iter()
        .map(|(id, values)| (id.to_string(), values.to_vec()))
        .collect()
}

/// Sample for `unit-1` carrying the given signals
pub fn sample(timestamp: Timestamp, signals: &[(Signal, f64)]) -> TelemetrySample {
    signals
        .iter()
        .fold(TelemetrySample::new("unit-1", timestamp), |sample, (signal, value)| {
            sample.with(*signal, *value)
        })
}

/// Assert two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
