//! Shared fixtures for the prediction integration tests

#![allow(dead_code)]

use hydroguard_core::{HistoryStore, Signal, TelemetrySample, TelemetryWindow, Timestamp};

pub const MINUTE_MS: u64 = 60_000;
pub const DAY_MS: u64 = 86_400_000;

/// One value per day starting at the epoch
pub fn daily_points(values: &[f64]) -> Vec<(Timestamp, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(day, value)| (day as u64 * DAY_MS, *value))
        .collect()
}

/// Exact line `start + slope · day` sampled daily for `count` days
pub fn daily_line(start: f64, slope: f64, count: usize) -> Vec<(Timestamp, f64)> {
    let values: Vec<f64> = (0..count).map(|day| start + slope * day as f64).collect();
    daily_points(&values)
}

/// Minute-spaced samples built column-wise from per-signal series
///
/// Row `i` carries the `i`th value of every series long enough to have one.
pub fn samples(asset_id: &str, columns: &[(Signal, &[f64])]) -> Vec<TelemetrySample> {
    let rows = columns.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
    (0..rows)
        .map(|i| {
            columns.iter().fold(
                TelemetrySample::new(asset_id, i as u64 * MINUTE_MS),
                |sample, (signal, values)| match values.get(i) {
                    Some(value) => sample.with(*signal, *value),
                    None => sample,
                },
            )
        })
        .collect()
}

/// Window holding exactly the given columns
pub fn window(asset_id: &str, columns: &[(Signal, &[f64])]) -> TelemetryWindow {
    let rows = samples(asset_id, columns);
    let mut window = TelemetryWindow::new(asset_id, rows.len().max(1));
    for sample in rows {
        window.push(sample);
    }
    window
}

/// History store fed with the given columns for one asset
pub fn store(asset_id: &str, columns: &[(Signal, &[f64])]) -> HistoryStore {
    let mut store = HistoryStore::with_capacity(100);
    for sample in samples(asset_id, columns) {
        store.push(sample);
    }
    store
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
