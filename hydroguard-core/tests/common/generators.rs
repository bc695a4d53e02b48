//! Deterministic telemetry generators
//!
//! A small linear congruential generator keeps fixtures reproducible
//! without pulling a random number crate into the test build.

use hydroguard_core::{Signal, TelemetrySample, Timestamp};

use super::MINUTE_MS;

/// Reproducible uniform noise in `[-1, 1)`
#[derive(Debug, Clone)]
pub struct Noise {
    state: u64,
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    }
}

/// Healthy unit at steady load: flat vibration and bearing temperature
pub fn steady_unit(asset_id: &str, start: Timestamp, count: usize) -> Vec<TelemetrySample> {
    let mut noise = Noise::new(7);
    (0..count)
        .map(|i| {
            TelemetrySample::new(asset_id, start + i as u64 * MINUTE_MS)
                .with(Signal::Vibration, 2.0 + 0.01 * noise.next())
                .with(Signal::BearingTemp, 55.0 + 0.05 * noise.next())
                .with(Signal::Rpm, 250.0)
                .with(Signal::GuideVane, 70.0)
                .with(Signal::DraftTubePressure, 1.2 + 0.02 * noise.next())
        })
        .collect()
}

/// Unit drifting into cavitation: rising vibration, oscillating draft-tube
/// pressure, guide vane closed to part load
pub fn cavitating_unit(asset_id: &str, start: Timestamp, count: usize) -> Vec<TelemetrySample> {
    (0..count)
        .map(|i| {
            let swing = if i % 2 == 0 { 2.5 } else { -2.5 };
            TelemetrySample::new(asset_id, start + i as u64 * MINUTE_MS)
                .with(Signal::Vibration, 2.0 + 0.3 * i as f64)
                .with(Signal::DraftTubePressure, 1.2 + swing)
                .with(Signal::GuideVane, 35.0)
        })
        .collect()
}
