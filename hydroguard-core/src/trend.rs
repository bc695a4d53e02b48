//! Trend Primitives
//!
//! ## Overview
//!
//! Closed-form statistics over a numeric sequence: ordinary least squares
//! against the implicit sample index, population variance, and a discrete
//! classification used by the pattern-matching kernel.
//!
//! ```text
//! |slope| > 0.05  →  RISING / FALLING
//! variance > 2.0  →  VOLATILE (overrides the slope class)
//! otherwise       →  STABLE
//! ```
//!
//! Both thresholds are tunable through [`TrendConfig`].
//!
//! ## Degenerate Input
//!
//! Fewer than two points yield a zero `STABLE` trend with confidence 0. A
//! zero index-variance denominator yields slope 0. Non-finite intermediate
//! values are sanitized to 0, so no `Trend` ever carries NaN.

use serde::{Deserialize, Serialize};

use crate::config::TrendConfig;
use crate::constants::trend::MIN_TREND_SAMPLES;

/// Discrete trend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendKind {
    Rising,
    Falling,
    Stable,
    Volatile,
}

impl TrendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TrendKind::Rising => "RISING",
            TrendKind::Falling => "FALLING",
            TrendKind::Stable => "STABLE",
            TrendKind::Volatile => "VOLATILE",
        }
    }
}

/// Regression summary of one signal over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Units per sample
    pub slope: f64,
    /// Fitted value at index 0
    pub intercept: f64,
    /// Population variance of the values
    pub variance: f64,
    pub mean: f64,
    pub kind: TrendKind,
    pub confidence: f64,
    /// Coefficient of determination, clamped to [0, 1]
    pub r_squared: f64,
    pub count: usize,
}

impl Trend {
    /// Trend of an empty or single-point sequence
    pub fn flat(mean: f64, count: usize) -> Self {
        Self {
            slope: 0.0,
            intercept: sanitize(mean),
            variance: 0.0,
            mean: sanitize(mean),
            kind: TrendKind::Stable,
            confidence: 0.0,
            r_squared: 0.0,
            count,
        }
    }
}

/// OLS fit over explicit x values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub count: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    /// Σ(x - x̄)²
    pub sxx: f64,
    /// Σ residual²
    pub ssr: f64,
}

impl Regression {
    pub fn predict(&self, x: f64) -> f64 {
        sanitize(self.slope * x + self.intercept)
    }

    /// Residual standard deviation with `n - 2` degrees of freedom
    pub fn residual_std(&self) -> f64 {
        if self.count <= 2 {
            return 0.0;
        }
        sanitize(libm::sqrt(self.ssr / (self.count - 2) as f64))
    }

    /// Standard error of the slope
    pub fn slope_std_error(&self) -> f64 {
        if self.count <= 2 || self.sxx <= 0.0 {
            return 0.0;
        }
        let residual_variance = self.ssr / (self.count - 2) as f64;
        sanitize(libm::sqrt(residual_variance / self.sxx))
    }
}

/// Replace NaN and ±∞ with 0
#[inline]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sanitize(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    sanitize(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64)
}

/// Ordinary least squares of `ys` against `xs`
///
/// Returns `None` for fewer than two pairs. Extra elements of the longer
/// slice are ignored. A zero x-variance gives slope 0 through the mean.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<Regression> {
    let count = xs.len().min(ys.len());
    if count < MIN_TREND_SAMPLES {
        return None;
    }
    let (xs, ys) = (&xs[..count], &ys[..count]);

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let (mut sxx, mut sxy, mut sst) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        sst += dy * dy;
    }

    let slope = if sxx > 0.0 { sanitize(sxy / sxx) } else { 0.0 };
    let intercept = sanitize(mean_y - slope * mean_x);

    let ssr: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| {
            let residual = y - (slope * x + intercept);
            residual * residual
        })
        .sum();
    let ssr = sanitize(ssr);

    let r_squared = if sst > 0.0 {
        sanitize(1.0 - ssr / sst).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(Regression {
        slope,
        intercept,
        r_squared,
        count,
        mean_x,
        mean_y,
        sxx: sanitize(sxx),
        ssr,
    })
}

/// Compute a trend with default thresholds
pub fn compute_trend(values: &[f64]) -> Trend {
    compute_trend_with(values, &TrendConfig::default())
}

/// Compute a trend against the sample index
pub fn compute_trend_with(values: &[f64], config: &TrendConfig) -> Trend {
    let xs: Vec<f64> = (0..values.len()).map(|i| i as f64).collect();
    let regression = match linear_regression(&xs, values) {
        Some(regression) => regression,
        None => return Trend::flat(mean(values), values.len()),
    };

    let variance = variance(values);
    let kind = classify(regression.slope, variance, config);

    Trend {
        slope: regression.slope,
        intercept: regression.intercept,
        variance,
        mean: regression.mean_y,
        kind,
        confidence: config.confidence,
        r_squared: regression.r_squared,
        count: regression.count,
    }
}

fn classify(slope: f64, variance: f64, config: &TrendConfig) -> TrendKind {
    if variance > config.volatility_variance {
        TrendKind::Volatile
    } else if slope.abs() > config.slope_threshold {
        if slope > 0.0 {
            TrendKind::Rising
        } else {
            TrendKind::Falling
        }
    } else {
        TrendKind::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequences_are_flat() {
        let trend = compute_trend(&[]);
        assert_eq!(trend.kind, TrendKind::Stable);
        assert_eq!(trend.confidence, 0.0);

        let trend = compute_trend(&[4.0]);
        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.mean, 4.0);
        assert_eq!(trend.confidence, 0.0);
    }

    #[test]
    fn test_rising_and_falling() {
        let rising = compute_trend(&[1.0, 1.5, 2.0, 2.5]);
        assert_eq!(rising.kind, TrendKind::Rising);
        assert!((rising.slope - 0.5).abs() < 1e-12);
        assert!((rising.intercept - 1.0).abs() < 1e-12);
        assert!((rising.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(rising.confidence, 0.9);

        let falling = compute_trend(&[3.0, 2.9, 2.8, 2.7]);
        assert_eq!(falling.kind, TrendKind::Falling);
    }

    #[test]
    fn test_noisy_line_keeps_direction() {
        let rising = compute_trend(&[1.0, 1.6, 1.9, 2.7, 2.9, 3.6]);
        assert_eq!(rising.kind, TrendKind::Rising);
        assert!(rising.slope > 0.0);
        assert!(rising.confidence > 0.0 && rising.confidence < 1.0);
        assert!(rising.r_squared > 0.9 && rising.r_squared < 1.0);

        let falling = compute_trend(&[3.6, 2.9, 2.7, 1.9, 1.6, 1.0]);
        assert_eq!(falling.kind, TrendKind::Falling);
        assert!(falling.slope < 0.0);
        assert!(falling.confidence > 0.0 && falling.confidence < 1.0);
        assert!((falling.r_squared - rising.r_squared).abs() < 1e-12);
    }

    #[test]
    fn test_small_slope_is_stable() {
        let trend = compute_trend(&[10.0, 10.01, 10.02, 10.03]);
        assert_eq!(trend.kind, TrendKind::Stable);
    }

    #[test]
    fn test_volatility_overrides_slope() {
        // steep rise with variance 5
        let trend = compute_trend(&[1.0, 3.0, 5.0, 7.0]);
        assert!(trend.slope > 0.05);
        assert!(trend.variance > 2.0);
        assert_eq!(trend.kind, TrendKind::Volatile);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = TrendConfig::default().with_volatility_variance(100.0);
        let trend = compute_trend_with(&[1.0, 3.0, 5.0, 7.0], &config);
        assert_eq!(trend.kind, TrendKind::Rising);
    }

    #[test]
    fn test_zero_x_variance() {
        let regression = linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(regression.slope, 0.0);
        assert_eq!(regression.intercept, 2.0);
    }

    #[test]
    fn test_non_finite_is_sanitized() {
        let trend = compute_trend(&[1.0, f64::INFINITY, 3.0]);
        assert!(trend.slope.is_finite());
        assert!(trend.variance.is_finite());
        assert!(trend.mean.is_finite());
    }

    #[test]
    fn test_regression_errors() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.1, 1.9, 3.2, 3.8];
        let regression = linear_regression(&xs, &ys).unwrap();
        assert!(regression.residual_std() > 0.0);
        assert!(regression.slope_std_error() > 0.0);
        assert!(regression.r_squared > 0.95);
        assert!((regression.predict(2.0) - 2.0).abs() < 0.1);
    }
}
