//! Breach forecasting
//!
//! ## Overview
//!
//! Fits an ordinary-least-squares line through `(timestamp, value)` pairs and
//! solves for the moment the line crosses a threshold:
//!
//! ```text
//! value
//!   95 ┤●
//!      │   ●
//!      │      ●            fitted: value = slope·days + intercept
//!   90 ┼─────────●──╳───── threshold
//!      │              ●    crossing = origin + (threshold − intercept) / slope
//!      └──────────────────> days since origin
//! ```
//!
//! The x axis is days since the earliest sample (`origin`), so the slope is
//! reported per day and the intercept is the fitted value at `origin`.
//!
//! ## Confidence
//!
//! Confidence is `min(1, |t| / 3)` with `t = slope / SE(slope)`. It is a
//! bounded heuristic, not a hypothesis test. A perfect fit has `SE = 0` and
//! gets confidence 1. When the slope is negligible there is no crossing and
//! confidence falls back to `min(1, n / 30)`.
//!
//! ## Failure probability
//!
//! The residual standard deviation is compared with an acceptable sigma of
//! 0.5 through the normal CDF, `Φ((σ − 0.5) / 0.5)`, and reported in percent
//! clamped to `[0.01, 99.99]`. Above 50 % a high-priority work order is
//! suggested.

use chrono::{DateTime, NaiveDate, Utc};
use hydroguard_core::constants::forecast::{
    CRITICAL_BREACH_DAYS, HIGH_BREACH_DAYS, MAX_FAILURE_PROBABILITY_PCT, MEDIUM_BREACH_DAYS,
    MIN_FAILURE_PROBABILITY_PCT,
};
use hydroguard_core::time::{days_to_ms, ms_to_days, ms_to_weeks};
use hydroguard_core::{linear_regression, sanitize, Regression, TimeSource, Timestamp};
use serde::{Deserialize, Serialize};

use crate::config::ForecastConfig;
use crate::prescription::ActionPriority;

/// Slope magnitude (per day) below which the direction is reported as stable
const STABLE_DIRECTION_SLOPE: f64 = 0.001;

/// Movement of the series relative to its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Improving,
    Stable,
    Degrading,
}

/// Urgency band derived from days until breach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreachSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BreachSeverity {
    pub fn from_days(days: f64) -> Self {
        if days < CRITICAL_BREACH_DAYS {
            BreachSeverity::Critical
        } else if days < HIGH_BREACH_DAYS {
            BreachSeverity::High
        } else if days < MEDIUM_BREACH_DAYS {
            BreachSeverity::Medium
        } else {
            BreachSeverity::Low
        }
    }
}

/// Work order proposed when the residual scatter is too wide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderSuggestion {
    pub priority: ActionPriority,
    pub title: String,
    pub description: String,
    pub observed_sigma: f64,
    pub failure_probability_pct: f64,
}

/// Breach-time prediction for one signal against a threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Change per day
    pub slope: f64,
    /// Fitted value at `origin`
    pub intercept: f64,
    /// Earliest sample timestamp, the x origin of the fit
    pub origin: Timestamp,
    pub sample_count: usize,
    pub residual_std: f64,
    /// `slope / SE(slope)`, 0 when the fit is exact or the slope is 0
    pub t_statistic: f64,
    pub r_squared: f64,
    /// 0 for a null forecast
    pub confidence: f64,
    /// `None` when the line never crosses; `Some(0.0)` when it already has
    pub weeks_until: Option<f64>,
    pub predicted_timestamp: Option<Timestamp>,
    /// In `[0.01, 99.99]`; 0 for a null forecast
    pub failure_probability_pct: f64,
    pub trend_direction: TrendDirection,
    pub severity: Option<BreachSeverity>,
    pub work_order: Option<WorkOrderSuggestion>,
}

impl ForecastResult {
    /// Forecast returned when there are too few points
    pub fn insufficient(sample_count: usize) -> Self {
        Self {
            slope: 0.0,
            intercept: 0.0,
            origin: 0,
            sample_count,
            residual_std: 0.0,
            t_statistic: 0.0,
            r_squared: 0.0,
            confidence: 0.0,
            weeks_until: None,
            predicted_timestamp: None,
            failure_probability_pct: 0.0,
            trend_direction: TrendDirection::Stable,
            severity: None,
            work_order: None,
        }
    }

    /// `true` when there was not enough data to fit a line
    pub fn is_null(&self) -> bool {
        self.confidence == 0.0
    }

    /// Fitted value at `timestamp`
    pub fn predict_value_at(&self, timestamp: Timestamp) -> f64 {
        let days = ms_to_days(timestamp as f64 - self.origin as f64);
        sanitize(self.slope * days + self.intercept)
    }
}

/// Forecast against the clock's current time
pub fn forecast(
    points: &[(Timestamp, f64)],
    threshold: f64,
    clock: &dyn TimeSource,
    config: &ForecastConfig,
) -> ForecastResult {
    forecast_at(points, threshold, clock.now(), config)
}

/// Forecast with an explicit "now"
pub fn forecast_at(
    points: &[(Timestamp, f64)],
    threshold: f64,
    now: Timestamp,
    config: &ForecastConfig,
) -> ForecastResult {
    let points: Vec<(Timestamp, f64)> = points
        .iter()
        .copied()
        .filter(|(_, value)| value.is_finite())
        .collect();

    if points.len() < config.min_samples.max(3) {
        return ForecastResult::insufficient(points.len());
    }

    let origin = points.iter().map(|(ts, _)| *ts).min().unwrap_or_default();
    let xs: Vec<f64> = points
        .iter()
        .map(|(ts, _)| ms_to_days(*ts as f64 - origin as f64))
        .collect();
    let ys: Vec<f64> = points.iter().map(|(_, value)| *value).collect();

    let Some(fit) = linear_regression(&xs, &ys) else {
        return ForecastResult::insufficient(points.len());
    };

    build_result(&fit, origin, threshold, now, config)
}

/// Re-run the forecast without the samples that fall on `excluded` UTC dates
///
/// Lets an operator check whether a known anomalous day distorts the trend.
pub fn forecast_excluding_dates(
    points: &[(Timestamp, f64)],
    threshold: f64,
    excluded: &[NaiveDate],
    now: Timestamp,
    config: &ForecastConfig,
) -> ForecastResult {
    let kept: Vec<(Timestamp, f64)> = points
        .iter()
        .copied()
        .filter(|(ts, _)| match utc_date(*ts) {
            Some(date) => !excluded.contains(&date),
            None => true,
        })
        .collect();

    log_debug!(
        "forecast excluding {} date(s): {} of {} samples kept",
        excluded.len(),
        kept.len(),
        points.len()
    );

    forecast_at(&kept, threshold, now, config)
}

/// Map residual sigma to a failure probability in percent
pub fn failure_probability_pct(residual_std: f64, acceptable_sigma: f64) -> f64 {
    let scale = if acceptable_sigma > 0.0 {
        acceptable_sigma
    } else {
        f64::MIN_POSITIVE
    };
    let z = (residual_std - acceptable_sigma) / scale;
    let pct = sanitize(normal_cdf(z) * 100.0);
    pct.clamp(MIN_FAILURE_PROBABILITY_PCT, MAX_FAILURE_PROBABILITY_PCT)
}

fn build_result(
    fit: &Regression,
    origin: Timestamp,
    threshold: f64,
    now: Timestamp,
    config: &ForecastConfig,
) -> ForecastResult {
    let residual_std = fit.residual_std();
    let std_error = fit.slope_std_error();
    let failure_probability = failure_probability_pct(residual_std, config.acceptable_sigma);

    let mut result = ForecastResult {
        slope: fit.slope,
        intercept: fit.intercept,
        origin,
        sample_count: fit.count,
        residual_std,
        t_statistic: 0.0,
        r_squared: fit.r_squared,
        confidence: 0.0,
        weeks_until: None,
        predicted_timestamp: None,
        failure_probability_pct: failure_probability,
        trend_direction: direction(fit, threshold),
        severity: None,
        work_order: work_order(residual_std, failure_probability, config),
    };

    if fit.slope.abs() <= config.negligible_slope_per_day {
        let full = config.full_confidence_samples.max(1) as f64;
        result.confidence = (fit.count as f64 / full).min(1.0);
        return result;
    }

    if std_error > 0.0 {
        result.t_statistic = sanitize(fit.slope / std_error);
        let full_t = config.t_stat_full_confidence.max(f64::MIN_POSITIVE);
        result.confidence = (result.t_statistic.abs() / full_t).min(1.0);
    } else {
        result.confidence = 1.0;
    }

    let crossing_days = (threshold - fit.intercept) / fit.slope;
    if !crossing_days.is_finite() {
        return result;
    }

    let crossing_ms = origin as f64 + days_to_ms(crossing_days);
    let weeks = ms_to_weeks(crossing_ms - now as f64).max(0.0);

    result.predicted_timestamp = Some(crossing_ms.max(0.0).round() as Timestamp);
    result.weeks_until = Some(weeks);
    result.severity = Some(BreachSeverity::from_days(weeks * 7.0));
    result
}

fn direction(fit: &Regression, threshold: f64) -> TrendDirection {
    if fit.slope.abs() < STABLE_DIRECTION_SLOPE {
        return TrendDirection::Stable;
    }
    // The side the series starts on decides which way is bad
    let starts_above = fit.intercept >= threshold;
    let falling = fit.slope < 0.0;
    if starts_above == falling {
        TrendDirection::Degrading
    } else {
        TrendDirection::Improving
    }
}

fn work_order(
    residual_std: f64,
    failure_probability: f64,
    config: &ForecastConfig,
) -> Option<WorkOrderSuggestion> {
    if failure_probability <= config.work_order_probability_pct {
        return None;
    }
    Some(WorkOrderSuggestion {
        priority: ActionPriority::High,
        title: "Investigate unstable operation".to_string(),
        description: format!(
            "Observed sigma {:.3} exceeds the acceptable {:.3}; failure probability {:.1}%",
            residual_std, config.acceptable_sigma, failure_probability
        ),
        observed_sigma: residual_std,
        failure_probability_pct: failure_probability,
    })
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + libm::erf(z / core::f64::consts::SQRT_2))
}

fn utc_date(timestamp: Timestamp) -> Option<NaiveDate> {
    let millis = i64::try_from(timestamp).ok()?;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroguard_core::constants::time::MS_PER_DAY;
    use hydroguard_core::FixedTime;

    fn daily(values: &[f64]) -> Vec<(Timestamp, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(day, v)| (day as u64 * MS_PER_DAY, *v))
            .collect()
    }

    #[test]
    fn test_too_few_points_is_null() {
        let result = forecast_at(&daily(&[95.0, 94.0, 93.0, 92.0]), 90.0, 0, &ForecastConfig::default());
        assert!(result.is_null());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.weeks_until, None);
        assert_eq!(result.sample_count, 4);
    }

    #[test]
    fn test_future_crossing() {
        let points = daily(&[95.0, 94.0, 93.0, 92.0, 91.0]);
        let now = 4 * MS_PER_DAY;
        let result = forecast_at(&points, 80.0, now, &ForecastConfig::default());

        assert!((result.slope + 1.0).abs() < 1e-9);
        assert!((result.intercept - 95.0).abs() < 1e-9);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.predicted_timestamp, Some(15 * MS_PER_DAY));
        let weeks = result.weeks_until.unwrap();
        assert!((weeks - 11.0 / 7.0).abs() < 1e-9);
        assert_eq!(result.severity, Some(BreachSeverity::Critical));
        assert_eq!(result.trend_direction, TrendDirection::Degrading);
    }

    #[test]
    fn test_flat_series_has_no_crossing() {
        let points = daily(&[92.0; 6]);
        let result = forecast_at(&points, 90.0, 5 * MS_PER_DAY, &ForecastConfig::default());
        assert_eq!(result.weeks_until, None);
        assert_eq!(result.predicted_timestamp, None);
        assert!((result.confidence - 0.2).abs() < 1e-12);
        assert_eq!(result.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn test_noisy_slope_lowers_confidence() {
        let points = daily(&[95.0, 93.0, 95.5, 92.5, 94.0, 93.0]);
        let result = forecast_at(&points, 80.0, 5 * MS_PER_DAY, &ForecastConfig::default());
        assert!(result.confidence > 0.0 && result.confidence < 1.0);
        assert!(result.t_statistic < 0.0);
    }

    #[test]
    fn test_failure_probability_mapping() {
        // sigma at the acceptable level sits on the median
        assert!((failure_probability_pct(0.5, 0.5) - 50.0).abs() < 1e-9);
        assert!((failure_probability_pct(0.0, 0.5) - 15.865).abs() < 0.01);
        assert_eq!(failure_probability_pct(100.0, 0.5), 99.99);
        assert_eq!(failure_probability_pct(-100.0, 0.5), 0.01);
    }

    #[test]
    fn test_wide_scatter_suggests_work_order() {
        let points = daily(&[95.0, 91.0, 96.0, 90.0, 95.5, 89.5]);
        let result = forecast_at(&points, 80.0, 5 * MS_PER_DAY, &ForecastConfig::default());
        assert!(result.failure_probability_pct > 50.0);
        let order = result.work_order.unwrap();
        assert_eq!(order.priority, ActionPriority::High);
        assert!(order.description.contains("sigma"));
    }

    #[test]
    fn test_excluding_dates_drops_outlier_day() {
        let mut points = daily(&[95.0, 94.0, 93.0, 92.0, 91.0, 90.0]);
        points[2].1 = 60.0;
        let config = ForecastConfig::default();

        let distorted = forecast_at(&points, 80.0, 5 * MS_PER_DAY, &config);
        let outlier_day = NaiveDate::from_ymd_opt(1970, 1, 3).unwrap();
        let cleaned = forecast_excluding_dates(&points, 80.0, &[outlier_day], 5 * MS_PER_DAY, &config);

        assert_eq!(cleaned.sample_count, 5);
        assert!((cleaned.slope + 1.0).abs() < 1e-9);
        assert!(cleaned.residual_std < distorted.residual_std);
    }

    #[test]
    fn test_predict_value_at_and_clock() {
        let points = daily(&[10.0, 12.0, 14.0, 16.0, 18.0]);
        let clock = FixedTime::new(4 * MS_PER_DAY);
        let result = forecast(&points, 30.0, &clock, &ForecastConfig::default());
        assert!((result.predict_value_at(10 * MS_PER_DAY) - 30.0).abs() < 1e-9);
        assert_eq!(result.predicted_timestamp, Some(10 * MS_PER_DAY));
        assert_eq!(result.trend_direction, TrendDirection::Degrading);
    }

    #[test]
    fn test_severity_bands() {
        assert_eq!(BreachSeverity::from_days(0.0), BreachSeverity::Critical);
        assert_eq!(BreachSeverity::from_days(45.0), BreachSeverity::High);
        assert_eq!(BreachSeverity::from_days(120.0), BreachSeverity::Medium);
        assert_eq!(BreachSeverity::from_days(400.0), BreachSeverity::Low);
    }
}
