//! Aging and efficiency estimation
//!
//! ## Overview
//!
//! Hydraulic efficiency is the share of water power converted to output:
//!
//! ```text
//! η = P / (ρ · g · Q · H)        P in W, Q in m³/s, H in m
//! ```
//!
//! The aging estimator compares the window's mean efficiency either with an
//! expert efficiency curve (interpolated over flow) or with the design
//! efficiency, and scores the shortfall:
//!
//! ```text
//! score = min(100, round(deviation_pp · 1.5))
//!
//!   0 ─── 10 ─────── 30 ─────── 60 ──────── 100
//!    OK     NOTICE     WARNING    CRITICAL
//! ```
//!
//! Operating-point reasons (part load, head mismatch, vibration) are attached
//! so the score can be read against how the unit is being run.

use hydroguard_core::constants::physics::{
    DEFAULT_DESIGN_EFFICIENCY, GRAVITY_M_PER_S2, WATER_DENSITY_KG_PER_M3,
};
use hydroguard_core::constants::risk::{
    AGING_CRITICAL_SCORE, AGING_NOTICE_SCORE, AGING_SCORE_PER_PP, AGING_WARNING_SCORE,
    ELEVATED_VIBRATION_MM_S, HEAD_MISMATCH_RATIO, MILD_VIBRATION_MM_S, NEAR_DESIGN_FLOW_RATIO,
    PART_LOAD_FLOW_RATIO,
};
use hydroguard_core::constants::time::DAYS_PER_YEAR;
use hydroguard_core::time::ms_to_days;
use hydroguard_core::trend::mean;
use hydroguard_core::{linear_regression, sanitize, Signal, TelemetrySample, TelemetryWindow, Timestamp};
use serde::{Deserialize, Serialize};

const WATTS_PER_MEGAWATT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningLevel {
    Ok,
    Notice,
    Warning,
    Critical,
}

impl WarningLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= AGING_CRITICAL_SCORE {
            WarningLevel::Critical
        } else if score >= AGING_WARNING_SCORE {
            WarningLevel::Warning
        } else if score >= AGING_NOTICE_SCORE {
            WarningLevel::Notice
        } else {
            WarningLevel::Ok
        }
    }
}

/// One point of an expert efficiency curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Flow (m³/s)
    pub q: f64,
    /// Efficiency as a fraction
    pub eta: f64,
}

/// Expected efficiency over flow for a turbine family or variant
///
/// Deserializes from `{ "points": [{ "q": .., "eta": .. }, ..] }` in any order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveDocument")]
pub struct EfficiencyCurve {
    points: Vec<CurvePoint>,
}

#[derive(Deserialize)]
struct CurveDocument {
    points: Vec<CurvePoint>,
}

impl From<CurveDocument> for EfficiencyCurve {
    fn from(document: CurveDocument) -> Self {
        EfficiencyCurve::new(document.points)
    }
}

impl EfficiencyCurve {
    /// Build a curve, dropping non-finite points and sorting by flow
    pub fn new(points: Vec<CurvePoint>) -> Self {
        let mut points: Vec<CurvePoint> = points
            .into_iter()
            .filter(|p| p.q.is_finite() && p.eta.is_finite())
            .collect();
        points.sort_by(|a, b| a.q.total_cmp(&b.q));
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Expected efficiency at `flow`, held flat beyond the curve ends
    pub fn expected_at(&self, flow: f64) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if flow <= first.q {
            return Some(first.eta);
        }
        if flow >= last.q {
            return Some(last.eta);
        }
        self.points.windows(2).find_map(|pair| {
            let (p0, p1) = (pair[0], pair[1]);
            if flow < p0.q || flow > p1.q {
                return None;
            }
            if p1.q == p0.q {
                return Some(p0.eta);
            }
            Some(p0.eta + (p1.eta - p0.eta) * (flow - p0.q) / (p1.q - p0.q))
        })
    }
}

/// Design operating point used for operating-point reasons
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingContext {
    pub design_flow_m3s: Option<f64>,
    pub design_head_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingResult {
    /// 0-100
    pub aging_score: u8,
    pub warning_level: WarningLevel,
    pub mean_efficiency_pct: f64,
    /// Shortfall against the reference, in percentage points
    pub deviation_pct: f64,
    /// Samples compared against the expert curve, 0 when the design value was used
    pub curve_samples: usize,
    pub reasons: Vec<String>,
    pub explanation: String,
}

impl AgingResult {
    fn empty(explanation: &str) -> Self {
        Self {
            aging_score: 0,
            warning_level: WarningLevel::Ok,
            mean_efficiency_pct: 0.0,
            deviation_pct: 0.0,
            curve_samples: 0,
            reasons: Vec::new(),
            explanation: explanation.to_string(),
        }
    }
}

/// Hydraulic efficiency of one sample as a fraction in `[0, 1]`
///
/// Output is read in MW. Returns 0 when output, flow or head is missing or
/// not positive.
pub fn hydraulic_efficiency(sample: &TelemetrySample) -> f64 {
    let positive = |signal| sample.get(signal).filter(|v: &f64| *v > 0.0);
    let (Some(power_mw), Some(flow), Some(head)) = (
        positive(Signal::Output),
        positive(Signal::Flow),
        positive(Signal::Head),
    ) else {
        return 0.0;
    };
    let eta = power_mw * WATTS_PER_MEGAWATT
        / (WATER_DENSITY_KG_PER_M3 * GRAVITY_M_PER_S2 * flow * head);
    sanitize(eta).clamp(0.0, 1.0)
}

/// Measured efficiency when present, computed efficiency otherwise
fn sample_efficiency(sample: &TelemetrySample) -> f64 {
    match sample.get(Signal::Efficiency) {
        Some(pct) if pct > 0.0 => pct / 100.0,
        _ => hydraulic_efficiency(sample),
    }
}

/// Score efficiency aging over a window
///
/// `design_eta` may be a fraction or a percentage; it defaults to 92 %. A
/// non-empty `curve` takes precedence over the design value whenever at
/// least one sample can be mapped onto it.
pub fn evaluate_aging(
    window: &TelemetryWindow,
    design_eta: Option<f64>,
    context: &AgingContext,
    curve: Option<&EfficiencyCurve>,
) -> AgingResult {
    if window.is_empty() {
        return AgingResult::empty("No telemetry available");
    }

    let etas: Vec<f64> = window
        .iter()
        .map(sample_efficiency)
        .filter(|eta| *eta > 0.0)
        .collect();
    if etas.is_empty() {
        return AgingResult::empty("Insufficient valid efficiency samples");
    }
    let mean_eta = mean(&etas);

    let from_curve = curve.and_then(|curve| curve_deviation(window, curve));
    let (deviation_pct, curve_samples) = match from_curve {
        Some((deviation, samples)) => (deviation.max(0.0), samples),
        None => {
            let design = match design_eta.filter(|d| d.is_finite() && *d > 0.0) {
                Some(d) if d > 1.0 => d / 100.0,
                Some(d) => d,
                None => DEFAULT_DESIGN_EFFICIENCY,
            };
            (((design - mean_eta) * 100.0).max(0.0), 0)
        }
    };

    let aging_score = libm::round(deviation_pct * AGING_SCORE_PER_PP).clamp(0.0, 100.0) as u8;
    let warning_level = WarningLevel::from_score(aging_score);
    let reasons = operating_reasons(window, context);

    let mut explanation = vec![format!(
        "Mean efficiency {:.2}%. Deviation {:.2}%.",
        mean_eta * 100.0,
        deviation_pct
    )];
    if curve_samples > 0 {
        explanation.push(format!(
            "Deviation computed against expert curve (n={curve_samples})."
        ));
    }
    explanation.extend(reasons.iter().cloned());
    match warning_level {
        WarningLevel::Critical => explanation.push(
            "Action: consider load redistribution or a planned outage to inspect for cavitation and runner damage."
                .to_string(),
        ),
        WarningLevel::Warning => explanation.push(
            "Action: monitor closely and schedule an inspection if the trend continues.".to_string(),
        ),
        WarningLevel::Notice | WarningLevel::Ok => {}
    }

    AgingResult {
        aging_score,
        warning_level,
        mean_efficiency_pct: mean_eta * 100.0,
        deviation_pct,
        curve_samples,
        reasons,
        explanation: explanation.join(" "),
    }
}

fn curve_deviation(window: &TelemetryWindow, curve: &EfficiencyCurve) -> Option<(f64, usize)> {
    let deviations: Vec<f64> = window
        .iter()
        .filter_map(|sample| {
            let flow = sample.get(Signal::Flow).filter(|q| *q > 0.0)?;
            let observed = Some(sample_efficiency(sample)).filter(|eta| *eta > 0.0)?;
            let expected = curve.expected_at(flow).filter(|eta| *eta > 0.0)?;
            Some((expected - observed) / expected * 100.0)
        })
        .collect();

    if deviations.is_empty() {
        None
    } else {
        Some((mean(&deviations), deviations.len()))
    }
}

fn operating_reasons(window: &TelemetryWindow, context: &AgingContext) -> Vec<String> {
    let positive_mean = |signal| {
        let values: Vec<f64> = window.values(signal).into_iter().filter(|v| *v > 0.0).collect();
        (!values.is_empty()).then(|| mean(&values))
    };
    let mut reasons = Vec::new();

    if let (Some(flow), Some(design)) = (
        positive_mean(Signal::Flow),
        context.design_flow_m3s.filter(|d| *d > 0.0),
    ) {
        let ratio = flow / design;
        let reason = if ratio < PART_LOAD_FLOW_RATIO {
            "Operating at part load (flow below 60% of design): efficiency drops and cavitation risk rises."
        } else if ratio < NEAR_DESIGN_FLOW_RATIO {
            "Operating below design flow: efficiency reduced by partial loading."
        } else {
            "Flow near design: loading is appropriate."
        };
        reasons.push(reason.to_string());
    }

    if let (Some(head), Some(design)) = (
        positive_mean(Signal::Head),
        context.design_head_m.filter(|d| *d > 0.0),
    ) {
        if head / design < HEAD_MISMATCH_RATIO {
            reasons.push(
                "Head mismatch: actual head below design shifts the operating point and reduces efficiency."
                    .to_string(),
            );
        }
    }

    if let Some(vibration) = positive_mean(Signal::Vibration) {
        if vibration > ELEVATED_VIBRATION_MM_S {
            reasons.push("Elevated vibration: mechanical fatigue shortens operational lifetime.".to_string());
        } else if vibration > MILD_VIBRATION_MM_S {
            reasons.push("Mild vibration observed: monitor for trend.".to_string());
        }
    }

    reasons
}

/// Efficiency change per year from `(timestamp, efficiency)` pairs
///
/// The result is in the unit of the input values per year. Returns 0 for
/// fewer than two points or a zero time span.
pub fn annual_degradation_rate(points: &[(Timestamp, f64)]) -> f64 {
    let Some(origin) = points.iter().map(|(ts, _)| *ts).min() else {
        return 0.0;
    };
    let (xs, ys): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter(|(_, eta)| eta.is_finite())
        .map(|(ts, eta)| (ms_to_days((ts - origin) as f64), *eta))
        .unzip();

    linear_regression(&xs, &ys)
        .map(|fit| sanitize(fit.slope * DAYS_PER_YEAR))
        .unwrap_or(0.0)
}

/// Revenue lost per hour by running below the optimal efficiency
///
/// `power_kw` times the efficiency shortfall gives the lost kW; multiplied by
/// the price per kWh this is the loss for one hour.
pub fn revenue_loss_per_hour(actual_eta: f64, optimal_eta: f64, power_kw: f64, price_per_kwh: f64) -> f64 {
    let shortfall = (optimal_eta - actual_eta).max(0.0);
    sanitize(shortfall * power_kw * price_per_kwh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroguard_core::constants::time::MS_PER_DAY;

    fn unit(output_mw: f64, flow: f64, head: f64) -> TelemetrySample {
        TelemetrySample::new("unit-3", 0)
            .with(Signal::Output, output_mw)
            .with(Signal::Flow, flow)
            .with(Signal::Head, head)
    }

    fn window(samples: Vec<TelemetrySample>) -> TelemetryWindow {
        let mut window = TelemetryWindow::new("unit-3", 30);
        for sample in samples {
            window.push(sample);
        }
        window
    }

    #[test]
    fn test_hydraulic_efficiency() {
        // 9 MW from 10 m³/s over 100 m
        let eta = hydraulic_efficiency(&unit(9.0, 10.0, 100.0));
        assert!((eta - 9.0e6 / (1000.0 * 9.80665 * 1000.0)).abs() < 1e-12);
        assert_eq!(hydraulic_efficiency(&unit(9.0, 0.0, 100.0)), 0.0);
        assert_eq!(hydraulic_efficiency(&unit(50.0, 1.0, 1.0)), 1.0);
        assert_eq!(hydraulic_efficiency(&TelemetrySample::new("unit-3", 0)), 0.0);
    }

    #[test]
    fn test_aging_against_design() {
        let samples = (0..4)
            .map(|_| TelemetrySample::new("unit-3", 0).with(Signal::Efficiency, 82.0))
            .collect();
        let result = evaluate_aging(&window(samples), None, &AgingContext::default(), None);
        // 10 pp below 92 %
        assert!((result.deviation_pct - 10.0).abs() < 1e-9);
        assert_eq!(result.aging_score, 15);
        assert_eq!(result.warning_level, WarningLevel::Notice);
        assert_eq!(result.curve_samples, 0);
    }

    #[test]
    fn test_aging_against_curve() {
        let curve = EfficiencyCurve::new(vec![
            CurvePoint { q: 20.0, eta: 0.94 },
            CurvePoint { q: 10.0, eta: 0.90 },
        ]);
        assert!((curve.expected_at(15.0).unwrap() - 0.92).abs() < 1e-12);
        assert_eq!(curve.expected_at(5.0), Some(0.90));

        let samples = vec![TelemetrySample::new("unit-3", 0)
            .with(Signal::Flow, 15.0)
            .with(Signal::Efficiency, 64.4)];
        let result = evaluate_aging(&window(samples), Some(0.5), &AgingContext::default(), Some(&curve));
        assert_eq!(result.curve_samples, 1);
        assert!((result.deviation_pct - 30.0).abs() < 1e-9);
        assert_eq!(result.aging_score, 45);
        assert_eq!(result.warning_level, WarningLevel::Warning);
        assert!(result.explanation.contains("expert curve"));
    }

    #[test]
    fn test_curve_from_json_is_sorted() {
        let curve: EfficiencyCurve =
            serde_json::from_str(r#"{ "points": [{ "q": 30.0, "eta": 0.9 }, { "q": 10.0, "eta": 0.8 }] }"#).unwrap();
        assert_eq!(curve.expected_at(0.0), Some(0.8));
        assert_eq!(curve.expected_at(40.0), Some(0.9));
    }

    #[test]
    fn test_operating_reasons() {
        let samples = (0..3)
            .map(|_| {
                TelemetrySample::new("unit-3", 0)
                    .with(Signal::Efficiency, 91.0)
                    .with(Signal::Flow, 5.0)
                    .with(Signal::Head, 70.0)
                    .with(Signal::Vibration, 5.0)
            })
            .collect();
        let context = AgingContext {
            design_flow_m3s: Some(10.0),
            design_head_m: Some(100.0),
        };
        let result = evaluate_aging(&window(samples), Some(92.0), &context, None);
        assert_eq!(result.reasons.len(), 3);
        assert!(result.reasons[0].starts_with("Operating at part load"));
        assert!(result.reasons[1].starts_with("Head mismatch"));
        assert!(result.reasons[2].starts_with("Elevated vibration"));
    }

    #[test]
    fn test_empty_inputs() {
        let empty = evaluate_aging(&TelemetryWindow::new("unit-3", 5), None, &AgingContext::default(), None);
        assert_eq!(empty.explanation, "No telemetry available");

        let no_eta = evaluate_aging(
            &window(vec![TelemetrySample::new("unit-3", 0).with(Signal::Vibration, 1.0)]),
            None,
            &AgingContext::default(),
            None,
        );
        assert_eq!(no_eta.explanation, "Insufficient valid efficiency samples");
        assert_eq!(no_eta.aging_score, 0);
    }

    #[test]
    fn test_annual_degradation_rate() {
        let points: Vec<(Timestamp, f64)> = (0..5)
            .map(|i| (i * 73 * MS_PER_DAY, 0.92 - 0.002 * i as f64))
            .collect();
        // -0.002 per 73 days
        assert!((annual_degradation_rate(&points) + 0.01).abs() < 1e-12);
        assert_eq!(annual_degradation_rate(&points[..1]), 0.0);
    }

    #[test]
    fn test_revenue_loss() {
        assert!((revenue_loss_per_hour(0.88, 0.92, 10_000.0, 0.08) - 32.0).abs() < 1e-9);
        assert_eq!(revenue_loss_per_hour(0.93, 0.92, 10_000.0, 0.08), 0.0);
    }
}
