//! Risk Detector Thresholds
//!
//! Thresholds for the synergetic, cavitation, thermal and efficiency
//! detectors, plus RUL stress weights and prescription bands.

// ===== SYNERGETIC RISK =====

/// Minimum buffered samples for synergetic analysis.
pub const SYNERGETIC_MIN_SAMPLES: usize = 5;

/// Acoustic oscillation ratio (`sigma / mean`) trigger.
pub const ACOUSTIC_OSCILLATION_TRIGGER: f64 = 0.30;

/// Thermal growth rate trigger (units per interval).
pub const THERMAL_GROWTH_TRIGGER: f64 = 0.5;

/// Interval length used to turn a temperature delta into a growth rate.
pub const THERMAL_GROWTH_INTERVAL: f64 = 0.1;

/// Hydraulic instability trigger (mean absolute deviation over mean, %).
pub const HYDRAULIC_INSTABILITY_TRIGGER_PCT: f64 = 15.0;

/// Probability (percent) reported when all three channels trigger.
pub const SYNERGETIC_PROBABILITY_PCT: f64 = 80.0;

// ===== CAVITATION =====

/// Specific speed normaliser in the empirical sigma limit
/// `(nq / 200)^1.33`.
pub const SPECIFIC_SPEED_REFERENCE: f64 = 200.0;

/// Exponent of the empirical sigma limit.
pub const SIGMA_LIMIT_EXPONENT: f64 = 1.33;

/// Floor of the sigma limit for very low specific speeds.
pub const SIGMA_LIMIT_FLOOR: f64 = 0.08;

/// Steepness of the logistic mapping from `sigma / limit` to probability.
pub const CAVITATION_LOGISTIC_STEEPNESS: f64 = 8.0;

/// Cavitation intensity mapped to probability 1.0 in the fallback path.
pub const CAVITATION_INTENSITY_FULL_SCALE: f64 = 10.0;

/// Confidence of the intensity-only fallback path.
pub const CAVITATION_FALLBACK_CONFIDENCE: f64 = 0.4;

// ===== BEARING THERMAL =====

/// Absolute bearing temperature ceiling (°C).
pub const BEARING_ABSOLUTE_LIMIT_C: f64 = 90.0;

/// Allowed bearing temperature rise over ambient (°C).
pub const BEARING_RISE_OVER_AMBIENT_C: f64 = 50.0;

/// Ambient temperature assumed when none is measured (°C).
pub const DEFAULT_AMBIENT_C: f64 = 25.0;

/// Projected time to the critical temperature (minutes) considered short.
pub const SHORT_TIME_TO_LIMIT_MIN: f64 = 60.0;

/// Slope (°C per minute) considered a fast thermal rise.
pub const FAST_THERMAL_SLOPE_C_PER_MIN: f64 = 0.5;

/// Minimum samples for a thermal projection.
pub const THERMAL_MIN_SAMPLES: usize = 3;

// ===== EFFICIENCY DECAY =====

/// Efficiency drop (percentage points) that flags probable decay.
pub const EFFICIENCY_DECAY_TRIGGER_PP: f64 = 1.5;

/// Efficiency drop (percentage points) mapped to probability 1.0.
pub const EFFICIENCY_DECAY_FULL_SCALE_PP: f64 = 5.0;

/// Eccentricity / grind index above which runner erosion is suspected.
pub const ECCENTRICITY_INDICATOR_LIMIT: f64 = 0.1;

/// Seepage / leak index above which seal wear is suspected.
pub const SEEPAGE_INDICATOR_LIMIT: f64 = 1.0;

// ===== RUL =====

/// Output change (MW) between consecutive samples counted as a sudden start.
pub const SUDDEN_START_DELTA_MW: f64 = 5.0;

/// Cavitation intensity above which a sample counts as cavitating.
pub const CAVITATION_ZONE_INTENSITY: f64 = 5.0;

/// Sudden starts normaliser in the stress formula.
pub const SUDDEN_START_NORMALISER: f64 = 100.0;

/// Maximum allowed foundation/alignment displacement (mm).
pub const MAX_ALIGNMENT_DEVIATION_MM: f64 = 0.5;

/// Stress weight of sudden starts.
pub const STRESS_WEIGHT_STARTS: f64 = 0.2;

/// Stress weight of cavitation hours.
pub const STRESS_WEIGHT_CAVITATION: f64 = 0.3;

/// Stress weight of alignment deviation.
pub const STRESS_WEIGHT_ALIGNMENT: f64 = 0.5;

/// Stress cap: remaining life never drops below `1 - MAX_STRESS` of base.
pub const MAX_STRESS: f64 = 0.95;

/// Upper bound of the RUL confidence.
pub const MAX_RUL_CONFIDENCE: f64 = 0.95;

/// Critical threshold as a share of base life.
pub const RUL_CRITICAL_SHARE: f64 = 0.1;

/// History length at which RUL confidence saturates.
pub const RUL_FULL_CONFIDENCE_SAMPLES: usize = 10;

// ===== AGING =====

/// Aging score points per percentage point of efficiency deviation.
pub const AGING_SCORE_PER_PP: f64 = 1.5;

/// Aging score at or above which the warning level is CRITICAL.
pub const AGING_CRITICAL_SCORE: u8 = 60;

/// Aging score at or above which the warning level is WARNING.
pub const AGING_WARNING_SCORE: u8 = 30;

/// Aging score at or above which the warning level is NOTICE.
pub const AGING_NOTICE_SCORE: u8 = 10;

/// Mean flow below this share of design flow is part-load operation.
pub const PART_LOAD_FLOW_RATIO: f64 = 0.6;

/// Mean flow below this share of design flow is partial loading.
pub const NEAR_DESIGN_FLOW_RATIO: f64 = 0.9;

/// Mean head below this share of design head is a head mismatch.
pub const HEAD_MISMATCH_RATIO: f64 = 0.8;

/// Mean vibration (mm/s) above which fatigue risk is elevated.
pub const ELEVATED_VIBRATION_MM_S: f64 = 4.0;

/// Mean vibration (mm/s) above which a mild vibration note is given.
pub const MILD_VIBRATION_MM_S: f64 = 1.5;

// ===== INCIDENT MATCHING =====

/// Minimum samples before incident matching is attempted.
pub const INCIDENT_MIN_SAMPLES: usize = 5;

/// Similarity (0-100) a match must strictly exceed.
pub const INCIDENT_SIMILARITY_THRESHOLD: f64 = 85.0;

// ===== PRESCRIPTION BANDS (percent) =====

/// Failure probability at or above which action is critical.
pub const PRESCRIPTION_CRITICAL_PCT: f64 = 90.0;

/// Failure probability at or above which action is high priority.
pub const PRESCRIPTION_HIGH_PCT: f64 = 70.0;

/// Failure probability at or above which monitoring is advised.
pub const PRESCRIPTION_MEDIUM_PCT: f64 = 50.0;
