//! Pattern-Matching Kernel Parameters
//!
//! The kernel turns matched condition weights into a probability and then
//! applies multiplicative boosts. These are the knobs for that arithmetic.

/// Probability a pattern must strictly exceed for an insight to be emitted.
pub const EMISSION_THRESHOLD: f64 = 0.60;

/// Base of the coupling boost applied when several trend-type conditions
/// match together: `probability * base^(synchronized - 1)`.
pub const COUPLING_BOOST_BASE: f64 = 1.15;

/// Minimum number of synchronized trend matches before coupling applies.
pub const MIN_SYNCHRONIZED_TRENDS: usize = 2;

/// Sigma multiplier used by dynamic thresholds that do not specify one.
pub const DEFAULT_SIGMA_MULTIPLIER: f64 = 2.0;

/// Upper bound for any pattern probability.
pub const MAX_PROBABILITY: f64 = 1.0;

// ===== HISTORY =====

/// Samples kept per asset window unless configured otherwise.
pub const DEFAULT_WINDOW_CAPACITY: usize = 60;
