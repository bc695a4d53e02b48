//! Learning Loop Factors
//!
//! Operator feedback adjusts a per-pattern multiplier by simple exponential
//! reinforcement. Federation blends local and received multipliers.

/// Multiplier assumed for patterns that have never received feedback.
pub const DEFAULT_PATTERN_WEIGHT: f64 = 1.0;

/// Factor applied on operator confirmation.
pub const CONFIRM_FACTOR: f64 = 1.10;

/// Factor applied on operator rejection.
pub const REJECT_FACTOR: f64 = 0.90;

/// Share of the local multiplier in a federated merge. The received
/// (global) multiplier gets `1.0 - LOCAL_BLEND_SHARE`.
pub const LOCAL_BLEND_SHARE: f64 = 0.7;

/// Smallest multiplier a store will hold. Repeated rejections saturate here
/// instead of underflowing to zero.
pub const MIN_PATTERN_WEIGHT: f64 = f64::MIN_POSITIVE;
