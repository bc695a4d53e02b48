//! Error Types for Configuration and Collaborator Failures
//!
//! ## Design Philosophy
//!
//! HydroGuard treats insufficient or degenerate data as an ordinary outcome.
//! A forecast over three points, a trend over a flat signal or a dynamic
//! threshold without a baseline all produce a valid result with zero (or
//! reduced) confidence. None of them are errors.
//!
//! Errors are reserved for problems the caller must fix:
//!
//! ### Configuration
//! - `InvalidConfig`: a tunable is outside its meaningful range
//! - `InvalidPattern`: a pattern definition cannot be evaluated
//! - `InvalidWeight`: a non-positive or non-finite weight multiplier
//!
//! ### Collaborators
//! - `Parse`: a pattern library, catalogue or config document is malformed
//! - `BaselineUnavailable`: the baseline provider failed
//! - `LockPoisoned`: a shared store was poisoned by a panicking writer
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use hydroguard_core::{SentinelError, WeightStore};
//!
//! let mut store = WeightStore::new("site-a");
//! match store.set("cavitation-complex", -1.0) {
//!     Ok(()) => {}
//!     Err(SentinelError::InvalidWeight { pattern_id, .. }) => {
//!         // reject the federated payload for this pattern
//!         assert_eq!(pattern_id, "cavitation-complex");
//!     }
//!     Err(_) => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for fallible HydroGuard operations
pub type SentinelResult<T> = Result<T, SentinelError>;

/// Errors raised by configuration and collaborator failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SentinelError {
    /// A configuration value is outside its valid range
    #[error("Invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending configuration key
        field: &'static str,
        /// Human-readable constraint that was violated
        reason: &'static str,
    },

    /// A pattern definition is not evaluable
    #[error("Invalid pattern `{id}`: {reason}")]
    InvalidPattern {
        /// Pattern identifier
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// A weight multiplier was zero, negative or not finite
    #[error("Invalid weight {weight} for pattern `{pattern_id}`: must be finite and > 0")]
    InvalidWeight {
        /// Pattern the weight was meant for
        pattern_id: String,
        /// Rejected multiplier
        weight: f64,
    },

    /// A pattern id was looked up but is not registered
    #[error("Unknown pattern `{0}`")]
    UnknownPattern(String),

    /// A JSON document could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// The baseline provider could not supply statistics
    #[error("Baseline unavailable: {0}")]
    BaselineUnavailable(String),

    /// A shared store lock was poisoned
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        SentinelError::Parse(err.to_string())
    }
}

impl SentinelError {
    /// True for errors caused by bad configuration or definitions rather
    /// than by a collaborator at runtime.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SentinelError::InvalidConfig { .. }
                | SentinelError::InvalidPattern { .. }
                | SentinelError::InvalidWeight { .. }
                | SentinelError::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SentinelError::InvalidWeight {
            pattern_id: "p".into(),
            weight: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid weight 0 for pattern `p`: must be finite and > 0"
        );

        let err = SentinelError::InvalidConfig {
            field: "emission_threshold",
            reason: "must be in (0, 1]",
        };
        assert!(err.to_string().contains("emission_threshold"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: SentinelError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, SentinelError::Parse(_)));
        assert!(err.is_configuration());
        assert!(!SentinelError::LockPoisoned.is_configuration());
    }
}
