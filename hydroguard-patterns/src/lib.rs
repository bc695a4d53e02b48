//! Failure Pattern Library for HydroGuard
//!
//! ## Overview
//!
//! Patterns are data, not code. This crate ships the default library of
//! hydro-unit failure signatures as JSON-shaped definitions, a thread-safe
//! registry to hold the active library, and a linter that reports
//! questionable definitions before they reach the kernel.
//!
//! ## Pattern Design
//!
//! A pattern combines weighted conditions over different signals. Weights
//! express how much each symptom contributes; they do not need to sum to 1.
//! Trend-type conditions that match together trigger the kernel's coupling
//! boost, so a pattern built from several trend conditions escalates faster
//! than one built from fixed thresholds.
//!
//! ```rust
//! use hydroguard_patterns::{default_library, PatternRegistry};
//!
//! let registry = PatternRegistry::new();
//! registry.load_defaults().unwrap();
//! assert!(registry.get("cavitation-complex").is_ok());
//! assert_eq!(default_library().unwrap().len(), 2);
//! ```
//!
//! ## Loading Custom Libraries
//!
//! A library is a JSON array of patterns in the same shape as the defaults.
//! [`PatternRegistry::load_json`] validates every pattern and rejects the
//! whole document if any pattern is not evaluable.

#![deny(unsafe_code)]

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            drop(format!($($arg)*));
        }
    };
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            drop(format!($($arg)*));
        }
    };
}

pub mod library;
pub mod registry;
pub mod validation;

pub use library::{bearing_thermal_instability, cavitation_complex, default_library, parse_library};
pub use registry::PatternRegistry;
pub use validation::{lint_library, lint_pattern, IssueKind, IssueLevel, LintIssue, LintReport};
