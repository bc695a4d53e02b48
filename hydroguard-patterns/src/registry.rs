//! Pattern Registry
//!
//! Holds the active pattern library behind an `RwLock` so the kernel can
//! take a consistent snapshot while operators add or replace patterns.
//! Registration validates each pattern; a pattern whose weights sum to zero
//! never enters the registry.

use std::collections::BTreeMap;
use std::sync::RwLock;

use hydroguard_core::{HeuristicPattern, SentinelError, SentinelResult};

use crate::library::{default_library, parse_library};

/// Thread-safe pattern library keyed by pattern id
#[derive(Debug, Default)]
pub struct PatternRegistry {
    patterns: RwLock<BTreeMap<String, HeuristicPattern>>,
}

impl PatternRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pattern. Duplicate ids are rejected.
    pub fn register(&self, pattern: HeuristicPattern) -> SentinelResult<()> {
        pattern.validate()?;

        let mut patterns = self.patterns.write().map_err(|_| SentinelError::LockPoisoned)?;
        if patterns.contains_key(&pattern.id) {
            return Err(SentinelError::InvalidPattern {
                id: pattern.id.clone(),
                reason: "already registered".into(),
            });
        }
        log_debug!("registered pattern {}", pattern.id);
        patterns.insert(pattern.id.clone(), pattern);
        Ok(())
    }

    /// Register or overwrite a pattern, returning the previous definition
    pub fn upsert(&self, pattern: HeuristicPattern) -> SentinelResult<Option<HeuristicPattern>> {
        pattern.validate()?;

        let mut patterns = self.patterns.write().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(patterns.insert(pattern.id.clone(), pattern))
    }

    pub fn get(&self, id: &str) -> SentinelResult<HeuristicPattern> {
        let patterns = self.patterns.read().map_err(|_| SentinelError::LockPoisoned)?;
        patterns
            .get(id)
            .cloned()
            .ok_or_else(|| SentinelError::UnknownPattern(id.to_string()))
    }

    pub fn remove(&self, id: &str) -> SentinelResult<HeuristicPattern> {
        let mut patterns = self.patterns.write().map_err(|_| SentinelError::LockPoisoned)?;
        patterns
            .remove(id)
            .ok_or_else(|| SentinelError::UnknownPattern(id.to_string()))
    }

    /// Snapshot of every registered pattern, ordered by id
    pub fn all(&self) -> SentinelResult<Vec<HeuristicPattern>> {
        let patterns = self.patterns.read().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(patterns.values().cloned().collect())
    }

    pub fn ids(&self) -> SentinelResult<Vec<String>> {
        let patterns = self.patterns.read().map_err(|_| SentinelError::LockPoisoned)?;
        Ok(patterns.keys().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.patterns.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load all default HydroGuard patterns
    pub fn load_defaults(&self) -> SentinelResult<()> {
        for pattern in default_library()? {
            self.register(pattern)?;
        }
        Ok(())
    }

    /// Load a JSON library, replacing patterns with the same id
    ///
    /// The document is fully validated before any pattern is stored.
    pub fn load_json(&self, json: &str) -> SentinelResult<usize> {
        let patterns = parse_library(json)?;
        let count = patterns.len();
        for pattern in patterns {
            self.upsert(pattern)?;
        }
        Ok(count)
    }
}
