//! Memoization of compiled patterns.
//!
//! Patterns are static once the registry is built, so compiling each one once
//! and sharing the result is enough. The cache is keyed by the literal pattern
//! string; it never affects match results.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use super::core::{compile, CompiledPattern};
use crate::error::PatternError;

/// Thread-safe pattern string -> [`CompiledPattern`] cache.
///
/// Cloning is cheap and clones share storage.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    compiled: Arc<RwLock<HashMap<String, Arc<CompiledPattern>>>>,
}

impl PatternCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached matcher for `pattern`, compiling it on first use.
    ///
    /// Compilation errors are not cached; a poisoned lock degrades to
    /// compiling without caching.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Arc<CompiledPattern>, PatternError> {
        if let Ok(map) = self.compiled.read() {
            if let Some(hit) = map.get(pattern) {
                return Ok(Arc::clone(hit));
            }
        }

        let compiled = Arc::new(compile(pattern)?);
        debug!(
            pattern = %pattern,
            regex = %compiled.regex().as_str(),
            "Compiled route pattern"
        );

        match self.compiled.write() {
            Ok(mut map) => {
                let entry = map
                    .entry(pattern.to_string())
                    .or_insert_with(|| Arc::clone(&compiled));
                Ok(Arc::clone(entry))
            }
            Err(_) => {
                warn!(pattern = %pattern, "Pattern cache lock poisoned, skipping cache");
                Ok(compiled)
            }
        }
    }

    /// Number of cached patterns
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.read().map(|m| m.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached matcher.
    pub fn clear(&self) {
        if let Ok(mut map) = self.compiled.write() {
            map.clear();
        }
    }
}
