//! Rule code to replacement suggestions.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Replacement suggestions keyed by rule code.
///
/// Entries are overwritten, never merged: whatever the most recent lint run
/// reported for a rule code is what fixes see, regardless of the document it
/// came from. Cloning yields another handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct AlternativesMap {
    inner: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl AlternativesMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the alternatives for a rule code, replacing any previous entry.
    pub fn record(&self, code: impl Into<String>, alternatives: Vec<String>) {
        self.inner.write().insert(code.into(), alternatives);
    }

    /// Returns the alternatives for a rule code, if any were recorded.
    pub fn get(&self, code: &str) -> Option<Vec<String>> {
        self.inner.read().get(code).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}
