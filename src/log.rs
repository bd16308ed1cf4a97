//! The citation record: which keys each recorded call shape exercised.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::cite::KeySet;

/// Mapping from call-signature label to the citation keys attributed to it.
///
/// A label appears only once a non-empty key set was produced for it, and a
/// repeat recording under the same label overwrites the previous entry
/// rather than accumulating. This is the engine's only mutable state; it is
/// owned by one [`Registry`](crate::Registry) and shared with its tracking
/// adapters.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CitationLog {
    citations: BTreeMap<String, KeySet>,
}

impl CitationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `keys` under `label`, replacing any prior entry for that
    /// exact label. Callers must not record empty key sets.
    pub(crate) fn record(&mut self, label: String, keys: KeySet) {
        debug_assert!(!keys.is_empty());
        self.citations.insert(label, keys);
    }

    /// Number of distinct call-signature labels recorded.
    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    /// The full label-to-keys map.
    pub fn citations(&self) -> &BTreeMap<String, KeySet> {
        &self.citations
    }

    /// Keys recorded under one label.
    pub fn get(&self, label: &str) -> Option<&KeySet> {
        self.citations.get(label)
    }

    /// Union of every recorded key set.
    pub fn used_keys(&self) -> KeySet {
        self.citations
            .values()
            .flat_map(|keys| keys.iter().cloned())
            .collect()
    }
}
