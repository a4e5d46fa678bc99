//! Protected path registry
//!
//! Provides [`ProtectedPathRegistry`], which collects every field path the
//! chain references while it is parsed, then fetches all of their current
//! values from the document in one traversal.

use crate::document::{render_raw, BidRequestDocument};
use crate::path::FieldPath;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Handle to one registered path occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathOccurrence(usize);

impl PathOccurrence {
    /// Position in encounter order
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Every path occurrence referenced by the chain, in encounter order
///
/// Occurrences are not deduplicated: the same path registered by two nodes
/// yields two handles. Deduplication happens only when fetching.
#[derive(Debug, Default, Clone)]
pub struct ProtectedPathRegistry {
    occurrences: Vec<FieldPath>,
}

impl ProtectedPathRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            occurrences: Vec::new(),
        }
    }

    /// Record a path occurrence
    pub fn register(&mut self, path: FieldPath) -> PathOccurrence {
        self.occurrences.push(path);
        PathOccurrence(self.occurrences.len() - 1)
    }

    /// Get the path behind a handle
    #[inline]
    #[must_use]
    pub fn occurrence(&self, handle: PathOccurrence) -> Option<&FieldPath> {
        self.occurrences.get(handle.0)
    }

    /// Get number of registered occurrences
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Distinct paths, in order of first registration
    #[must_use]
    pub fn distinct_paths(&self) -> Vec<&FieldPath> {
        let mut distinct: IndexMap<&str, &FieldPath> = IndexMap::new();
        for path in &self.occurrences {
            distinct.entry(path.as_str()).or_insert(path);
        }
        distinct.into_values().collect()
    }

    /// Fetch the current value of every registered path
    ///
    /// Consumes the registry: the fetch happens once per parse.
    #[must_use]
    pub fn resolve_all(self, document: &BidRequestDocument) -> ResolvedFields {
        let paths = self.distinct_paths();
        let fetched = document.fetch_batch(&paths);

        let values: HashMap<String, String> = paths
            .iter()
            .zip(fetched)
            .filter_map(|(path, value)| Some((path.to_string(), render_raw(value?))))
            .collect();

        tracing::debug!(
            occurrences = self.occurrences.len(),
            requested = paths.len(),
            found = values.len(),
            "resolved registered paths"
        );

        ResolvedFields {
            values,
            requested: paths.len(),
        }
    }
}

/// Current document values of every registered path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    values: HashMap<String, String>,
    requested: usize,
}

impl ResolvedFields {
    /// Current value of a registered path, if the document has it
    #[inline]
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&str> {
        self.values.get(path).map(String::as_str)
    }

    /// Number of distinct paths fetched
    #[inline]
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of distinct paths found in the document
    #[inline]
    #[must_use]
    pub fn found(&self) -> usize {
        self.values.len()
    }
}
