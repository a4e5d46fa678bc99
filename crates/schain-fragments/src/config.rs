//! Extraction configuration
//!
//! [`ParserConfig`] is plain data so a host server can embed it in its own
//! configuration file.

use serde::{Deserialize, Serialize};

/// What to emit when a field resolves to nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Emit the key with an empty value
    #[default]
    Empty,

    /// Fail the whole extraction with `FieldNotFound`
    Reject,
}

/// Configuration for [`FragmentBuilder`](crate::FragmentBuilder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Handling of protected or replaced fields absent from the document
    pub missing_field_policy: MissingFieldPolicy,
    /// Maximum accepted document size in bytes
    pub max_document_bytes: usize,
    /// Maximum accepted number of chain nodes
    pub max_nodes: usize,
}

impl ParserConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With missing field policy
    #[inline]
    #[must_use]
    pub fn with_missing_field_policy(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field_policy = policy;
        self
    }

    /// With maximum document size
    #[inline]
    #[must_use]
    pub fn with_max_document_bytes(mut self, limit: usize) -> Self {
        self.max_document_bytes = limit;
        self
    }

    /// With maximum chain length
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, limit: usize) -> Self {
        self.max_nodes = limit;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            missing_field_policy: MissingFieldPolicy::Empty,
            max_document_bytes: 10 * 1024 * 1024, // 10MB
            max_nodes: 128,
        }
    }
}
