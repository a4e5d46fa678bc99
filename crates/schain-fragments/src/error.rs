//! Error types for fragment extraction
//!
//! Every failure aborts the whole extraction: callers receive either the
//! complete fragment list or the first error encountered.

/// Errors raised while turning a bid request into signature fragments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchainError {
    /// Document is not a JSON object, or the chain has the wrong shape
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Required path is absent from the document
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// A `replace` token failed query-string decoding
    #[error("malformed replacement in node {node}: '{token}' ({reason})")]
    MalformedReplacement {
        /// Index of the declaring node
        node: usize,
        /// Offending token, as written
        token: String,
        /// Why decoding failed
        reason: String,
    },

    /// Input exceeds the configured document size
    #[error("document of {size} bytes exceeds limit of {limit} bytes")]
    DocumentTooLarge {
        /// Length of the input in bytes
        size: usize,
        /// Configured `max_document_bytes`
        limit: usize,
    },

    /// Chain exceeds the configured node count
    #[error("chain of {count} nodes exceeds limit of {limit} nodes")]
    TooManyNodes {
        /// Number of nodes in the chain
        count: usize,
        /// Configured `max_nodes`
        limit: usize,
    },

    /// Field could not be resolved and the policy rejects missing values
    #[error("field '{path}' attributed to node {node} not found in document")]
    FieldNotFound {
        /// Index of the node whose fragment needed the field
        node: usize,
        /// Unresolved field path
        path: String,
    },
}

impl SchainError {
    /// Create malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput(message.into())
    }

    /// Create malformed replacement error
    pub fn malformed_replacement(
        node: usize,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedReplacement {
            node,
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Check if error reports a missing path or field
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound(_) | Self::FieldNotFound { .. })
    }

    /// Check if error was caused by a configured limit
    #[inline]
    #[must_use]
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::DocumentTooLarge { .. } | Self::TooManyNodes { .. })
    }
}

/// Result type alias for fragment extraction
pub type SchainResult<T> = Result<T, SchainError>;
