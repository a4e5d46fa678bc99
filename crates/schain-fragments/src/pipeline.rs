//! Extraction pipeline
//!
//! Runs the stages in strict sequence: parse the document, parse the chain
//! (registering paths), fetch every registered path once, then assemble.

use crate::chain::{parse_chain, SupplyChainNode};
use crate::config::ParserConfig;
use crate::document::BidRequestDocument;
use crate::error::{SchainError, SchainResult};
use crate::fragment::FragmentAssembler;
use crate::registry::ProtectedPathRegistry;
use crate::resolver::OverrideResolver;
use serde::{Deserialize, Serialize};

/// Output of a successful extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedBidRequest {
    nodes: Vec<SupplyChainNode>,
    signature_message_fragments: Vec<String>,
}

impl ParsedBidRequest {
    /// One escaped fragment per node, in chain order
    #[inline]
    #[must_use]
    pub fn signature_message_fragments(&self) -> &[String] {
        &self.signature_message_fragments
    }

    /// Parsed chain nodes
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[SupplyChainNode] {
        &self.nodes
    }

    /// Get number of fragments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.signature_message_fragments.len()
    }

    /// Check if the chain was empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signature_message_fragments.is_empty()
    }

    /// Take the fragments
    #[inline]
    #[must_use]
    pub fn into_fragments(self) -> Vec<String> {
        self.signature_message_fragments
    }
}

/// Turns bid requests into signature fragments
///
/// Holds only configuration, so one builder can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    config: ParserConfig,
}

impl FragmentBuilder {
    /// Create builder with configuration
    #[inline]
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Extract per-node fragments from raw request bytes
    ///
    /// # Errors
    /// - `DocumentTooLarge` if `bytes` exceeds the configured size
    /// - any error from parsing the document or chain
    /// - `FieldNotFound` under [`MissingFieldPolicy::Reject`](crate::MissingFieldPolicy::Reject)
    pub fn build(&self, bytes: &[u8]) -> SchainResult<ParsedBidRequest> {
        if bytes.len() > self.config.max_document_bytes {
            return Err(SchainError::DocumentTooLarge {
                size: bytes.len(),
                limit: self.config.max_document_bytes,
            });
        }

        let document = BidRequestDocument::from_slice(bytes)?;

        let mut registry = ProtectedPathRegistry::new();
        let nodes = parse_chain(&document, &self.config, &mut registry)?;
        let fields = registry.resolve_all(&document);

        let resolver = OverrideResolver::new(&nodes, &fields);
        let signature_message_fragments =
            FragmentAssembler::new(resolver, self.config.missing_field_policy).assemble()?;

        tracing::debug!(nodes = nodes.len(), "assembled signature fragments");

        Ok(ParsedBidRequest {
            nodes,
            signature_message_fragments,
        })
    }
}

/// Extract per-node fragments with the default configuration
///
/// # Errors
/// See [`FragmentBuilder::build`]
pub fn parse_bid_request(bytes: &[u8]) -> SchainResult<ParsedBidRequest> {
    FragmentBuilder::default().build(bytes)
}
