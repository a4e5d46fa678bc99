//! Override resolution
//!
//! Determines which value a node actually observed for a field. A node saw
//! whatever the nearest later node replaced; if nobody downstream touched the
//! field, it saw what the document holds today.

use crate::chain::SupplyChainNode;
use crate::registry::ResolvedFields;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A later node declared a replacement for the field
    Replaced {
        /// Index of the nearest later node declaring the key
        by_node: usize,
        /// Value that node declared
        value: &'a str,
    },

    /// Nobody downstream replaced the field; the document value applies
    Current(&'a str),

    /// Nobody downstream replaced the field and the document lacks it
    Missing,
}

impl<'a> Resolution<'a> {
    /// Resolved value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&'a str> {
        match *self {
            Self::Replaced { value, .. } | Self::Current(value) => Some(value),
            Self::Missing => None,
        }
    }

    /// Check if nothing could be resolved
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Forward-scan resolver over an immutable chain
#[derive(Debug, Clone, Copy)]
pub struct OverrideResolver<'a> {
    nodes: &'a [SupplyChainNode],
    fields: &'a ResolvedFields,
}

impl<'a> OverrideResolver<'a> {
    /// Create resolver over parsed nodes and fetched document values
    #[inline]
    #[must_use]
    pub fn new(nodes: &'a [SupplyChainNode], fields: &'a ResolvedFields) -> Self {
        Self { nodes, fields }
    }

    /// Parsed nodes, in chain order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &'a [SupplyChainNode] {
        self.nodes
    }

    /// Value node `index` observed for `key`
    ///
    /// Scans nodes `index + 1 ..` in ascending order and returns the first
    /// declared replacement of `key`. The node's own replacements are never
    /// consulted. Falls back to the document's current value.
    #[must_use]
    pub fn resolve(&self, index: usize, key: &str) -> Resolution<'a> {
        self.nodes
            .iter()
            .enumerate()
            .skip(index.saturating_add(1))
            .find_map(|(by_node, node)| {
                node.replacement_for(key)
                    .map(|value| Resolution::Replaced { by_node, value })
            })
            .unwrap_or_else(|| {
                self.fields
                    .lookup(key)
                    .map_or(Resolution::Missing, Resolution::Current)
            })
    }
}
