//! Supply chain parsing
//!
//! Walks `source.ext.schain.nodes`, extracting each node's identity, the
//! paths it protects and the replacements it declares. Every referenced path
//! is registered with the [`ProtectedPathRegistry`] in chain order.

use crate::config::ParserConfig;
use crate::document::{render_raw, BidRequestDocument};
use crate::error::{SchainError, SchainResult};
use crate::path::FieldPath;
use crate::registry::ProtectedPathRegistry;
use serde::{Deserialize, Serialize};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::borrow::Cow;

/// Location of the node array in a bid request
pub const NODES_PATH: &str = "source.ext.schain.nodes";

/// A field value a node says it substituted before forwarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredReplacement {
    /// Replaced field path
    pub key: String,
    /// Value the node wrote in its place
    pub value: String,
}

/// One hop of the supply chain
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplyChainNode {
    /// Advertising system identifier
    pub asi: String,
    /// Seller identifier
    pub sid: String,
    /// Paths this node attests to, in declared order
    pub protected_params: Vec<String>,
    /// Fields this node overwrote, in declared order
    pub declared_replacements: Vec<DeclaredReplacement>,
}

impl SupplyChainNode {
    /// Value this node declared for `key`, if any
    #[must_use]
    pub fn replacement_for(&self, key: &str) -> Option<&str> {
        self.declared_replacements
            .iter()
            .find(|replacement| replacement.key == key)
            .map(|replacement| replacement.value.as_str())
    }
}

/// Parse the chain out of a document
///
/// Protected paths are registered first (node 0's, then node 1's, ...),
/// followed by every declared replacement key, so the registry covers every
/// path the resolver may fall back to.
///
/// # Errors
/// - `PathNotFound` if the document has no node array
/// - `MalformedInput` if the node array or one of its elements has the wrong shape
/// - `TooManyNodes` if the chain is longer than the configured limit
/// - `MalformedReplacement` if a `replace` token cannot be decoded
pub fn parse_chain(
    document: &BidRequestDocument,
    config: &ParserConfig,
    registry: &mut ProtectedPathRegistry,
) -> SchainResult<Vec<SupplyChainNode>> {
    let nodes_path = NODES_PATH
        .parse::<FieldPath>()
        .map_err(|e| SchainError::malformed(e.to_string()))?;
    let items = document.array_at(&nodes_path)?;

    if items.len() > config.max_nodes {
        return Err(SchainError::TooManyNodes {
            count: items.len(),
            limit: config.max_nodes,
        });
    }

    let nodes = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_node(index, item))
        .collect::<SchainResult<Vec<_>>>()?;

    let protected = nodes.iter().flat_map(|node| node.protected_params.iter());
    let replaced = nodes
        .iter()
        .flat_map(|node| node.declared_replacements.iter().map(|r| &r.key));
    for raw in protected.chain(replaced) {
        if let Ok(path) = raw.parse() {
            registry.register(path);
        }
    }

    Ok(nodes)
}

fn parse_node(index: usize, item: &Value) -> SchainResult<SupplyChainNode> {
    let Value::Object(fields) = item else {
        return Err(SchainError::malformed(format!(
            "schain node {index} is not an object"
        )));
    };
    let field = |name: &str| fields.get(name).map(render_raw);

    let node = SupplyChainNode {
        asi: field("asi").unwrap_or_default(),
        sid: field("sid").unwrap_or_default(),
        protected_params: field("params")
            .map(|params| split_params(index, &params))
            .unwrap_or_default(),
        declared_replacements: field("replace")
            .map(|replace| decode_replacements(index, &replace))
            .transpose()?
            .unwrap_or_default(),
    };

    tracing::debug!(
        node = index,
        asi = %node.asi,
        sid = %node.sid,
        protected = node.protected_params.len(),
        replaced = node.declared_replacements.len(),
        "parsed schain node"
    );

    Ok(node)
}

fn split_params(index: usize, params: &str) -> Vec<String> {
    params
        .split('&')
        .filter(|path| {
            if path.is_empty() {
                tracing::debug!(node = index, "dropping empty protected path");
            }
            !path.is_empty()
        })
        .map(str::to_string)
        .collect()
}

/// Decode a node's `replace` string into ordered replacements
///
/// Tokens are `key=value` pairs joined by `&`, encoded as
/// `application/x-www-form-urlencoded`. Only the first value of a repeated
/// key is kept.
///
/// # Errors
/// Returns `MalformedReplacement` for a token with a bad percent escape, a
/// `;` separator, or escapes that decode to invalid UTF-8
pub fn decode_replacements(
    index: usize,
    replace: &str,
) -> SchainResult<Vec<DeclaredReplacement>> {
    let mut replacements: Vec<DeclaredReplacement> = Vec::new();

    for token in replace.split('&').filter(|token| !token.is_empty()) {
        let (key, value) = decode_token(token)
            .map_err(|reason| SchainError::malformed_replacement(index, token, reason))?;

        if replacements.iter().any(|existing| existing.key == key) {
            tracing::warn!(
                node = index,
                key = %key,
                "repeated replacement key, keeping first value"
            );
            continue;
        }
        replacements.push(DeclaredReplacement { key, value });
    }

    Ok(replacements)
}

/// Split on the first `=` and decode both sides; no `=` means an empty value
fn decode_token(token: &str) -> Result<(String, String), &'static str> {
    validate_token(token)?;
    let (key, value) = token.split_once('=').unwrap_or((token, ""));
    Ok((decode_component(key)?, decode_component(value)?))
}

fn decode_component(raw: &str) -> Result<String, &'static str> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| "invalid UTF-8")
}

fn validate_token(token: &str) -> Result<(), &'static str> {
    if token.contains(';') {
        return Err("semicolon separator");
    }

    let bytes = token.as_bytes();
    for (at, _) in token.match_indices('%') {
        let escape = bytes.get(at + 1..at + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err("invalid percent escape");
        }
    }
    Ok(())
}
