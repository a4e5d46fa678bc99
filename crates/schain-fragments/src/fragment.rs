//! Signature fragment assembly
//!
//! Each node yields one fragment:
//!
//! ```text
//! &schain.[i].asi=<asi>&schain.[i].sid=<sid>&<protected>=<value>...&<replaced>=<value>...
//! ```
//!
//! Keys are emitted verbatim. Values are query-escaped: alphanumerics and
//! `-_.~` pass through, space becomes `+`, every other byte is `%XX`.

use crate::config::MissingFieldPolicy;
use crate::error::{SchainError, SchainResult};
use crate::resolver::OverrideResolver;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in a fragment value
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One `key=value` token of a fragment, before escaping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPair {
    /// Emitted verbatim
    pub key: String,
    /// Escaped on rendering
    pub value: String,
}

impl SignedPair {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Builds per-node fragments from a resolver
#[derive(Debug, Clone, Copy)]
pub struct FragmentAssembler<'a> {
    resolver: OverrideResolver<'a>,
    policy: MissingFieldPolicy,
}

impl<'a> FragmentAssembler<'a> {
    /// Create assembler
    #[inline]
    #[must_use]
    pub fn new(resolver: OverrideResolver<'a>, policy: MissingFieldPolicy) -> Self {
        Self { resolver, policy }
    }

    /// One fragment per node, in chain order
    ///
    /// # Errors
    /// Returns `FieldNotFound` if a field cannot be resolved and the policy is
    /// [`MissingFieldPolicy::Reject`]
    pub fn assemble(&self) -> SchainResult<Vec<String>> {
        (0..self.resolver.nodes().len())
            .map(|index| self.node_pairs(index).map(|pairs| render_fragment(&pairs)))
            .collect()
    }

    /// Unescaped pairs of node `index`: identity, protected fields, then
    /// declared replacements
    ///
    /// # Errors
    /// Same as [`assemble`](Self::assemble)
    pub fn node_pairs(&self, index: usize) -> SchainResult<Vec<SignedPair>> {
        let Some(node) = self.resolver.nodes().get(index) else {
            return Ok(Vec::new());
        };

        let keys = node
            .protected_params
            .iter()
            .chain(node.declared_replacements.iter().map(|r| &r.key));

        let mut pairs = Vec::with_capacity(
            2 + node.protected_params.len() + node.declared_replacements.len(),
        );
        pairs.push(SignedPair::new(format!("schain.[{index}].asi"), node.asi.as_str()));
        pairs.push(SignedPair::new(format!("schain.[{index}].sid"), node.sid.as_str()));

        for key in keys {
            let value = self.resolve_value(index, key)?;
            pairs.push(SignedPair::new(key.as_str(), value));
        }

        Ok(pairs)
    }

    fn resolve_value(&self, index: usize, key: &str) -> SchainResult<&'a str> {
        let resolution = self.resolver.resolve(index, key);
        if let Some(value) = resolution.value() {
            return Ok(value);
        }

        match self.policy {
            MissingFieldPolicy::Empty => {
                tracing::debug!(
                    node = index,
                    path = %key,
                    "field not found, emitting empty value"
                );
                Ok("")
            }
            MissingFieldPolicy::Reject => Err(SchainError::FieldNotFound {
                node: index,
                path: key.to_string(),
            }),
        }
    }
}

/// Join pairs into a fragment, escaping values
#[must_use]
pub fn render_fragment(pairs: &[SignedPair]) -> String {
    pairs.iter().fold(String::new(), |mut fragment, pair| {
        fragment.push('&');
        fragment.push_str(&pair.key);
        fragment.push('=');
        push_escaped(&mut fragment, &pair.value);
        fragment
    })
}

fn push_escaped(fragment: &mut String, value: &str) {
    for (at, part) in value.split(' ').enumerate() {
        if at > 0 {
            fragment.push('+');
        }
        fragment.extend(utf8_percent_encode(part, QUERY_VALUE));
    }
}
