//! Bid request document access
//!
//! Uses serde_json to parse the request once, then answers single-path and
//! batched lookups against the parsed tree.

use crate::error::{SchainError, SchainResult};
use crate::path::{FieldPath, Segment};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parsed bid request
#[derive(Debug, Clone, PartialEq)]
pub struct BidRequestDocument {
    root: Value,
}

impl BidRequestDocument {
    /// Parse raw request bytes
    ///
    /// # Errors
    /// Returns `MalformedInput` if the bytes are not JSON or the top level is
    /// not an object
    pub fn from_slice(bytes: &[u8]) -> SchainResult<Self> {
        let root: Value = serde_json::from_slice(bytes)
            .map_err(|e| SchainError::malformed(format!("JSON parse error: {e}")))?;

        if !root.is_object() {
            return Err(SchainError::malformed("top-level value is not an object"));
        }

        Ok(Self { root })
    }

    /// Root JSON value
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Get value at path
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.root, |current, segment| step(current, segment))
    }

    /// Get the array at path
    ///
    /// # Errors
    /// Returns `PathNotFound` if the path is absent, `MalformedInput` if the
    /// value there is not an array
    pub fn array_at(&self, path: &FieldPath) -> SchainResult<&[Value]> {
        match self.get(path) {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(SchainError::malformed(format!("'{path}' is not an array"))),
            None => Err(SchainError::PathNotFound(path.to_string())),
        }
    }

    /// Fetch many paths in a single traversal
    ///
    /// All paths are merged into a segment trie and the document is walked
    /// once along it, so shared prefixes are visited only once. The result is
    /// aligned with `paths`.
    #[must_use]
    pub fn fetch_batch(&self, paths: &[&FieldPath]) -> Vec<Option<&Value>> {
        let mut trie = PathTrie::default();
        for (slot, path) in paths.iter().enumerate() {
            trie.insert(path.segments(), slot);
        }

        let mut found = vec![None; paths.len()];
        trie.walk(&self.root, &mut found);
        found
    }
}

fn step<'v>(current: &'v Value, segment: &Segment) -> Option<&'v Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

/// Render a JSON value the way it is signed
///
/// Strings yield their contents; everything else yields compact JSON text.
#[must_use]
pub fn render_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Default)]
struct PathTrie {
    slots: Vec<usize>,
    children: BTreeMap<Segment, PathTrie>,
}

impl PathTrie {
    fn insert(&mut self, segments: &[Segment], slot: usize) {
        let node = segments.iter().fold(self, |node, segment| {
            node.children.entry(segment.clone()).or_default()
        });
        node.slots.push(slot);
    }

    fn walk<'v>(&self, value: &'v Value, found: &mut [Option<&'v Value>]) {
        for &slot in &self.slots {
            found[slot] = Some(value);
        }
        for (segment, child) in &self.children {
            if let Some(next) = step(value, segment) {
                child.walk(next, found);
            }
        }
    }
}
