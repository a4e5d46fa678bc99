//! Field paths into a bid request
//!
//! Provides [`FieldPath`], a dot-separated path decomposed into the segments
//! used when walking the document.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object member name
    Key(String),
    /// Array element, written `[N]`
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        raw.strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(|digits| digits.parse().ok())
            .map_or_else(|| Self::Key(raw.to_string()), Self::Index)
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Dot-separated path to a field of the bid request
///
/// Keeps the path exactly as written so it can be emitted verbatim as a
/// fragment key.
///
/// # Examples
/// - `app.bundle` → `[Key("app"), Key("bundle")]`
/// - `imp.[0].id` → `[Key("imp"), Index(0), Key("id")]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Path as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Get number of segments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; empty paths are rejected on construction
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }

        Ok(Self {
            raw: s.to_string(),
            segments: s.split('.').map(Segment::parse).collect(),
        })
    }
}

/// Errors related to field paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path has no characters at all
    #[error("field path is empty")]
    Empty,
}
