//! JSON Pointer (RFC 6901) parsing, formatting, and lookup.

use std::fmt;

use accord_types::Document;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Why a pointer string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("invalid escape sequence in pointer: {0:?}")]
    InvalidEscape(String),
}

/// A parsed JSON Pointer: the unescaped reference tokens from the root.
///
/// The empty pointer `""` addresses the whole document.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    segments: Vec<String>,
}

impl Pointer {
    /// The pointer to the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a pointer, unescaping `~1` to `/` and `~0` to `~`.
    pub fn parse(text: &str) -> Result<Self, PointerError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = text.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash(text.to_string()));
        };
        let segments = rest
            .split('/')
            .map(unescape)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| PointerError::InvalidEscape(text.to_string()))?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the parent's segments and the final token.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }

    /// Returns `true` if `self` is `other` or lies beneath it.
    pub fn starts_with(&self, other: &Pointer) -> bool {
        self.segments.starts_with(&other.segments)
    }

    /// Extend the pointer by one token.
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Look up the value this pointer addresses.
    pub fn resolve<'a>(&self, document: &'a Document) -> Option<&'a Document> {
        resolve_segments(document, &self.segments)
    }

    pub fn resolve_mut<'a>(&self, document: &'a mut Document) -> Option<&'a mut Document> {
        resolve_segments_mut(document, &self.segments)
    }
}

/// Walk `segments` from `document`, stopping at the first failed lookup.
pub fn resolve_segments<'a>(document: &'a Document, segments: &[String]) -> Option<&'a Document> {
    segments
        .iter()
        .try_fold(document, |node, segment| child(node, segment))
}

pub fn resolve_segments_mut<'a>(
    document: &'a mut Document,
    segments: &[String],
) -> Option<&'a mut Document> {
    segments
        .iter()
        .try_fold(document, |node, segment| child_mut(node, segment))
}

/// One step of a pointer walk: a mapping key, or a sequence index.
///
/// `-` (one past the end) and malformed indices never resolve, and neither
/// does any step into a scalar.
pub fn child<'a>(node: &'a Document, segment: &str) -> Option<&'a Document> {
    match node {
        Document::Mapping(map) => map.get(segment),
        Document::Sequence(items) => parse_index(segment).and_then(|i| items.get(i)),
        Document::Scalar(_) => None,
    }
}

pub fn child_mut<'a>(node: &'a mut Document, segment: &str) -> Option<&'a mut Document> {
    match node {
        Document::Mapping(map) => map.get_mut(segment),
        Document::Sequence(items) => parse_index(segment).and_then(|i| items.get_mut(i)),
        Document::Scalar(_) => None,
    }
}

/// Parse an array index token: `0`, or digits without a leading zero.
pub fn parse_index(segment: &str) -> Option<usize> {
    let valid = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if valid {
        segment.parse().ok()
    } else {
        None
    }
}

fn unescape(segment: &str) -> Option<String> {
    if !segment.contains('~') {
        return Some(segment.to_string());
    }
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return None,
        }
    }
    Some(out)
}

fn escape(segment: &str) -> String {
    if !segment.contains('/') && !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace('~', "~0").replace('/', "~1")
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape(segment))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer({:?})", self.to_string())
    }
}

impl std::str::FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Pointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
