use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Key-ordered mapping of field names to nested documents.
pub type Mapping = BTreeMap<String, Document>;

/// A JSON-like document stored under a single key.
///
/// Every document is exactly one of three shapes. Code that walks a document
/// matches on all three, so there is no fourth shape that could slip through
/// unhandled. Mapping keys are kept sorted, which makes structural equality,
/// hashing and [`DocumentDigest`](crate::DocumentDigest) independent of the
/// order in which fields were written.
///
/// Serializes to and from plain JSON.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Document {
    /// String keys to nested documents.
    Mapping(Mapping),
    /// An ordered list of documents.
    Sequence(Vec<Document>),
    /// A leaf value.
    Scalar(Scalar),
}

/// A leaf value inside a [`Document`].
///
/// Numbers compare by value, so `1` and `1.0` are equal and hash alike,
/// while each keeps its own textual form when serialized.
#[derive(Clone, Debug)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => NumberKey::of(a) == NumberKey::of(b),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Number(n) => NumberKey::of(n).hash(state),
            Self::String(s) => s.hash(state),
        }
    }
}

/// Canonical form of a JSON number.
///
/// Integral values, whether written as integers or floats, map to `Integer`
/// exactly; everything else keeps its `f64` bit pattern.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) enum NumberKey {
    Integer(i128),
    Fraction(u64),
    Text(String),
}

impl NumberKey {
    // Every integral f64 below this magnitude converts to i128 exactly.
    const EXACT_LIMIT: f64 = 1.0e38;

    pub(crate) fn of(n: &Number) -> Self {
        if let Some(i) = n.as_i64() {
            return Self::Integer(i.into());
        }
        if let Some(u) = n.as_u64() {
            return Self::Integer(u.into());
        }
        match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < Self::EXACT_LIMIT => Self::Integer(f as i128),
            Some(f) => Self::Fraction(f.to_bits()),
            None => Self::Text(n.to_string()),
        }
    }
}

impl Document {
    /// An empty mapping, the shape of a freshly created record.
    pub fn empty() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// The `null` scalar.
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Short name of this document's shape, for diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Scalar(_) => "scalar",
        }
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns `true` for an empty mapping or an empty sequence.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mapping(map) => map.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Document>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Look up a field of a mapping. Returns `None` for other shapes.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Convert into a `serde_json::Value`.
    pub fn into_value(self) -> Value {
        self.into()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        match document {
            Document::Scalar(scalar) => scalar.into(),
            Document::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Document::Mapping(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

impl From<Scalar> for Document {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Mapping> for Document {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Document {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }
}

impl FromIterator<(String, Document)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().collect())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({self})")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: Value = self.clone().into();
        write!(f, "{value}")
    }
}
