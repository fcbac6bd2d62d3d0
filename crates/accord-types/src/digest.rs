use std::fmt;

use crate::document::{Document, NumberKey, Scalar};

const DOMAIN: &str = "accord-document-v1";

/// BLAKE3 digest of a document's structure.
///
/// Structurally equal documents always produce the same digest, whatever
/// order their fields were written in. Used to order siblings that carry
/// identical timestamps.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentDigest([u8; 32]);

impl DocumentDigest {
    /// Hash a document.
    pub fn of(document: &Document) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(DOMAIN.as_bytes());
        hasher.update(b":");
        feed(&mut hasher, document);
        Self(*hasher.finalize().as_bytes())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

// Every node is tagged and every variable-length part is length-prefixed,
// so distinct trees never share an encoding.
fn feed(hasher: &mut blake3::Hasher, document: &Document) {
    match document {
        Document::Mapping(map) => {
            hasher.update(b"m");
            hasher.update(&(map.len() as u64).to_le_bytes());
            for (key, value) in map {
                feed_str(hasher, key);
                feed(hasher, value);
            }
        }
        Document::Sequence(items) => {
            hasher.update(b"s");
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                feed(hasher, item);
            }
        }
        Document::Scalar(Scalar::Null) => {
            hasher.update(b"z");
        }
        Document::Scalar(Scalar::Bool(b)) => {
            hasher.update(if *b { b"t" } else { b"f" });
        }
        Document::Scalar(Scalar::Number(n)) => match NumberKey::of(n) {
            NumberKey::Integer(i) => {
                hasher.update(b"i");
                hasher.update(&i.to_le_bytes());
            }
            NumberKey::Fraction(bits) => {
                hasher.update(b"x");
                hasher.update(&bits.to_le_bytes());
            }
            NumberKey::Text(text) => {
                hasher.update(b"n");
                feed_str(hasher, &text);
            }
        },
        Document::Scalar(Scalar::String(s)) => {
            hasher.update(b"\"");
            feed_str(hasher, s);
        }
    }
}

fn feed_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl fmt::Debug for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentDigest({})", self.short_hex())
    }
}

impl fmt::Display for DocumentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn digest(value: serde_json::Value) -> DocumentDigest {
        DocumentDigest::of(&Document::from(value))
    }

    #[test]
    fn equal_documents_share_a_digest() {
        assert_eq!(digest(json!({"a": 1, "b": [true]})), digest(json!({"b": [true], "a": 1})));
    }

    #[test]
    fn different_documents_differ() {
        assert_ne!(digest(json!({"a": 1})), digest(json!({"a": 2})));
        assert_ne!(digest(json!({"a": "1"})), digest(json!({"a": 1})));
        assert_ne!(digest(json!(null)), digest(json!(false)));
    }

    #[test]
    fn nesting_is_not_ambiguous() {
        assert_ne!(digest(json!([["a"], "b"])), digest(json!([["a", "b"]])));
        assert_ne!(digest(json!({"ab": "c"})), digest(json!({"a": "bc"})));
    }

    #[test]
    fn numerically_equal_documents_share_a_digest() {
        assert_eq!(digest(json!({"n": [1, 2]})), digest(json!({"n": [1.0, 2]})));
        assert_ne!(digest(json!(1)), digest(json!(1.5)));
    }

    #[test]
    fn hex_forms() {
        let d = digest(json!({"k": "v"}));
        assert_eq!(d.short_hex().len(), 8);
        assert_eq!(d.to_string().len(), 64);
        assert!(d.to_hex().starts_with(&d.short_hex()));
        assert_eq!(format!("{d:?}"), format!("DocumentDigest({})", d.short_hex()));
    }
}
