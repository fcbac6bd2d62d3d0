use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::TypeError;
use crate::stamp::WriteStamp;

/// One concurrently written version of a record, as returned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sibling<T = WriteStamp> {
    pub document: Document,
    pub timestamp: T,
}

impl<T> Sibling<T> {
    pub fn new(document: impl Into<Document>, timestamp: T) -> Self {
        Self {
            document: document.into(),
            timestamp,
        }
    }
}

/// All currently visible versions of one record.
///
/// Never empty: the first sibling is held apart from the rest, so a
/// `SiblingSet` without a sibling cannot be built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingSet<T = WriteStamp> {
    first: Sibling<T>,
    rest: Vec<Sibling<T>>,
}

impl<T> SiblingSet<T> {
    /// Build a set from the siblings in store return order.
    pub fn new(siblings: Vec<Sibling<T>>) -> Result<Self, TypeError> {
        let mut iter = siblings.into_iter();
        let first = iter.next().ok_or(TypeError::EmptySiblingSet)?;
        Ok(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// A set holding a single, already resolved sibling.
    pub fn single(sibling: Sibling<T>) -> Self {
        Self {
            first: sibling,
            rest: Vec::new(),
        }
    }

    /// Append another sibling in arrival order.
    pub fn push(&mut self, sibling: Sibling<T>) {
        self.rest.push(sibling);
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` if no resolution is needed.
    pub fn is_resolved(&self) -> bool {
        self.rest.is_empty()
    }

    /// Siblings in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Sibling<T>> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Consume the set, returning siblings in arrival order.
    pub fn into_vec(self) -> Vec<Sibling<T>> {
        let mut all = Vec::with_capacity(self.len());
        all.push(self.first);
        all.extend(self.rest);
        all
    }

    /// Consume the set, splitting it into its first sibling and the rest
    /// after a stable sort by `compare`.
    pub fn into_sorted_by<F>(self, mut compare: F) -> (Sibling<T>, Vec<Sibling<T>>)
    where
        F: FnMut(&Sibling<T>, &Sibling<T>) -> std::cmp::Ordering,
    {
        let mut all = self.into_vec();
        all.sort_by(|a, b| compare(a, b));
        let mut iter = all.into_iter();
        match iter.next() {
            Some(first) => (first, iter.collect()),
            None => unreachable!("sibling set holds at least one sibling"),
        }
    }
}

impl<T> From<Sibling<T>> for SiblingSet<T> {
    fn from(sibling: Sibling<T>) -> Self {
        Self::single(sibling)
    }
}

impl<T> TryFrom<Vec<Sibling<T>>> for SiblingSet<T> {
    type Error = TypeError;

    fn try_from(siblings: Vec<Sibling<T>>) -> Result<Self, Self::Error> {
        Self::new(siblings)
    }
}

impl<T> IntoIterator for SiblingSet<T> {
    type Item = Sibling<T>;
    type IntoIter = std::vec::IntoIter<Sibling<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<T: Serialize> Serialize for SiblingSet<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SiblingSet<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let siblings = Vec::<Sibling<T>>::deserialize(deserializer)?;
        Self::new(siblings).map_err(serde::de::Error::custom)
    }
}
