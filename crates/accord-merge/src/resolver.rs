use std::cmp::Ordering;

use accord_types::{Document, DocumentDigest, Sibling, SiblingSet};
use tracing::debug;

use crate::fold::merge_into;
use crate::strategy::{MergeStrategy, TieBreak};

/// Collapses a [`SiblingSet`] into one document.
///
/// Siblings are sorted oldest first, the oldest document seeds the result,
/// and every newer sibling is folded in with [`merge_into`]. Resolution never
/// fails: conflicting shapes fall back to the newer value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolver {
    strategy: MergeStrategy,
    tie_break: TieBreak,
}

impl Resolver {
    pub fn new(strategy: MergeStrategy) -> Self {
        Self {
            strategy,
            tie_break: TieBreak::default(),
        }
    }

    /// Per-field last-writer-wins with deep mapping merge.
    pub fn scalar_wins() -> Self {
        Self::new(MergeStrategy::ScalarWins)
    }

    /// Like [`scalar_wins`](Self::scalar_wins), but sequences are unioned.
    pub fn set_union() -> Self {
        Self::new(MergeStrategy::SetUnion)
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Resolve siblings ordered by their timestamps' natural order.
    pub fn resolve<T: Ord>(&self, siblings: SiblingSet<T>) -> Document {
        self.resolve_by(siblings, T::cmp)
    }

    /// Resolve siblings ordered by `compare`, which must be a total order
    /// over timestamps with older writes sorting first.
    pub fn resolve_by<T, F>(&self, siblings: SiblingSet<T>, mut compare: F) -> Document
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let count = siblings.len();
        debug!(
            siblings = count,
            strategy = %self.strategy,
            tie_break = %self.tie_break,
            "resolving siblings"
        );

        let tie_break = self.tie_break;
        let (oldest, newer) = siblings.into_sorted_by(|a: &Sibling<T>, b: &Sibling<T>| {
            compare(&a.timestamp, &b.timestamp).then_with(|| match tie_break {
                TieBreak::Arrival => Ordering::Equal,
                TieBreak::ContentDigest => {
                    let (left, right) = (DocumentDigest::of(&a.document), DocumentDigest::of(&b.document));
                    debug!(
                        left = %left.short_hex(),
                        right = %right.short_hex(),
                        "equal timestamps, ordering by content digest"
                    );
                    left.cmp(&right)
                }
            })
        });

        let mut resolution = oldest.document;
        for sibling in newer {
            merge_into(&mut resolution, sibling.document, self.strategy);
        }

        debug!(siblings = count, shape = resolution.shape(), "siblings resolved");
        resolution
    }
}

/// Resolve `siblings` with `strategy`, ordering by timestamp.
pub fn resolve<T: Ord>(siblings: SiblingSet<T>, strategy: MergeStrategy) -> Document {
    Resolver::new(strategy).resolve(siblings)
}

/// Resolve `siblings` with `strategy`, ordering timestamps with `compare`.
pub fn resolve_by<T, F>(siblings: SiblingSet<T>, strategy: MergeStrategy, compare: F) -> Document
where
    F: FnMut(&T, &T) -> Ordering,
{
    Resolver::new(strategy).resolve_by(siblings, compare)
}
