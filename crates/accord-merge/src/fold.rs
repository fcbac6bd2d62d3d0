//! The per-field merge applied while folding siblings oldest to newest.

use std::collections::btree_map::Entry;
use std::collections::HashSet;

use accord_types::{Document, Mapping};
use tracing::{trace, warn};

use crate::strategy::MergeStrategy;

/// Merge `incoming`, which is newer, into `accumulator`.
///
/// - two mappings merge key by key, recursively
/// - two sequences become their union under [`MergeStrategy::SetUnion`]
/// - anything else is replaced by `incoming`
///
/// Keys missing from `incoming` are left alone; absence is never a delete.
pub fn merge_into(accumulator: &mut Document, incoming: Document, strategy: MergeStrategy) {
    match (accumulator, incoming) {
        (Document::Mapping(acc), Document::Mapping(inc)) => merge_mappings(acc, inc, strategy),
        (Document::Sequence(acc), Document::Sequence(inc))
            if strategy == MergeStrategy::SetUnion =>
        {
            union_into(acc, inc)
        }
        (slot, incoming) => *slot = incoming,
    }
}

fn merge_mappings(accumulator: &mut Mapping, incoming: Mapping, strategy: MergeStrategy) {
    for (key, value) in incoming {
        match accumulator.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                if !merges_structurally(slot.get(), &value, strategy) {
                    trace!(field = %slot.key(), "newer sibling value wins");
                }
                merge_into(slot.get_mut(), value, strategy);
            }
        }
    }
}

fn merges_structurally(existing: &Document, incoming: &Document, strategy: MergeStrategy) -> bool {
    match (existing, incoming) {
        (Document::Mapping(_), Document::Mapping(_)) => true,
        (Document::Sequence(_), Document::Sequence(_)) => strategy == MergeStrategy::SetUnion,
        _ => false,
    }
}

/// Replace `accumulator` with the union of both sequences.
///
/// Accumulator elements come first, then incoming elements not seen yet.
/// Duplicates within either side collapse as well, including numerically
/// equal numbers such as `1` and `1.0`.
fn union_into(accumulator: &mut Vec<Document>, incoming: Vec<Document>) {
    if accumulator
        .iter()
        .chain(incoming.iter())
        .any(|item| !item.is_scalar())
    {
        warn!("set-union merge over composite elements; deduplicating by structural equality");
    }

    let mut seen = HashSet::with_capacity(accumulator.len() + incoming.len());
    let mut merged = Vec::with_capacity(accumulator.len() + incoming.len());
    for item in accumulator.drain(..).chain(incoming) {
        if seen.insert(item.clone()) {
            merged.push(item);
        }
    }
    *accumulator = merged;
}
