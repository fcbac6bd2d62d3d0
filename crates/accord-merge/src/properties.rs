//! Property tests for the resolution laws.

use std::collections::{BTreeMap, HashSet};

use accord_types::{Document, Mapping, Sibling, SiblingSet, WriteStamp};
use proptest::prelude::*;

use crate::{resolve, MergeStrategy};

fn arb_strategy() -> impl Strategy<Value = MergeStrategy> {
    prop_oneof![Just(MergeStrategy::ScalarWins), Just(MergeStrategy::SetUnion)]
}

fn arb_scalar() -> impl Strategy<Value = Document> {
    prop_oneof![
        Just(Document::null()),
        any::<bool>().prop_map(Document::from),
        any::<i64>().prop_map(Document::from),
        "[a-z]{0,6}".prop_map(|s: String| Document::from(s)),
    ]
}

fn arb_document() -> impl Strategy<Value = Document> {
    arb_scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Document::Sequence),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4).prop_map(Document::Mapping),
        ]
    })
}

fn arb_mapping(prefix: &'static str) -> impl Strategy<Value = Mapping> {
    prop::collection::btree_map("[a-z]{1,3}", arb_document(), 0..5).prop_map(move |map| {
        map.into_iter()
            .map(|(key, value)| (format!("{prefix}{key}"), value))
            .collect()
    })
}

fn at(ms: u64, document: Document) -> Sibling {
    Sibling::new(document, WriteStamp::from_millis(ms))
}

fn element_set(doc: &Document, field: &str) -> HashSet<Document> {
    doc.get(field)
        .and_then(Document::as_sequence)
        .map(|items| items.iter().cloned().collect())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn singleton_resolves_to_itself(doc in arb_document(), strategy in arb_strategy()) {
        let set = SiblingSet::single(at(1, doc.clone()));
        prop_assert_eq!(resolve(set, strategy), doc);
    }

    #[test]
    fn disjoint_keys_are_all_kept(
        older in arb_mapping("old_"),
        newer in arb_mapping("new_"),
        strategy in arb_strategy(),
        newer_arrives_first in any::<bool>(),
    ) {
        let mut expected = older.clone();
        expected.extend(newer.clone());

        let mut siblings = vec![at(1, Document::Mapping(older)), at(2, Document::Mapping(newer))];
        if newer_arrives_first {
            siblings.reverse();
        }
        let set = SiblingSet::new(siblings).unwrap();
        prop_assert_eq!(resolve(set, strategy), Document::Mapping(expected));
    }

    #[test]
    fn newest_scalar_wins(
        old_value in arb_scalar(),
        new_value in arb_scalar(),
        strategy in arb_strategy(),
        newer_arrives_first in any::<bool>(),
    ) {
        let older: Document = [("k".to_string(), old_value)].into_iter().collect();
        let newer: Document = [("k".to_string(), new_value.clone())].into_iter().collect();
        let mut siblings = vec![at(10, older), at(20, newer)];
        if newer_arrives_first {
            siblings.reverse();
        }
        let doc = resolve(SiblingSet::new(siblings).unwrap(), strategy);
        prop_assert_eq!(doc.get("k"), Some(&new_value));
    }

    #[test]
    fn set_union_contains_every_element(
        lists in prop::collection::vec(prop::collection::vec(any::<i8>(), 0..6), 1..5),
    ) {
        let docs: Vec<Document> = lists
            .iter()
            .map(|items| {
                let seq = Document::Sequence(items.iter().map(|n| Document::from(i64::from(*n))).collect());
                [("i".to_string(), seq)].into_iter().collect()
            })
            .collect();
        let expected: HashSet<Document> = lists
            .iter()
            .flatten()
            .map(|n| Document::from(i64::from(*n)))
            .collect();

        let forward = docs.iter().cloned().enumerate().map(|(i, d)| at(i as u64, d)).collect();
        let backward = docs.iter().cloned().rev().enumerate().map(|(i, d)| at(i as u64, d)).collect();

        let forward = resolve(SiblingSet::new(forward).unwrap(), MergeStrategy::SetUnion);
        let backward = resolve(SiblingSet::new(backward).unwrap(), MergeStrategy::SetUnion);
        prop_assert_eq!(element_set(&forward, "i"), expected.clone());
        prop_assert_eq!(element_set(&backward, "i"), expected);
    }

    #[test]
    fn nested_keys_survive_at_depth(
        left in prop::collection::btree_map("[a-m]{1,3}", any::<i32>(), 0..4),
        right in prop::collection::btree_map("[n-z]{1,3}", any::<i32>(), 0..4),
    ) {
        let wrap = |inner: &BTreeMap<String, i32>| -> Document {
            let leaf: Document = inner
                .iter()
                .map(|(k, v)| (k.clone(), Document::from(i64::from(*v))))
                .collect();
            let mid: Document = [("mid".to_string(), leaf)].into_iter().collect();
            [("top".to_string(), mid)].into_iter().collect()
        };
        let doc = resolve(
            SiblingSet::new(vec![at(1, wrap(&left)), at(2, wrap(&right))]).unwrap(),
            MergeStrategy::ScalarWins,
        );
        let leaf = doc.get("top").and_then(|d| d.get("mid")).and_then(Document::as_mapping);
        let keys = leaf.map(|m| m.len()).unwrap_or_default();
        prop_assert_eq!(keys, left.len() + right.len());
    }
}
