//! Guard against `add` operations that would overwrite existing data.
//!
//! Under RFC 6902 an `add` whose target already exists replaces it. When a
//! client's view of a record is stale, that silently clobbers a value some
//! other writer put there. The guard requires clients to say `replace` when
//! they mean to overwrite; `add` is only accepted where nothing exists yet.

use accord_types::Document;
use serde_json::Value;
use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::operation::{Patch, PatchOperation};
use crate::pointer::child;

/// Check every `add` in `patch` against `document`.
///
/// An `add` is accepted as soon as one step of its path fails to resolve
/// (a missing key, an index past the end, `-`, or a step into a scalar).
/// If the whole path resolves, including the root pointer `""`, the patch is
/// rejected with [`PatchError::UnsafeAdd`]. Other operations are not
/// inspected. Validation stops at the first rejection and never mutates
/// `document`.
pub fn validate(patch: &Patch, document: &Document) -> PatchResult<()> {
    for operation in patch {
        let PatchOperation::Add { path, .. } = operation else {
            continue;
        };

        let mut node = document;
        let mut inserts_new_data = false;
        for segment in path.segments() {
            match child(node, segment) {
                Some(next) => node = next,
                None => {
                    inserts_new_data = true;
                    break;
                }
            }
        }

        if !inserts_new_data {
            debug!(path = %path, "rejecting add over an existing value");
            return Err(PatchError::UnsafeAdd { path: path.clone() });
        }
    }
    Ok(())
}

/// Parse a raw JSON patch and validate it in one step.
///
/// Malformed operations are reported before any `add` is checked.
pub fn validate_json(raw: &Value, document: &Document) -> PatchResult<Patch> {
    let patch = Patch::from_json(raw)?;
    validate(&patch, document)?;
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::Pointer;
    use serde_json::json;

    fn check(patch: Value, doc: Value) -> PatchResult<Patch> {
        validate_json(&patch, &Document::from(doc))
    }

    fn unsafe_add(path: &str) -> PatchError {
        PatchError::UnsafeAdd {
            path: Pointer::parse(path).unwrap(),
        }
    }

    #[test]
    fn rejects_add_over_existing_key() {
        let err = check(json!([{"op": "add", "path": "/a", "value": 1}]), json!({"a": 0})).unwrap_err();
        assert_eq!(err, unsafe_add("/a"));
        assert_eq!(err.to_string(), "cannot add a key that already exists: /a");
    }

    #[test]
    fn accepts_add_of_new_key() {
        assert!(check(json!([{"op": "add", "path": "/z", "value": 1}]), json!({"a": 0})).is_ok());
    }

    #[test]
    fn accepts_add_under_missing_parent() {
        assert!(check(json!([{"op": "add", "path": "/x/y/z", "value": 1}]), json!({"a": 0})).is_ok());
    }

    #[test]
    fn existing_null_counts_as_existing() {
        let err = check(json!([{"op": "add", "path": "/ee", "value": 1}]), json!({"ee": null})).unwrap_err();
        assert_eq!(err, unsafe_add("/ee"));
    }

    #[test]
    fn nested_paths_are_walked() {
        let doc = json!({"a": {"b": {"c": 1}}});
        assert_eq!(
            check(json!([{"op": "add", "path": "/a/b/c", "value": 2}]), doc.clone()).unwrap_err(),
            unsafe_add("/a/b/c")
        );
        assert!(check(json!([{"op": "add", "path": "/a/b/d", "value": 2}]), doc).is_ok());
    }

    #[test]
    fn escaped_segments_are_unescaped() {
        let doc = json!({"a/b": {"c~d": 1}});
        assert_eq!(
            check(json!([{"op": "add", "path": "/a~1b/c~0d", "value": 2}]), doc.clone()).unwrap_err(),
            unsafe_add("/a~1b/c~0d")
        );
        assert!(check(json!([{"op": "add", "path": "/a~1b/c~1d", "value": 2}]), doc).is_ok());
    }

    #[test]
    fn sequence_indices() {
        let doc = json!({"list": [1, 2]});
        assert_eq!(
            check(json!([{"op": "add", "path": "/list/1", "value": 9}]), doc.clone()).unwrap_err(),
            unsafe_add("/list/1")
        );
        assert!(check(json!([{"op": "add", "path": "/list/2", "value": 9}]), doc.clone()).is_ok());
        assert!(check(json!([{"op": "add", "path": "/list/-", "value": 9}]), doc).is_ok());
    }

    #[test]
    fn step_into_scalar_is_new_data() {
        assert!(check(json!([{"op": "add", "path": "/a/b", "value": 1}]), json!({"a": 5})).is_ok());
    }

    #[test]
    fn root_add_always_overwrites() {
        assert_eq!(
            check(json!([{"op": "add", "path": "", "value": {}}]), json!({})).unwrap_err(),
            unsafe_add("")
        );
    }

    #[test]
    fn other_operations_are_not_checked() {
        let doc = json!({"a": 0});
        let patch = json!([
            {"op": "replace", "path": "/a", "value": 1},
            {"op": "test", "path": "/a", "value": 0},
            {"op": "remove", "path": "/a"},
            {"op": "copy", "from": "/a", "path": "/b"}
        ]);
        assert!(check(patch, doc).is_ok());
    }

    #[test]
    fn first_offending_add_is_reported() {
        let doc = json!({"a": 0, "b": 0});
        let patch = json!([
            {"op": "add", "path": "/new", "value": 1},
            {"op": "add", "path": "/b", "value": 1},
            {"op": "add", "path": "/a", "value": 1}
        ]);
        assert_eq!(check(patch, doc).unwrap_err(), unsafe_add("/b"));
    }

    #[test]
    fn malformed_patch_is_distinct_from_rejection() {
        assert!(matches!(
            check(json!([{}]), json!({})).unwrap_err(),
            PatchError::MalformedPatch { index: 0, .. }
        ));
        assert!(matches!(
            check(json!([{"path": "/ee", "op": "add"}]), json!({"ee": "ee"})).unwrap_err(),
            PatchError::MalformedPatch { .. }
        ));
    }

    #[test]
    fn validation_does_not_mutate() {
        let doc = Document::from(json!({"a": 0}));
        let before = doc.clone();
        let patch = Patch::from_json(&json!([{"op": "add", "path": "/z", "value": 1}])).unwrap();
        validate(&patch, &doc).unwrap();
        assert_eq!(doc, before);
    }
}
