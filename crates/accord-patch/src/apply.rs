//! Standard RFC 6902 patch application.

use accord_types::Document;
use tracing::debug;

use crate::error::{PatchError, PatchResult};
use crate::guard::validate;
use crate::operation::{Patch, PatchOperation};
use crate::pointer::{parse_index, resolve_segments_mut, Pointer};

/// Apply `patch` to `document`.
///
/// All or nothing: operations run against a working copy, and `document` is
/// only replaced once every operation has succeeded.
pub fn apply(patch: &Patch, document: &mut Document) -> PatchResult<()> {
    let mut working = document.clone();
    for operation in patch {
        apply_operation(&mut working, operation)?;
    }
    *document = working;
    debug!(operations = patch.len(), "patch applied");
    Ok(())
}

/// Run the add guard, then apply.
pub fn apply_guarded(patch: &Patch, document: &mut Document) -> PatchResult<()> {
    validate(patch, document)?;
    apply(patch, document)
}

/// Apply a single operation in place.
pub fn apply_operation(document: &mut Document, operation: &PatchOperation) -> PatchResult<()> {
    match operation {
        PatchOperation::Add { path, value } => add(document, path, value.clone()),
        PatchOperation::Remove { path } => remove(document, path).map(drop),
        PatchOperation::Replace { path, value } => replace(document, path, value.clone()),
        PatchOperation::Move { from, path } => {
            if from == path {
                return from
                    .resolve(document)
                    .map(drop)
                    .ok_or_else(|| PatchError::PathNotFound(from.clone()));
            }
            if path.starts_with(from) {
                return Err(PatchError::MoveIntoSelf {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(document, from)?;
            add(document, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = from
                .resolve(document)
                .cloned()
                .ok_or_else(|| PatchError::PathNotFound(from.clone()))?;
            add(document, path, value)
        }
        PatchOperation::Test { path, value } => {
            let actual = path
                .resolve(document)
                .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
            if actual == value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

fn parent_mut<'a>(document: &'a mut Document, path: &Pointer) -> PatchResult<(&'a mut Document, String)> {
    let Some((parent, last)) = path.split_last() else {
        return Err(PatchError::InvalidTarget(path.clone()));
    };
    let last = last.to_string();
    let node = resolve_segments_mut(document, parent).ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
    Ok((node, last))
}

fn add(document: &mut Document, path: &Pointer, value: Document) -> PatchResult<()> {
    if path.is_root() {
        *document = value;
        return Ok(());
    }
    let (parent, key) = parent_mut(document, path)?;
    match parent {
        Document::Mapping(map) => {
            map.insert(key, value);
            Ok(())
        }
        Document::Sequence(items) => {
            if key == "-" {
                items.push(value);
                return Ok(());
            }
            match parse_index(&key) {
                Some(index) if index <= items.len() => {
                    items.insert(index, value);
                    Ok(())
                }
                _ => Err(PatchError::InvalidIndex(path.clone())),
            }
        }
        Document::Scalar(_) => Err(PatchError::InvalidTarget(path.clone())),
    }
}

fn remove(document: &mut Document, path: &Pointer) -> PatchResult<Document> {
    let (parent, key) = parent_mut(document, path)?;
    match parent {
        Document::Mapping(map) => map
            .remove(&key)
            .ok_or_else(|| PatchError::PathNotFound(path.clone())),
        Document::Sequence(items) => match parse_index(&key) {
            Some(index) if index < items.len() => Ok(items.remove(index)),
            _ => Err(PatchError::InvalidIndex(path.clone())),
        },
        Document::Scalar(_) => Err(PatchError::InvalidTarget(path.clone())),
    }
}

fn replace(document: &mut Document, path: &Pointer, value: Document) -> PatchResult<()> {
    let target = path
        .resolve_mut(document)
        .ok_or_else(|| PatchError::PathNotFound(path.clone()))?;
    *target = value;
    Ok(())
}
