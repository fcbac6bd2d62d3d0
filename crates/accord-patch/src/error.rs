use crate::pointer::Pointer;

/// Errors raised while parsing, guarding, or applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// An operation is missing a required member or has an invalid one.
    #[error("malformed patch operation at index {index}: {reason}")]
    MalformedPatch { index: usize, reason: String },

    /// An `add` targets a location that already holds a value; `replace`
    /// states that intent explicitly.
    #[error("cannot add a key that already exists: {path}")]
    UnsafeAdd { path: Pointer },

    /// The target, or its parent, does not exist.
    #[error("path not found: {0}")]
    PathNotFound(Pointer),

    /// A sequence index is not a valid array index or is out of bounds.
    #[error("invalid sequence index at {0}")]
    InvalidIndex(Pointer),

    /// The parent of the target is a scalar, or the root cannot be removed.
    #[error("invalid target: {0}")]
    InvalidTarget(Pointer),

    /// A `move` would place a value inside itself.
    #[error("cannot move {from} into its own child {path}")]
    MoveIntoSelf { from: Pointer, path: Pointer },

    /// A `test` operation found a different value.
    #[error("test failed at {0}")]
    TestFailed(Pointer),
}

impl PatchError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPatch {
            index,
            reason: reason.into(),
        }
    }
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
