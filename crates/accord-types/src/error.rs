use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("a sibling set must contain at least one sibling")]
    EmptySiblingSet,
}
