//! JSON Patch guard and apply for Accord.
//!
//! Patches go through two sequential steps:
//!
//! 1. [`validate`]: reject any `add` whose path already resolves to a value,
//!    since that would silently overwrite data a `replace` should have
//!    targeted. Pure; usable as a dry run.
//! 2. [`apply`]: standard RFC 6902 application, all or nothing.
//!
//! [`apply_guarded`] runs both.
//!
//! # Key Types
//!
//! - [`Patch`] / [`PatchOperation`] — parsed operations; malformed input is rejected up front
//! - [`Pointer`] — RFC 6901 JSON Pointer
//! - [`PatchError`] — `MalformedPatch`, `UnsafeAdd`, and apply failures

pub mod apply;
pub mod error;
pub mod guard;
pub mod operation;
pub mod pointer;

pub use apply::{apply, apply_guarded, apply_operation};
pub use error::{PatchError, PatchResult};
pub use guard::{validate, validate_json};
pub use operation::{Patch, PatchOperation};
pub use pointer::{Pointer, PointerError};
