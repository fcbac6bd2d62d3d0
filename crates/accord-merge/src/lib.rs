//! Sibling resolution engine for Accord.
//!
//! Collapses the concurrently written versions of a record into a single
//! document. Siblings are folded oldest to newest; mappings merge key by key
//! at every depth, and only genuine field-level conflicts are settled by
//! timestamp (the newer value wins). Two strategies differ in how sequences
//! are treated:
//!
//! - [`MergeStrategy::ScalarWins`] — the newer sequence replaces the older one
//! - [`MergeStrategy::SetUnion`] — sequences are unioned and deduplicated
//!
//! A key missing from a newer sibling is not treated as a delete: values
//! contributed by older siblings survive. There is no tombstone convention.
//!
//! # Key Types
//!
//! - [`Resolver`] — strategy plus tie-break, the entry point
//! - [`ResolutionConfig`] — per-record-type resolver settings loaded from TOML

pub mod config;
pub mod error;
pub mod fold;
pub mod resolver;
pub mod strategy;

#[cfg(test)]
mod properties;

pub use config::{ResolutionConfig, ResolverConfig};
pub use error::{MergeError, MergeResult};
pub use fold::merge_into;
pub use resolver::{resolve, resolve_by, Resolver};
pub use strategy::{MergeStrategy, TieBreak};
