//! Foundation types for Accord.
//!
//! Accord reconciles the divergent versions ("siblings") that a leaderless
//! key-value store keeps for a record after concurrent writes, and guards
//! JSON patches against silently overwriting data. Every other Accord crate
//! depends on `accord-types`.
//!
//! # Key Types
//!
//! - [`Document`] — JSON-like value: mapping, sequence, or scalar
//! - [`Sibling`] / [`SiblingSet`] — timestamped versions of one record (never empty)
//! - [`WriteStamp`] — totally ordered write timestamp
//! - [`DocumentDigest`] — structural BLAKE3 digest, used as a tie-break key

pub mod digest;
pub mod document;
pub mod error;
pub mod sibling;
pub mod stamp;

pub use digest::DocumentDigest;
pub use document::{Document, Mapping, Scalar};
pub use error::TypeError;
pub use sibling::{Sibling, SiblingSet};
pub use stamp::WriteStamp;
