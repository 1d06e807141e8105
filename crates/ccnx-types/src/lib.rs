//! Foundation types for the CCNx content store.
//!
//! Every lookup key the store indexes by is defined here as a plain,
//! immutable value type with a total order:
//!
//! - [`Name`] -- hierarchical name, ordered segment by segment
//! - [`HashValue`] -- 32-byte content object hash, ordered by raw bytes
//! - [`KeyId`] -- publisher key identifier, ordered by raw bytes

pub mod error;
pub mod hash;
pub mod keyid;
pub mod name;

pub use error::TypeError;
pub use hash::HashValue;
pub use keyid::KeyId;
pub use name::{Name, NameSegment, SegmentType};
