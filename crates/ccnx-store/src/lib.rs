//! Multi-index LRU content store for a CCNx forwarder.
//!
//! The store caches content objects and answers interests from the cache.
//! Every resident object is reachable through up to three ordered indices:
//!
//! - by content hash (every object)
//! - by name (named objects)
//! - by name and publisher keyid (named objects with a verified signature)
//!
//! An interest is resolved through its strongest restriction and must then
//! satisfy all of its restrictions. When the store is full, admitting a new
//! object evicts the least recently used one.
//!
//! # Ownership
//!
//! [`StandardContentStore`] owns its entries in a slot arena. The indices and
//! the recency list hold [`EntryId`]s only, and every mutating call updates
//! all of them before returning.
//!
//! # Concurrency
//!
//! None. Every operation takes `&mut self` and runs to completion; queueing
//! and simulated delay belong to the caller.

pub mod config;
pub mod entry;
pub mod error;
pub mod index;
pub mod matcher;
pub mod message;
pub mod recency;
pub mod store;
pub mod traits;

pub use config::{ContentStoreConfig, ServiceTimeConfig};
pub use entry::{Entry, EntryId, EntryKeys, NameKeyid};
pub use error::{StoreError, StoreResult};
pub use message::{
    ContentObject, Interest, InterestReturn, Message, MessageKind, ReturnCode, Validation,
};
pub use recency::{RecencyHandle, RecencyList};
pub use store::{StandardContentStore, StoreStats};
pub use traits::{Admission, ContentStore, Removal};
