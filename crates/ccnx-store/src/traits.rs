use crate::error::StoreResult;
use crate::message::{ContentObject, Message};

/// Outcome of offering a content object to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// A new entry was created.
    Admitted,
    /// An identical object was already resident; its recency was refreshed.
    Refreshed,
    /// The store cannot hold any object (capacity 0).
    Rejected,
}

impl Admission {
    /// Whether the object is resident after the call.
    pub fn is_resident(&self) -> bool {
        matches!(self, Self::Admitted | Self::Refreshed)
    }
}

/// Outcome of removing a content object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    Removed,
    NotFound,
}

/// A node-local cache of content objects.
///
/// All implementations must satisfy these invariants after every call:
/// - At most `object_capacity()` objects are resident.
/// - Every resident object is findable by its content hash.
/// - A miss is never an error, and never fabricates or forwards anything.
/// - Every call runs to completion; delays belong to the caller.
pub trait ContentStore {
    /// Find a resident object satisfying `message`.
    ///
    /// A hit makes the object the most recently used. Returns `Err` for
    /// messages that cannot be resolved to a lookup key.
    fn match_interest(&mut self, message: &Message) -> StoreResult<Option<&ContentObject>>;

    /// Admit a content object, evicting if the store is full.
    fn add_content_object(&mut self, message: Message) -> StoreResult<Admission>;

    /// Remove a content object, located by its content hash.
    fn remove_content_object(&mut self, message: &Message) -> StoreResult<Removal>;

    /// Number of resident objects.
    fn object_count(&self) -> usize;

    /// Maximum number of resident objects.
    fn object_capacity(&self) -> usize;
}
