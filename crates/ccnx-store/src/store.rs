use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use ccnx_types::HashValue;

use crate::config::ContentStoreConfig;
use crate::entry::{Entry, EntryArena, EntryId, EntryKeys};
use crate::error::{StoreError, StoreResult};
use crate::index::Indices;
use crate::matcher;
use crate::message::{ContentObject, Message};
use crate::recency::RecencyList;
use crate::traits::{Admission, ContentStore, Removal};

mod eviction;

/// Running counters of store outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub admitted: u64,
    pub refreshed: u64,
    pub rejected: u64,
    pub evicted: u64,
    /// Entries replaced by a newer object with the same name and keyid, or
    /// with the same name when both are unsigned.
    pub displaced: u64,
    pub removed: u64,
    pub not_found: u64,
}

/// LRU content store with hash, name and name/keyid indices.
///
/// The arena owns every entry. The indices and the recency list refer to
/// entries by [`EntryId`] only, and all three are updated together by each
/// mutating call.
pub struct StandardContentStore {
    config: ContentStoreConfig,
    entries: EntryArena,
    indices: Indices,
    recency: RecencyList,
    stats: StoreStats,
}

impl StandardContentStore {
    /// Create an empty store.
    pub fn new(config: ContentStoreConfig) -> StoreResult<Self> {
        config.validate()?;
        debug!(capacity = config.object_capacity, "content store created");
        Ok(Self {
            config,
            entries: EntryArena::new(),
            indices: Indices::new(),
            recency: RecencyList::new(),
            stats: StoreStats::default(),
        })
    }

    /// An empty store with default settings and the given capacity.
    pub fn with_capacity(object_capacity: usize) -> Self {
        Self {
            config: ContentStoreConfig::with_capacity(object_capacity),
            entries: EntryArena::new(),
            indices: Indices::new(),
            recency: RecencyList::new(),
            stats: StoreStats::default(),
        }
    }

    pub fn config(&self) -> &ContentStoreConfig {
        &self.config
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    pub fn hash_index_len(&self) -> usize {
        self.indices.by_hash.len()
    }

    pub fn name_index_len(&self) -> usize {
        self.indices.by_name.len()
    }

    pub fn name_keyid_index_len(&self) -> usize {
        self.indices.by_name_keyid.len()
    }

    /// The next eviction candidate.
    pub fn least_recent(&self) -> Option<&Entry> {
        self.recency
            .peek_least_recent()
            .and_then(|id| self.entries.get(id))
    }

    pub fn most_recent(&self) -> Option<&Entry> {
        self.recency
            .peek_most_recent()
            .and_then(|id| self.entries.get(id))
    }

    /// Resident entries from most to least recently used.
    pub fn iter_recency(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.recency.iter().filter_map(|id| self.entries.get(id))
    }

    /// Look up an entry by content hash without touching its recency.
    pub fn find_by_hash(&self, hash: &HashValue) -> Option<&Entry> {
        self.indices
            .by_hash
            .get(hash)
            .and_then(|id| self.entries.get(id))
    }

    /// Whether the entry with content hash `hash` is resident and consistently
    /// tracked: indexed under exactly its own keys and present in the
    /// recency list.
    pub fn is_entry_valid(&self, hash: &HashValue) -> bool {
        let Some(id) = self.indices.by_hash.get(hash) else {
            return false;
        };
        self.is_id_valid(id)
    }

    /// Check every resident entry plus the aggregate sizes of the indices.
    pub fn verify_consistency(&self) -> bool {
        let resident = self.entries.len();
        let named = self.entries.iter().filter(|(_, e)| e.name().is_some()).count();
        let keyed = self
            .entries
            .iter()
            .filter(|(_, e)| e.keys().name_keyid().is_some())
            .count();
        resident <= self.config.object_capacity
            && self.recency.len() == resident
            && self.indices.by_hash.len() == resident
            && self.indices.by_name.len() == named
            && self.indices.by_name_keyid.len() == keyed
            && self.entries.iter().all(|(id, _)| self.is_id_valid(id))
    }

    /// Remove the object with content hash `hash`.
    pub fn remove_by_hash(&mut self, hash: &HashValue) -> Option<ContentObject> {
        let Some(id) = self.indices.by_hash.get(hash) else {
            self.stats.not_found += 1;
            trace!(hash = %hash.short_hex(), "remove: not resident");
            return None;
        };
        let entry = self.release(id)?;
        self.stats.removed += 1;
        debug!(hash = %hash.short_hex(), "removed content object");
        self.debug_check();
        Some(entry.into_content())
    }

    fn is_id_valid(&self, id: EntryId) -> bool {
        self.entries.get(id).is_some_and(|entry| {
            self.indices.holds_exactly(id, entry.keys())
                && self.recency.get(entry.recency()) == Some(id)
        })
    }

    /// Take an entry out of every index and the recency list, then drop it
    /// from the arena.
    fn release(&mut self, id: EntryId) -> Option<Entry> {
        let entry = self.entries.get(id)?;
        self.indices.remove(id, entry.keys());
        let unlinked = self.recency.remove(entry.recency());
        debug_assert_eq!(unlinked, Some(id), "recency list out of sync");
        self.entries.remove(id)
    }

    fn touch(&mut self, id: EntryId) {
        if let Some(entry) = self.entries.get(id) {
            self.recency.promote_to_front(entry.recency());
            if let Some(name) = entry.name() {
                self.indices.by_name.promote(name, id);
            }
        }
    }

    /// The resident entry a new object with `keys` replaces, if any.
    ///
    /// Signed objects collide on name and keyid. Unsigned objects collide
    /// with the unsigned entry of the same name. Objects from different
    /// publishers under one name coexist.
    fn superseded_by(&self, keys: &EntryKeys) -> Option<EntryId> {
        if let Some(key) = keys.name_keyid() {
            return self.indices.by_name_keyid.get(&key);
        }
        let name = keys.name.as_ref()?;
        self.indices.by_name.entries(name).iter().copied().find(|&id| {
            self.entries
                .get(id)
                .is_some_and(|entry| entry.keys().keyid.is_none())
        })
    }

    fn admit(&mut self, object: ContentObject, keys: EntryKeys) -> EntryId {
        let id = self.entries.next_id();
        let handle = self.recency.push_front(id);
        self.indices.insert(id, &keys);
        let inserted = self.entries.insert(Entry::new(object, keys, handle));
        debug_assert_eq!(inserted, id, "arena handed out an unexpected id");
        inserted
    }

    fn debug_check(&self) {
        let resident = self.entries.len();
        debug_assert!(resident <= self.config.object_capacity, "over capacity");
        debug_assert_eq!(self.recency.len(), resident, "recency list size");
        debug_assert_eq!(self.indices.by_hash.len(), resident, "hash index size");
        debug_assert!(self.indices.by_name.len() <= resident, "name index size");
        debug_assert!(
            self.indices.by_name_keyid.len() <= self.indices.by_name.len(),
            "name/keyid index size"
        );
    }
}

impl ContentStore for StandardContentStore {
    fn match_interest(&mut self, message: &Message) -> StoreResult<Option<&ContentObject>> {
        match matcher::resolve(message, &self.indices, &self.entries)? {
            Some(id) => {
                self.touch(id);
                self.stats.hits += 1;
                let entry = self.entries.get(id);
                if let Some(entry) = entry {
                    trace!(hash = %entry.hash().short_hex(), "match hit");
                }
                Ok(entry.map(Entry::content))
            }
            None => {
                self.stats.misses += 1;
                trace!(name = ?message.name(), "match miss");
                Ok(None)
            }
        }
    }

    fn add_content_object(&mut self, message: Message) -> StoreResult<Admission> {
        let object = match message {
            Message::ContentObject(object) => object,
            other => {
                return Err(StoreError::InvalidMessage {
                    operation: "add content object",
                    found: other.kind(),
                })
            }
        };
        let keys = EntryKeys::for_content_object(&object);

        if let Some(id) = self.indices.by_hash.get(&keys.hash) {
            self.touch(id);
            self.stats.refreshed += 1;
            trace!(hash = %keys.hash.short_hex(), "refreshed resident object");
            return Ok(Admission::Refreshed);
        }

        let capacity = self.config.object_capacity;
        if capacity == 0 {
            self.stats.rejected += 1;
            trace!(hash = %keys.hash.short_hex(), "rejected: store has no capacity");
            return Ok(Admission::Rejected);
        }

        if let Some(previous) = self.superseded_by(&keys) {
            if self.release(previous).is_some() {
                self.stats.displaced += 1;
                debug!(name = ?keys.name, keyid = ?keys.keyid, "displaced older object");
            }
        }

        if self.entries.len() >= capacity {
            self.evict_least_recent();
        }

        let hash = keys.hash;
        self.admit(object, keys);
        self.stats.admitted += 1;
        debug!(hash = %hash.short_hex(), resident = self.entries.len(), "admitted content object");
        self.debug_check();
        Ok(Admission::Admitted)
    }

    fn remove_content_object(&mut self, message: &Message) -> StoreResult<Removal> {
        let Message::ContentObject(object) = message else {
            return Err(StoreError::InvalidMessage {
                operation: "remove content object",
                found: message.kind(),
            });
        };
        Ok(match self.remove_by_hash(&object.content_hash()) {
            Some(_) => Removal::Removed,
            None => Removal::NotFound,
        })
    }

    fn object_count(&self) -> usize {
        self.entries.len()
    }

    fn object_capacity(&self) -> usize {
        self.config.object_capacity
    }
}

impl fmt::Debug for StandardContentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardContentStore")
            .field("object_count", &self.entries.len())
            .field("object_capacity", &self.config.object_capacity)
            .field("stats", &self.stats)
            .finish()
    }
}
