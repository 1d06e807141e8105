//! Capacity enforcement.
//!
//! Eviction is pure LRU: the victim is always the tail of the recency list.
//! The victim leaves every index, the list and the arena in one step, so no
//! caller ever observes a partially removed entry.

use tracing::debug;

use super::StandardContentStore;
use crate::message::ContentObject;

impl StandardContentStore {
    /// Evict the least recently used entry, returning its content.
    ///
    /// Returns `None` only when the store is empty.
    pub(super) fn evict_least_recent(&mut self) -> Option<ContentObject> {
        let victim = self.recency.peek_least_recent()?;
        let entry = self.release(victim)?;
        self.stats.evicted += 1;
        debug!(
            hash = %entry.hash().short_hex(),
            name = ?entry.name(),
            "evicted least recently used object"
        );
        Some(entry.into_content())
    }
}

#[cfg(test)]
mod tests {
    use crate::message::ContentObject;
    use crate::store::StandardContentStore;
    use crate::traits::ContentStore;
    use ccnx_types::Name;

    fn fill(store: &mut StandardContentStore, uris: &[&str]) {
        for uri in uris {
            let object = ContentObject::named(Name::parse(uri).unwrap(), uri.as_bytes().to_vec());
            store.add_content_object(object.into()).unwrap();
        }
    }

    #[test]
    fn evicts_tail_and_clears_every_index() {
        let mut store = StandardContentStore::with_capacity(3);
        fill(&mut store, &["/a", "/b", "/c"]);
        let victim = store.evict_least_recent().unwrap();
        assert_eq!(victim.name, Name::parse("/a").ok());
        assert_eq!(store.object_count(), 2);
        assert_eq!(store.hash_index_len(), 2);
        assert_eq!(store.name_index_len(), 2);
        assert!(store.find_by_hash(&victim.content_hash()).is_none());
        assert!(store.verify_consistency());
    }

    #[test]
    fn empty_store_has_nothing_to_evict() {
        let mut store = StandardContentStore::with_capacity(3);
        assert!(store.evict_least_recent().is_none());
        assert_eq!(store.stats().evicted, 0);
    }

    #[test]
    fn successive_evictions_follow_recency_order() {
        let mut store = StandardContentStore::with_capacity(3);
        fill(&mut store, &["/a", "/b", "/c"]);
        let order: Vec<_> = std::iter::from_fn(|| store.evict_least_recent())
            .filter_map(|o| o.name.map(|n| n.to_string()))
            .collect();
        assert_eq!(order, vec!["ccnx:/a", "ccnx:/b", "ccnx:/c"]);
        assert!(store.is_empty());
    }
}
