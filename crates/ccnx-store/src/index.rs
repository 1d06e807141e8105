//! The three ordered indices over resident entries.
//!
//! The hash and name/keyid indices map each key to a single [`EntryId`]. The
//! name index maps a name to every resident entry carrying it, since several
//! publishers may sign objects under one name. Keys are plain value types
//! with their own total order, so the maps are ordinary `BTreeMap`s.

use std::collections::BTreeMap;

use ccnx_types::{HashValue, Name};

use crate::entry::{EntryId, EntryKeys, NameKeyid};

/// An ordered map from one key kind to entries.
#[derive(Debug)]
pub struct KeyIndex<K: Ord> {
    map: BTreeMap<K, EntryId>,
}

impl<K: Ord> Default for KeyIndex<K> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<K: Ord> KeyIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `key` to `id`, returning the entry it displaced, if any.
    pub fn insert(&mut self, key: K, id: EntryId) -> Option<EntryId> {
        self.map.insert(key, id)
    }

    pub fn remove(&mut self, key: &K) -> Option<EntryId> {
        self.map.remove(key)
    }

    pub fn get(&self, key: &K) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Keys in index order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }
}

/// Entries by content hash. Holds every resident entry.
pub type HashIndex = KeyIndex<HashValue>;
/// Entries by name and keyid. Holds every named entry with a verified keyid.
pub type NameKeyidIndex = KeyIndex<NameKeyid>;

/// Entries by name. Holds every named entry.
///
/// Each name keeps its entries most recently used first, so a bare-name
/// lookup returns the freshest one.
#[derive(Debug, Default)]
pub struct NameIndex {
    map: BTreeMap<Name, Vec<EntryId>>,
    len: usize,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` under `name` as its most recent entry.
    ///
    /// Returns false if `id` was already indexed under `name`.
    pub fn insert(&mut self, name: Name, id: EntryId) -> bool {
        let group = self.map.entry(name).or_default();
        if group.contains(&id) {
            return false;
        }
        group.insert(0, id);
        self.len += 1;
        true
    }

    /// Remove `id` from `name`. Returns false if it was not indexed there.
    pub fn remove(&mut self, name: &Name, id: EntryId) -> bool {
        let Some(group) = self.map.get_mut(name) else {
            return false;
        };
        let Some(pos) = group.iter().position(|&e| e == id) else {
            return false;
        };
        group.remove(pos);
        if group.is_empty() {
            self.map.remove(name);
        }
        self.len -= 1;
        true
    }

    /// Move `id` to the front of `name`'s entries.
    pub fn promote(&mut self, name: &Name, id: EntryId) {
        if let Some(group) = self.map.get_mut(name) {
            if let Some(pos) = group.iter().position(|&e| e == id) {
                group[..=pos].rotate_right(1);
            }
        }
    }

    /// The most recently used entry named `name`.
    pub fn get(&self, name: &Name) -> Option<EntryId> {
        self.entries(name).first().copied()
    }

    /// Every entry named `name`, most recently used first.
    pub fn entries(&self, name: &Name) -> &[EntryId] {
        self.map.get(name).map_or(&[][..], Vec::as_slice)
    }

    pub fn contains(&self, name: &Name, id: EntryId) -> bool {
        self.entries(name).contains(&id)
    }

    /// Number of indexed entries, counting each entry of a shared name.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distinct names in index order.
    pub fn keys(&self) -> impl Iterator<Item = &Name> {
        self.map.keys()
    }
}

/// The three indices, updated together.
#[derive(Debug, Default)]
pub struct Indices {
    pub by_hash: HashIndex,
    pub by_name: NameIndex,
    pub by_name_keyid: NameKeyidIndex,
}

impl Indices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` under every key in `keys`.
    ///
    /// The caller guarantees the hash and name/keyid keys are not already
    /// taken. A name may be shared with other entries.
    pub fn insert(&mut self, id: EntryId, keys: &EntryKeys) {
        let prev = self.by_hash.insert(keys.hash, id);
        debug_assert!(prev.is_none(), "hash key already indexed");
        if let Some(name) = &keys.name {
            let added = self.by_name.insert(name.clone(), id);
            debug_assert!(added, "entry already indexed under its name");
        }
        if let Some(key) = keys.name_keyid() {
            let prev = self.by_name_keyid.insert(key, id);
            debug_assert!(prev.is_none(), "name/keyid key already indexed");
        }
    }

    /// Remove every key in `keys`. Each removed key must have pointed at `id`.
    pub fn remove(&mut self, id: EntryId, keys: &EntryKeys) {
        let removed = self.by_hash.remove(&keys.hash);
        debug_assert_eq!(removed, Some(id), "hash index out of sync");
        if let Some(name) = &keys.name {
            let removed = self.by_name.remove(name, id);
            debug_assert!(removed, "name index out of sync");
        }
        if let Some(key) = keys.name_keyid() {
            let removed = self.by_name_keyid.remove(&key);
            debug_assert_eq!(removed, Some(id), "name/keyid index out of sync");
        }
    }

    /// Whether `id` is indexed under exactly the keys it should be.
    pub fn holds_exactly(&self, id: EntryId, keys: &EntryKeys) -> bool {
        let by_hash = self.by_hash.get(&keys.hash) == Some(id);
        let by_name = match &keys.name {
            Some(name) => self.by_name.contains(name, id),
            None => true,
        };
        let by_name_keyid = match keys.name_keyid() {
            Some(key) => self.by_name_keyid.get(&key) == Some(id),
            None => true,
        };
        by_hash && by_name && by_name_keyid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Entry, EntryArena};
    use crate::message::ContentObject;
    use crate::recency::RecencyHandle;
    use ccnx_crypto::SigningKey;

    fn admit(arena: &mut EntryArena, object: ContentObject) -> (EntryId, EntryKeys) {
        let keys = EntryKeys::for_content_object(&object);
        let id = arena.insert(Entry::new(object, keys.clone(), RecencyHandle::detached()));
        (id, keys)
    }

    #[test]
    fn key_index_basic_operations() {
        let mut arena = EntryArena::new();
        let (id, keys) = admit(&mut arena, ContentObject::new(None, b"x".to_vec()));
        let mut index = HashIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.insert(keys.hash, id), None);
        assert_eq!(index.get(&keys.hash), Some(id));
        assert_eq!(index.len(), 1);
        assert_eq!(index.remove(&keys.hash), Some(id));
        assert_eq!(index.get(&keys.hash), None);
    }

    #[test]
    fn name_index_iterates_in_name_order() {
        let mut arena = EntryArena::new();
        let mut index = NameIndex::new();
        for uri in ["/b", "/a/z", "/a"] {
            let (id, _) = admit(&mut arena, ContentObject::new(None, uri.as_bytes().to_vec()));
            assert!(index.insert(Name::parse(uri).unwrap(), id));
        }
        let order: Vec<String> = index.keys().map(|n| n.to_string()).collect();
        assert_eq!(order, vec!["ccnx:/a", "ccnx:/a/z", "ccnx:/b"]);
    }

    #[test]
    fn name_index_holds_several_entries_per_name() {
        let mut arena = EntryArena::new();
        let name = Name::parse("/x").unwrap();
        let (first, _) = admit(&mut arena, ContentObject::new(None, b"1".to_vec()));
        let (second, _) = admit(&mut arena, ContentObject::new(None, b"2".to_vec()));
        let (third, _) = admit(&mut arena, ContentObject::new(None, b"3".to_vec()));

        let mut index = NameIndex::new();
        assert!(index.insert(name.clone(), first));
        assert!(index.insert(name.clone(), second));
        assert!(index.insert(name.clone(), third));
        assert!(!index.insert(name.clone(), second));
        assert_eq!(index.len(), 3);
        assert_eq!(index.keys().count(), 1);
        assert_eq!(index.entries(&name), &[third, second, first]);
        assert_eq!(index.get(&name), Some(third));

        index.promote(&name, first);
        assert_eq!(index.entries(&name), &[first, third, second]);

        assert!(index.remove(&name, third));
        assert!(!index.remove(&name, third));
        assert_eq!(index.entries(&name), &[first, second]);
        assert!(index.remove(&name, first));
        assert!(index.remove(&name, second));
        assert!(index.is_empty());
        assert_eq!(index.keys().count(), 0);
        assert_eq!(index.get(&name), None);
    }

    #[test]
    fn nameless_entry_only_in_hash_index() {
        let mut arena = EntryArena::new();
        let (id, keys) = admit(&mut arena, ContentObject::new(None, b"x".to_vec()));
        let mut indices = Indices::new();
        indices.insert(id, &keys);
        assert_eq!(indices.by_hash.len(), 1);
        assert_eq!(indices.by_name.len(), 0);
        assert_eq!(indices.by_name_keyid.len(), 0);
        assert!(indices.holds_exactly(id, &keys));
    }

    #[test]
    fn signed_named_entry_in_all_three() {
        let mut arena = EntryArena::new();
        let key = SigningKey::from_label("p");
        let object = ContentObject::signed(Name::parse("/a").ok(), b"x".to_vec(), &key);
        let (id, keys) = admit(&mut arena, object);
        let mut indices = Indices::new();
        indices.insert(id, &keys);
        assert_eq!(indices.by_hash.len(), 1);
        assert_eq!(indices.by_name.len(), 1);
        assert_eq!(indices.by_name_keyid.len(), 1);
        assert!(indices.holds_exactly(id, &keys));

        indices.remove(id, &keys);
        assert!(indices.by_hash.is_empty());
        assert!(indices.by_name.is_empty());
        assert!(indices.by_name_keyid.is_empty());
        assert!(!indices.holds_exactly(id, &keys));
    }

    #[test]
    fn two_publishers_share_a_name() {
        let mut arena = EntryArena::new();
        let name = Name::parse("/x").ok();
        let alice = SigningKey::from_label("alice");
        let bob = SigningKey::from_label("bob");
        let alice = ContentObject::signed(name.clone(), b"a".to_vec(), &alice);
        let bob = ContentObject::signed(name, b"b".to_vec(), &bob);
        let (a, a_keys) = admit(&mut arena, alice);
        let (b, b_keys) = admit(&mut arena, bob);
        let mut indices = Indices::new();
        indices.insert(a, &a_keys);
        indices.insert(b, &b_keys);

        assert_eq!(indices.by_name.len(), 2);
        assert_eq!(indices.by_name_keyid.len(), 2);
        assert!(indices.holds_exactly(a, &a_keys));
        assert!(indices.holds_exactly(b, &b_keys));

        indices.remove(a, &a_keys);
        assert!(!indices.holds_exactly(a, &a_keys));
        assert!(indices.holds_exactly(b, &b_keys));
        assert_eq!(indices.by_name.len(), 1);
    }
}
