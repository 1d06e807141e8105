//! Stored entries and the arena that owns them.

use std::fmt;

use ccnx_types::{HashValue, KeyId, Name};

use crate::message::ContentObject;
use crate::recency::RecencyHandle;

/// Composite key of the name/keyid index: name first, keyid breaks ties.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKeyid {
    pub name: Name,
    pub keyid: KeyId,
}

/// The lookup keys of one content object, computed once on admission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryKeys {
    pub hash: HashValue,
    pub name: Option<Name>,
    /// Only present when the object is named and carries a verified keyid.
    pub keyid: Option<KeyId>,
}

impl EntryKeys {
    /// Derive the keys of a content object.
    pub fn for_content_object(object: &ContentObject) -> Self {
        let name = object.name.clone();
        let keyid = name.as_ref().and_then(|_| object.key_id());
        Self {
            hash: object.content_hash(),
            name,
            keyid,
        }
    }

    /// The name/keyid index key, if both parts are present.
    pub fn name_keyid(&self) -> Option<NameKeyid> {
        match (&self.name, self.keyid) {
            (Some(name), Some(keyid)) => Some(NameKeyid {
                name: name.clone(),
                keyid,
            }),
            _ => None,
        }
    }
}

/// One admitted content object.
#[derive(Debug)]
pub struct Entry {
    content: ContentObject,
    keys: EntryKeys,
    recency: RecencyHandle,
}

impl Entry {
    pub(crate) fn new(content: ContentObject, keys: EntryKeys, recency: RecencyHandle) -> Self {
        Self {
            content,
            keys,
            recency,
        }
    }

    pub fn content(&self) -> &ContentObject {
        &self.content
    }

    pub fn keys(&self) -> &EntryKeys {
        &self.keys
    }

    pub fn hash(&self) -> &HashValue {
        &self.keys.hash
    }

    pub fn name(&self) -> Option<&Name> {
        self.keys.name.as_ref()
    }

    pub fn keyid(&self) -> Option<&KeyId> {
        self.keys.keyid.as_ref()
    }

    pub(crate) fn recency(&self) -> RecencyHandle {
        self.recency
    }

    pub(crate) fn into_content(self) -> ContentObject {
        self.content
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Stable handle to an entry in an [`EntryArena`].
///
/// The generation makes a handle to a released slot distinguishable from a
/// handle to whatever entry reuses the slot later.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId {
    slot: u32,
    generation: u32,
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({}v{})", self.slot, self.generation)
    }
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Sole owner of all resident entries. Indices only hold [`EntryId`]s.
#[derive(Default)]
pub(crate) struct EntryArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// The id the next [`insert`](Self::insert) will return.
    pub fn next_id(&self) -> EntryId {
        match self.free.last() {
            Some(&slot) => EntryId {
                slot,
                generation: self.slots[slot as usize].generation,
            },
            None => EntryId {
                slot: self.slots.len() as u32,
                generation: 0,
            },
        }
    }

    pub fn insert(&mut self, entry: Entry) -> EntryId {
        self.len += 1;
        match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.entry = Some(entry);
                EntryId {
                    slot,
                    generation: s.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                EntryId {
                    slot,
                    generation: 0,
                }
            }
        }
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots
            .get(id.slot as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entry.as_ref())
    }

    /// Release the entry, invalidating `id`.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let slot = self.slots.get_mut(id.slot as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;
        Some(entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Entry)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entry.as_ref().map(|e| {
                (
                    EntryId {
                        slot: i as u32,
                        generation: s.generation,
                    },
                    e,
                )
            })
        })
    }
}
