//! Most-recently-used ordering of resident entries.
//!
//! The list is doubly linked through an arena of nodes, so every operation is
//! O(1). Each entry keeps the [`RecencyHandle`] of its node; nothing ever
//! searches the list.

use crate::entry::EntryId;

/// Position of one entry in a [`RecencyList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecencyHandle(u32);

impl RecencyHandle {
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self(u32::MAX)
    }
}

#[derive(Debug)]
struct Node {
    entry: EntryId,
    /// Towards the front (more recent).
    prev: Option<u32>,
    /// Towards the back (less recent).
    next: Option<u32>,
}

/// Entries ordered from most to least recently used.
#[derive(Debug, Default)]
pub struct RecencyList {
    nodes: Vec<Option<Node>>,
    free: Vec<u32>,
    head: Option<u32>,
    tail: Option<u32>,
    len: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `entry` as the most recently used.
    pub fn push_front(&mut self, entry: EntryId) -> RecencyHandle {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx as usize] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                (self.nodes.len() - 1) as u32
            }
        };
        self.link_front(idx);
        self.len += 1;
        RecencyHandle(idx)
    }

    /// Mark the entry at `handle` as the most recently used.
    ///
    /// Returns `false` if the handle is not in the list.
    pub fn promote_to_front(&mut self, handle: RecencyHandle) -> bool {
        if self.node(handle.0).is_none() {
            return false;
        }
        if self.head != Some(handle.0) {
            self.unlink(handle.0);
            self.link_front(handle.0);
        }
        true
    }

    /// Take the entry at `handle` out of the list.
    pub fn remove(&mut self, handle: RecencyHandle) -> Option<EntryId> {
        self.node(handle.0)?;
        self.unlink(handle.0);
        let node = self.nodes[handle.0 as usize].take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(node.entry)
    }

    /// The entry at `handle`, if the handle is in the list.
    pub fn get(&self, handle: RecencyHandle) -> Option<EntryId> {
        self.node(handle.0).map(|n| n.entry)
    }

    /// The next eviction candidate.
    pub fn peek_least_recent(&self) -> Option<EntryId> {
        self.tail.and_then(|idx| self.node(idx)).map(|n| n.entry)
    }

    pub fn peek_most_recent(&self) -> Option<EntryId> {
        self.head.and_then(|idx| self.node(idx)).map(|n| n.entry)
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = EntryId> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.next;
            Some(node.entry)
        })
    }

    fn node(&self, idx: u32) -> Option<&Node> {
        self.nodes.get(idx as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: u32) -> Option<&mut Node> {
        self.nodes.get_mut(idx as usize).and_then(Option::as_mut)
    }

    fn link_front(&mut self, idx: u32) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head) => head.prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: u32) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = None;
        }
    }
}
