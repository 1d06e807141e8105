//! Virtual-time delay queue with parallel servers.
//!
//! Each enqueued item is assigned to the server that frees up first and
//! completes `service_time` after that server starts it. Items come out in
//! completion order; items completing at the same instant come out in
//! arrival order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::error::{Result, ServiceError};

struct Pending<T> {
    due: Duration,
    seq: u64,
    item: T,
}

impl<T> PartialEq for Pending<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Pending<T> {}

impl<T> PartialOrd for Pending<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest completion first.
impl<T> Ord for Pending<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of items waiting out their service time.
///
/// Time is virtual: callers pass the current instant, measured from any
/// fixed origin, to every call.
pub struct DelayQueue<T> {
    /// When each server finishes its last assigned item.
    free_at: Vec<Duration>,
    pending: BinaryHeap<Pending<T>>,
    next_seq: u64,
}

impl<T> DelayQueue<T> {
    /// Create a queue served by `servers` parallel servers.
    pub fn new(servers: u32) -> Result<Self> {
        if servers == 0 {
            return Err(ServiceError::InvalidServiceTime(
                "delay queue needs at least one server".into(),
            ));
        }
        Ok(Self {
            free_at: vec![Duration::ZERO; servers as usize],
            pending: BinaryHeap::new(),
            next_seq: 0,
        })
    }

    pub fn servers(&self) -> usize {
        self.free_at.len()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `item` at `now`, returning the instant it completes.
    pub fn enqueue(&mut self, now: Duration, item: T, service_time: Duration) -> Duration {
        // Earliest-free server; lowest index on ties.
        let (server, free_at) = self
            .free_at
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(i, t)| (t, i))
            .unwrap_or((0, Duration::ZERO));
        let due = now.max(free_at).saturating_add(service_time);
        if let Some(slot) = self.free_at.get_mut(server) {
            *slot = due;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending { due, seq, item });
        due
    }

    /// Completion instant of the next item to come out.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.peek().map(|p| p.due)
    }

    /// Take the next item if it has completed by `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        if self.next_due()? > now {
            return None;
        }
        self.pending.pop().map(|p| (p.due, p.item))
    }
}
