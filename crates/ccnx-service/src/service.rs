use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use ccnx_store::{
    Admission, ContentObject, ContentStore, ContentStoreConfig, Message, Removal,
    ServiceTimeConfig, StandardContentStore, StoreError,
};

use crate::error::Result;
use crate::queue::DelayQueue;
use crate::work::{ConnectionList, WorkItem, WorkOperation};

/// Result of a serviced match request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchCompletion {
    /// The message that was matched.
    pub request: Message,
    /// The cached object, or `None` on a miss or an error.
    pub content: Option<ContentObject>,
    pub error: Option<StoreError>,
}

/// Result of a serviced add request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddCompletion {
    /// The message that was offered.
    pub object: Message,
    /// Egress connections given at submission, unchanged.
    pub egress: ConnectionList,
    /// Whether the object is resident after the add.
    pub admitted: bool,
}

pub type MatchInterestCallback = Box<dyn FnMut(MatchCompletion)>;
pub type AddContentObjectCallback = Box<dyn FnMut(AddCompletion)>;

/// A content store fed through a simulated input delay.
///
/// Submitted work waits in a [`DelayQueue`] for its service time, computed
/// from the message's name length, and is handed to the store when the
/// virtual clock reaches its completion instant. Match and add results go to
/// the registered callbacks; removes complete silently.
pub struct ContentStoreService<S> {
    store: S,
    queue: DelayQueue<WorkItem>,
    service_time: ServiceTimeConfig,
    now: Duration,
    on_match: Option<MatchInterestCallback>,
    on_add: Option<AddContentObjectCallback>,
    serviced: u64,
}

impl ContentStoreService<StandardContentStore> {
    /// Build a [`StandardContentStore`] and its service from one config.
    pub fn with_config(config: ContentStoreConfig) -> Result<Self> {
        let service_time = config.service_time.clone();
        let store = StandardContentStore::new(config)?;
        Self::new(store, service_time)
    }
}

impl<S: ContentStore> ContentStoreService<S> {
    /// Wrap `store` behind a delay queue with the given parameters.
    pub fn new(store: S, service_time: ServiceTimeConfig) -> Result<Self> {
        let queue = DelayQueue::new(service_time.layer_delay_servers)?;
        info!(
            servers = service_time.layer_delay_servers,
            capacity = store.object_capacity(),
            "content store service started"
        );
        Ok(Self {
            store,
            queue,
            service_time,
            now: Duration::ZERO,
            on_match: None,
            on_add: None,
            serviced: 0,
        })
    }

    pub fn set_match_interest_callback(
        &mut self,
        callback: impl FnMut(MatchCompletion) + 'static,
    ) {
        self.on_match = Some(Box::new(callback));
    }

    pub fn set_add_content_object_callback(
        &mut self,
        callback: impl FnMut(AddCompletion) + 'static,
    ) {
        self.on_add = Some(Box::new(callback));
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Items submitted but not yet serviced.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total items serviced so far.
    pub fn serviced(&self) -> u64 {
        self.serviced
    }

    /// Queue a match request. Returns the instant it will be serviced.
    pub fn submit_match(&mut self, message: Message) -> Duration {
        self.submit(WorkOperation::MatchInterest, message, ConnectionList::new())
    }

    /// Queue a content object for admission, to be reported with `egress`.
    pub fn submit_add(&mut self, message: Message, egress: ConnectionList) -> Duration {
        self.submit(WorkOperation::AddContentObject, message, egress)
    }

    pub fn submit_remove(&mut self, message: Message) -> Duration {
        self.submit(WorkOperation::RemoveContentObject, message, ConnectionList::new())
    }

    /// Move the clock to `time` and service every item due by then, in
    /// completion order. The clock never moves backwards.
    ///
    /// Returns the number of items serviced.
    pub fn advance_to(&mut self, time: Duration) -> usize {
        self.now = self.now.max(time);
        let mut count = 0;
        while let Some((due, item)) = self.queue.pop_due(self.now) {
            self.service(due, item);
            count += 1;
        }
        count
    }

    /// Service everything queued, advancing the clock as far as needed.
    pub fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        while let Some(due) = self.queue.next_due() {
            count += self.advance_to(due);
        }
        count
    }

    fn submit(
        &mut self,
        operation: WorkOperation,
        message: Message,
        egress: ConnectionList,
    ) -> Duration {
        let item = WorkItem {
            operation,
            message,
            egress,
            arrived_at: self.now,
        };
        let service_time = self.service_time.service_time(item.name_bytes());
        let due = self.queue.enqueue(self.now, item, service_time);
        debug!(%operation, due_us = saturating_micros(due), "work queued");
        due
    }

    fn service(&mut self, due: Duration, item: WorkItem) {
        self.serviced += 1;
        let waited = due.saturating_sub(item.arrived_at);
        debug!(
            operation = %item.operation,
            waited_us = saturating_micros(waited),
            "servicing work item"
        );
        match item.operation {
            WorkOperation::MatchInterest => self.service_match(item.message),
            WorkOperation::AddContentObject => self.service_add(item.message, item.egress),
            WorkOperation::RemoveContentObject => self.service_remove(&item.message),
        }
    }

    fn service_match(&mut self, request: Message) {
        let (content, error) = match self.store.match_interest(&request) {
            Ok(found) => (found.cloned(), None),
            Err(e) => {
                warn!(error = %e, "match request rejected");
                (None, Some(e))
            }
        };
        if let Some(callback) = self.on_match.as_mut() {
            callback(MatchCompletion {
                request,
                content,
                error,
            });
        }
    }

    fn service_add(&mut self, object: Message, egress: ConnectionList) {
        let admitted = match self.store.add_content_object(object.clone()) {
            Ok(admission) => {
                if admission == Admission::Rejected {
                    warn!("content object rejected by store");
                }
                admission.is_resident()
            }
            Err(e) => {
                warn!(error = %e, "add request rejected");
                false
            }
        };
        if let Some(callback) = self.on_add.as_mut() {
            callback(AddCompletion {
                object,
                egress,
                admitted,
            });
        }
    }

    fn service_remove(&mut self, message: &Message) {
        match self.store.remove_content_object(message) {
            Ok(Removal::Removed) => debug!("content object removed"),
            Ok(Removal::NotFound) => debug!("remove: content object not resident"),
            Err(e) => warn!(error = %e, "remove request rejected"),
        }
    }
}

impl<S: ContentStore> fmt::Debug for ContentStoreService<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStoreService")
            .field("now", &self.now)
            .field("pending", &self.queue.len())
            .field("serviced", &self.serviced)
            .field("object_count", &self.store.object_count())
            .finish()
    }
}

/// Whole microseconds in `d`, clamped to `u64::MAX`.
fn saturating_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
