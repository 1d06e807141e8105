use std::fmt;
use std::time::Duration;

use ccnx_store::Message;
use ccnx_types::Name;

/// Identifier of a forwarder connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn{}", self.0)
    }
}

/// Connections a content object should be sent out on once admitted.
///
/// The service never interprets the list; it hands it back unchanged in the
/// add completion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionList(Vec<ConnectionId>);

impl ConnectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, connection: ConnectionId) {
        self.0.push(connection);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConnectionId> {
        self.0.iter()
    }
}

impl FromIterator<ConnectionId> for ConnectionList {
    fn from_iter<I: IntoIterator<Item = ConnectionId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the store should do with a queued message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkOperation {
    MatchInterest,
    AddContentObject,
    RemoveContentObject,
}

impl fmt::Display for WorkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchInterest => write!(f, "match"),
            Self::AddContentObject => write!(f, "add"),
            Self::RemoveContentObject => write!(f, "remove"),
        }
    }
}

/// A message waiting in the service's input queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub operation: WorkOperation,
    pub message: Message,
    pub egress: ConnectionList,
    /// Virtual time the item was submitted.
    pub arrived_at: Duration,
}

impl WorkItem {
    /// Encoded size of the message name, the input to the service time.
    /// Nameless messages count as zero bytes.
    pub fn name_bytes(&self) -> usize {
        self.message.name().map_or(0, Name::encoded_len)
    }
}
