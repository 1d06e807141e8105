use crate::message::MessageKind;

/// Errors from content store operations.
///
/// Misses and not-found removals are outcomes, not errors; see
/// [`Admission`](crate::Admission) and [`Removal`](crate::Removal).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The message is of the wrong type for the requested operation.
    #[error("invalid message for {operation}: got {found}")]
    InvalidMessage {
        operation: &'static str,
        found: MessageKind,
    },

    /// An interest with neither a name nor a hash restriction.
    #[error("interest carries no name and no hash restriction")]
    NoRestriction,

    /// The configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
