use ccnx_store::StoreError;

/// Errors produced by the content store service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The underlying store refused to start.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The delay queue parameters are unusable.
    #[error("invalid service time: {0}")]
    InvalidServiceTime(String),
}

/// Convenience alias used throughout the service crate.
pub type Result<T> = std::result::Result<T, ServiceError>;
