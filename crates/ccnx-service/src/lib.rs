//! Content store service for a simulated CCNx forwarder.
//!
//! Wraps any [`ContentStore`](ccnx_store::ContentStore) behind an input
//! delay queue. Work items wait out a service time of
//! `layer_delay_constant + layer_delay_slope * name_bytes` on one of
//! `layer_delay_servers` parallel servers, then run against the store.
//! Match and add results are delivered through completion callbacks.
//!
//! Time is virtual. The caller drives the clock with
//! [`ContentStoreService::advance_to`] or
//! [`ContentStoreService::run_until_idle`].

pub mod error;
pub mod queue;
pub mod service;
pub mod work;

pub use error::{Result, ServiceError};
pub use queue::DelayQueue;
pub use service::{
    AddCompletion, AddContentObjectCallback, ContentStoreService, MatchCompletion,
    MatchInterestCallback,
};
pub use work::{ConnectionId, ConnectionList, WorkItem, WorkOperation};
