//! # Serialized State Containers
//!
//! The only mutable state shared across tasks: the connected-peer count and
//! the lifecycle flag. Both are owned by actor tasks built on one generic
//! [`SyncedValue`]; nothing else holds a mutable reference to them.

pub mod lifecycle;
pub mod peer_count;
pub mod synced;

pub use lifecycle::LifecycleState;
pub use peer_count::PeerCountTracker;
pub use synced::SyncedValue;
