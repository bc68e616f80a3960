//! Domain Errors for Peer Bootstrap
//!
//! Only configuration and lifecycle misuse are surfaced synchronously to
//! callers. Dial failures are collected per sweep and never stop the service.

use crate::domain::{Multiaddr, PeerId};
use std::time::Duration;
use thiserror::Error;

/// Invalid construction input. A service is never produced when this fires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Too few bootstrapping nodes. Expected at least: {min_peers}, got: {seeds}")]
    TooFewSeeds { min_peers: usize, seeds: usize },

    #[error("min_peers must be greater than zero")]
    ZeroMinPeers,

    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },

    #[error("Failed to resolve seed address {address:?}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: ResolveError,
    },

    #[error("No Tokio runtime available to host the state actors")]
    NoRuntime,

    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Failure turning an address string into a [`PeerRecord`](crate::domain::PeerRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Not a multiaddr, or a component failed to parse (including a peer id
    /// that is not a valid multihash).
    #[error("invalid multiaddr: {0}")]
    Malformed(String),

    #[error("address does not end in a /p2p peer id")]
    MissingPeerId,

    #[error("address has no transport part before the peer id")]
    MissingAddress,
}

/// Illegal lifecycle transition. No state is mutated when returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("bootstrap service already started")]
    AlreadyStarted,

    #[error("bootstrap service not started")]
    NotStarted,
}

/// Errors reported by the network host collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("connection refused by peer")]
    ConnectionRefused,

    #[error("peer unreachable")]
    Unreachable,

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("host query failed: {0}")]
    Query(String),

    #[error("host closed")]
    Closed,
}

/// Why a single seed dial failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialFailure {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("dial deadline exceeded after {0:?}")]
    DeadlineExceeded(Duration),

    #[error("dial task aborted: {0}")]
    TaskAborted(String),

    #[error(transparent)]
    State(#[from] StateError),
}

/// One seed dial failed. Non-fatal: the sweep continues for the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to connect to {peer} at {address}: {failure}")]
pub struct ConnectError {
    pub peer: PeerId,
    pub address: Multiaddr,
    #[source]
    pub failure: DialFailure,
}

/// Aggregate of every dial failure seen during one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} of {attempted} seed dials failed", .failures.len())]
pub struct SweepError {
    /// Dials actually issued to the host.
    pub attempted: usize,
    pub failures: Vec<ConnectError>,
}

impl SweepError {
    /// Peers whose dial failed, in seed order.
    pub fn failed_peers(&self) -> impl Iterator<Item = &PeerId> {
        self.failures.iter().map(|f| &f.peer)
    }
}

/// A serialized state container stopped answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state actor closed")]
    Closed,
}

/// Umbrella error for service operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl BootstrapError {
    /// True for the `NotStarted` lifecycle error.
    pub fn is_not_started(&self) -> bool {
        matches!(self, Self::Lifecycle(LifecycleError::NotStarted))
    }
}
