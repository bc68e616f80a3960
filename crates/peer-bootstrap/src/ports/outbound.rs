//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this crate **requires** the host application to implement.

use crate::domain::{HostError, PeerId, PeerRecord, ResolveError};
use async_trait::async_trait;
use std::sync::Arc;

/// Handle returned by [`NetworkHost::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Receiver of host connection notifications.
///
/// # Thread Safety
///
/// Hosts may invoke these callbacks concurrently from any thread, including
/// threads outside the async runtime. Implementations must not block.
pub trait HostNotifiee: Send + Sync {
    /// A connection to `peer` was established.
    fn connected(&self, peer: &PeerId);

    /// A connection to `peer` was dropped.
    fn disconnected(&self, peer: &PeerId);
}

/// The peer-to-peer host: transport, handshakes and live connection state.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct Libp2pHost { swarm: SwarmHandle }
///
/// #[async_trait]
/// impl NetworkHost for Libp2pHost {
///     async fn connect(&self, peer: &PeerRecord) -> Result<(), HostError> {
///         self.swarm.dial(peer.dial_address()).await.map_err(|e| HostError::Handshake(e.to_string()))
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait NetworkHost: Send + Sync {
    /// Dial a peer and complete the handshake.
    ///
    /// Repeated or concurrent dials to the same peer must be harmless.
    async fn connect(&self, peer: &PeerRecord) -> Result<(), HostError>;

    /// Number of peers with a live connection.
    fn connected_peer_count(&self) -> Result<usize, HostError>;

    /// Number of addresses the host currently listens on.
    fn listen_address_count(&self) -> Result<usize, HostError>;

    /// Register for connect/disconnect notifications.
    fn subscribe(&self, notifiee: Arc<dyn HostNotifiee>) -> Result<SubscriptionId, HostError>;

    /// Drop a registration. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Parses configured address strings into peer records.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, address: &str) -> Result<PeerRecord, ResolveError>;
}
