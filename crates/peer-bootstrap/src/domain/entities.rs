//! Core domain entities: peer identity, location and dial context.

use multiaddr::Protocol;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

pub use libp2p_identity::PeerId;
pub use multiaddr::Multiaddr;

/// Immutable identity + location of a seed peer.
///
/// `address` is the transport part only (`/ip4/../tcp/..`, `/dnsaddr/..`);
/// the peer id is kept separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerRecord {
    pub id: PeerId,
    pub address: Multiaddr,
}

impl PeerRecord {
    pub fn new(id: PeerId, address: Multiaddr) -> Self {
        Self { id, address }
    }

    /// Full dial address with the trailing `/p2p/<id>`.
    pub fn dial_address(&self) -> Multiaddr {
        self.address.clone().with(Protocol::P2p(self.id))
    }
}

impl fmt::Display for PeerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dial_address())
    }
}

/// Deadline carried by every dial of one sweep.
///
/// `background()` imposes no deadline: a hung host connect then blocks the
/// sweep until the host gives up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialContext {
    deadline: Option<Instant>,
}

impl DialContext {
    /// No deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// `with_timeout` when set, `background` otherwise.
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::background, Self::with_timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
