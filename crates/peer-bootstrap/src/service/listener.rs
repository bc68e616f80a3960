//! Republishes the host's live peer count on every connection event.

use crate::domain::PeerId;
use crate::ports::{HostNotifiee, NetworkHost};
use crate::state::PeerCountTracker;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Host notifiee that keeps the [`PeerCountTracker`] current.
///
/// Both event kinds trigger the same refresh: query the host, store the
/// answer. Concurrent events each store their own query result, so the
/// tracked value is whichever query finished last rather than the one
/// matching the latest event. It converges once events stop.
///
/// Holds the host weakly; the host owns this listener while subscribed.
pub struct EventListener {
    host: Weak<dyn NetworkHost>,
    peers: PeerCountTracker,
}

impl EventListener {
    pub fn new(host: &Arc<dyn NetworkHost>, peers: PeerCountTracker) -> Self {
        Self {
            host: Arc::downgrade(host),
            peers,
        }
    }

    /// Query the host and store its connected-peer count.
    ///
    /// On a failed query the previous count is kept.
    pub fn refresh(&self) {
        let Some(host) = self.host.upgrade() else {
            debug!("Host dropped, ignoring connection event");
            return;
        };

        match host.connected_peer_count() {
            Ok(count) => {
                if let Err(e) = self.peers.set(count) {
                    warn!(error = %e, "Failed to record connected peer count");
                }
            }
            Err(e) => warn!(error = %e, "Failed to query connected peers"),
        }
    }
}

impl HostNotifiee for EventListener {
    fn connected(&self, peer: &PeerId) {
        debug!(peer = %peer, "Peer connected");
        self.refresh();
    }

    fn disconnected(&self, peer: &PeerId) {
        info!(peer = %peer, "Dropped connection to peer");
        self.refresh();
    }
}
