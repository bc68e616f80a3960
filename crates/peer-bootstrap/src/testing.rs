//! Centralized Testing Utilities
//!
//! A scripted in-memory [`NetworkHost`] and seed fixtures. Available with the
//! `test-utils` feature flag.

use crate::domain::{HostError, PeerId, PeerRecord};
use crate::ports::{HostNotifiee, NetworkHost, SubscriptionId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Build `n` distinct, resolvable seed address strings.
///
/// ```rust,ignore
/// use peer_bootstrap::testing::seed_addresses;
///
/// let seeds = seed_addresses(3);
/// assert!(seeds[0].starts_with("/ip4/10.0.0.1/tcp/4001/p2p/Qm"));
/// ```
pub fn seed_addresses(n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| format!("/ip4/10.0.{}.{}/tcp/4001/p2p/{}", i / 256, i % 256, seed_id(i)))
        .collect()
}

/// Peer id used by [`seed_addresses`] for the `i`-th seed (1-based).
///
/// A sha2-256 multihash whose digest ends in `i`, so ids are stable across
/// calls and distinct per seed.
pub fn seed_id(i: usize) -> PeerId {
    let mut multihash = [0u8; 34];
    multihash[0] = 0x12;
    multihash[1] = 0x20;
    multihash[26..].copy_from_slice(&(i as u64).to_be_bytes());
    PeerId::from_bytes(&multihash).expect("sha2-256 multihash is a valid peer id")
}

#[derive(Default)]
struct HostState {
    reachable: HashSet<PeerId>,
    connected: HashSet<PeerId>,
    listen_addresses: usize,
    fail_queries: bool,
    subscribers: HashMap<SubscriptionId, Arc<dyn HostNotifiee>>,
}

/// In-memory host with scripted reachability.
///
/// Dials to reachable peers succeed and emit `connected` to every subscriber;
/// other dials fail with [`HostError::Unreachable`]. Notifications are
/// delivered outside the internal lock, so notifiees may query the host.
#[derive(Default)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
    connect_calls: AtomicUsize,
    next_subscription: AtomicU64,
    connect_delay: Option<Duration>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every dial sleeps for `delay` before completing.
    #[must_use]
    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_listen_addresses(self, count: usize) -> Self {
        self.state.lock().listen_addresses = count;
        self
    }

    pub fn set_reachable(&self, peer: &PeerId, reachable: bool) {
        let mut state = self.state.lock();
        if reachable {
            state.reachable.insert(peer.clone());
        } else {
            state.reachable.remove(peer);
        }
    }

    /// Mark the first `n` peers of [`seed_addresses`] reachable.
    pub fn set_seeds_reachable(&self, n: usize) {
        for i in 1..=n {
            self.set_reachable(&seed_id(i), true);
        }
    }

    pub fn set_listen_address_count(&self, count: usize) {
        self.state.lock().listen_addresses = count;
    }

    /// Make every count query fail with [`HostError::Query`].
    pub fn set_query_failure(&self, fail: bool) {
        self.state.lock().fail_queries = fail;
    }

    /// Total `connect` invocations so far.
    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn connected(&self) -> Vec<PeerId> {
        let mut peers: Vec<_> = self.state.lock().connected.iter().cloned().collect();
        peers.sort();
        peers
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    /// Drop the connection to `peer` and notify subscribers.
    pub fn disconnect(&self, peer: &PeerId) {
        let removed = self.state.lock().connected.remove(peer);
        if removed {
            self.notify(|n| n.disconnected(peer));
        }
    }

    /// Drop every connection, notifying once per peer.
    pub fn disconnect_all(&self) {
        for peer in self.connected() {
            self.disconnect(&peer);
        }
    }

    /// Emit a `connected` event without changing state.
    pub fn emit_connected(&self, peer: &PeerId) {
        self.notify(|n| n.connected(peer));
    }

    fn notify(&self, event: impl Fn(&dyn HostNotifiee)) {
        let subscribers: Vec<_> = self.state.lock().subscribers.values().cloned().collect();
        for subscriber in subscribers {
            event(subscriber.as_ref());
        }
    }
}

#[async_trait]
impl NetworkHost for InMemoryHost {
    async fn connect(&self, peer: &PeerRecord) -> Result<(), HostError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }

        let newly_connected = {
            let mut state = self.state.lock();
            if !state.reachable.contains(&peer.id) {
                return Err(HostError::Unreachable);
            }
            state.connected.insert(peer.id.clone())
        };

        if newly_connected {
            self.notify(|n| n.connected(&peer.id));
        }
        Ok(())
    }

    fn connected_peer_count(&self) -> Result<usize, HostError> {
        let state = self.state.lock();
        if state.fail_queries {
            return Err(HostError::Query("peer enumeration unavailable".into()));
        }
        Ok(state.connected.len())
    }

    fn listen_address_count(&self) -> Result<usize, HostError> {
        let state = self.state.lock();
        if state.fail_queries {
            return Err(HostError::Query("listen addresses unavailable".into()));
        }
        Ok(state.listen_addresses)
    }

    fn subscribe(&self, notifiee: Arc<dyn HostNotifiee>) -> Result<SubscriptionId, HostError> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.state.lock().subscribers.insert(id, notifiee);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state.lock().subscribers.remove(&id);
    }
}
