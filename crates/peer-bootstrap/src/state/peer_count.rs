//! Connected-peer count, serialized through a [`SyncedValue`].

use crate::domain::StateError;
use crate::state::SyncedValue;
use tokio::runtime::Handle;

/// Tracks how many peers the host currently reports as connected.
///
/// Written by the connection listener (and once at start); read by sweeps
/// and timer ticks. Starts at 0.
#[derive(Debug, Clone)]
pub struct PeerCountTracker {
    inner: SyncedValue<usize>,
}

impl PeerCountTracker {
    pub fn spawn_on(handle: &Handle) -> Self {
        Self {
            inner: SyncedValue::spawn_on(0, handle),
        }
    }

    pub async fn get(&self) -> Result<usize, StateError> {
        self.inner.get().await
    }

    /// Non-blocking; safe from host callback threads.
    pub fn set(&self, count: usize) -> Result<(), StateError> {
        self.inner.set(count)
    }

    /// True when the tracked count is at least `min_peers`.
    pub async fn meets(&self, min_peers: usize) -> Result<bool, StateError> {
        Ok(self.get().await? >= min_peers)
    }
}
