//! Started/stopped flag, serialized through a [`SyncedValue`].

use crate::domain::{BootstrapError, LifecycleError, StateError};
use crate::state::SyncedValue;
use tokio::runtime::Handle;

/// `Stopped` (initial) ⇄ `Started`.
///
/// Each transition is a single check-and-set inside the actor, so two
/// concurrent `start()` calls can never both succeed.
#[derive(Debug, Clone)]
pub struct LifecycleState {
    started: SyncedValue<bool>,
}

impl LifecycleState {
    pub fn spawn_on(handle: &Handle) -> Self {
        Self {
            started: SyncedValue::spawn_on(false, handle),
        }
    }

    pub async fn has_started(&self) -> Result<bool, StateError> {
        self.started.get().await
    }

    /// `Stopped → Started`. Fails with `AlreadyStarted`, leaving the state untouched.
    pub async fn start(&self) -> Result<(), BootstrapError> {
        self.transition(true, LifecycleError::AlreadyStarted).await
    }

    /// `Started → Stopped`. Fails with `NotStarted`, leaving the state untouched.
    pub async fn stop(&self) -> Result<(), BootstrapError> {
        self.transition(false, LifecycleError::NotStarted).await
    }

    async fn transition(&self, to: bool, illegal: LifecycleError) -> Result<(), BootstrapError> {
        let changed = self
            .started
            .update(move |started| {
                if *started == to {
                    false
                } else {
                    *started = to;
                    true
                }
            })
            .await?;

        if changed {
            Ok(())
        } else {
            Err(illegal.into())
        }
    }
}
