//! Start/stop wiring and the `BootstrapApi` implementation.

use super::core::BootstrapService;
use crate::domain::{BootstrapError, DialContext, SweepReport, SweepTrigger};
use crate::ports::{BootstrapApi, HostNotifiee, NetworkHost, SubscriptionId};
use crate::service::{observe_listen_addresses, EventListener, ReconciliationScheduler};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Resources held while the service runs.
///
/// Dropping it unsubscribes the listener and signals both timer loops.
pub(crate) struct RunningSession {
    host: Arc<dyn NetworkHost>,
    subscription: SubscriptionId,
    shutdown: watch::Sender<bool>,
}

impl Drop for RunningSession {
    fn drop(&mut self) {
        self.host.unsubscribe(self.subscription);
        // Receivers may already be gone
        let _ = self.shutdown.send(true);
    }
}

/// What `start` needs after the session is stored.
struct SessionStart {
    shutdown: watch::Receiver<bool>,
    listen_baseline: Option<usize>,
}

impl BootstrapService {
    /// Seed the tracker, register the connection listener and record the
    /// listen address count the soft timer compares against.
    fn open_session(&self) -> Result<(RunningSession, SessionStart), BootstrapError> {
        let count = self.host.connected_peer_count()?;
        self.peers.set(count)?;

        let listener: Arc<dyn HostNotifiee> =
            Arc::new(EventListener::new(&self.host, self.peers.clone()));
        let subscription = self.host.subscribe(listener)?;

        let (shutdown, rx) = watch::channel(false);
        let session = RunningSession {
            host: Arc::clone(&self.host),
            subscription,
            shutdown,
        };
        let listen_baseline = observe_listen_addresses(self.host.as_ref());

        debug!(
            connected = count,
            listen_addresses = ?listen_baseline,
            "Connection listener registered"
        );
        Ok((
            session,
            SessionStart {
                shutdown: rx,
                listen_baseline,
            },
        ))
    }
}

#[async_trait]
impl BootstrapApi for BootstrapService {
    async fn start(&self) -> Result<(), BootstrapError> {
        let started = {
            let mut slot = self.session.lock().await;
            self.lifecycle.start().await?;

            match self.open_session() {
                Ok((session, started)) => {
                    *slot = Some(session);
                    started
                }
                Err(e) => {
                    warn!(error = %e, "Failed to start bootstrap service");
                    self.lifecycle.stop().await?;
                    return Err(e);
                }
            }
        };

        info!(
            seeds = self.address_book.len(),
            min_peers = self.config.min_peers,
            "Bootstrap service started"
        );

        let ctx = DialContext::from_timeout(self.config.dial_timeout);
        let initial = self.orchestrator.sweep(ctx, SweepTrigger::Initial).await;

        // A stop() during the initial sweep already signalled shutdown; the
        // loops see it before their first tick.
        ReconciliationScheduler::new(
            self.orchestrator.clone(),
            Arc::clone(&self.host),
            self.peers.clone(),
            &self.config,
        )
        .launch(started.listen_baseline, started.shutdown);

        if let Err(e) = &initial {
            warn!(error = %e, "Initial bootstrap incomplete");
        }
        initial.map(|_| ())
    }

    async fn stop(&self) -> Result<(), BootstrapError> {
        let session = {
            let mut slot = self.session.lock().await;
            self.lifecycle.stop().await?;
            slot.take()
        };
        drop(session);

        info!("Bootstrap service stopped");
        Ok(())
    }

    async fn bootstrap(&self, ctx: DialContext) -> Result<SweepReport, BootstrapError> {
        self.orchestrator.sweep(ctx, SweepTrigger::Manual).await
    }
}
