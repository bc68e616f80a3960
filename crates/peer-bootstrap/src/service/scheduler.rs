//! Dual-timer reconciliation.
//!
//! - **Soft** timer: below the minimum, sweep only when the host's listen
//!   address count changed since the last observation (new interface, NAT
//!   mapping, ...).
//! - **Hard** timer: below the minimum, sweep unconditionally.
//!
//! Each loop waits on its interval and the shutdown signal together, so
//! `stop()` takes effect at the next wait point. A sweep that already began
//! runs to completion.

use crate::domain::{BootstrapConfig, BootstrapError, DialContext, LifecycleError, SweepTrigger};
use crate::ports::NetworkHost;
use crate::service::ConnectionOrchestrator;
use crate::state::PeerCountTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Join handles of the two timer loops.
pub struct SchedulerHandles {
    pub soft: JoinHandle<()>,
    pub hard: JoinHandle<()>,
}

/// Owns the timer configuration and launches both loops.
pub struct ReconciliationScheduler {
    orchestrator: ConnectionOrchestrator,
    host: Arc<dyn NetworkHost>,
    peers: PeerCountTracker,
    min_peers: usize,
    soft_interval: Duration,
    hard_interval: Duration,
    dial_timeout: Option<Duration>,
}

impl ReconciliationScheduler {
    pub fn new(
        orchestrator: ConnectionOrchestrator,
        host: Arc<dyn NetworkHost>,
        peers: PeerCountTracker,
        config: &BootstrapConfig,
    ) -> Self {
        Self {
            orchestrator,
            host,
            peers,
            min_peers: config.min_peers,
            soft_interval: config.bootstrap_interval,
            hard_interval: config.hard_bootstrap_interval,
            dial_timeout: config.dial_timeout,
        }
    }

    /// Spawn both loops. They exit once `shutdown` reads `true` or its
    /// sender is dropped. The first tick of each comes one period after launch.
    ///
    /// `listen_baseline` is the soft timer's first reference point; take it
    /// with [`observe_listen_addresses`] when the connection listener starts.
    pub fn launch(
        self,
        listen_baseline: Option<usize>,
        shutdown: watch::Receiver<bool>,
    ) -> SchedulerHandles {
        let this = Arc::new(self);

        let soft = tokio::spawn(Arc::clone(&this).run_soft(listen_baseline, shutdown.clone()));
        let hard = tokio::spawn(this.run_hard(shutdown));

        SchedulerHandles { soft, hard }
    }

    async fn run_soft(
        self: Arc<Self>,
        mut last_listen_count: Option<usize>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut ticker = interval_at(Instant::now() + self.soft_interval, self.soft_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while wait_for_tick(&mut ticker, &mut shutdown).await {
            self.soft_tick(&mut last_listen_count).await;
        }
        debug!("Soft bootstrap timer stopped");
    }

    async fn run_hard(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + self.hard_interval, self.hard_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        while wait_for_tick(&mut ticker, &mut shutdown).await {
            if self.below_minimum().await {
                self.sweep(SweepTrigger::Hard).await;
            }
        }
        debug!("Hard bootstrap timer stopped");
    }

    async fn soft_tick(&self, last_listen_count: &mut Option<usize>) {
        if !self.below_minimum().await {
            return;
        }

        let Some(current) = observe_listen_addresses(self.host.as_ref()) else {
            return;
        };

        if *last_listen_count == Some(current) {
            debug!(listen_addresses = current, "Listen addresses unchanged");
            return;
        }

        debug!(
            previous = ?last_listen_count,
            listen_addresses = current,
            "Listen addresses changed"
        );
        *last_listen_count = Some(current);
        self.sweep(SweepTrigger::Soft).await;
    }

    async fn below_minimum(&self) -> bool {
        match self.peers.meets(self.min_peers).await {
            Ok(met) => !met,
            Err(e) => {
                warn!(error = %e, "Failed to read connected peer count");
                false
            }
        }
    }

    async fn sweep(&self, trigger: SweepTrigger) {
        let ctx = DialContext::from_timeout(self.dial_timeout);
        match self.orchestrator.sweep(ctx, trigger).await {
            Ok(_) => {}
            Err(BootstrapError::Lifecycle(LifecycleError::NotStarted)) => {
                debug!(trigger = trigger.as_str(), "Service stopped, sweep skipped");
            }
            Err(e) => warn!(trigger = trigger.as_str(), error = %e, "Bootstrap sweep incomplete"),
        }
    }
}

/// Current listen address count, `None` if the host cannot say.
pub fn observe_listen_addresses(host: &dyn NetworkHost) -> Option<usize> {
    match host.listen_address_count() {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Failed to query listen addresses");
            None
        }
    }
}

/// Wait for the next tick. Returns `false` once shutdown was signalled.
async fn wait_for_tick(
    ticker: &mut tokio::time::Interval,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    loop {
        if *shutdown.borrow() {
            return false;
        }
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    return false;
                }
            }
            _ = ticker.tick() => return !*shutdown.borrow(),
        }
    }
}
