//! Connection sweep: fan out one dial per seed, join on all of them.

use crate::domain::{
    AddressBook, BootstrapError, BootstrapStats, ConnectError, DialContext, DialFailure,
    LifecycleError, PeerRecord, SweepError, SweepReport, SweepTrigger,
};
use crate::ports::NetworkHost;
use crate::state::{LifecycleState, PeerCountTracker};
use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

enum DialOutcome {
    /// Minimum already met when the task ran.
    Skipped,
    Connected,
    Failed(ConnectError),
}

/// Performs sweeps over the seed list.
///
/// Cheap to clone; every clone shares the same seeds, host and state.
#[derive(Clone)]
pub struct ConnectionOrchestrator {
    seeds: Arc<AddressBook>,
    host: Arc<dyn NetworkHost>,
    peers: PeerCountTracker,
    lifecycle: LifecycleState,
    min_peers: usize,
    stats: Arc<BootstrapStats>,
}

impl ConnectionOrchestrator {
    pub fn new(
        seeds: Arc<AddressBook>,
        host: Arc<dyn NetworkHost>,
        peers: PeerCountTracker,
        lifecycle: LifecycleState,
        min_peers: usize,
        stats: Arc<BootstrapStats>,
    ) -> Self {
        Self {
            seeds,
            host,
            peers,
            lifecycle,
            min_peers,
            stats,
        }
    }

    /// Run one sweep.
    ///
    /// Spawns a task per seed. Each task re-reads the tracked peer count and
    /// dials only while it is below `min_peers`; tasks racing each other may
    /// still dial more seeds than strictly needed. Returns once every task
    /// has finished.
    ///
    /// # Errors
    ///
    /// - `Lifecycle(NotStarted)` without dialing if the service is stopped
    /// - `Sweep(..)` listing every failed dial
    pub async fn sweep(
        &self,
        ctx: DialContext,
        trigger: SweepTrigger,
    ) -> Result<SweepReport, BootstrapError> {
        if !self.lifecycle.has_started().await? {
            return Err(LifecycleError::NotStarted.into());
        }
        self.stats.record_sweep(trigger);

        debug!(
            trigger = trigger.as_str(),
            seeds = self.seeds.len(),
            min_peers = self.min_peers,
            "Starting bootstrap sweep"
        );

        let (seeds, tasks): (Vec<_>, Vec<_>) = self
            .seeds
            .seeds()
            .iter()
            .map(|seed| {
                let this = self.clone();
                let task_seed = seed.clone();
                let task = tokio::spawn(async move { this.dial(&task_seed, ctx).await });
                (seed, task)
            })
            .unzip();

        let mut report = SweepReport::default();
        let mut failures = Vec::new();

        for (seed, joined) in seeds.into_iter().zip(join_all(tasks).await) {
            let outcome = joined.unwrap_or_else(|e| {
                DialOutcome::Failed(connect_error(seed, DialFailure::TaskAborted(e.to_string())))
            });
            match outcome {
                DialOutcome::Skipped => report.skipped += 1,
                DialOutcome::Connected => {
                    report.attempted += 1;
                    report.connected += 1;
                }
                DialOutcome::Failed(err) => {
                    report.attempted += 1;
                    failures.push(err);
                }
            }
        }

        self.stats.record_dials(report.attempted, failures.len());
        info!(
            trigger = trigger.as_str(),
            attempted = report.attempted,
            connected = report.connected,
            skipped = report.skipped,
            failed = failures.len(),
            "Bootstrap sweep complete"
        );

        if failures.is_empty() {
            Ok(report)
        } else {
            Err(SweepError {
                attempted: report.attempted,
                failures,
            }
            .into())
        }
    }

    async fn dial(&self, seed: &PeerRecord, ctx: DialContext) -> DialOutcome {
        match self.peers.meets(self.min_peers).await {
            Ok(true) => {
                debug!(peer = %seed.id, "Peer minimum met, skipping seed");
                return DialOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => return DialOutcome::Failed(connect_error(seed, e.into())),
        }

        debug!(peer = %seed.id, address = %seed.address, "Dialing seed peer");
        let started = Instant::now();
        let result = match ctx.deadline() {
            Some(deadline) => match timeout_at(deadline, self.host.connect(seed)).await {
                Ok(result) => result.map_err(DialFailure::from),
                Err(_) => Err(DialFailure::DeadlineExceeded(started.elapsed())),
            },
            None => self.host.connect(seed).await.map_err(DialFailure::from),
        };

        match result {
            Ok(()) => {
                info!(peer = %seed.id, address = %seed.address, "Connected to seed peer");
                DialOutcome::Connected
            }
            Err(failure) => {
                warn!(
                    peer = %seed.id,
                    address = %seed.address,
                    error = %failure,
                    "Failed to connect to seed peer"
                );
                DialOutcome::Failed(connect_error(seed, failure))
            }
        }
    }
}

fn connect_error(seed: &PeerRecord, failure: DialFailure) -> ConnectError {
    ConnectError {
        peer: seed.id.clone(),
        address: seed.address.clone(),
        failure,
    }
}
