use crate::domain::{
    AddressBook, BootstrapConfig, BootstrapStats, ConfigError, PeerRecord, StateError,
    StatsSnapshot,
};
use crate::ports::{AddressResolver, NetworkHost};
use crate::service::lifecycle::RunningSession;
use crate::service::ConnectionOrchestrator;
use crate::state::{LifecycleState, PeerCountTracker};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::debug;

/// Bootstrap service implementing the driving port.
///
/// Keeps the host connected to at least `min_peers` peers by sweeping the
/// seed list at start, on demand, and from the soft/hard timers.
///
/// # Example
///
/// ```rust,ignore
/// use peer_bootstrap::{BootstrapConfig, BootstrapService, MultiaddrResolver};
///
/// let config = BootstrapConfig::new(seeds, 4);
/// let service = BootstrapService::new(config, host, &MultiaddrResolver)?;
///
/// if let Err(e) = service.start().await {
///     tracing::warn!(error = %e, "Initial bootstrap incomplete");
/// }
/// // ...
/// service.stop().await?;
/// ```
pub struct BootstrapService {
    pub(crate) config: BootstrapConfig,
    pub(crate) address_book: Arc<AddressBook>,
    pub(crate) host: Arc<dyn NetworkHost>,
    pub(crate) peers: PeerCountTracker,
    pub(crate) lifecycle: LifecycleState,
    pub(crate) orchestrator: ConnectionOrchestrator,
    pub(crate) stats: Arc<BootstrapStats>,
    /// Subscription and timer shutdown of the current run, if started.
    ///
    /// Held across each lifecycle transition and the session setup or
    /// teardown that goes with it, so start and stop never interleave there.
    pub(crate) session: Mutex<Option<RunningSession>>,
}

impl BootstrapService {
    /// Create a new bootstrap service.
    ///
    /// Must be called from within a Tokio runtime; the state actors are
    /// spawned on it.
    ///
    /// # Arguments
    ///
    /// * `config` - Seeds, peer minimum and timer periods
    /// * `host` - The network host to dial through
    /// * `resolver` - Turns each seed address into a peer record
    ///
    /// # Errors
    ///
    /// `ConfigError` if the config is invalid, any seed fails to resolve,
    /// or no runtime is available. No service is produced in that case.
    pub fn new(
        config: BootstrapConfig,
        host: Arc<dyn NetworkHost>,
        resolver: &dyn AddressResolver,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let address_book = Arc::new(AddressBook::resolve(&config.seed_addresses, resolver)?);
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let peers = PeerCountTracker::spawn_on(&runtime);
        let lifecycle = LifecycleState::spawn_on(&runtime);
        let stats = Arc::new(BootstrapStats::default());
        let orchestrator = ConnectionOrchestrator::new(
            Arc::clone(&address_book),
            Arc::clone(&host),
            peers.clone(),
            lifecycle.clone(),
            config.min_peers,
            Arc::clone(&stats),
        );

        debug!(
            seeds = address_book.len(),
            min_peers = config.min_peers,
            "Bootstrap service created"
        );

        Ok(Self {
            config,
            address_book,
            host,
            peers,
            lifecycle,
            orchestrator,
            stats,
            session: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// The resolved seed peers, in configuration order.
    pub fn seeds(&self) -> &[PeerRecord] {
        self.address_book.seeds()
    }

    /// Currently tracked connected-peer count.
    pub async fn connected_peer_count(&self) -> Result<usize, StateError> {
        self.peers.get().await
    }

    pub async fn has_started(&self) -> Result<bool, StateError> {
        self.lifecycle.has_started().await
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl fmt::Debug for BootstrapService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapService")
            .field("config", &self.config)
            .field("seeds", &self.address_book.len())
            .field("running", &self.session.try_lock().map(|s| s.is_some()).ok())
            .finish_non_exhaustive()
    }
}
