//! Tests for BootstrapService

use super::*;
use crate::adapters::MultiaddrResolver;
use crate::domain::{
    BootstrapConfig, BootstrapError, ConfigError, DialContext, HostError, LifecycleError,
    PeerRecord, ResolveError,
};
use crate::ports::{BootstrapApi, HostNotifiee, NetworkHost, SubscriptionId};
use crate::testing::{seed_addresses, seed_id, InMemoryHost};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Route service logs to the test harness; `RUST_LOG=peer_bootstrap=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn test_config(seeds: usize, min_peers: usize) -> BootstrapConfig {
    BootstrapConfig::new(seed_addresses(seeds), min_peers)
        .with_bootstrap_interval(Duration::from_secs(1))
        .with_hard_bootstrap_interval(Duration::from_secs(10))
}

fn create_service(seeds: usize, min_peers: usize) -> (BootstrapService, Arc<InMemoryHost>) {
    init_tracing();
    let host = Arc::new(InMemoryHost::new());
    let service =
        BootstrapService::new(test_config(seeds, min_peers), host.clone(), &MultiaddrResolver)
            .unwrap();
    (service, host)
}

// =============================================================================
// Construction
// =============================================================================

#[tokio::test]
async fn test_new_rejects_min_peers_above_seed_count() {
    let host = Arc::new(InMemoryHost::new());
    let err = BootstrapService::new(test_config(3, 4), host, &MultiaddrResolver).unwrap_err();

    assert_eq!(
        err,
        ConfigError::TooFewSeeds {
            min_peers: 4,
            seeds: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "Too few bootstrapping nodes. Expected at least: 4, got: 3"
    );
}

#[tokio::test]
async fn test_new_rejects_unresolvable_seed() {
    let mut seeds = seed_addresses(2);
    seeds.push("not-an-address".to_string());
    let config = BootstrapConfig::new(seeds, 1);

    let err = BootstrapService::new(config, Arc::new(InMemoryHost::new()), &MultiaddrResolver)
        .unwrap_err();

    assert!(matches!(err, ConfigError::Resolve { ref address, .. } if address == "not-an-address"));
}

#[tokio::test]
async fn test_new_rejects_seed_with_invalid_peer_id() {
    for bad in ["/ip4/1.2.3.4/tcp/4001/p2p/Qm", "/ip4/1.2.3.5/tcp/4001/p2p/1"] {
        let mut seeds = seed_addresses(1);
        seeds.push(bad.to_string());
        let config = BootstrapConfig::new(seeds, 1);

        let err = BootstrapService::new(config, Arc::new(InMemoryHost::new()), &MultiaddrResolver)
            .unwrap_err();

        assert!(
            matches!(
                err,
                ConfigError::Resolve { ref address, source: ResolveError::Malformed(_) }
                    if address == bad
            ),
            "unexpected error for {bad}: {err}"
        );
    }
}

#[test]
fn test_new_requires_runtime() {
    let err = BootstrapService::new(
        test_config(2, 1),
        Arc::new(InMemoryHost::new()),
        &MultiaddrResolver,
    )
    .unwrap_err();

    assert_eq!(err, ConfigError::NoRuntime);
}

#[tokio::test]
async fn test_new_exposes_resolved_seeds_in_order() {
    let (service, host) = create_service(3, 2);

    let ids: Vec<_> = service.seeds().iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![seed_id(1), seed_id(2), seed_id(3)]);
    assert_eq!(service.config().min_peers, 2);
    assert_eq!(service.has_started().await, Ok(false));
    assert_eq!(host.subscriber_count(), 0);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_double_start_rejected() {
    let (service, host) = create_service(2, 1);
    host.set_seeds_reachable(2);

    service.start().await.unwrap();
    let result = service.start().await;

    assert_eq!(
        result,
        Err(BootstrapError::Lifecycle(LifecycleError::AlreadyStarted))
    );
    assert_eq!(service.has_started().await, Ok(true));
    assert_eq!(host.subscriber_count(), 1);
}

#[tokio::test]
async fn test_stop_without_start_rejected() {
    let (service, _host) = create_service(2, 1);

    let result = service.stop().await;
    assert!(result.as_ref().is_err_and(BootstrapError::is_not_started));
}

#[tokio::test]
async fn test_bootstrap_while_stopped_does_not_dial() {
    let (service, host) = create_service(3, 1);
    host.set_seeds_reachable(3);

    let result = service.bootstrap(DialContext::background()).await;

    assert_eq!(
        result,
        Err(BootstrapError::Lifecycle(LifecycleError::NotStarted))
    );
    assert_eq!(host.connect_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_start_rolls_back() {
    let (service, host) = create_service(2, 1);
    host.set_seeds_reachable(2);
    host.set_query_failure(true);

    let result = service.start().await;
    assert!(matches!(
        result,
        Err(BootstrapError::Host(HostError::Query(_)))
    ));
    assert_eq!(service.has_started().await, Ok(false));
    assert_eq!(host.subscriber_count(), 0);

    host.set_query_failure(false);
    service.start().await.unwrap();
    assert_eq!(service.has_started().await, Ok(true));
}

#[tokio::test(start_paused = true)]
async fn test_stop_start_stop_cycle() {
    let (service, host) = create_service(2, 2);
    host.set_seeds_reachable(2);

    service.start().await.unwrap();
    service.stop().await.unwrap();
    // Both seeds are still connected, so the second start dials nothing
    service.start().await.unwrap();
    assert_eq!(host.connect_calls(), 2);

    host.disconnect_all();
    service.stop().await.unwrap();
    assert_eq!(host.subscriber_count(), 0);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(host.connect_calls(), 2);
    assert_eq!(service.stats().sweeps, 2);
    assert_eq!(service.has_started().await, Ok(false));
}

#[tokio::test(start_paused = true)]
async fn test_close_is_stop() {
    let (service, host) = create_service(2, 1);
    host.set_seeds_reachable(2);

    service.start().await.unwrap();
    service.close().await.unwrap();
    assert_eq!(service.has_started().await, Ok(false));

    let again = service.close().await;
    assert_eq!(
        again,
        Err(BootstrapError::Lifecycle(LifecycleError::NotStarted))
    );
}

/// Host whose peer enumeration blocks the calling thread.
struct SlowCountHost {
    inner: InMemoryHost,
    delay: Duration,
}

#[async_trait]
impl NetworkHost for SlowCountHost {
    async fn connect(&self, peer: &PeerRecord) -> Result<(), HostError> {
        self.inner.connect(peer).await
    }

    fn connected_peer_count(&self) -> Result<usize, HostError> {
        std::thread::sleep(self.delay);
        self.inner.connected_peer_count()
    }

    fn listen_address_count(&self) -> Result<usize, HostError> {
        self.inner.listen_address_count()
    }

    fn subscribe(&self, notifiee: Arc<dyn HostNotifiee>) -> Result<SubscriptionId, HostError> {
        self.inner.subscribe(notifiee)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.unsubscribe(id)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stop_during_slow_start_leaves_no_subscription() {
    init_tracing();
    let host = Arc::new(SlowCountHost {
        inner: InMemoryHost::new(),
        delay: Duration::from_millis(200),
    });
    let service = Arc::new(
        BootstrapService::new(test_config(2, 1), host.clone(), &MultiaddrResolver).unwrap(),
    );

    let starting = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.start().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stopped = service.stop().await;
    // Seeds are unreachable, so start reports a sweep error or NotStarted
    let _ = starting.await.unwrap();

    assert_eq!(stopped, Ok(()));
    assert_eq!(service.has_started().await, Ok(false));
    assert_eq!(host.inner.subscriber_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_started_service_unsubscribes() {
    let (service, host) = create_service(2, 1);
    host.set_seeds_reachable(2);

    service.start().await.unwrap();
    assert_eq!(host.subscriber_count(), 1);

    drop(service);
    assert_eq!(host.subscriber_count(), 0);
}

// =============================================================================
// Sweeps
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_start_reaches_minimum_with_partial_reachability() {
    let (service, host) = create_service(4, 2);
    host.set_seeds_reachable(2);

    let result = service.start().await;

    // Unreachable seeds that were still dialed surface as a sweep error
    assert!(matches!(result, Ok(()) | Err(BootstrapError::Sweep(_))));
    assert!(service.connected_peer_count().await.unwrap() >= 2);
    assert!(host.connect_calls() <= 4);
    assert_eq!(service.has_started().await, Ok(true));
    assert_eq!(host.subscriber_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_skips_dials_when_minimum_already_met() {
    let (service, host) = create_service(3, 2);
    host.set_seeds_reachable(2);
    for seed in service.seeds()[..2].to_vec() {
        host.connect(&seed).await.unwrap();
    }

    service.start().await.unwrap();

    assert_eq!(host.connect_calls(), 2);
    assert_eq!(service.connected_peer_count().await, Ok(2));
}

#[tokio::test(start_paused = true)]
async fn test_manual_bootstrap_reconnects() {
    let (service, host) = create_service(2, 2);
    host.set_seeds_reachable(2);
    service.start().await.unwrap();

    host.disconnect_all();
    assert_eq!(service.connected_peer_count().await, Ok(0));

    let report = service.bootstrap(DialContext::background()).await.unwrap();
    assert_eq!(report.connected, 2);
    assert_eq!(service.connected_peer_count().await, Ok(2));
}

// =============================================================================
// Reconciliation timers
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_hard_timer_restores_peers_after_disconnect() {
    let (service, host) = create_service(4, 2);
    host.set_seeds_reachable(2);
    let _ = service.start().await;
    let calls_after_start = host.connect_calls();

    host.disconnect_all();
    assert_eq!(service.connected_peer_count().await, Ok(0));

    // Listen addresses unchanged: soft ticks stay idle
    tokio::time::sleep(Duration::from_millis(5500)).await;
    assert_eq!(host.connect_calls(), calls_after_start);
    assert_eq!(service.stats().soft_sweeps, 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(service.stats().hard_sweeps, 1);
    assert!(service.connected_peer_count().await.unwrap() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_listen_address_change_triggers_soft_sweep() {
    let (service, host) = create_service(2, 2);
    host.set_reachable(&seed_id(1), true);
    let _ = service.start().await;
    assert_eq!(host.connect_calls(), 2);

    host.set_listen_address_count(1);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(service.stats().soft_sweeps, 1);
    assert_eq!(host.connect_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_listen_change_during_initial_sweep_triggers_soft_sweep() {
    init_tracing();
    let host = Arc::new(InMemoryHost::new().with_connect_delay(Duration::from_secs(5)));
    let service = Arc::new(
        BootstrapService::new(test_config(2, 2), host.clone(), &MultiaddrResolver).unwrap(),
    );

    let starting = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.start().await }
    });

    // Initial sweep is still dialing when a new listen address appears
    tokio::time::sleep(Duration::from_secs(2)).await;
    host.set_listen_address_count(1);

    let result = starting.await.unwrap();
    assert!(matches!(result, Err(BootstrapError::Sweep(_))));
    assert_eq!(service.stats().soft_sweeps, 0);

    // First soft tick lands one period after the initial sweep ends
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(service.stats().soft_sweeps, 1);
}
