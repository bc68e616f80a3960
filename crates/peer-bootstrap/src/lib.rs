//! # Peer Bootstrap
//!
//! Keeps a peer-to-peer node connected to a minimum number of peers by
//! dialing a fixed list of seed peers, both at startup and whenever the
//! connection count falls below the configured minimum.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Config, seed address book, errors, sweep reports
//! - **State Layer:** Actor-owned peer count and lifecycle flag
//! - **Ports Layer:** `BootstrapApi` (driving), `NetworkHost` and
//!   `AddressResolver` (driven)
//! - **Service Layer:** Sweeps, connection listener, soft/hard timers
//! - **Adapters Layer:** Multiaddr resolver, TOML config loader
//!
//! ## Example
//!
//! ```rust,ignore
//! use peer_bootstrap::{BootstrapApi, BootstrapConfig, BootstrapService, MultiaddrResolver};
//!
//! let config = BootstrapConfig::new(
//!     vec!["/ip4/104.131.131.82/tcp/4001/p2p/QmaCpDMGvV2BGHeYERUEnRQAwe3N8SzbUtfsmvsqQLuvuJ".into()],
//!     1,
//! );
//! let service = BootstrapService::new(config, host, &MultiaddrResolver)?;
//! service.start().await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod state;

/// In-memory host and seed fixtures.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use domain::{
    AddressBook, BootstrapConfig, BootstrapError, BootstrapStats, ConfigError, ConnectError,
    DialContext, DialFailure, HostError, LifecycleError, Multiaddr, PeerId, PeerRecord,
    ResolveError, StateError, StatsSnapshot, SweepError, SweepReport, SweepTrigger,
};

pub use ports::{AddressResolver, BootstrapApi, HostNotifiee, NetworkHost, SubscriptionId};

pub use service::{BootstrapService, ConnectionOrchestrator, EventListener};

pub use state::{LifecycleState, PeerCountTracker};

pub use adapters::MultiaddrResolver;

#[cfg(feature = "toml-config")]
pub use adapters::TomlConfigLoader;
