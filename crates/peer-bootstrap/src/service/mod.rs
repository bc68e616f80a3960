//! # Bootstrap Service
//!
//! High-level service implementing the `BootstrapApi` port.
//!
//! ```text
//!  start() ──► LifecycleState ──► PeerCountTracker.set(host count)
//!          ──► host.subscribe(EventListener)
//!          ──► ConnectionOrchestrator.sweep()          (initial, synchronous)
//!          ──► ReconciliationScheduler { soft loop, hard loop }
//!
//!  host events ──► EventListener ──► PeerCountTracker.set(..)
//!  soft tick   ──► listen-address delta? ──► sweep
//!  hard tick   ──► below minimum?         ──► sweep
//! ```
//!
//! Sweeps from different triggers may overlap; repeated dials to the same
//! seed are left to the host to deduplicate.

// Semantic submodules
mod core;
mod lifecycle;
pub mod listener;
pub mod orchestrator;
pub mod scheduler;

// Re-export public API
pub use self::core::BootstrapService;
pub use listener::EventListener;
pub use orchestrator::ConnectionOrchestrator;
pub use scheduler::{observe_listen_addresses, ReconciliationScheduler, SchedulerHandles};

#[cfg(test)]
mod tests;
