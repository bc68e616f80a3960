//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** APIs this crate exposes to the node
//! - **Driven Ports (Outbound):** SPIs this crate requires from the host

pub mod inbound;
pub mod outbound;

pub use inbound::BootstrapApi;
pub use outbound::{AddressResolver, HostNotifiee, NetworkHost, SubscriptionId};
