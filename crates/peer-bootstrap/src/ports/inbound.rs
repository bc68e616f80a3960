//! # Driving Ports (Inbound API)
//!
//! The operations this crate exposes to the node that embeds it.

use crate::domain::{BootstrapError, DialContext, SweepReport};
use async_trait::async_trait;

/// Primary API of the bootstrap service.
///
/// # Example
///
/// ```rust,ignore
/// use peer_bootstrap::ports::BootstrapApi;
///
/// async fn run<T: BootstrapApi>(service: &T) -> Result<(), BootstrapError> {
///     if let Err(e) = service.start().await {
///         tracing::warn!(error = %e, "Initial bootstrap incomplete");
///     }
///     service.stop().await
/// }
/// ```
#[async_trait]
pub trait BootstrapApi: Send + Sync {
    /// Begin maintaining the peer minimum.
    ///
    /// # Returns
    ///
    /// - `Err(Lifecycle(AlreadyStarted))` if already running (no other effect)
    /// - `Err(Sweep(..))` if the initial sweep had failed dials; the service
    ///   is running regardless
    async fn start(&self) -> Result<(), BootstrapError>;

    /// Stop the timers and the connection listener.
    ///
    /// Returns `Err(Lifecycle(NotStarted))` if not running.
    async fn stop(&self) -> Result<(), BootstrapError>;

    /// Alias for [`stop`](Self::stop).
    async fn close(&self) -> Result<(), BootstrapError> {
        self.stop().await
    }

    /// Run one sweep now.
    ///
    /// Returns `Err(Lifecycle(NotStarted))` without dialing if not running.
    async fn bootstrap(&self, ctx: DialContext) -> Result<SweepReport, BootstrapError>;
}
