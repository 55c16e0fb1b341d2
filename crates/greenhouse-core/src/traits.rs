//! Trait abstraction over the greenhouse gateway.
//!
//! [`Gateway`] is implemented by the HTTP [`GatewayClient`](crate::GatewayClient),
//! the in-memory [`MockGateway`](crate::MockGateway) and the
//! [`CachedGateway`](crate::CachedGateway) wrapper, so the poll loop and the
//! commands can run against any of them.

use std::sync::Arc;

use async_trait::async_trait;

use greenhouse_types::{ActuatorCommand, Snapshot};

use crate::error::Result;

/// Source of sensor snapshots and sink for actuator commands.
///
/// # Example
///
/// ```
/// use greenhouse_core::{Gateway, Result, SensorHistoryTracker};
///
/// async fn refresh<G: Gateway + ?Sized>(gateway: &G, tracker: &mut SensorHistoryTracker) -> Result<()> {
///     let snapshot = gateway.fetch_snapshot().await?;
///     tracker.update(&snapshot);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch the current readings, grouped by sensor type.
    async fn fetch_snapshot(&self) -> Result<Snapshot>;

    /// Send one actuator set point.
    async fn send_command(&self, command: ActuatorCommand) -> Result<()>;

    /// Where this gateway lives, for logs and status lines.
    fn describe(&self) -> String;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        (**self).fetch_snapshot().await
    }

    async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        (**self).send_command(command).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for Box<G> {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        (**self).fetch_snapshot().await
    }

    async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        (**self).send_command(command).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
