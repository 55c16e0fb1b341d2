//! Short-lived snapshot cache in front of a gateway.
//!
//! Several refresh triggers can land within a few hundred milliseconds of
//! each other (timer tick, manual refresh, a command). [`CachedGateway`]
//! answers those from the last successful fetch while it is younger than
//! the TTL. Failed fetches are never cached.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::trace;

use greenhouse_types::{ActuatorCommand, Snapshot};

use crate::error::Result;
use crate::traits::Gateway;

/// Default time a fetched snapshot stays fresh.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2);

/// A [`Gateway`] that reuses recent snapshots.
///
/// A TTL of zero disables caching. Commands always pass straight through.
pub struct CachedGateway<G> {
    inner: G,
    ttl: Duration,
    cached: RwLock<Option<(Instant, Snapshot)>>,
}

impl<G: Gateway> CachedGateway<G> {
    /// Wrap `inner`, caching snapshots for `ttl`.
    pub fn new(inner: G, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop the cached snapshot so the next fetch hits the gateway.
    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    async fn fresh(&self) -> Option<Snapshot> {
        let cached = self.cached.read().await;
        cached
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, snapshot)| snapshot.clone())
    }
}

#[async_trait]
impl<G: Gateway> Gateway for CachedGateway<G> {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        if self.ttl.is_zero() {
            return self.inner.fetch_snapshot().await;
        }

        if let Some(snapshot) = self.fresh().await {
            trace!("Serving cached snapshot");
            return Ok(snapshot);
        }

        let snapshot = self.inner.fetch_snapshot().await?;
        *self.cached.write().await = Some((Instant::now(), snapshot.clone()));
        Ok(snapshot)
    }

    async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        self.inner.send_command(command).await
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
