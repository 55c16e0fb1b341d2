//! In-memory gateway for testing and offline demos.
//!
//! [`MockGateway`] implements [`Gateway`], so the poll loop and commands can
//! be exercised without a running gateway.
//!
//! # Features
//!
//! - **Scripted snapshots**: queue snapshots or failures to be returned in order
//! - **Failure injection**: make actuator commands fail with a given detail
//! - **Latency simulation**: delay every request by a fixed amount
//! - **Command recording**: inspect every command that was sent

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use greenhouse_types::{ActuatorCommand, SensorKind, SensorReading, Snapshot};

use crate::error::{Error, Result};
use crate::traits::Gateway;

enum Scripted {
    Snapshot(Snapshot),
    Failure(String),
}

/// A mock gateway for testing.
///
/// When the script queue is empty, every fetch returns the base snapshot.
///
/// # Example
///
/// ```
/// use greenhouse_core::{Gateway, MockGateway};
/// use greenhouse_types::SensorKind;
///
/// #[tokio::main]
/// async fn main() {
///     let gateway = MockGateway::with_values(21.0, 800.0, 65.0);
///     let snapshot = gateway.fetch_snapshot().await.unwrap();
///     assert_eq!(snapshot.first(SensorKind::Light).unwrap().parse_value(), Ok(800.0));
/// }
/// ```
pub struct MockGateway {
    base: RwLock<Snapshot>,
    script: RwLock<VecDeque<Scripted>>,
    commands: RwLock<Vec<ActuatorCommand>>,
    command_failure: RwLock<Option<String>>,
    fetch_count: AtomicU32,
    latency_ms: AtomicU64,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(Snapshot::new())
    }
}

impl MockGateway {
    /// Create a mock that always returns `snapshot`.
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            base: RwLock::new(snapshot),
            script: RwLock::new(VecDeque::new()),
            commands: RwLock::new(Vec::new()),
            command_failure: RwLock::new(None),
            fetch_count: AtomicU32::new(0),
            latency_ms: AtomicU64::new(0),
        }
    }

    /// Create a mock reporting one active sensor of each type.
    pub fn with_values(temperature: f64, light: f64, humidity: f64) -> Self {
        Self::new(values_snapshot(temperature, light, humidity))
    }

    /// Replace the snapshot returned once the script is exhausted.
    pub async fn set_snapshot(&self, snapshot: Snapshot) {
        *self.base.write().await = snapshot;
    }

    /// Queue a snapshot; queued entries are returned before the base snapshot.
    pub async fn push_snapshot(&self, snapshot: Snapshot) {
        self.script.write().await.push_back(Scripted::Snapshot(snapshot));
    }

    /// Queue a failed fetch.
    pub async fn push_failure(&self, message: &str) {
        self.script
            .write()
            .await
            .push_back(Scripted::Failure(message.to_string()));
    }

    /// Make every subsequent command fail with `detail`, or succeed with `None`.
    pub async fn set_command_failure(&self, detail: Option<&str>) {
        *self.command_failure.write().await = detail.map(str::to_string);
    }

    /// Commands received so far, in order.
    pub async fn commands(&self) -> Vec<ActuatorCommand> {
        self.commands.read().await.clone()
    }

    /// Number of fetches performed.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Set simulated latency for every request.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::Relaxed);
    }

    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::Relaxed);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        self.simulate_latency().await;
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        match self.script.write().await.pop_front() {
            Some(Scripted::Snapshot(snapshot)) => Ok(snapshot),
            Some(Scripted::Failure(message)) => Err(Error::api(503, message)),
            None => Ok(self.base.read().await.clone()),
        }
    }

    async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        self.simulate_latency().await;
        self.commands.write().await.push(command);

        match self.command_failure.read().await.as_ref() {
            Some(detail) => Err(Error::api(400, detail.clone())),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "mock gateway".to_string()
    }
}

/// A snapshot with one active reading per sensor type.
pub fn values_snapshot(temperature: f64, light: f64, humidity: f64) -> Snapshot {
    SensorKind::ALL
        .into_iter()
        .zip([temperature, light, humidity])
        .fold(Snapshot::new(), |snapshot, (kind, value)| {
            snapshot.with_reading(kind, SensorReading::with_value(value.to_string()).with_active(true))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_types::Actuator;

    #[tokio::test]
    async fn test_default_returns_base_snapshot() {
        let gateway = MockGateway::with_values(20.0, 500.0, 55.0);

        let snapshot = gateway.fetch_snapshot().await.unwrap();
        assert_eq!(
            snapshot.first(SensorKind::Temperature).unwrap().parse_value(),
            Ok(20.0)
        );
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_script_is_consumed_in_order() {
        let gateway = MockGateway::default();
        gateway.push_snapshot(values_snapshot(1.0, 2.0, 3.0)).await;
        gateway.push_failure("gateway down").await;

        assert!(!gateway.fetch_snapshot().await.unwrap().is_empty());

        let err = gateway.fetch_snapshot().await.unwrap_err();
        assert_eq!(err.user_message(), "gateway down");
        assert!(err.is_retryable());

        // Falls back to the (empty) base snapshot
        assert!(gateway.fetch_snapshot().await.unwrap().is_empty());
        assert_eq!(gateway.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_commands_are_recorded() {
        let gateway = MockGateway::default();
        let cmd = ActuatorCommand::new(Actuator::Humidity, 70).unwrap();

        gateway.send_command(cmd).await.unwrap();

        assert_eq!(gateway.commands().await, vec![cmd]);
    }

    #[tokio::test]
    async fn test_command_failure_injection() {
        let gateway = MockGateway::default();
        gateway.set_command_failure(Some("Device unavailable")).await;

        let cmd = ActuatorCommand::new(Actuator::Light, 10).unwrap();
        let err = gateway.send_command(cmd).await.unwrap_err();

        assert_eq!(err.user_message(), "Device unavailable");
        // Still recorded
        assert_eq!(gateway.commands().await.len(), 1);

        gateway.set_command_failure(None).await;
        assert!(gateway.send_command(cmd).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_simulation() {
        let gateway = MockGateway::default();
        gateway.set_latency(Duration::from_millis(500));

        let start = tokio::time::Instant::now();
        gateway.fetch_snapshot().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
