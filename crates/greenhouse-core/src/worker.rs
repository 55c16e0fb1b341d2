//! Background refresh loop.
//!
//! The worker owns the [`SensorHistoryTracker`] and the gateway. On every
//! timer tick, and whenever the UI asks for it, it fetches a snapshot,
//! applies it, and sends a copy of the resulting state to the UI. A failed
//! fetch is applied as an empty snapshot, which flags every sensor.
//!
//! Actuator commands from the UI are forwarded to the gateway and their
//! outcome reported back as events.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use greenhouse_types::{ActuatorCommand, Snapshot};

use crate::history::{SensorHistoryTracker, UpdateReport};
use crate::messages::{Command, DashboardEvent, TickUpdate};
use crate::traits::Gateway;

/// Default time between refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(3000);

/// Default number of timed refreshes before the loop goes idle.
pub const DEFAULT_REFRESH_LIMIT: u64 = 1000;

/// Refresh loop settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Time between timed refreshes.
    pub refresh_interval: Duration,
    /// Stop timed refreshes after this many; `None` means never.
    pub refresh_limit: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            refresh_limit: Some(DEFAULT_REFRESH_LIMIT),
        }
    }
}

/// Fetch one snapshot and apply it to `tracker`.
///
/// Returns the update report and, if the fetch failed, the error text. The
/// tracker is always updated.
pub async fn refresh_once<G: Gateway + ?Sized>(
    gateway: &G,
    tracker: &mut SensorHistoryTracker,
) -> (UpdateReport, Option<String>) {
    let (snapshot, fetch_error) = match gateway.fetch_snapshot().await {
        Ok(snapshot) => (snapshot, None),
        Err(e) => {
            warn!(gateway = %gateway.describe(), "Failed to fetch sensors: {}", e);
            (Snapshot::new(), Some(e.to_string()))
        }
    };

    let report = tracker.update(&snapshot);
    for (kind, failure) in report.failures() {
        debug!(sensor = %kind, %failure, "Sensor in error");
    }
    (report, fetch_error)
}

/// Background worker driving refreshes and actuator commands.
pub struct DashboardWorker<G> {
    gateway: G,
    tracker: SensorHistoryTracker,
    config: WorkerConfig,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<DashboardEvent>,
    cancel: CancellationToken,
    ticks: u64,
    timed_ticks: u64,
}

impl<G: Gateway> DashboardWorker<G> {
    /// Create a worker with an empty tracker.
    pub fn new(
        gateway: G,
        config: WorkerConfig,
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<DashboardEvent>,
    ) -> Self {
        Self {
            gateway,
            tracker: SensorHistoryTracker::new(),
            config,
            command_rx,
            event_tx,
            cancel: CancellationToken::new(),
            ticks: 0,
            timed_ticks: 0,
        }
    }

    /// Token that stops the worker when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn limit_reached(&self) -> bool {
        self.config
            .refresh_limit
            .is_some_and(|limit| self.timed_ticks >= limit)
    }

    /// Run until shutdown, cancellation, or either channel closing.
    pub async fn run(mut self) {
        info!(
            gateway = %self.gateway.describe(),
            interval = ?self.config.refresh_interval,
            limit = ?self.config.refresh_limit,
            "DashboardWorker started"
        );

        let mut ticker = interval(self.config.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("DashboardWorker cancelled");
                    break;
                }
                cmd = self.command_rx.recv() => {
                    let keep_running = match cmd {
                        Some(Command::Shutdown) | None => {
                            info!("DashboardWorker received shutdown");
                            false
                        }
                        Some(Command::Refresh) => self.refresh().await,
                        Some(Command::SendActuator(command)) => self.send_actuator(command).await,
                    };
                    if !keep_running {
                        break;
                    }
                }
                _ = ticker.tick(), if !self.limit_reached() => {
                    self.timed_ticks += 1;
                    if !self.refresh().await {
                        break;
                    }
                    if self.limit_reached() {
                        info!(ticks = self.timed_ticks, "Refresh limit reached");
                        let event = DashboardEvent::RefreshLimitReached { ticks: self.timed_ticks };
                        if self.event_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }

        info!("DashboardWorker stopped");
    }

    /// Returns `false` once the UI has gone away.
    async fn refresh(&mut self) -> bool {
        let (report, fetch_error) = refresh_once(&self.gateway, &mut self.tracker).await;
        self.ticks += 1;

        let update = TickUpdate {
            tick: self.ticks,
            states: self.tracker.view(),
            report,
            fetch_error,
            at: OffsetDateTime::now_utc(),
        };
        self.event_tx
            .send(DashboardEvent::Updated(Box::new(update)))
            .await
            .is_ok()
    }

    async fn send_actuator(&mut self, command: ActuatorCommand) -> bool {
        let event = match self.gateway.send_command(command).await {
            Ok(()) => DashboardEvent::ActuatorSent { command },
            Err(e) => {
                warn!(%command, "Actuator command failed: {}", e);
                DashboardEvent::ActuatorFailed {
                    command,
                    error: e.user_message(),
                }
            }
        };
        self.event_tx.send(event).await.is_ok()
    }
}
