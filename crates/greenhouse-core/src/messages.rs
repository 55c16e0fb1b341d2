//! Message types for UI/worker communication.
//!
//! ```text
//! +------------------+     Command      +-------------------+
//! |    UI Thread     | --------------> |  DashboardWorker  |
//! |    (ratatui)     |                 |  (tokio runtime)  |
//! |                  | <-------------- |                   |
//! +------------------+  DashboardEvent +-------------------+
//! ```
//!
//! - [`Command`]: Messages sent from the UI to the background worker
//! - [`DashboardEvent`]: Events sent from the worker back to the UI

use std::collections::BTreeMap;

use time::OffsetDateTime;

use greenhouse_types::{ActuatorCommand, SensorKind};

use crate::history::{HistoryState, UpdateReport};

/// Commands sent from the UI to the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch and apply a snapshot now, outside the timer.
    Refresh,

    /// Send an actuator set point to the gateway.
    SendActuator(ActuatorCommand),

    /// Stop the worker.
    Shutdown,
}

/// The result of one refresh cycle.
#[derive(Debug, Clone)]
pub struct TickUpdate {
    /// Number of refreshes applied so far, this one included.
    pub tick: u64,
    /// Copy of every sensor's history and flag after the update.
    pub states: BTreeMap<SensorKind, HistoryState>,
    /// Per-sensor outcome of the update.
    pub report: UpdateReport,
    /// Why the fetch failed, if it did (every sensor is then flagged).
    pub fetch_error: Option<String>,
    /// When the refresh completed.
    pub at: OffsetDateTime,
}

/// Events sent from the worker back to the UI.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A refresh completed.
    Updated(Box<TickUpdate>),

    /// The gateway accepted an actuator command.
    ActuatorSent {
        /// The command that was sent.
        command: ActuatorCommand,
    },

    /// The gateway rejected an actuator command, or could not be reached.
    ActuatorFailed {
        /// The command that failed.
        command: ActuatorCommand,
        /// Gateway detail or transport error.
        error: String,
    },

    /// Timed refreshes stopped because the configured limit was reached.
    RefreshLimitReached {
        /// Number of timed refreshes performed.
        ticks: u64,
    },
}
