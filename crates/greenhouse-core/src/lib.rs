//! Core library for the smart greenhouse dashboard.
//!
//! This crate tracks recent sensor values reported by a greenhouse gateway
//! and talks to that gateway over HTTP.
//!
//! # Features
//!
//! - **History tracking**: rolling 20-value history and error flag per sensor
//! - **Gateway client**: fetch sensor readings, send actuator set points
//! - **Snapshot cache**: reuse a recent fetch for a short TTL
//! - **Retry logic**: configurable backoff for transient gateway failures
//! - **Background worker**: timed refresh loop driven over channels
//! - **Mock gateway**: scripted snapshots and failure injection for tests
//!
//! # Quick Start
//!
//! ```no_run
//! use greenhouse_core::{GatewayClient, SensorHistoryTracker};
//! use greenhouse_types::SensorKind;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new("http://localhost:8080")?;
//!     let mut tracker = SensorHistoryTracker::new();
//!
//!     let snapshot = client.snapshot().await?;
//!     tracker.update(&snapshot);
//!
//!     for kind in SensorKind::ALL {
//!         println!("{kind}: {:?} (error: {})", tracker.history(kind), tracker.is_error(kind));
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod gateway;
pub mod history;
pub mod messages;
pub mod mock;
pub mod retry;
pub mod traits;
pub mod worker;

pub use cache::{CachedGateway, DEFAULT_CACHE_TTL};
pub use error::{Error, Result};
pub use gateway::{DEFAULT_GATEWAY_URL, DEFAULT_TIMEOUT, GatewayClient, UNAVAILABLE_DETAIL};
pub use history::{HISTORY_CAPACITY, HistoryState, SensorFailure, SensorHistoryTracker, UpdateReport};
pub use messages::{Command, DashboardEvent, TickUpdate};
pub use mock::{MockGateway, values_snapshot};
pub use retry::{RetryConfig, with_retry};
pub use traits::Gateway;
pub use worker::{
    DEFAULT_REFRESH_INTERVAL, DEFAULT_REFRESH_LIMIT, DashboardWorker, WorkerConfig, refresh_once,
};

// Re-export the data model so downstream crates need only one dependency
pub use greenhouse_types::{
    Actuator, ActuatorCommand, ParseError, SensorDto, SensorKind, SensorReading, Snapshot,
    ValueError,
};
