//! HTTP client for the greenhouse gateway REST API.
//!
//! The gateway exposes two endpoints:
//!
//! - `GET /api/sensors` returns a JSON array of sensor records
//! - `POST /api/actuators/{name}/{value}` applies an actuator set point
//!
//! # Example
//!
//! ```no_run
//! use greenhouse_core::GatewayClient;
//! use greenhouse_types::{Actuator, ActuatorCommand};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GatewayClient::new("http://localhost:8080")?;
//!
//! let snapshot = client.snapshot().await?;
//! println!("{snapshot:?}");
//!
//! client.send_command(ActuatorCommand::new(Actuator::Light, 80)?).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info};

use greenhouse_types::{ActuatorCommand, SensorDto, Snapshot};

use crate::error::{Error, Result};
use crate::retry::{RetryConfig, with_retry};
use crate::traits::Gateway;

/// Gateway address used when none is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Request timeout used by [`GatewayClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Message shown when a rejected command carries no `detail`.
pub const UNAVAILABLE_DETAIL: &str = "Device unavailable";

/// HTTP client for the greenhouse gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl GatewayClient {
    /// Create a client with the default timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The gateway base URL (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let mut gateway = Self::with_client(base_url, client)?;
        gateway.timeout = timeout;
        Ok(gateway)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            base_url: normalize_url(base_url)?,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        })
    }

    /// Replace the retry policy used for sensor fetches.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw sensor records, without retrying.
    pub async fn sensors(&self) -> Result<Vec<SensorDto>> {
        let url = format!("{}/api/sensors", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_detail(response, status.to_string()).await;
            return Err(Error::api(status.as_u16(), message));
        }

        response
            .json::<Vec<SensorDto>>()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// Fetch the sensor records and group them into a snapshot.
    ///
    /// Transient failures are retried according to the client's
    /// [`RetryConfig`].
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let sensors = with_retry(&self.retry, "fetch_sensors", || self.sensors()).await?;
        debug!(count = sensors.len(), "Fetched sensors");
        Ok(Snapshot::from_sensors(sensors))
    }

    /// Send an actuator set point.
    ///
    /// Sent exactly once. A non-success status becomes [`Error::Api`] whose
    /// message is the gateway's `detail` field, or [`UNAVAILABLE_DETAIL`].
    pub async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        let url = format!("{}{}", self.base_url, command.path());
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if status.is_success() {
            info!(%command, "Actuator command accepted");
            Ok(())
        } else {
            let message = error_detail(response, UNAVAILABLE_DETAIL.to_string()).await;
            Err(Error::api(status.as_u16(), message))
        }
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(url, self.timeout)
        } else {
            Error::NotReachable {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        self.snapshot().await
    }

    async fn send_command(&self, command: ActuatorCommand) -> Result<()> {
        GatewayClient::send_command(self, command).await
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn normalize_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim().trim_end_matches('/').to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Ok(base_url)
}

/// The `detail` field of an error body, or `fallback`.
async fn error_detail(response: Response, fallback: String) -> String {
    let body = response.text().await.unwrap_or_default();
    detail_from_body(&body).unwrap_or(fallback)
}

fn detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GatewayClient::new("http://localhost:8080").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = GatewayClient::new("http://greenhouse.local:8080/").unwrap();
        assert_eq!(client.base_url(), "http://greenhouse.local:8080");
        assert_eq!(client.describe(), "http://greenhouse.local:8080");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = GatewayClient::new("localhost:8080");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_detail_from_body() {
        assert_eq!(
            detail_from_body(r#"{"detail": "Actuator offline"}"#),
            Some("Actuator offline".to_string())
        );
        assert_eq!(detail_from_body(r#"{"detail": null}"#), None);
        assert_eq!(detail_from_body(r#"{"error": "x"}"#), None);
        assert_eq!(detail_from_body("<html>"), None);
        assert_eq!(
            detail_from_body(r#"{"detail": [{"msg": "bad"}]}"#),
            Some(r#"[{"msg":"bad"}]"#.to_string())
        );
    }
}
