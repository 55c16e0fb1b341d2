//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use greenhouse_core::{
    DEFAULT_CACHE_TTL, DEFAULT_GATEWAY_URL, DEFAULT_REFRESH_INTERVAL, DEFAULT_REFRESH_LIMIT,
    DEFAULT_TIMEOUT, WorkerConfig,
};
use greenhouse_types::Actuator;

/// Shortest refresh interval accepted from the config file.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the greenhouse gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Time between dashboard refreshes, in milliseconds
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Timed refreshes before the dashboard stops polling (0 = never stop)
    #[serde(default = "default_refresh_limit")]
    pub refresh_limit: u64,

    /// How long a fetched snapshot is reused, in milliseconds (0 = no cache)
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Initial slider positions
    #[serde(default)]
    pub actuators: ActuatorDefaults,
}

/// Initial value of each actuator slider in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorDefaults {
    #[serde(default = "default_temperature_setpoint")]
    pub temperature: u32,
    #[serde(default = "default_light_setpoint")]
    pub light: u32,
    #[serde(default = "default_humidity_setpoint")]
    pub humidity: u32,
}

impl ActuatorDefaults {
    /// Configured start value for `actuator`, clamped into its range.
    #[must_use]
    pub fn get(&self, actuator: Actuator) -> u32 {
        let value = match actuator {
            Actuator::Temperature => self.temperature,
            Actuator::Light => self.light,
            Actuator::Humidity => self.humidity,
        };
        actuator.clamp_value(value)
    }

    fn set(&mut self, actuator: Actuator, value: u32) {
        match actuator {
            Actuator::Temperature => self.temperature = value,
            Actuator::Light => self.light = value,
            Actuator::Humidity => self.humidity = value,
        }
    }
}

impl Default for ActuatorDefaults {
    fn default() -> Self {
        Self {
            temperature: default_temperature_setpoint(),
            light: default_light_setpoint(),
            humidity: default_humidity_setpoint(),
        }
    }
}

fn default_gateway_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_millis() as u64
}

fn default_refresh_limit() -> u64 {
    DEFAULT_REFRESH_LIMIT
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL.as_millis() as u64
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_temperature_setpoint() -> u32 {
    Actuator::Temperature.default_value()
}

fn default_light_setpoint() -> u32 {
    Actuator::Light.default_value()
}

fn default_humidity_setpoint() -> u32 {
    Actuator::Humidity.default_value()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            refresh_interval_ms: default_refresh_interval_ms(),
            refresh_limit: default_refresh_limit(),
            cache_ttl_ms: default_cache_ttl_ms(),
            timeout_secs: default_timeout_secs(),
            no_color: false,
            actuators: ActuatorDefaults::default(),
        }
    }
}

/// Keys accepted by `greenhouse config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ConfigKey {
    /// Gateway base URL
    GatewayUrl,
    /// Refresh interval in milliseconds
    RefreshIntervalMs,
    /// Timed refresh limit (0 = unlimited)
    RefreshLimit,
    /// Snapshot cache TTL in milliseconds
    CacheTtlMs,
    /// Request timeout in seconds
    TimeoutSecs,
    /// Disable colored output (true/false)
    NoColor,
    /// Initial temperature slider value
    ActuatorTemperature,
    /// Initial light slider value
    ActuatorLight,
    /// Initial humidity slider value
    ActuatorHumidity,
}

impl ConfigKey {
    /// Name of the key in the TOML file.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::GatewayUrl => "gateway_url",
            ConfigKey::RefreshIntervalMs => "refresh_interval_ms",
            ConfigKey::RefreshLimit => "refresh_limit",
            ConfigKey::CacheTtlMs => "cache_ttl_ms",
            ConfigKey::TimeoutSecs => "timeout_secs",
            ConfigKey::NoColor => "no_color",
            ConfigKey::ActuatorTemperature => "actuators.temperature",
            ConfigKey::ActuatorLight => "actuators.light",
            ConfigKey::ActuatorHumidity => "actuators.humidity",
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("greenhouse")
            .join("config.toml")
    }

    /// Load config from the default path, or return defaults if missing or unreadable.
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Parse and store a value for `key`.
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::GatewayUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    bail!("Gateway URL must start with http:// or https://");
                }
                self.gateway_url = value.to_string();
            }
            ConfigKey::RefreshIntervalMs => {
                let ms = parse_number(value)?;
                if ms < MIN_REFRESH_INTERVAL_MS {
                    bail!("Refresh interval must be at least {MIN_REFRESH_INTERVAL_MS} ms");
                }
                self.refresh_interval_ms = ms;
            }
            ConfigKey::RefreshLimit => self.refresh_limit = parse_number(value)?,
            ConfigKey::CacheTtlMs => self.cache_ttl_ms = parse_number(value)?,
            ConfigKey::TimeoutSecs => {
                let secs = parse_number(value)?;
                if secs == 0 {
                    bail!("Timeout must be at least 1 second");
                }
                self.timeout_secs = secs;
            }
            ConfigKey::NoColor => {
                self.no_color = value
                    .parse()
                    .with_context(|| format!("Expected true or false, got '{value}'"))?;
            }
            ConfigKey::ActuatorTemperature => self.set_actuator(Actuator::Temperature, value)?,
            ConfigKey::ActuatorLight => self.set_actuator(Actuator::Light, value)?,
            ConfigKey::ActuatorHumidity => self.set_actuator(Actuator::Humidity, value)?,
        }
        Ok(())
    }

    /// Current value of `key`, as it would be written on the command line.
    #[must_use]
    pub fn get_value(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::GatewayUrl => self.gateway_url.clone(),
            ConfigKey::RefreshIntervalMs => self.refresh_interval_ms.to_string(),
            ConfigKey::RefreshLimit => self.refresh_limit.to_string(),
            ConfigKey::CacheTtlMs => self.cache_ttl_ms.to_string(),
            ConfigKey::TimeoutSecs => self.timeout_secs.to_string(),
            ConfigKey::NoColor => self.no_color.to_string(),
            ConfigKey::ActuatorTemperature => self.actuators.temperature.to_string(),
            ConfigKey::ActuatorLight => self.actuators.light.to_string(),
            ConfigKey::ActuatorHumidity => self.actuators.humidity.to_string(),
        }
    }

    /// Reset `key` to its built-in default.
    pub fn unset(&mut self, key: ConfigKey) {
        let defaults = Self::default();
        let value = defaults.get_value(key);
        // Defaults always pass validation
        if let Err(e) = self.set_value(key, &value) {
            tracing::debug!("Failed to reset {:?}: {}", key, e);
        }
    }

    fn set_actuator(&mut self, actuator: Actuator, value: &str) -> Result<()> {
        let value: u32 = value
            .parse()
            .with_context(|| format!("Expected a whole number, got '{value}'"))?;
        let range = actuator.range();
        if !range.contains(&value) {
            bail!(
                "{} accepts values from {} to {}",
                actuator,
                range.start(),
                range.end()
            );
        }
        self.actuators.set(actuator, value);
        Ok(())
    }

    /// Refresh loop settings derived from this config.
    #[must_use]
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            refresh_interval: Duration::from_millis(
                self.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS),
            ),
            refresh_limit: (self.refresh_limit > 0).then_some(self.refresh_limit),
        }
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Snapshot cache TTL.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

fn parse_number(value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("Expected a whole number, got '{value}'"))
}

/// Resolve the gateway URL: flag or environment (already merged by clap), then config.
pub fn resolve_gateway(arg: Option<String>, config: &Config) -> String {
    arg.filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.gateway_url.clone())
}

/// Resolve the refresh interval: explicit value in seconds, then config.
pub fn resolve_interval(arg_secs: Option<u64>, config: &Config) -> Duration {
    match arg_secs {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => config.worker_config().refresh_interval,
    }
}
