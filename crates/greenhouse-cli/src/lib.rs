//! Command-line interface and terminal dashboard for a smart greenhouse.
//!
//! The greenhouse gateway exposes temperature, light and humidity sensors
//! over HTTP, along with one actuator per sensor. This crate shows the last
//! twenty readings of each sensor and lets the user drive the actuators.
//!
//! # Features
//!
//! - **Live dashboard**: one chart and one slider per sensor, auto-refreshing
//! - **Current readings**: color-coded text or JSON
//! - **Continuous monitoring**: watch mode with trend arrows
//! - **Actuator control**: send a set point from the command line
//! - **Configuration file**: persistent gateway URL, refresh settings and slider values
//! - **Shell completions**: bash, zsh, fish and PowerShell
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dashboard` | Full-screen dashboard (the default) |
//! | `read` | Read current sensor values |
//! | `watch` | Continuously print sensor values |
//! | `set` | Send a value to an actuator |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Configuration
//!
//! Settings live in `~/.config/greenhouse/config.toml` (or the platform
//! equivalent):
//!
//! - `gateway_url`: gateway base URL
//! - `refresh_interval_ms`, `refresh_limit`: dashboard refresh loop
//! - `cache_ttl_ms`, `timeout_secs`: HTTP behavior
//! - `no_color`: disable colored output
//! - `actuators.*`: initial slider values
//!
//! # Environment Variables
//!
//! - `GREENHOUSE_GATEWAY`: gateway URL (overridden by `--gateway`)
//! - `NO_COLOR`: disable colored output when set
//! - `RUST_LOG`: log filter
//!
//! # Examples
//!
//! ```bash
//! greenhouse --gateway http://192.168.1.20:8080
//! greenhouse read --format json
//! greenhouse watch --interval 5 --count 10
//! greenhouse set humidity 60
//! ```

pub mod config;
pub mod format;
pub mod style;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod commands;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export core dependencies for convenience
pub use greenhouse_core;
pub use greenhouse_types;
