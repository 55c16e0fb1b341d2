//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use greenhouse_types::Actuator;

pub use crate::config::ConfigKey;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "greenhouse")]
#[command(author, version, about = "Dashboard and control for a smart greenhouse gateway", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Gateway base URL (overrides the config file)
    #[arg(short, long, global = true, env = "GREENHOUSE_GATEWAY")]
    pub gateway: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the live dashboard (default when no command is given)
    #[cfg(feature = "tui")]
    Dashboard,

    /// Fetch the sensors once and print their values
    Read {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Use compact JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Poll the sensors and print one line per refresh
    Watch {
        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many refreshes (0 = run until Ctrl+C)
        #[arg(short, long, default_value = "0")]
        count: u64,
    },

    /// Send a set point to an actuator
    Set {
        /// Actuator: temperature, light or humidity
        #[arg(value_parser = parse_actuator)]
        actuator: Actuator,

        /// Value (temperature 0-50, light and humidity 0-100)
        value: u32,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn parse_actuator(s: &str) -> Result<Actuator, String> {
    s.parse().map_err(|e: greenhouse_types::ParseError| e.to_string())
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_enum)]
        key: ConfigKey,
        /// Configuration value
        value: String,
    },

    /// Reset a configuration value to its default
    Unset {
        /// Configuration key to reset
        #[arg(value_enum)]
        key: ConfigKey,
    },

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
