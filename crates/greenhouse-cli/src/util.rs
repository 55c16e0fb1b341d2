//! Utility functions for CLI operations.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use greenhouse_core::{CachedGateway, GatewayClient};

use crate::config::Config;

/// The gateway stack used by every command: HTTP client behind a snapshot cache.
pub type DefaultGateway = CachedGateway<GatewayClient>;

/// Build the gateway for `url` using the timeouts and cache TTL from `config`.
pub fn connect_gateway(url: &str, config: &Config) -> Result<DefaultGateway> {
    let client = GatewayClient::with_timeout(url, config.timeout())
        .with_context(|| format!("Invalid gateway URL '{url}'"))?;
    Ok(CachedGateway::new(client, config.cache_ttl()))
}

/// Write content to a file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

/// Append content to a file, or print it to stdout.
pub fn append_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
