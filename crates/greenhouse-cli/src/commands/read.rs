//! Read command implementation.

use std::path::PathBuf;

use anyhow::{Result, bail};

use greenhouse_core::{Gateway, SensorHistoryTracker, refresh_once};

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_status_text, status_json};
use crate::util::write_output;

/// Arguments for the read command.
pub struct ReadArgs<'a> {
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

/// Fetch once, apply the snapshot to a fresh tracker and render the result.
///
/// Returns the rendered output and the fetch error, if any.
pub async fn render_read<G: Gateway + ?Sized>(
    gateway: &G,
    format: OutputFormat,
    opts: &FormatOptions,
) -> Result<(String, Option<String>)> {
    let mut tracker = SensorHistoryTracker::new();
    let (report, fetch_error) = refresh_once(gateway, &mut tracker).await;
    let states = tracker.view();
    let name = gateway.describe();

    let content = match format {
        OutputFormat::Json => {
            opts.as_json(&status_json(&name, &states, &report, fetch_error.as_deref()))?
        }
        OutputFormat::Text => {
            format_status_text(&name, &states, &report, fetch_error.as_deref(), opts)
        }
    };
    Ok((content, fetch_error))
}

pub async fn cmd_read<G: Gateway + ?Sized>(gateway: &G, args: ReadArgs<'_>) -> Result<()> {
    let (content, fetch_error) = render_read(gateway, args.format, args.opts).await?;
    write_output(args.output, &content)?;

    if fetch_error.is_some() {
        bail!("Could not read sensors from {}", gateway.describe());
    }
    Ok(())
}
