//! Watch command implementation.
//!
//! Runs the same background worker as the dashboard and prints one line per
//! refresh instead of drawing charts. The worker's refresh limit doubles as
//! the `--count` option.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use greenhouse_core::{DashboardEvent, DashboardWorker, Gateway, TickUpdate, WorkerConfig};

use crate::format::{FormatOptions, format_watch_line};
use crate::util::append_output;

/// Arguments for the watch command.
pub struct WatchArgs<'a> {
    pub interval: Duration,
    pub count: u64,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

pub async fn cmd_watch<G: Gateway + 'static>(gateway: G, args: WatchArgs<'_>) -> Result<()> {
    let WatchArgs {
        interval,
        count,
        output,
        quiet,
        opts,
    } = args;

    let name = gateway.describe();
    let config = WorkerConfig {
        refresh_interval: interval,
        refresh_limit: (count > 0).then_some(count),
    };

    // The worker stops when every command sender is gone, so keep this one alive
    let (command_tx, command_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(32);
    let worker = DashboardWorker::new(gateway, config, command_rx, event_tx);
    let cancel = worker.cancellation_token();
    let handle = tokio::spawn(worker.run());

    if !quiet {
        let header = if opts.no_color {
            format!("Watching: {}", name)
        } else {
            format!("Watching: {}", name.cyan())
        };
        eprintln!("{}", header);
        if count > 0 {
            eprintln!(
                "Interval: {}s | Count: {} | Press Ctrl+C to stop",
                interval.as_secs_f64(),
                count
            );
        } else {
            eprintln!("Interval: {}s | Press Ctrl+C to stop", interval.as_secs_f64());
        }
        eprintln!("{}", "-".repeat(60));
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut previous: Option<Box<TickUpdate>> = None;
    let result = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                eprintln!("\nShutting down...");
                break Ok(());
            }
            event = event_rx.recv() => match event {
                Some(DashboardEvent::Updated(update)) => {
                    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
                    let line = format_watch_line(&timestamp, &update, previous.as_deref(), opts);
                    if let Err(e) = append_output(output, &line) {
                        break Err(e);
                    }
                    if let Some(err) = &update.fetch_error
                        && !quiet
                    {
                        eprintln!("  gateway error: {}", err);
                    }
                    previous = Some(update);
                }
                Some(DashboardEvent::RefreshLimitReached { ticks }) => {
                    if !quiet {
                        eprintln!("Completed {} readings.", ticks);
                    }
                    break Ok(());
                }
                Some(_) => {}
                None => break Ok(()),
            },
        }
    };

    cancel.cancel();
    drop(command_tx);
    let _ = handle.await;
    result
}
