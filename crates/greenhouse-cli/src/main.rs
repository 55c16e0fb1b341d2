use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use greenhouse_cli::cli::{Cli, Commands};
use greenhouse_cli::commands::{
    ReadArgs, WatchArgs, cmd_config, cmd_read, cmd_set, cmd_watch,
};
use greenhouse_cli::config::{Config, resolve_gateway, resolve_interval};
use greenhouse_cli::format::FormatOptions;
use greenhouse_cli::util::connect_gateway;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "greenhouse", &mut io::stdout());
        return Ok(());
    }

    init_tracing(&cli);

    let config = Config::load();
    let no_color = cli.no_color || config.no_color;
    let gateway_url = resolve_gateway(cli.gateway.clone(), &config);

    match cli.command {
        #[cfg(feature = "tui")]
        None | Some(Commands::Dashboard) => {
            let gateway = connect_gateway(&gateway_url, &config)?;
            greenhouse_cli::tui::run(gateway, &config).await
        }
        #[cfg(not(feature = "tui"))]
        None => {
            let gateway = connect_gateway(&gateway_url, &config)?;
            let opts = FormatOptions::new(no_color);
            cmd_read(
                &gateway,
                ReadArgs {
                    format: Default::default(),
                    output: cli.output.as_ref(),
                    opts: &opts,
                },
            )
            .await
        }
        Some(Commands::Read { format, compact }) => {
            let gateway = connect_gateway(&gateway_url, &config)?;
            let opts = FormatOptions::new(no_color).with_compact(compact);
            cmd_read(
                &gateway,
                ReadArgs {
                    format,
                    output: cli.output.as_ref(),
                    opts: &opts,
                },
            )
            .await
        }
        Some(Commands::Watch { interval, count }) => {
            let gateway = connect_gateway(&gateway_url, &config)?;
            let opts = FormatOptions::new(no_color);
            cmd_watch(
                gateway,
                WatchArgs {
                    interval: resolve_interval(interval, &config),
                    count,
                    output: cli.output.as_ref(),
                    quiet: cli.quiet,
                    opts: &opts,
                },
            )
            .await
        }
        Some(Commands::Set { actuator, value }) => {
            let gateway = connect_gateway(&gateway_url, &config)?;
            cmd_set(&gateway, actuator, value, cli.quiet, no_color).await
        }
        Some(Commands::Config { action }) => cmd_config(action, cli.quiet),
        Some(Commands::Completions { .. }) => {
            // Already handled above
            Ok(())
        }
    }
}

/// Install the tracing subscriber.
///
/// The dashboard owns the terminal, so its logs go to a file instead; if the
/// file cannot be created, logging stays off.
fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if is_dashboard(cli) {
        if let Some(file) = log_file_path().and_then(|path| {
            let dir = path.parent()?;
            fs::create_dir_all(dir).ok()?;
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
        }) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "tui")]
fn is_dashboard(cli: &Cli) -> bool {
    matches!(cli.command, None | Some(Commands::Dashboard))
}

#[cfg(not(feature = "tui"))]
fn is_dashboard(_cli: &Cli) -> bool {
    false
}

fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("greenhouse").join("greenhouse.log"))
}
