//! Main entry point for the TUI dashboard.
//!
//! Ties the background [`DashboardWorker`] to the terminal. It handles:
//!
//! - Terminal setup and restoration
//! - Channel creation for worker communication
//! - The main event loop with input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod input;
pub mod ui;

pub use app::App;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;

use greenhouse_core::{Command, DashboardEvent, DashboardWorker, Gateway};

use crate::config::Config;

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard against `gateway` until the user quits.
///
/// The worker refreshes immediately and then on every interval tick; the
/// sliders start from the configured actuator values.
pub async fn run<G: Gateway + 'static>(gateway: G, config: &Config) -> Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<DashboardEvent>(32);

    let name = gateway.describe();
    info!(gateway = %name, "Starting dashboard");

    let worker = DashboardWorker::new(gateway, config.worker_config(), cmd_rx, event_tx);
    let cancel = worker.cancellation_token();
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(name, &config.actuators, event_rx);

    let mut terminal = setup_terminal()?;

    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx).await;

    if cmd_tx.try_send(Command::Shutdown).is_err() {
        cancel.cancel();
    }

    restore_terminal()?;

    let _ = worker_handle.await;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key, app.show_help);
            if let Some(cmd) = input::apply_action(app, action) {
                let _ = command_tx.try_send(cmd);
            }
        }

        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_event(event);
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}
