//! Keyboard input handling for the TUI.
//!
//! # Key Bindings
//!
//! | Key | Action |
//! |-----|--------|
//! | `q` / `Ctrl+C` | Quit the application |
//! | `j` / `Down`, `Tab` | Select next panel |
//! | `k` / `Up`, `BackTab` | Select previous panel |
//! | `l` / `Right` | Increase the selected slider by 1 |
//! | `h` / `Left` | Decrease the selected slider by 1 |
//! | `PageUp` / `]` | Increase the selected slider by 10 |
//! | `PageDown` / `[` | Decrease the selected slider by 10 |
//! | `Enter` / `s` | Send the selected slider value to its actuator |
//! | `r` | Refresh sensors now |
//! | `t` | Toggle dark/light theme |
//! | `?` | Toggle help overlay |
//! | `Esc` | Close help |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use greenhouse_core::Command;

use super::app::App;

/// Slider step for coarse adjustments.
pub const COARSE_STEP: i64 = 10;

/// User actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Fetch sensors now.
    Refresh,
    /// Select the next panel.
    SelectNext,
    /// Select the previous panel.
    SelectPrevious,
    /// Move the selected slider.
    Adjust(i64),
    /// Send the selected slider value.
    Send,
    /// Toggle between dark and light theme.
    ToggleTheme,
    /// Toggle help overlay.
    ToggleHelp,
    /// Close the help overlay.
    Dismiss,
    /// No action (unrecognized key).
    None,
}

/// Map a key event to an action.
///
/// While the help overlay is open only the keys that close it, and quit,
/// are recognized.
pub fn handle_key(key: KeyEvent, show_help: bool) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if show_help {
        return match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Esc | KeyCode::Char('?') => Action::Dismiss,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Action::SelectPrevious,
        KeyCode::Right | KeyCode::Char('l') => Action::Adjust(1),
        KeyCode::Left | KeyCode::Char('h') => Action::Adjust(-1),
        KeyCode::PageUp | KeyCode::Char(']') => Action::Adjust(COARSE_STEP),
        KeyCode::PageDown | KeyCode::Char('[') => Action::Adjust(-COARSE_STEP),
        KeyCode::Enter | KeyCode::Char('s') => Action::Send,
        KeyCode::Char('t') => Action::ToggleTheme,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Dismiss,
        _ => Action::None,
    }
}

/// Apply an action to the application state.
///
/// Returns the command to send to the background worker, if any.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.quit();
            None
        }
        Action::Refresh => {
            app.push_status_message("Refreshing...".to_string());
            Some(Command::Refresh)
        }
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::Adjust(delta) => {
            app.adjust_selected(delta);
            None
        }
        Action::Send => app.take_selected_command().map(Command::SendActuator),
        Action::ToggleTheme => {
            app.toggle_theme();
            None
        }
        Action::ToggleHelp => {
            app.toggle_help();
            None
        }
        Action::Dismiss => {
            app.show_help = false;
            None
        }
        Action::None => None,
    }
}
