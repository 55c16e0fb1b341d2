//! Application state for the TUI.
//!
//! [`App`] mirrors what the background worker last reported (history and
//! error flag per sensor), plus the UI-only state: slider positions, which
//! panel is selected and the outcome of the last command per actuator.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tokio::sync::mpsc;

use greenhouse_core::{DashboardEvent, HistoryState, SensorFailure, TickUpdate, UpdateReport};
use greenhouse_types::{Actuator, ActuatorCommand, SensorKind};

use crate::config::ActuatorDefaults;
use crate::format::{command_failed_message, command_sent_message};

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// UI theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Get background color for this theme.
    pub fn bg(self) -> ratatui::style::Color {
        match self {
            Self::Dark => ratatui::style::Color::Reset,
            Self::Light => ratatui::style::Color::White,
        }
    }
}

/// What a sensor panel shows instead of, or as, its chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelView {
    /// The last update failed: warning only, no chart.
    Offline,
    /// No error but nothing recorded yet.
    Unavailable,
    /// Chart of the history.
    Chart,
}

/// Outcome of the last command sent to one actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub message: String,
    pub ok: bool,
}

/// Slider state for one actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderState {
    pub actuator: Actuator,
    pub value: u32,
    /// Waiting for the gateway to answer.
    pub sending: bool,
    pub last_outcome: Option<CommandOutcome>,
}

impl SliderState {
    fn new(actuator: Actuator, value: u32) -> Self {
        Self {
            actuator,
            value: actuator.clamp_value(value),
            sending: false,
            last_outcome: None,
        }
    }

    /// Slider position as a fraction of its range.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        let range = self.actuator.range();
        let span = f64::from(range.end() - range.start());
        if span == 0.0 {
            return 0.0;
        }
        f64::from(self.value - range.start()) / span
    }
}

/// Main application state for the TUI.
pub struct App {
    /// Where the data comes from, for the header.
    pub gateway: String,
    /// Latest history and error flag per sensor.
    pub states: BTreeMap<SensorKind, HistoryState>,
    /// Per-sensor outcome of the latest update.
    pub report: UpdateReport,
    /// Why the latest fetch failed, if it did.
    pub fetch_error: Option<String>,
    /// Refreshes applied so far.
    pub tick: u64,
    /// When the latest refresh completed.
    pub last_update: Option<OffsetDateTime>,
    /// One slider per actuator, in [`Actuator::ALL`] order.
    pub sliders: Vec<SliderState>,
    /// Index of the selected panel.
    pub selected: usize,
    /// Timed refreshes have stopped.
    pub refresh_stopped: bool,
    pub theme: Theme,
    pub show_help: bool,
    pub status_messages: Vec<(String, Instant)>,
    /// Receiver for events from the background worker.
    pub event_rx: mpsc::Receiver<DashboardEvent>,
    should_quit: bool,
}

impl App {
    /// Create a new application.
    pub fn new(
        gateway: String,
        initial: &ActuatorDefaults,
        event_rx: mpsc::Receiver<DashboardEvent>,
    ) -> Self {
        Self {
            gateway,
            states: BTreeMap::new(),
            report: UpdateReport::default(),
            fetch_error: None,
            tick: 0,
            last_update: None,
            sliders: Actuator::ALL
                .into_iter()
                .map(|a| SliderState::new(a, initial.get(a)))
                .collect(),
            selected: 0,
            refresh_stopped: false,
            theme: Theme::default(),
            show_help: false,
            status_messages: Vec::new(),
            event_rx,
            should_quit: false,
        }
    }

    /// Returns whether the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Ask the event loop to exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// History and flag for `kind`; empty before the first update.
    pub fn state(&self, kind: SensorKind) -> HistoryState {
        self.states.get(&kind).cloned().unwrap_or_default()
    }

    /// What the panel for `kind` should show.
    pub fn panel_view(&self, kind: SensorKind) -> PanelView {
        match self.states.get(&kind) {
            Some(state) if state.is_error() => PanelView::Offline,
            Some(state) if !state.is_empty() => PanelView::Chart,
            _ => PanelView::Unavailable,
        }
    }

    /// Why `kind` is flagged, from the latest update.
    pub fn failure(&self, kind: SensorKind) -> Option<&SensorFailure> {
        self.report.failure(kind)
    }

    /// Slider for `actuator`.
    pub fn slider(&self, actuator: Actuator) -> Option<&SliderState> {
        self.sliders.iter().find(|s| s.actuator == actuator)
    }

    fn slider_mut(&mut self, actuator: Actuator) -> Option<&mut SliderState> {
        self.sliders.iter_mut().find(|s| s.actuator == actuator)
    }

    /// Currently selected slider.
    pub fn selected_slider(&self) -> Option<&SliderState> {
        self.sliders.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.sliders.is_empty() {
            self.selected = (self.selected + 1) % self.sliders.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.sliders.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.sliders.len() - 1);
        }
    }

    /// Move the selected slider by `delta`, staying within the actuator's range.
    pub fn adjust_selected(&mut self, delta: i64) {
        if let Some(slider) = self.sliders.get_mut(self.selected) {
            let target = (i64::from(slider.value) + delta).max(0);
            let target = u32::try_from(target).unwrap_or(u32::MAX);
            slider.value = slider.actuator.clamp_value(target);
        }
    }

    /// Command for the selected slider, marking it as in flight.
    pub fn take_selected_command(&mut self) -> Option<ActuatorCommand> {
        let slider = self.sliders.get_mut(self.selected)?;
        let command = ActuatorCommand::new(slider.actuator, slider.value).ok()?;
        slider.sending = true;
        Some(command)
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Get the theme colors for the current mode.
    pub fn app_theme(&self) -> super::ui::theme::AppTheme {
        match self.theme {
            Theme::Dark => super::ui::theme::AppTheme::dark(),
            Theme::Light => super::ui::theme::AppTheme::light(),
        }
    }

    /// Add a status message to the queue.
    pub fn push_status_message(&mut self, message: String) {
        self.status_messages.push((message, Instant::now()));
        while self.status_messages.len() > 5 {
            self.status_messages.remove(0);
        }
    }

    /// Remove expired status messages.
    pub fn clean_expired_messages(&mut self) {
        self.status_messages
            .retain(|(_, created)| created.elapsed() < STATUS_MESSAGE_TIMEOUT);
    }

    /// Get the current status message to display.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    /// Handle an event from the background worker.
    pub fn handle_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Updated(update) => self.apply_update(*update),
            DashboardEvent::ActuatorSent { command } => {
                self.finish_command(command, command_sent_message(&command), true);
            }
            DashboardEvent::ActuatorFailed { command, error } => {
                self.finish_command(command, command_failed_message(&command, &error), false);
            }
            DashboardEvent::RefreshLimitReached { ticks } => {
                self.refresh_stopped = true;
                self.push_status_message(format!(
                    "Auto-refresh stopped after {ticks} updates. Press r to refresh."
                ));
            }
        }
    }

    fn apply_update(&mut self, update: TickUpdate) {
        if let Some(err) = &update.fetch_error
            && self.fetch_error.is_none()
        {
            self.push_status_message(format!("Gateway error: {err}"));
        }
        self.states = update.states;
        self.report = update.report;
        self.fetch_error = update.fetch_error;
        self.tick = update.tick;
        self.last_update = Some(update.at);
    }

    fn finish_command(&mut self, command: ActuatorCommand, message: String, ok: bool) {
        if let Some(slider) = self.slider_mut(command.actuator) {
            slider.sending = false;
            slider.last_outcome = Some(CommandOutcome { message, ok });
        }
    }
}
