//! Output formatting for text and JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use greenhouse_core::{HistoryState, SensorFailure, TickUpdate, UpdateReport};
use greenhouse_types::{ActuatorCommand, SensorKind};

use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            compact: false,
        }
    }

    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize value to JSON string, respecting compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Text shown in place of a value for a flagged sensor.
pub fn offline_message(kind: SensorKind) -> String {
    format!("{} sensor offline.", kind.label())
}

/// Text shown for a sensor with no history and no error.
pub fn unavailable_message(kind: SensorKind) -> String {
    format!("{} unavailable.", kind.label())
}

/// Status line after the gateway accepted a command.
pub fn command_sent_message(command: &ActuatorCommand) -> String {
    format!(
        "Command sent to {} with value {}",
        command.actuator.gateway_name(),
        command.value
    )
}

/// Status line after a command failed.
pub fn command_failed_message(command: &ActuatorCommand, error: &str) -> String {
    format!(
        "Failed to send command to {}. Error: {}",
        command.actuator.gateway_name(),
        error
    )
}

/// Per-sensor JSON record.
#[derive(Debug, Serialize)]
pub struct SensorStatusJson {
    pub sensor: SensorKind,
    pub unit: &'static str,
    pub value: Option<f64>,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub history: Vec<f64>,
}

/// JSON document printed by `read`.
#[derive(Debug, Serialize)]
pub struct StatusJson {
    pub gateway: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
    pub sensors: Vec<SensorStatusJson>,
}

/// Build the JSON view of one update.
pub fn status_json(
    gateway: &str,
    states: &BTreeMap<SensorKind, HistoryState>,
    report: &UpdateReport,
    fetch_error: Option<&str>,
) -> StatusJson {
    let sensors = SensorKind::ALL
        .into_iter()
        .map(|kind| {
            let state = states.get(&kind).cloned().unwrap_or_default();
            SensorStatusJson {
                sensor: kind,
                unit: kind.unit(),
                value: (!state.is_error()).then(|| state.latest()).flatten(),
                error: state.is_error(),
                reason: report.failure(kind).map(SensorFailure::to_string),
                history: state.to_vec(),
            }
        })
        .collect();

    StatusJson {
        gateway: gateway.to_string(),
        fetch_error: fetch_error.map(str::to_string),
        sensors,
    }
}

/// Format one sensor's current value, or why there is none.
pub fn format_sensor_value(
    kind: SensorKind,
    state: &HistoryState,
    failure: Option<&SensorFailure>,
    opts: &FormatOptions,
) -> String {
    if state.is_error() {
        let reason = failure.map(|f| format!(" ({f})")).unwrap_or_default();
        return format!("{}{}", style::format_offline(opts.no_color), reason);
    }
    match state.latest() {
        Some(value) => style::format_value_colored(kind, value, opts.no_color),
        None => unavailable_message(kind),
    }
}

/// Multi-line text view of one update.
pub fn format_status_text(
    gateway: &str,
    states: &BTreeMap<SensorKind, HistoryState>,
    report: &UpdateReport,
    fetch_error: Option<&str>,
    opts: &FormatOptions,
) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}",
        style::format_title(&format!("Greenhouse @ {gateway}"), opts.no_color)
    );
    if let Some(err) = fetch_error {
        let _ = writeln!(
            output,
            "{}",
            style::format_failure(&format!("Gateway unreachable: {err}"), opts.no_color)
        );
    }

    for kind in SensorKind::ALL {
        let state = states.get(&kind).cloned().unwrap_or_default();
        let value = format_sensor_value(kind, &state, report.failure(kind), opts);
        let _ = writeln!(output, "  {:<12} {}", kind.label(), value);
    }
    output
}

/// One line per refresh for `watch`.
///
/// `previous` is the update before this one, used for trend arrows.
pub fn format_watch_line(
    timestamp: &str,
    update: &TickUpdate,
    previous: Option<&TickUpdate>,
    opts: &FormatOptions,
) -> String {
    let mut parts = Vec::with_capacity(SensorKind::ALL.len());
    for kind in SensorKind::ALL {
        let state = update.states.get(&kind).cloned().unwrap_or_default();
        let mut part = format!(
            "{} {}",
            kind.label(),
            format_sensor_value(kind, &state, None, opts)
        );

        let previous_value = previous
            .and_then(|p| p.states.get(&kind))
            .filter(|s| !s.is_error())
            .and_then(HistoryState::latest);
        if let (false, Some(current), Some(prev)) = (state.is_error(), state.latest(), previous_value)
        {
            part.push(' ');
            part.push_str(style::trend_indicator(
                current,
                prev,
                style::trend_dead_band(kind),
                opts.no_color,
            ));
        }
        parts.push(part);
    }

    format!("[{}] {}\n", timestamp, parts.join("  "))
}
