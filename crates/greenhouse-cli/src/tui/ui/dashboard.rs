//! Sensor panels: one chart (or warning) and one actuator slider per sensor.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LineGauge, Paragraph};

use greenhouse_types::SensorKind;

use super::theme::{AppTheme, BORDER_TYPE};
use super::widgets::{history_points, history_trend, x_bounds, y_bounds, y_labels};
use crate::format::{offline_message, unavailable_message};
use crate::style::format_value;
use crate::tui::app::{App, PanelView, SliderState};

/// Width of the slider column.
const SLIDER_WIDTH: u16 = 34;

/// Panel title, e.g. "Temperature (°C)".
pub fn panel_title(kind: SensorKind) -> String {
    format!("{} ({})", kind.label(), kind.unit())
}

/// Draw the three sensor panels stacked vertically.
pub(super) fn draw_panels(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (i, kind) in SensorKind::ALL.into_iter().enumerate() {
        draw_panel(frame, rows[i], app, kind, app.selected == i);
    }
}

fn draw_panel(frame: &mut Frame, area: Rect, app: &App, kind: SensorKind, selected: bool) {
    let theme = app.app_theme();
    let state = app.state(kind);

    let mut title = vec![Span::styled(format!(" {} ", panel_title(kind)), theme.title_style())];
    if app.panel_view(kind) == PanelView::Chart
        && let Some(latest) = state.latest()
    {
        title.push(Span::styled(
            format!("{} ", format_value(kind, latest)),
            Style::default()
                .fg(theme.sensor_color(kind))
                .add_modifier(Modifier::BOLD),
        ));
        if let Some(arrow) = history_trend(kind, &state) {
            title.push(Span::styled(
                format!("{arrow} "),
                Style::default().fg(theme.text_secondary),
            ));
        }
    }

    let border_style = if selected {
        theme.border_active_style()
    } else {
        theme.border_inactive_style()
    };
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(SLIDER_WIDTH)])
        .split(inner);

    match app.panel_view(kind) {
        PanelView::Offline => {
            let mut lines = vec![
                Line::from(""),
                Line::from(Span::styled(offline_message(kind), theme.error_banner_style())),
            ];
            if let Some(failure) = app.failure(kind) {
                lines.push(Line::from(Span::styled(
                    failure.to_string(),
                    Style::default().fg(theme.text_muted),
                )));
            }
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                cols[0],
            );
        }
        PanelView::Unavailable => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    unavailable_message(kind),
                    Style::default().fg(theme.warning),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                cols[0],
            );
        }
        PanelView::Chart => {
            let points = history_points(&state);
            let x = x_bounds(points.len());
            let y = y_bounds(&state);
            let dataset = Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.sensor_color(kind)))
                .data(&points);
            let chart = Chart::new(vec![dataset])
                .x_axis(Axis::default().bounds(x))
                .y_axis(
                    Axis::default()
                        .bounds(y)
                        .labels(y_labels(kind, y))
                        .style(Style::default().fg(theme.text_muted)),
                );
            frame.render_widget(chart, cols[0]);
        }
    }

    if let Some(slider) = app.slider(kind.actuator()) {
        draw_slider(frame, cols[1], slider, selected, &theme);
    }
}

fn draw_slider(frame: &mut Frame, area: Rect, slider: &SliderState, selected: bool, theme: &AppTheme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Label
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Hint
            Constraint::Min(0),    // Last command outcome
        ])
        .split(area);

    let range = slider.actuator.range();
    let label = format!(
        "Set {} ({}-{})",
        slider.actuator.sensor().label().to_lowercase(),
        range.start(),
        range.end()
    );
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(theme.text_secondary)),
        rows[0],
    );

    let gauge_color = if selected { theme.primary } else { theme.text_muted };
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(gauge_color))
        .unfilled_style(Style::default().fg(theme.border_inactive))
        .label(format!("{:>3}", slider.value))
        .ratio(slider.ratio());
    frame.render_widget(gauge, rows[1]);

    let hint = if slider.sending {
        Span::styled("Sending...", Style::default().fg(theme.warning))
    } else if selected {
        Span::styled("←/→ adjust  Enter send", Style::default().fg(theme.text_muted))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(hint)), rows[2]);

    if let Some(outcome) = &slider.last_outcome {
        let color = if outcome.ok { theme.success } else { theme.danger };
        frame.render_widget(
            Paragraph::new(outcome.message.as_str())
                .style(Style::default().fg(color))
                .wrap(ratatui::widgets::Wrap { trim: true }),
            rows[3],
        );
    }
}
