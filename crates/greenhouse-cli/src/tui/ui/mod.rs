//! Layout and rendering for the TUI dashboard.
//!
//! The screen is split into:
//!
//! - **Header**: title, gateway, refresh count and last update
//! - **Panels**: one per sensor with its chart and actuator slider
//! - **Status bar**: status messages or key hints, and the clock

pub mod theme;
pub mod widgets;

mod dashboard;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app::{App, Theme};
use theme::{AppTheme, BORDER_TYPE};

/// Draw the complete TUI interface.
pub fn draw(frame: &mut Frame, app: &App) {
    if matches!(app.theme, Theme::Light) {
        frame.render_widget(
            Block::default().style(Style::default().bg(app.theme.bg())),
            frame.area(),
        );
    }

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Min(9),    // Sensor panels
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);
    dashboard::draw_panels(frame, main_layout[1], app);
    draw_status_bar(frame, main_layout[2], app);

    if app.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();

    let mut spans = vec![
        Span::styled(
            " Smart Greenhouse ",
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", app.gateway),
            Style::default().fg(theme.text_secondary),
        ),
    ];

    if app.fetch_error.is_some() {
        spans.push(Span::styled(
            " OFFLINE ",
            Style::default()
                .fg(theme.danger)
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(
        format!(" #{} ", app.tick),
        Style::default().fg(theme.text_muted),
    ));

    if let Some(at) = app.last_update {
        spans.push(Span::styled(
            format!(
                " updated {:02}:{:02}:{:02} UTC ",
                at.hour(),
                at.minute(),
                at.second()
            ),
            Style::default().fg(theme.text_muted),
        ));
    }

    if app.refresh_stopped {
        spans.push(Span::styled(" PAUSED ", Style::default().fg(theme.warning)));
    }

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}

fn context_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![("?", "help"), ("j/k", "select"), ("←/→", "adjust"), ("Enter", "send")];
    if app.refresh_stopped {
        hints.push(("r", "resume"));
    } else {
        hints.push(("r", "refresh"));
    }
    hints.push(("q", "quit"));
    hints
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.app_theme();
    let time_str = Local::now().format("%H:%M:%S").to_string();

    let left_spans = if let Some(msg) = app.current_status_message() {
        vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme.text_secondary),
        )]
    } else {
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in context_hints(app).iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", desc),
                Style::default().fg(theme.text_muted),
            ));
        }
        spans
    };

    let status_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(10)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left_spans)), status_layout[0]);
    frame.render_widget(
        Paragraph::new(time_str)
            .style(Style::default().fg(theme.text_muted))
            .alignment(Alignment::Right),
        status_layout[1],
    );
}

fn draw_help_overlay(frame: &mut Frame) {
    let theme = AppTheme::dark();

    let area = frame.area();
    let width = 48.min(area.width.saturating_sub(2));
    let height = 18.min(area.height.saturating_sub(2));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    let help_area = Rect::new(x, y, width, height);
    frame.render_widget(Clear, help_area);

    let lines = vec![
        Line::from(""),
        shortcut_line("j/k", "Next/Prev panel", &theme),
        shortcut_line("Tab", "Next panel", &theme),
        shortcut_line("h/l", "Slider -1/+1", &theme),
        shortcut_line("[ / ]", "Slider -10/+10", &theme),
        shortcut_line("PgDn/PgUp", "Slider -10/+10", &theme),
        shortcut_line("Enter/s", "Send to actuator", &theme),
        shortcut_line("r", "Refresh now", &theme),
        shortcut_line("t", "Toggle theme", &theme),
        shortcut_line("q/Ctrl+C", "Quit", &theme),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(theme.text_muted),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(theme.border_active_style())
        .title(Span::styled(" Keyboard Shortcuts ", theme.title_style()));

    frame.render_widget(Paragraph::new(lines).block(block), help_area);
}

fn shortcut_line<'a>(key: &str, desc: &str, theme: &AppTheme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:>12} ", key), Style::default().fg(theme.warning)),
        Span::styled(desc.to_string(), Style::default().fg(theme.text_secondary)),
    ])
}
