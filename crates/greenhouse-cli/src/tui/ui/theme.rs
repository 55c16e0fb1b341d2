//! Color palette for the dashboard.
//!
//! Tailwind-style colors, with one green accent per theme for the
//! greenhouse look.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use greenhouse_types::SensorKind;

/// Application theme with all UI colors.
#[derive(Debug, Clone, Copy)]
pub struct AppTheme {
    pub primary: Color,

    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub border_active: Color,
    pub border_inactive: Color,

    pub bg_header: Color,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl AppTheme {
    /// Dark theme.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Rgb(74, 222, 128), // green-400

            success: Color::Rgb(74, 222, 128), // green-400
            warning: Color::Rgb(251, 191, 36), // amber-400
            danger: Color::Rgb(248, 113, 113), // red-400

            text_primary: Color::Rgb(248, 250, 252), // slate-50
            text_secondary: Color::Rgb(148, 163, 184), // slate-400
            text_muted: Color::Rgb(100, 116, 139),   // slate-500

            border_active: Color::Rgb(74, 222, 128), // green-400
            border_inactive: Color::Rgb(71, 85, 105), // slate-600

            bg_header: Color::Rgb(30, 41, 59), // slate-800
        }
    }

    /// Light theme.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Rgb(22, 163, 74), // green-600

            success: Color::Rgb(22, 163, 74), // green-600
            warning: Color::Rgb(217, 119, 6), // amber-600
            danger: Color::Rgb(220, 38, 38),  // red-600

            text_primary: Color::Rgb(15, 23, 42),    // slate-900
            text_secondary: Color::Rgb(71, 85, 105), // slate-600
            text_muted: Color::Rgb(148, 163, 184),   // slate-400

            border_active: Color::Rgb(22, 163, 74), // green-600
            border_inactive: Color::Rgb(203, 213, 225), // slate-300

            bg_header: Color::Rgb(241, 245, 249), // slate-100
        }
    }

    /// Line color for a sensor's chart.
    #[must_use]
    pub fn sensor_color(&self, kind: SensorKind) -> Color {
        match kind {
            SensorKind::Temperature => Color::Rgb(251, 146, 60), // orange-400
            SensorKind::Light => Color::Rgb(250, 204, 21),       // yellow-400
            SensorKind::Humidity => Color::Rgb(56, 189, 248),    // sky-400
        }
    }

    /// Style for active/focused borders.
    #[inline]
    #[must_use]
    pub fn border_active_style(&self) -> Style {
        Style::default().fg(self.border_active)
    }

    /// Style for inactive borders.
    #[inline]
    #[must_use]
    pub fn border_inactive_style(&self) -> Style {
        Style::default().fg(self.border_inactive)
    }

    /// Style for titles.
    #[inline]
    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for header/app bar.
    #[inline]
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default().bg(self.bg_header)
    }

    /// Bold banner on the danger color.
    #[inline]
    #[must_use]
    pub fn error_banner_style(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }
}

/// Default border type for all blocks.
pub const BORDER_TYPE: BorderType = BorderType::Rounded;
