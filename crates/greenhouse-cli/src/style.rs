//! Terminal styling for CLI output.
//!
//! Colors follow simple comfort bands for plants. Every function takes a
//! `no_color` flag and falls back to plain ASCII when it is set.

use owo_colors::OwoColorize;

use greenhouse_types::SensorKind;

// ============================================================================
// Thresholds
// ============================================================================

/// Temperature bands (Celsius).
pub mod temperature {
    pub const COLD: f64 = 15.0; // Cyan: < 15°C
    pub const HOT: f64 = 30.0; // Orange: > 30°C
    // Green: 15-30°C
}

/// Light bands (lux).
pub mod light {
    pub const DIM: f64 = 200.0; // Yellow: < 200 lux
    // Green: >= 200 lux
}

/// Relative humidity bands (percent).
pub mod humidity {
    pub const DRY: f64 = 40.0; // Yellow: < 40%
    pub const DAMP: f64 = 85.0; // Blue: > 85%
    // Green: 40-85%
}

/// Which comfort band a value falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Good,
    High,
}

/// Classify a sensor value.
#[must_use]
pub fn band(kind: SensorKind, value: f64) -> Band {
    let (low, high) = match kind {
        SensorKind::Temperature => (temperature::COLD, temperature::HOT),
        SensorKind::Light => (light::DIM, f64::INFINITY),
        SensorKind::Humidity => (humidity::DRY, humidity::DAMP),
    };
    if value < low {
        Band::Low
    } else if value > high {
        Band::High
    } else {
        Band::Good
    }
}

// ============================================================================
// Colored Value Formatting
// ============================================================================

/// Format a value with its unit, one decimal for temperature.
#[must_use]
pub fn format_value(kind: SensorKind, value: f64) -> String {
    match kind {
        SensorKind::Temperature => format!("{:.1} {}", value, kind.unit()),
        _ => format!("{:.0} {}", value, kind.unit()),
    }
}

/// Format a value colored by its comfort band.
pub fn format_value_colored(kind: SensorKind, value: f64, no_color: bool) -> String {
    let formatted = format_value(kind, value);
    if no_color {
        return formatted;
    }

    match (kind, band(kind, value)) {
        (_, Band::Good) => format!("{}", formatted.green()),
        (SensorKind::Temperature, Band::Low) => format!("{}", formatted.cyan()),
        (SensorKind::Temperature, Band::High) => format!("{}", formatted.truecolor(255, 165, 0)),
        (SensorKind::Humidity, Band::High) => format!("{}", formatted.blue()),
        _ => format!("{}", formatted.yellow()),
    }
}

/// Format the offline marker for a sensor.
pub fn format_offline(no_color: bool) -> String {
    if no_color {
        "OFFLINE".to_string()
    } else {
        format!("{}", "OFFLINE".red().bold())
    }
}

// ============================================================================
// Status Messages
// ============================================================================

/// Format a success message.
pub fn format_success(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[OK] {}", message)
    } else {
        format!("{} {}", "[OK]".green(), message)
    }
}

/// Format an error message.
pub fn format_failure(message: &str, no_color: bool) -> String {
    if no_color {
        format!("[!!] {}", message)
    } else {
        format!("{} {}", "[!!]".red(), message)
    }
}

/// Format a section title.
pub fn format_title(title: &str, no_color: bool) -> String {
    if no_color {
        title.to_string()
    } else {
        format!("{}", title.bold())
    }
}

// ============================================================================
// Trend Indicators
// ============================================================================

/// Get trend indicator comparing current and previous values.
///
/// Changes smaller than `dead_band` are shown as flat.
pub fn trend_indicator(current: f64, previous: f64, dead_band: f64, no_color: bool) -> &'static str {
    let diff = current - previous;
    if diff.abs() < dead_band {
        "-"
    } else if diff > 0.0 {
        if no_color { "^" } else { "↑" }
    } else if no_color {
        "v"
    } else {
        "↓"
    }
}

/// Dead band used for trend arrows per sensor type.
#[must_use]
pub fn trend_dead_band(kind: SensorKind) -> f64 {
    match kind {
        SensorKind::Temperature => 0.2,
        SensorKind::Light => 10.0,
        SensorKind::Humidity => 1.0,
    }
}
