//! Chart helpers for the sensor panels.

use greenhouse_core::{HISTORY_CAPACITY, HistoryState};
use greenhouse_types::SensorKind;

use crate::style::{trend_dead_band, trend_indicator};

/// Chart points for a history, x being the sample index.
///
/// NaN and infinite samples keep their slot on the x axis but are not drawn.
pub fn history_points(state: &HistoryState) -> Vec<(f64, f64)> {
    state
        .values()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64, v))
        .collect()
}

/// X axis range. Always spans at least a full history so the line grows
/// from the left instead of stretching.
pub fn x_bounds(len: usize) -> [f64; 2] {
    let last = len.saturating_sub(1).max(HISTORY_CAPACITY) as f64;
    [0.0, last]
}

/// Y axis range around the recorded values, padded so a flat line is
/// still visible.
pub fn y_bounds(state: &HistoryState) -> [f64; 2] {
    let Some((lo, hi)) = state.bounds() else {
        return [0.0, 1.0];
    };
    let span = hi - lo;
    let pad = if span < f64::EPSILON {
        (lo.abs() * 0.05).max(1.0)
    } else {
        span * 0.1
    };
    [lo - pad, hi + pad]
}

/// Three evenly spaced y axis labels.
pub fn y_labels(kind: SensorKind, bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .into_iter()
        .map(|v| match kind {
            SensorKind::Temperature => format!("{v:.1}"),
            _ => format!("{v:.0}"),
        })
        .collect()
}

/// Trend arrow comparing the last two recorded values.
pub fn history_trend(kind: SensorKind, state: &HistoryState) -> Option<&'static str> {
    let mut recent = state.values().rev();
    let current = recent.next()?;
    let previous = recent.next()?;
    Some(trend_indicator(
        current,
        previous,
        trend_dead_band(kind),
        false,
    ))
}
