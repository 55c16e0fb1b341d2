//! Rolling per-sensor history with error flags.
//!
//! [`SensorHistoryTracker`] keeps, for each [`SensorKind`], the last
//! [`HISTORY_CAPACITY`] successfully parsed values (oldest first) and a flag
//! saying whether the most recent update for that sensor failed.
//!
//! Each call to [`SensorHistoryTracker::update`] looks only at the first
//! reading of every sensor type in the snapshot:
//!
//! - absent or empty list: error, history untouched
//! - reported inactive: error, history untouched
//! - value missing or not a number: error, history untouched
//! - otherwise: value appended, oldest evicted past capacity, error cleared
//!
//! Sensors never affect each other, and an update can never fail as a whole.
//!
//! # Example
//!
//! ```
//! use greenhouse_core::SensorHistoryTracker;
//! use greenhouse_types::{SensorKind, SensorReading, Snapshot};
//!
//! let mut tracker = SensorHistoryTracker::new();
//! let snapshot = Snapshot::new()
//!     .with_reading(SensorKind::Temperature, SensorReading::with_value("23.5"));
//!
//! tracker.update(&snapshot);
//!
//! assert_eq!(tracker.history(SensorKind::Temperature), vec![23.5]);
//! assert!(!tracker.is_error(SensorKind::Temperature));
//! assert!(tracker.is_error(SensorKind::Light));
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use greenhouse_types::{SensorKind, Snapshot, ValueError};

/// Maximum number of values kept per sensor.
pub const HISTORY_CAPACITY: usize = 20;

/// History and error flag for one sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    history: VecDeque<f64>,
    error: bool,
}

impl HistoryState {
    /// Empty history, no error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values oldest first.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.history.iter().copied()
    }

    /// Copy of the values, oldest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    /// The most recently recorded value.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.history.back().copied()
    }

    /// Number of recorded values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Whether the latest update for this sensor failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Smallest and largest finite recorded value.
    ///
    /// NaN and infinities are kept in the history but skipped here, so the
    /// result is `None` when no finite value has been recorded.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    fn record(&mut self, value: f64) {
        self.history.push_back(value);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.error = false;
    }

    fn mark_error(&mut self) {
        self.error = true;
    }
}

/// Why a sensor was flagged during an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorFailure {
    /// The snapshot had no reading for this sensor type.
    Absent,
    /// The first reading reported itself inactive (`active` false, null or zero).
    Inactive,
    /// The first reading's value was missing or not numeric.
    Malformed(ValueError),
}

impl fmt::Display for SensorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFailure::Absent => f.write_str("no reading"),
            SensorFailure::Inactive => f.write_str("sensor inactive"),
            SensorFailure::Malformed(e) => write!(f, "malformed reading: {e}"),
        }
    }
}

/// Per-sensor outcome of a single [`SensorHistoryTracker::update`].
///
/// Purely informational; callers that only care about the flags can drop it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    outcomes: BTreeMap<SensorKind, Result<f64, SensorFailure>>,
}

impl UpdateReport {
    /// The recorded value or the failure reason for a sensor.
    #[must_use]
    pub fn outcome(&self, kind: SensorKind) -> Option<&Result<f64, SensorFailure>> {
        self.outcomes.get(&kind)
    }

    /// The failure reason for a sensor, if it was flagged.
    #[must_use]
    pub fn failure(&self, kind: SensorKind) -> Option<&SensorFailure> {
        self.outcome(kind).and_then(|o| o.as_ref().err())
    }

    /// All flagged sensors with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (SensorKind, &SensorFailure)> {
        self.outcomes
            .iter()
            .filter_map(|(kind, o)| o.as_ref().err().map(|e| (*kind, e)))
    }

    /// Whether every sensor recorded a value.
    #[must_use]
    pub fn all_ok(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }
}

/// Tracks recent values and error flags for temperature, light and humidity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorHistoryTracker {
    temperature: HistoryState,
    light: HistoryState,
    humidity: HistoryState,
}

impl SensorHistoryTracker {
    /// All histories empty, all flags cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one snapshot to every sensor.
    ///
    /// Never fails: problems with a sensor only set that sensor's flag. The
    /// returned report says what happened to each sensor.
    pub fn update(&mut self, snapshot: &Snapshot) -> UpdateReport {
        let mut report = UpdateReport::default();

        for kind in SensorKind::ALL {
            let outcome = evaluate(snapshot, kind);
            let state = self.state_mut(kind);
            match &outcome {
                Ok(value) => {
                    state.record(*value);
                    debug!(sensor = %kind, value, "Recorded reading");
                }
                Err(failure) => {
                    state.mark_error();
                    debug!(sensor = %kind, %failure, "Sensor flagged");
                }
            }
            report.outcomes.insert(kind, outcome);
        }

        report
    }

    /// State for one sensor.
    #[must_use]
    pub fn state(&self, kind: SensorKind) -> &HistoryState {
        match kind {
            SensorKind::Temperature => &self.temperature,
            SensorKind::Light => &self.light,
            SensorKind::Humidity => &self.humidity,
        }
    }

    fn state_mut(&mut self, kind: SensorKind) -> &mut HistoryState {
        match kind {
            SensorKind::Temperature => &mut self.temperature,
            SensorKind::Light => &mut self.light,
            SensorKind::Humidity => &mut self.humidity,
        }
    }

    /// History for one sensor, oldest first.
    #[must_use]
    pub fn history(&self, kind: SensorKind) -> Vec<f64> {
        self.state(kind).to_vec()
    }

    /// Error flag for one sensor.
    #[must_use]
    pub fn is_error(&self, kind: SensorKind) -> bool {
        self.state(kind).is_error()
    }

    /// All states in display order.
    pub fn states(&self) -> impl Iterator<Item = (SensorKind, &HistoryState)> {
        SensorKind::ALL.into_iter().map(move |kind| (kind, self.state(kind)))
    }

    /// Owned copy of every state, for handing to a presentation layer.
    #[must_use]
    pub fn view(&self) -> BTreeMap<SensorKind, HistoryState> {
        self.states().map(|(kind, state)| (kind, state.clone())).collect()
    }
}

fn evaluate(snapshot: &Snapshot, kind: SensorKind) -> Result<f64, SensorFailure> {
    let reading = snapshot.first(kind).ok_or(SensorFailure::Absent)?;
    if !reading.is_active() {
        return Err(SensorFailure::Inactive);
    }
    reading.parse_value().map_err(SensorFailure::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_types::SensorReading;
    use serde_json::json;

    fn temp(value: &str) -> Snapshot {
        Snapshot::new().with_reading(SensorKind::Temperature, SensorReading::with_value(value))
    }

    fn all_three(t: &str, l: &str, h: &str) -> Snapshot {
        Snapshot::new()
            .with_reading(SensorKind::Temperature, SensorReading::with_value(t))
            .with_reading(SensorKind::Light, SensorReading::with_value(l))
            .with_reading(SensorKind::Humidity, SensorReading::with_value(h))
    }

    #[test]
    fn test_new_tracker_is_empty_and_clear() {
        let tracker = SensorHistoryTracker::new();
        for (_, state) in tracker.states() {
            assert!(state.is_empty());
            assert!(!state.is_error());
        }
    }

    #[test]
    fn test_first_good_reading() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&temp("23.5"));

        assert_eq!(tracker.history(SensorKind::Temperature), vec![23.5]);
        assert!(!tracker.is_error(SensorKind::Temperature));
        assert!(tracker.history(SensorKind::Light).is_empty());
        assert!(tracker.is_error(SensorKind::Light));
        assert!(tracker.is_error(SensorKind::Humidity));
    }

    #[test]
    fn test_inactive_sensor_keeps_history() {
        let mut tracker = SensorHistoryTracker::new();
        for v in ["21.0", "22.0", "23.0"] {
            tracker.update(&temp(v));
        }

        let snapshot = Snapshot::new().with_reading(
            SensorKind::Temperature,
            SensorReading::with_value("24.0").with_active(false),
        );
        let report = tracker.update(&snapshot);

        assert_eq!(tracker.history(SensorKind::Temperature), vec![21.0, 22.0, 23.0]);
        assert!(tracker.is_error(SensorKind::Temperature));
        assert_eq!(report.failure(SensorKind::Temperature), Some(&SensorFailure::Inactive));
    }

    #[test]
    fn test_eviction_at_capacity() {
        let mut tracker = SensorHistoryTracker::new();
        for i in 1..=20 {
            tracker.update(&temp(&i.to_string()));
        }
        assert_eq!(tracker.state(SensorKind::Temperature).len(), HISTORY_CAPACITY);

        tracker.update(&temp("99"));

        let expected: Vec<f64> = (2..=20).map(f64::from).chain([99.0]).collect();
        assert_eq!(tracker.history(SensorKind::Temperature), expected);
    }

    #[test]
    fn test_unparseable_value() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&Snapshot::new().with_reading(SensorKind::Light, SensorReading::with_value("500")));

        let report = tracker.update(
            &Snapshot::new().with_reading(SensorKind::Light, SensorReading::with_value("n/a")),
        );

        assert_eq!(tracker.history(SensorKind::Light), vec![500.0]);
        assert!(tracker.is_error(SensorKind::Light));
        assert!(matches!(
            report.failure(SensorKind::Light),
            Some(SensorFailure::Malformed(ValueError::NotNumeric(_)))
        ));
    }

    #[test]
    fn test_missing_and_null_values_flag_error() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(
            &Snapshot::new()
                .with_reading(SensorKind::Temperature, SensorReading::missing())
                .with_reading(SensorKind::Light, SensorReading::with_value(json!(null)))
                .with_reading(SensorKind::Humidity, SensorReading::with_value(true)),
        );

        for kind in SensorKind::ALL {
            assert!(tracker.is_error(kind), "{kind} should be flagged");
            assert!(tracker.history(kind).is_empty());
        }
    }

    #[test]
    fn test_empty_list_is_absent() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&temp("20"));

        let report = tracker.update(&Snapshot::new().with_readings(SensorKind::Temperature, Vec::new()));

        assert!(tracker.is_error(SensorKind::Temperature));
        assert_eq!(tracker.history(SensorKind::Temperature), vec![20.0]);
        assert_eq!(report.failure(SensorKind::Temperature), Some(&SensorFailure::Absent));
    }

    #[test]
    fn test_empty_snapshot_flags_everything() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&all_three("20", "400", "60"));

        let report = tracker.update(&Snapshot::new());

        assert!(!report.all_ok());
        assert_eq!(report.failures().count(), 3);
        for kind in SensorKind::ALL {
            assert!(tracker.is_error(kind));
            assert_eq!(tracker.history(kind).len(), 1);
        }
    }

    #[test]
    fn test_recovery_clears_error() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&Snapshot::new());
        assert!(tracker.is_error(SensorKind::Humidity));

        let report = tracker.update(&all_three("20", "400", "61.5"));

        assert!(report.all_ok());
        assert!(!tracker.is_error(SensorKind::Humidity));
        assert_eq!(tracker.state(SensorKind::Humidity).latest(), Some(61.5));
    }

    #[test]
    fn test_only_first_reading_counts() {
        let mut tracker = SensorHistoryTracker::new();
        let snapshot = Snapshot::new().with_readings(
            SensorKind::Temperature,
            vec![
                SensorReading::with_value("bad"),
                SensorReading::with_value("22.0"),
            ],
        );

        tracker.update(&snapshot);

        assert!(tracker.is_error(SensorKind::Temperature));
        assert!(tracker.history(SensorKind::Temperature).is_empty());
    }

    #[test]
    fn test_sensors_are_independent() {
        let mut tracker = SensorHistoryTracker::new();
        let snapshot = Snapshot::new()
            .with_reading(SensorKind::Temperature, SensorReading::with_value("20"))
            .with_reading(SensorKind::Light, SensorReading::with_value("x"))
            .with_reading(
                SensorKind::Humidity,
                SensorReading::with_value("70").with_active(false),
            );

        let report = tracker.update(&snapshot);

        assert_eq!(report.outcome(SensorKind::Temperature), Some(&Ok(20.0)));
        assert!(!tracker.is_error(SensorKind::Temperature));
        assert!(tracker.is_error(SensorKind::Light));
        assert!(tracker.is_error(SensorKind::Humidity));
    }

    #[test]
    fn test_numeric_json_value_accepted() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(
            &Snapshot::new().with_reading(SensorKind::Light, SensorReading::with_value(json!(812))),
        );
        assert_eq!(tracker.history(SensorKind::Light), vec![812.0]);
    }

    #[test]
    fn test_bounds_and_view() {
        let mut tracker = SensorHistoryTracker::new();
        for v in ["3", "-1", "7"] {
            tracker.update(&temp(v));
        }

        assert_eq!(tracker.state(SensorKind::Temperature).bounds(), Some((-1.0, 7.0)));
        assert_eq!(tracker.state(SensorKind::Light).bounds(), None);

        let view = tracker.view();
        assert_eq!(view.len(), 3);
        assert_eq!(view[&SensorKind::Temperature].to_vec(), vec![3.0, -1.0, 7.0]);
    }

    #[test]
    fn test_non_finite_values_are_recorded() {
        let mut tracker = SensorHistoryTracker::new();
        for v in ["5", "nan", "inf", "1e400", "-inf", "2"] {
            tracker.update(&temp(v));
            assert!(!tracker.is_error(SensorKind::Temperature), "{v} should be accepted");
        }

        let state = tracker.state(SensorKind::Temperature);
        assert_eq!(state.len(), 6);
        assert!(state.values().nth(1).unwrap().is_nan());
        assert_eq!(state.values().nth(3), Some(f64::INFINITY));
        assert_eq!(state.bounds(), Some((2.0, 5.0)));
    }

    #[test]
    fn test_bounds_none_without_finite_values() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&temp("nan"));
        tracker.update(&temp("inf"));

        assert_eq!(tracker.state(SensorKind::Temperature).len(), 2);
        assert_eq!(tracker.state(SensorKind::Temperature).bounds(), None);
    }

    #[test]
    fn test_null_and_falsy_active_flag_error() {
        let mut tracker = SensorHistoryTracker::new();
        tracker.update(&all_three("20", "400", "60"));

        let snapshot = Snapshot::new()
            .with_reading(
                SensorKind::Temperature,
                SensorReading::with_value("21").with_active(json!(null)),
            )
            .with_reading(SensorKind::Light, SensorReading::with_value("410").with_active(0))
            .with_reading(
                SensorKind::Humidity,
                SensorReading::with_value("61").with_active("yes"),
            );
        let report = tracker.update(&snapshot);

        assert_eq!(report.failure(SensorKind::Temperature), Some(&SensorFailure::Inactive));
        assert_eq!(report.failure(SensorKind::Light), Some(&SensorFailure::Inactive));
        assert_eq!(tracker.history(SensorKind::Temperature), vec![20.0]);
        assert_eq!(tracker.history(SensorKind::Light), vec![400.0]);
        assert_eq!(tracker.history(SensorKind::Humidity), vec![60.0, 61.0]);
        assert!(!tracker.is_error(SensorKind::Humidity));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(SensorFailure::Absent.to_string(), "no reading");
        assert_eq!(SensorFailure::Inactive.to_string(), "sensor inactive");
        assert_eq!(
            SensorFailure::Malformed(ValueError::Missing).to_string(),
            "malformed reading: value missing"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// A first reading that is either good, inactive, malformed or absent.
        fn reading_strategy() -> impl Strategy<Value = Option<SensorReading>> {
            prop_oneof![
                (-1000.0f64..1000.0).prop_map(|v| Some(SensorReading::with_value(v.to_string()))),
                (-1000.0f64..1000.0)
                    .prop_map(|v| Some(SensorReading::with_value(v.to_string()).with_active(false))),
                "[a-z]{1,5}".prop_map(|s| Some(SensorReading::with_value(s))),
                Just(Some(SensorReading::missing())),
                Just(None),
            ]
        }

        fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
            (reading_strategy(), reading_strategy(), reading_strategy()).prop_map(|(t, l, h)| {
                let mut snapshot = Snapshot::new();
                for (kind, reading) in SensorKind::ALL.into_iter().zip([t, l, h]) {
                    if let Some(reading) = reading {
                        snapshot.push(kind, reading);
                    }
                }
                snapshot
            })
        }

        proptest! {
            /// History never exceeds capacity, whatever the input.
            #[test]
            fn history_is_bounded(snapshots in prop::collection::vec(snapshot_strategy(), 0..60)) {
                let mut tracker = SensorHistoryTracker::new();
                for snapshot in &snapshots {
                    tracker.update(snapshot);
                    for (_, state) in tracker.states() {
                        prop_assert!(state.len() <= HISTORY_CAPACITY);
                    }
                }
            }

            /// The flag is exactly "did the last update fail", and a failure
            /// leaves the history untouched.
            #[test]
            fn flag_tracks_last_outcome(snapshots in prop::collection::vec(snapshot_strategy(), 1..40)) {
                let mut tracker = SensorHistoryTracker::new();
                for snapshot in &snapshots {
                    let before = tracker.clone();
                    let report = tracker.update(snapshot);
                    for kind in SensorKind::ALL {
                        match report.outcome(kind) {
                            Some(Ok(value)) => {
                                prop_assert!(!tracker.is_error(kind));
                                prop_assert_eq!(tracker.state(kind).latest(), Some(*value));
                            }
                            Some(Err(_)) => {
                                prop_assert!(tracker.is_error(kind));
                                prop_assert_eq!(tracker.history(kind), before.history(kind));
                            }
                            None => prop_assert!(false, "missing outcome for {}", kind),
                        }
                    }
                }
            }

            /// History holds the last N good values in arrival order.
            #[test]
            fn history_is_fifo_suffix(values in prop::collection::vec(-1.0e6f64..1.0e6, 0..50)) {
                let mut tracker = SensorHistoryTracker::new();
                for v in &values {
                    tracker.update(&Snapshot::new().with_reading(
                        SensorKind::Humidity,
                        SensorReading::with_value(v.to_string()),
                    ));
                }
                let start = values.len().saturating_sub(HISTORY_CAPACITY);
                prop_assert_eq!(tracker.history(SensorKind::Humidity), values[start..].to_vec());
            }
        }
    }
}
