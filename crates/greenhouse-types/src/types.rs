//! Core types for greenhouse sensor data and actuator commands.

use core::fmt;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ParseError, ValueError};

/// Monitored sensor type.
///
/// The set is fixed: exactly one history and one error flag is tracked per
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    /// Air temperature in degrees Celsius.
    Temperature,
    /// Light intensity in lux.
    Light,
    /// Relative humidity percentage.
    Humidity,
}

impl SensorKind {
    /// All sensor types, in display order.
    pub const ALL: [SensorKind; 3] = [SensorKind::Temperature, SensorKind::Light, SensorKind::Humidity];

    /// Classify a gateway sensor by its name.
    ///
    /// The match is a case-insensitive substring test, tried in the order
    /// temperature, light, humidity; the first hit wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use greenhouse_types::SensorKind;
    ///
    /// assert_eq!(SensorKind::from_name("temperature_sensor"), Some(SensorKind::Temperature));
    /// assert_eq!(SensorKind::from_name("Greenhouse LIGHT 1"), Some(SensorKind::Light));
    /// assert_eq!(SensorKind::from_name("humidity_sensor"), Some(SensorKind::Humidity));
    /// assert_eq!(SensorKind::from_name("soil_ph"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name_lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| name_lower.contains(kind.as_str()))
    }

    /// Lowercase identifier, as used in JSON and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Light => "light",
            SensorKind::Humidity => "humidity",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Light => "Light",
            SensorKind::Humidity => "Humidity",
        }
    }

    /// Display unit for values of this type.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Light => "lux",
            SensorKind::Humidity => "%",
        }
    }

    /// The actuator that controls this quantity.
    #[must_use]
    pub fn actuator(&self) -> Actuator {
        match self {
            SensorKind::Temperature => Actuator::Temperature,
            SensorKind::Light => Actuator::Light,
            SensorKind::Humidity => Actuator::Humidity,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Ok(SensorKind::Temperature),
            "light" => Ok(SensorKind::Light),
            "humidity" => Ok(SensorKind::Humidity),
            _ => Err(ParseError::UnknownSensorKind(s.to_string())),
        }
    }
}

/// A sensor record as returned by the gateway's `/api/sensors` endpoint.
///
/// Fields other than `name`, `active` and `valueField` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorDto {
    /// Sensor name; used to classify the sensor.
    #[serde(default)]
    pub name: String,
    /// Whether the device is switched on, as sent. `None` when the key is
    /// absent; an explicit null is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<Value>,
    /// Latest value, usually a numeric string.
    #[serde(default, rename = "valueField", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SensorDto {
    /// The sensor type this record belongs to, if any.
    #[must_use]
    pub fn kind(&self) -> Option<SensorKind> {
        SensorKind::from_name(&self.name)
    }

    /// Drop the name and keep the reading.
    #[must_use]
    pub fn into_reading(self) -> SensorReading {
        SensorReading {
            active: self.active,
            value: self.value,
        }
    }
}

/// One reading of a sensor within a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Whether the device is switched on; absent means on.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub active: Option<Value>,
    /// Raw value; expected to parse as a float.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SensorReading {
    /// Create a reading with the given raw value and no `active` field.
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            active: None,
            value: Some(value.into()),
        }
    }

    /// Create a reading that carries no value at all.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Set the `active` field explicitly.
    #[must_use]
    pub fn with_active(mut self, active: impl Into<Value>) -> Self {
        self.active = Some(active.into());
        self
    }

    /// Whether the device reported itself active.
    ///
    /// An absent field means active. A present field is judged by its
    /// truthiness: null, `false`, zero, `""`, `[]` and `{}` are inactive,
    /// anything else is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.as_ref().is_none_or(is_truthy)
    }

    /// Interpret the raw value as an `f64`.
    ///
    /// Accepts JSON numbers and numeric strings (surrounding whitespace is
    /// ignored), including `nan`, `inf` and out-of-range literals such as
    /// `1e400`. Null, missing, booleans, arrays and objects are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use greenhouse_types::SensorReading;
    ///
    /// assert_eq!(SensorReading::with_value("23.5").parse_value(), Ok(23.5));
    /// assert_eq!(SensorReading::with_value(7).parse_value(), Ok(7.0));
    /// assert!(SensorReading::with_value("warm").parse_value().is_err());
    /// assert!(SensorReading::missing().parse_value().is_err());
    /// ```
    pub fn parse_value(&self) -> Result<f64, ValueError> {
        let value = match &self.value {
            None | Some(Value::Null) => return Err(ValueError::Missing),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| ValueError::NotNumeric(n.to_string()))?,
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValueError::NotNumeric(s.clone()))?,
            Some(Value::Bool(_)) => return Err(ValueError::UnsupportedType("bool")),
            Some(Value::Array(_)) => return Err(ValueError::UnsupportedType("array")),
            Some(Value::Object(_)) => return Err(ValueError::UnsupportedType("object")),
        };

        Ok(value)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Deserialize a field that may be absent, keeping an explicit null as
/// `Some(Value::Null)`. Absence is handled by `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// One tick's readings across all sensor types.
///
/// A type with no entry and a type with an empty list are treated the same
/// by consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    sensors: BTreeMap<SensorKind, Vec<SensorReading>>,
}

impl Snapshot {
    /// An empty snapshot (every sensor absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Group gateway sensor records by type, preserving response order.
    ///
    /// Records whose name matches no sensor type are dropped.
    pub fn from_sensors(sensors: impl IntoIterator<Item = SensorDto>) -> Self {
        let mut snapshot = Self::new();
        for sensor in sensors {
            if let Some(kind) = sensor.kind() {
                snapshot.push(kind, sensor.into_reading());
            }
        }
        snapshot
    }

    /// Append a reading for the given type.
    pub fn push(&mut self, kind: SensorKind, reading: SensorReading) {
        self.sensors.entry(kind).or_default().push(reading);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with_reading(mut self, kind: SensorKind, reading: SensorReading) -> Self {
        self.push(kind, reading);
        self
    }

    /// Set the list for a type explicitly (an empty list is kept as present).
    #[must_use]
    pub fn with_readings(mut self, kind: SensorKind, readings: Vec<SensorReading>) -> Self {
        self.sensors.insert(kind, readings);
        self
    }

    /// Readings for a type, or `None` if the type is absent.
    #[must_use]
    pub fn readings(&self, kind: SensorKind) -> Option<&[SensorReading]> {
        self.sensors.get(&kind).map(Vec::as_slice)
    }

    /// The first reading for a type, the only one that is considered.
    #[must_use]
    pub fn first(&self, kind: SensorKind) -> Option<&SensorReading> {
        self.readings(kind).and_then(<[SensorReading]>::first)
    }

    /// Whether no type has any reading.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensors.values().all(Vec::is_empty)
    }
}

/// A controllable device on the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actuator {
    /// Heating/cooling set point.
    Temperature,
    /// Grow light intensity.
    Light,
    /// Humidifier level.
    Humidity,
}

impl Actuator {
    /// All actuators, in display order.
    pub const ALL: [Actuator; 3] = [Actuator::Temperature, Actuator::Light, Actuator::Humidity];

    /// Name used in the gateway's command URL.
    #[must_use]
    pub fn gateway_name(&self) -> &'static str {
        match self {
            Actuator::Temperature => "actuator_temperature",
            Actuator::Light => "actuator_light",
            Actuator::Humidity => "actuator_humidity",
        }
    }

    /// Accepted values (inclusive).
    #[must_use]
    pub fn range(&self) -> RangeInclusive<u32> {
        match self {
            Actuator::Temperature => 0..=50,
            Actuator::Light | Actuator::Humidity => 0..=100,
        }
    }

    /// Initial slider position.
    #[must_use]
    pub fn default_value(&self) -> u32 {
        match self {
            Actuator::Temperature => 25,
            Actuator::Light | Actuator::Humidity => 50,
        }
    }

    /// The sensor type this actuator influences.
    #[must_use]
    pub fn sensor(&self) -> SensorKind {
        match self {
            Actuator::Temperature => SensorKind::Temperature,
            Actuator::Light => SensorKind::Light,
            Actuator::Humidity => SensorKind::Humidity,
        }
    }

    /// Clamp a value into this actuator's range.
    #[must_use]
    pub fn clamp_value(&self, value: u32) -> u32 {
        let range = self.range();
        value.clamp(*range.start(), *range.end())
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gateway_name())
    }
}

impl FromStr for Actuator {
    type Err = ParseError;

    /// Accepts both the short form (`light`) and the gateway name
    /// (`actuator_light`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let short = lower.strip_prefix("actuator_").unwrap_or(&lower);
        short
            .parse::<SensorKind>()
            .map(|kind| kind.actuator())
            .map_err(|_| ParseError::UnknownActuator(s.to_string()))
    }
}

/// A validated actuator set point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    /// Target actuator.
    pub actuator: Actuator,
    /// Value within the actuator's range.
    pub value: u32,
}

impl ActuatorCommand {
    /// Create a command, rejecting values outside the actuator's range.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ValueOutOfRange`] when `value` is not accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use greenhouse_types::{Actuator, ActuatorCommand};
    ///
    /// assert!(ActuatorCommand::new(Actuator::Temperature, 30).is_ok());
    /// assert!(ActuatorCommand::new(Actuator::Temperature, 51).is_err());
    /// ```
    pub fn new(actuator: Actuator, value: u32) -> Result<Self, ParseError> {
        let range = actuator.range();
        if !range.contains(&value) {
            return Err(ParseError::ValueOutOfRange {
                actuator: actuator.gateway_name().to_string(),
                value,
                min: *range.start(),
                max: *range.end(),
            });
        }
        Ok(Self { actuator, value })
    }

    /// URL path relative to the gateway base.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/api/actuators/{}/{}", self.actuator.gateway_name(), self.value)
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.actuator.gateway_name(), self.value)
    }
}
