//! Error types for greenhouse-types.

use thiserror::Error;

/// Errors that can occur when parsing greenhouse identifiers and commands.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The string does not name a known sensor type.
    #[error("Unknown sensor type '{0}' (expected temperature, light or humidity)")]
    UnknownSensorKind(String),

    /// The string does not name a known actuator.
    #[error("Unknown actuator '{0}' (expected temperature, light or humidity)")]
    UnknownActuator(String),

    /// An actuator value lies outside the range the actuator accepts.
    #[error("Value {value} out of range for {actuator} (allowed {min}..={max})")]
    ValueOutOfRange {
        /// Gateway name of the actuator.
        actuator: String,
        /// The rejected value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}

/// Why a sensor reading's value could not be turned into a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The reading carried no value, or an explicit null.
    #[error("value missing")]
    Missing,

    /// The value is text that does not parse as a number.
    #[error("value '{0}' is not numeric")]
    NotNumeric(String),

    /// The value has a JSON type that cannot hold a number (bool, array, object).
    #[error("value has unsupported type {0}")]
    UnsupportedType(&'static str),
}

/// Result type alias using greenhouse-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
