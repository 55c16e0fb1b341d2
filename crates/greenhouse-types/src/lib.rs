//! Shared types for the smart greenhouse dashboard.
//!
//! This crate holds the data model exchanged between the gateway client,
//! the history tracker and the presentation layer.
//!
//! # Features
//!
//! - Sensor types and gateway sensor records
//! - Per-tick snapshots grouped by sensor type
//! - Actuators and validated actuator commands
//! - Error types for parsing identifiers and values
//!
//! # Example
//!
//! ```
//! use greenhouse_types::{SensorKind, SensorReading, Snapshot};
//!
//! let snapshot = Snapshot::new()
//!     .with_reading(SensorKind::Temperature, SensorReading::with_value("23.5"));
//! assert_eq!(snapshot.first(SensorKind::Temperature).unwrap().parse_value(), Ok(23.5));
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult, ValueError};
pub use types::{Actuator, ActuatorCommand, SensorDto, SensorKind, SensorReading, Snapshot};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- SensorKind ---

    #[test]
    fn test_sensor_kind_from_name_is_case_insensitive() {
        assert_eq!(SensorKind::from_name("TEMPERATURE_SENSOR"), Some(SensorKind::Temperature));
        assert_eq!(SensorKind::from_name("Light Sensor"), Some(SensorKind::Light));
        assert_eq!(SensorKind::from_name("humidity"), Some(SensorKind::Humidity));
    }

    #[test]
    fn test_sensor_kind_from_name_prefers_temperature() {
        // A name mentioning two quantities is classified by the first in order
        assert_eq!(
            SensorKind::from_name("humidity_and_temperature"),
            Some(SensorKind::Temperature)
        );
        assert_eq!(SensorKind::from_name("light_humidity"), Some(SensorKind::Light));
    }

    #[test]
    fn test_sensor_kind_from_name_unknown() {
        assert_eq!(SensorKind::from_name(""), None);
        assert_eq!(SensorKind::from_name("co2_sensor"), None);
    }

    #[test]
    fn test_sensor_kind_parse_and_display() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.to_string().parse::<SensorKind>(), Ok(kind));
        }
        assert!("pressure".parse::<SensorKind>().is_err());
    }

    #[test]
    fn test_sensor_kind_units() {
        assert_eq!(SensorKind::Temperature.unit(), "°C");
        assert_eq!(SensorKind::Light.unit(), "lux");
        assert_eq!(SensorKind::Humidity.unit(), "%");
    }

    // --- SensorReading ---

    #[test]
    fn test_reading_active_defaults_to_true() {
        assert!(SensorReading::with_value("1").is_active());
        assert!(SensorReading::with_value("1").with_active(true).is_active());
        assert!(!SensorReading::with_value("1").with_active(false).is_active());
    }

    #[test]
    fn test_reading_active_follows_truthiness() {
        let reading = |active: serde_json::Value| SensorReading::with_value("1").with_active(active);

        assert!(!reading(json!(null)).is_active());
        assert!(!reading(json!(0)).is_active());
        assert!(!reading(json!("")).is_active());
        assert!(!reading(json!([])).is_active());
        assert!(reading(json!(1)).is_active());
        assert!(reading(json!("false")).is_active());
        assert!(reading(json!({"on": true})).is_active());
    }

    #[test]
    fn test_parse_value_numeric_string() {
        assert_eq!(SensorReading::with_value("23.5").parse_value(), Ok(23.5));
        assert_eq!(SensorReading::with_value(" 42 ").parse_value(), Ok(42.0));
        assert_eq!(SensorReading::with_value("-1e2").parse_value(), Ok(-100.0));
    }

    #[test]
    fn test_parse_value_json_number() {
        assert_eq!(SensorReading::with_value(json!(18.25)).parse_value(), Ok(18.25));
        assert_eq!(SensorReading::with_value(json!(900)).parse_value(), Ok(900.0));
    }

    #[test]
    fn test_parse_value_rejects_missing_and_null() {
        assert_eq!(SensorReading::missing().parse_value(), Err(ValueError::Missing));
        assert_eq!(
            SensorReading::with_value(serde_json::Value::Null).parse_value(),
            Err(ValueError::Missing)
        );
    }

    #[test]
    fn test_parse_value_rejects_non_numeric() {
        assert_eq!(
            SensorReading::with_value("n/a").parse_value(),
            Err(ValueError::NotNumeric("n/a".to_string()))
        );
        assert!(SensorReading::with_value("").parse_value().is_err());
        assert_eq!(
            SensorReading::with_value(true).parse_value(),
            Err(ValueError::UnsupportedType("bool"))
        );
        assert_eq!(
            SensorReading::with_value(json!([1.0])).parse_value(),
            Err(ValueError::UnsupportedType("array"))
        );
    }

    #[test]
    fn test_parse_value_accepts_non_finite() {
        assert_eq!(SensorReading::with_value("inf").parse_value(), Ok(f64::INFINITY));
        assert_eq!(SensorReading::with_value("-inf").parse_value(), Ok(f64::NEG_INFINITY));
        assert_eq!(SensorReading::with_value("1e400").parse_value(), Ok(f64::INFINITY));
        assert!(SensorReading::with_value("NaN").parse_value().unwrap().is_nan());
    }

    // --- SensorDto / Snapshot ---

    #[test]
    fn test_sensor_dto_deserializes_gateway_shape() {
        let body = r#"[
            {"id": 1, "name": "temperature_sensor", "active": true, "valueField": "23.5"},
            {"id": 2, "name": "light_sensor", "valueField": null},
            {"id": 3, "name": "humidity_sensor", "active": false}
        ]"#;
        let sensors: Vec<SensorDto> = serde_json::from_str(body).unwrap();

        assert_eq!(sensors.len(), 3);
        assert_eq!(sensors[0].kind(), Some(SensorKind::Temperature));
        assert_eq!(sensors[0].value, Some(json!("23.5")));
        assert_eq!(sensors[1].active, None);
        assert_eq!(sensors[1].value, None);
        assert_eq!(sensors[2].active, Some(json!(false)));
    }

    #[test]
    fn test_sensor_dto_keeps_odd_active_values() {
        let body = r#"[
            {"name": "temperature_sensor", "active": null, "valueField": "23.5"},
            {"name": "light_sensor", "active": "false", "valueField": "400"},
            {"name": "humidity_sensor", "active": 0, "valueField": "60"}
        ]"#;
        let sensors: Vec<SensorDto> = serde_json::from_str(body).unwrap();

        assert_eq!(sensors[0].active, Some(serde_json::Value::Null));
        assert_eq!(sensors[1].active, Some(json!("false")));
        assert_eq!(sensors[2].active, Some(json!(0)));

        let readings: Vec<SensorReading> =
            sensors.into_iter().map(SensorDto::into_reading).collect();
        assert!(!readings[0].is_active());
        assert!(readings[1].is_active());
        assert!(!readings[2].is_active());
    }

    #[test]
    fn test_sensor_dto_missing_name_defaults_empty() {
        let sensor: SensorDto = serde_json::from_str(r#"{"valueField": "1"}"#).unwrap();
        assert_eq!(sensor.name, "");
        assert_eq!(sensor.kind(), None);
    }

    #[test]
    fn test_snapshot_groups_by_kind_in_order() {
        let sensors = vec![
            SensorDto {
                name: "temperature_a".into(),
                value: Some(json!("20")),
                ..Default::default()
            },
            SensorDto {
                name: "soil".into(),
                value: Some(json!("7")),
                ..Default::default()
            },
            SensorDto {
                name: "temperature_b".into(),
                value: Some(json!("21")),
                ..Default::default()
            },
        ];

        let snapshot = Snapshot::from_sensors(sensors);
        let temps = snapshot.readings(SensorKind::Temperature).unwrap();
        assert_eq!(temps.len(), 2);
        assert_eq!(temps[0].parse_value(), Ok(20.0));
        assert_eq!(snapshot.first(SensorKind::Temperature), Some(&temps[0]));
        assert!(snapshot.readings(SensorKind::Light).is_none());
        assert!(snapshot.readings(SensorKind::Humidity).is_none());
    }

    #[test]
    fn test_snapshot_empty_list_is_present_but_empty() {
        let snapshot = Snapshot::new().with_readings(SensorKind::Light, Vec::new());
        assert_eq!(snapshot.readings(SensorKind::Light), Some(&[][..]));
        assert!(snapshot.first(SensorKind::Light).is_none());
        assert!(snapshot.is_empty());
    }

    // --- Actuator ---

    #[test]
    fn test_actuator_gateway_names() {
        assert_eq!(Actuator::Temperature.gateway_name(), "actuator_temperature");
        assert_eq!(Actuator::Light.gateway_name(), "actuator_light");
        assert_eq!(Actuator::Humidity.gateway_name(), "actuator_humidity");
    }

    #[test]
    fn test_actuator_ranges_and_defaults() {
        assert_eq!(Actuator::Temperature.range(), 0..=50);
        assert_eq!(Actuator::Light.range(), 0..=100);
        assert_eq!(Actuator::Temperature.default_value(), 25);
        assert_eq!(Actuator::Humidity.default_value(), 50);
        assert_eq!(Actuator::Temperature.clamp_value(80), 50);
    }

    #[test]
    fn test_actuator_from_str_accepts_both_forms() {
        assert_eq!("light".parse::<Actuator>(), Ok(Actuator::Light));
        assert_eq!("actuator_humidity".parse::<Actuator>(), Ok(Actuator::Humidity));
        assert_eq!("Temperature".parse::<Actuator>(), Ok(Actuator::Temperature));
        assert!(matches!(
            "fan".parse::<Actuator>(),
            Err(ParseError::UnknownActuator(_))
        ));
    }

    #[test]
    fn test_actuator_command_validation() {
        let cmd = ActuatorCommand::new(Actuator::Light, 100).unwrap();
        assert_eq!(cmd.path(), "/api/actuators/actuator_light/100");

        let err = ActuatorCommand::new(Actuator::Temperature, 51).unwrap_err();
        assert!(err.to_string().contains("actuator_temperature"));
        assert!(err.to_string().contains("0..=50"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Arbitrary text never panics the value parser.
            #[test]
            fn parse_value_never_panics(s in ".*") {
                let _ = SensorReading::with_value(s).parse_value();
            }

            /// Any finite float written as text parses back to itself.
            #[test]
            fn parse_value_accepts_formatted_floats(v in -1.0e9f64..1.0e9) {
                prop_assert_eq!(SensorReading::with_value(v.to_string()).parse_value(), Ok(v));
            }
        }
    }
}
