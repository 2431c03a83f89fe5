//! Payload decoding into typed records.
//!
//! A payload is parsed into a generic JSON value first, then classified and
//! projected into one of the two known record shapes. A `status` field makes
//! the payload a [`StatusEvent`]; otherwise a `temperature` field makes it a
//! [`SensorReading`]; anything else is rejected.

use plantwatch_types::{Record, SensorReading, StatusEvent};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when decoding a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not syntactically valid JSON.
    #[error("payload is not valid JSON")]
    MalformedPayload,

    /// Valid JSON, but matches neither known record shape.
    #[error("payload matches neither a sensor reading nor a status event")]
    UnrecognizedShape,

    /// A required field is absent, empty, or of an unusable type.
    #[error("required field `{0}` is missing")]
    MissingField(String),
}

/// Decode a raw payload into a [`Record`].
///
/// Pure function of its input: no state, no side effects. Duplicate or
/// out-of-order payloads decode the same way every time.
pub fn decode(payload: &str) -> Result<Record, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|_| DecodeError::MalformedPayload)?;

    let object = value.as_object().ok_or(DecodeError::UnrecognizedShape)?;

    // A status field wins over a temperature field if both are present.
    if object.contains_key("status") {
        decode_status(object)
    } else if object.contains_key("temperature") {
        decode_sensor(object)
    } else {
        Err(DecodeError::UnrecognizedShape)
    }
}

fn decode_sensor(object: &Map<String, Value>) -> Result<Record, DecodeError> {
    let machine_id = required_string(object, "machine_id")?;
    let temperature = object
        .get("temperature")
        .and_then(Value::as_f64)
        .ok_or_else(|| DecodeError::MissingField("temperature".to_string()))?;

    Ok(Record::Sensor(SensorReading {
        machine_id,
        timestamp: optional_string(object, "timestamp"),
        temperature,
    }))
}

fn decode_status(object: &Map<String, Value>) -> Result<Record, DecodeError> {
    let machine_id = required_string(object, "machine_id")?;

    // Non-string status values fall into the "unknown" bucket rather than
    // failing the whole payload.
    let status = object
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    Ok(Record::Status(StatusEvent {
        machine_id,
        status,
        error_code: optional_string(object, "error_code"),
        timestamp: optional_string(object, "timestamp"),
    }))
}

/// A required field of the wrong type counts as missing.
fn required_string(object: &Map<String, Value>, name: &str) -> Result<String, DecodeError> {
    match object.get(name).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(DecodeError::MissingField(name.to_string())),
    }
}

fn optional_string(object: &Map<String, Value>, name: &str) -> Option<String> {
    object.get(name).and_then(Value::as_str).map(str::to_string)
}
