//! Inbound record shapes for telemetry payloads.
//!
//! These types are the only wire contract the decoder honors: a payload is
//! either a sensor reading or a machine status event. Classification and
//! validation of raw payloads live in `plantwatch-analytics`; this module
//! just defines the shapes.

/// A single temperature reading from a machine sensor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Identifier of the machine the reading came from. Never empty.
    pub machine_id: String,

    /// When the reading was taken, as reported by the producer.
    ///
    /// Advisory only: analytics order readings by arrival, not by this field.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<String>,

    /// Temperature value in the producer's units.
    pub temperature: f64,
}

/// A machine status report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEvent {
    /// Identifier of the reporting machine.
    pub machine_id: String,

    /// Status label, e.g. `running`, `idle`, `maintenance`, `error`.
    ///
    /// The label set is open; unknown labels are tallied as-is.
    pub status: String,

    /// Producer-supplied error code, present only for error statuses.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_code: Option<String>,

    /// When the status was reported. Advisory only.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub timestamp: Option<String>,
}

/// A decoded telemetry record: one of the two known payload shapes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Record {
    /// A temperature reading, routed to the stall detector.
    Sensor(SensorReading),
    /// A status report, routed to the status aggregator.
    Status(StatusEvent),
}

impl Record {
    /// The machine this record refers to.
    pub fn machine_id(&self) -> &str {
        match self {
            Record::Sensor(reading) => &reading.machine_id,
            Record::Status(event) => &event.machine_id,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserialize_sensor_reading() {
        let json = r#"{
            "machine_id": "M001",
            "timestamp": "2025-01-11T18:15:00Z",
            "temperature": 76.4
        }"#;

        let reading: SensorReading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.machine_id, "M001");
        assert_eq!(reading.timestamp.as_deref(), Some("2025-01-11T18:15:00Z"));
        assert_eq!(reading.temperature, 76.4);
    }

    #[test]
    fn deserialize_status_event_without_error_code() {
        let json = r#"{"machine_id": "M002", "status": "running"}"#;

        let event: StatusEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.machine_id, "M002");
        assert_eq!(event.status, "running");
        assert!(event.error_code.is_none());
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn serialize_record_is_flat() {
        // The union must serialize without an enum tag so producers and
        // consumers see the same flat object shape.
        let record = Record::Status(StatusEvent {
            machine_id: "M003".to_string(),
            status: "error".to_string(),
            error_code: Some("E101".to_string()),
            timestamp: None,
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["machine_id"], "M003");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error_code"], "E101");
        assert!(json.get("Status").is_none());
    }
}
