//! # plantwatch-types
//!
//! Record and signal schema for plantwatch. This crate defines the wire
//! contract for incoming manufacturing telemetry payloads and the detection
//! signals the analytics core emits, so producers and consumers can share
//! one set of types.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: plain data types, no framework needed
//! - **Optional serialization**: enable the `serde` feature as needed
//! - **Closed record set**: exactly two inbound shapes, [`SensorReading`]
//!   and [`StatusEvent`], combined in the [`Record`] union
//! - **Self-describing signals**: every [`Signal`] carries a severity, a
//!   human-readable message, and the structured fields of its event
//!
//! ## Example
//!
//! ```rust
//! use plantwatch_types::{Record, SensorReading};
//!
//! let record = Record::Sensor(SensorReading {
//!     machine_id: "M001".to_string(),
//!     timestamp: None,
//!     temperature: 76.4,
//! });
//!
//! assert_eq!(record.machine_id(), "M001");
//! ```

mod record;
mod signal;

pub use record::{Record, SensorReading, StatusEvent};
pub use signal::{ErrorAlert, Severity, Signal, SignalKind, StallEvent, TallySnapshot};
