//! # plantwatch-analytics
//!
//! The stream analytics core of plantwatch. This crate turns raw telemetry
//! payloads into detection signals: it decodes payloads into typed records,
//! tracks a bounded window of recent temperatures per machine to detect
//! stalls, tallies machine status labels, and raises alerts on error
//! statuses.
//!
//! Transport concerns (broker connections, polling, offset management) are
//! deliberately outside this crate: it consumes payloads one at a time and
//! emits [`Signal`]s to configured sinks.
//!
//! ## Quick Start
//!
//! ```rust
//! use plantwatch_analytics::{Dispatcher, Sink};
//!
//! // Route signals to the process log.
//! let dispatcher = Dispatcher::builder().sink(Sink::log()).build();
//!
//! // Feed raw payloads as they arrive.
//! dispatcher.dispatch_payload(r#"{"machine_id": "M001", "temperature": 76.4}"#).unwrap();
//! dispatcher.dispatch_payload(r#"{"machine_id": "M002", "status": "running"}"#).unwrap();
//!
//! assert_eq!(dispatcher.tally().get("running"), Some(&1));
//! ```
//!
//! ## Features
//!
//! - **Deterministic detection**: outcomes depend only on per-machine
//!   arrival order, never on wall-clock time
//! - **Bounded state**: one fixed-capacity window per machine, one global
//!   status tally
//! - **Multiple sinks**: log, channel, or file, emitted to all of them
//! - **Total operations**: decode errors are signaled and dropped, never
//!   fatal

mod decode;
mod dispatch;
mod sink;
mod stall;
mod status;

pub use decode::{decode, DecodeError};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use sink::Sink;
pub use stall::{StallDetector, STALL_THRESHOLD, WINDOW_CAPACITY};
pub use status::StatusAggregator;

// Re-export types for convenience
pub use plantwatch_types::{
    ErrorAlert, Record, SensorReading, Severity, Signal, SignalKind, StallEvent, StatusEvent,
    TallySnapshot,
};
