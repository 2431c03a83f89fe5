//! # plantwatch
//!
//! Real-time analytics over manufacturing machine telemetry.
//!
//! plantwatch consumes a stream of JSON payloads - temperature readings
//! and machine status reports - and derives two signals: a per-machine
//! temperature stall detector and a global status tally with error
//! alerting.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Consumer                             │
//! │  ┌─────────┐    ┌────────────┐    ┌──────────────────────┐  │
//! │  │ source  │───▶│ dispatcher │───▶│ sinks (log/chan/file)│  │
//! │  │ (input) │    │ (routing)  │    └──────────────────────┘  │
//! │  └────┬────┘    └─────┬──────┘                              │
//! │       │               ├──▶ decode  (payload → record)       │
//! │       │               ├──▶ stall detector (per machine)     │
//! │       ▼               └──▶ status aggregator (global tally) │
//! │  FileSource | StreamSource | ChannelSource                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: payload source abstraction ([`PayloadSource`] trait)
//!   with implementations for file tailing, async streams, and channels
//! - **[`consumer`]**: the run loop driving a source into the dispatcher
//! - The analytics core (decoding, detection, sinks) lives in
//!   `plantwatch-analytics`; the record and signal schema in
//!   `plantwatch-types`
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Tail a payload log file
//! plantwatch --file payloads.ndjson
//!
//! # Consume live payloads over TCP
//! plantwatch --connect localhost:9092
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::time::Duration;
//! use plantwatch::{ChannelSource, Consumer};
//! use plantwatch_analytics::{Dispatcher, Sink};
//!
//! let (tx, source) = ChannelSource::create(16, "in-process");
//! let dispatcher = Dispatcher::builder().sink(Sink::log()).build();
//! let mut consumer = Consumer::new(Box::new(source), dispatcher, Duration::from_millis(250));
//!
//! tx.try_send(r#"{"machine_id": "M001", "status": "running"}"#.to_string()).unwrap();
//! consumer.drain();
//! assert_eq!(consumer.dispatcher().tally().get("running"), Some(&1));
//! ```

pub mod consumer;
pub mod source;

// Re-export main types for convenience
pub use consumer::Consumer;
pub use source::{ChannelSource, FileSource, PayloadSource, StreamSource};

pub use plantwatch_analytics::{decode, DecodeError, Dispatcher, DispatcherBuilder, Sink};
pub use plantwatch_types::{
    ErrorAlert, Record, SensorReading, Severity, Signal, SignalKind, StallEvent, StatusEvent,
    TallySnapshot,
};
