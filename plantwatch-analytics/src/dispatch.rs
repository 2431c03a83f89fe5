//! Routing decoded records to detectors and notification sinks.

use parking_lot::Mutex;

use plantwatch_types::{Record, Signal, TallySnapshot};

use crate::decode::{decode, DecodeError};
use crate::sink::Sink;
use crate::stall::StallDetector;
use crate::status::StatusAggregator;

/// Routes each record to the right detector and forwards the resulting
/// signals to all configured sinks.
///
/// The dispatcher owns both detectors behind mutexes, so it can be shared
/// by reference across tasks: each `observe` is atomic with respect to its
/// state, preserving the FIFO window and counting invariants when more
/// than one worker feeds it. A single consuming worker per stream remains
/// the intended deployment.
///
/// # Example
///
/// ```rust
/// use plantwatch_analytics::{Dispatcher, Sink};
///
/// let dispatcher = Dispatcher::builder().sink(Sink::log()).build();
///
/// dispatcher.dispatch_payload(r#"{"machine_id": "M002", "status": "idle"}"#).unwrap();
/// assert_eq!(dispatcher.tally().get("idle"), Some(&1));
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    stall: Mutex<StallDetector>,
    status: Mutex<StatusAggregator>,
    sinks: Vec<Sink>,
}

impl Dispatcher {
    /// Create a dispatcher with no sinks configured.
    ///
    /// Detection still runs; signals simply go nowhere. Use
    /// [`Dispatcher::builder()`] to attach sinks.
    pub fn new() -> Self {
        Self {
            stall: Mutex::new(StallDetector::new()),
            status: Mutex::new(StatusAggregator::new()),
            sinks: Vec::new(),
        }
    }

    /// Create a builder for configuring the dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Decode a raw payload and dispatch the resulting record.
    ///
    /// Decode failures are handled locally: an error-severity signal is
    /// emitted, no detector is touched, and the error is returned so the
    /// caller can count skipped payloads. Stream processing never stops on
    /// a bad payload.
    pub fn dispatch_payload(&self, raw: &str) -> Result<(), DecodeError> {
        match decode(raw) {
            Ok(record) => {
                self.dispatch(record);
                Ok(())
            }
            Err(err) => {
                self.emit(&Signal::decode_failure(err.to_string(), raw));
                Err(err)
            }
        }
    }

    /// Route a decoded record to the appropriate detector.
    ///
    /// Sensor readings feed the stall detector; a detection becomes a
    /// warning signal. Status events feed the aggregator; the updated
    /// tally is always emitted as an info signal, plus a warning signal
    /// when the status is an error.
    pub fn dispatch(&self, record: Record) {
        match record {
            Record::Sensor(reading) => {
                let event = self
                    .stall
                    .lock()
                    .observe(&reading.machine_id, reading.temperature);
                if let Some(event) = event {
                    self.emit(&Signal::stall(event));
                }
            }
            Record::Status(event) => {
                let (alert, snapshot) = {
                    let mut status = self.status.lock();
                    let alert = status.observe(&event);
                    (alert, status.snapshot())
                };
                self.emit(&Signal::tally(snapshot));
                if let Some(alert) = alert {
                    self.emit(&Signal::alert(alert));
                }
            }
        }
    }

    /// A copy of the current status tally.
    pub fn tally(&self) -> TallySnapshot {
        self.status.lock().snapshot()
    }

    /// Forward a signal to every sink. Emission failures are logged and
    /// never propagate into the dispatch path.
    fn emit(&self, signal: &Signal) {
        for sink in &self.sinks {
            if let Err(e) = sink.emit(signal) {
                tracing::warn!("failed to emit signal to sink: {}", e);
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`Dispatcher`].
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    sinks: Vec<Sink>,
}

impl DispatcherBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    ///
    /// Multiple sinks can be added; signals will be emitted to all of them.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            stall: Mutex::new(StallDetector::new()),
            status: Mutex::new(StatusAggregator::new()),
            sinks: self.sinks,
        }
    }
}
