//! Payload source abstraction for receiving raw telemetry.
//!
//! This module provides a trait-based abstraction for receiving raw
//! payload lines from various transports (file tailing, network streams,
//! in-process channels). Sources deliver payloads as opaque text; decoding
//! is the analytics core's job.

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

/// Trait for receiving raw payloads from various transports.
///
/// Implementations deliver payloads one at a time, in arrival order, with
/// no deduplication guarantee - the analytics core tolerates duplicates.
///
/// # Example
///
/// ```
/// use plantwatch::{ChannelSource, PayloadSource};
///
/// let (tx, mut source) = ChannelSource::create(16, "test");
/// tx.try_send(r#"{"machine_id": "M001", "temperature": 76.4}"#.to_string()).unwrap();
///
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
/// ```
pub trait PayloadSource: Send + Debug {
    /// Poll for the next raw payload line.
    ///
    /// Returns `Some(payload)` if one is available, `None` otherwise.
    /// This method must be non-blocking.
    fn poll(&mut self) -> Option<String>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The error encountered during the most recent poll, if any.
    fn error(&self) -> Option<String>;
}
