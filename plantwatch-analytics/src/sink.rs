//! Notification sinks for emitting signals.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use plantwatch_types::{Severity, Signal};

/// Destination for detection signals.
///
/// Configure where the dispatcher should deliver signals. Multiple sinks
/// can be attached to one dispatcher; every signal goes to all of them.
#[derive(Debug)]
pub enum Sink {
    /// Log each signal via `tracing` at the signal's severity.
    Log,

    /// Append each signal as newline-delimited JSON to a file.
    File(PathBuf),

    /// Forward signals through a channel (best effort).
    ///
    /// Use [`Sink::channel()`] to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<Signal>),
}

impl Sink {
    /// Create a log sink.
    pub fn log() -> Self {
        Sink::Log
    }

    /// Create a file sink.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plantwatch_analytics::Sink;
    ///
    /// let sink = Sink::file("signals.ndjson");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Sink::File(path.into())
    }

    /// Create a channel sink and return both the sink and the receiver.
    ///
    /// Useful for wiring signals into your own alert handling. Delivery is
    /// best effort: if the channel is full, the signal is dropped rather
    /// than blocking the dispatch path.
    ///
    /// # Example
    ///
    /// ```rust
    /// use plantwatch_analytics::Sink;
    ///
    /// let (sink, mut rx) = Sink::channel(16);
    ///
    /// // Later, receive signals
    /// // while let Some(signal) = rx.recv().await {
    /// //     println!("{}: {}", signal.severity.label(), signal.message);
    /// // }
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<Signal>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Sink::Channel(tx), rx)
    }

    /// Emit a signal to this sink.
    pub(crate) fn emit(&self, signal: &Signal) -> std::io::Result<()> {
        match self {
            Sink::Log => match signal.severity {
                Severity::Info => tracing::info!("{}", signal.message),
                Severity::Warning => tracing::warn!("{}", signal.message),
                Severity::Error => tracing::error!("{}", signal.message),
            },
            Sink::File(path) => {
                let json = serde_json::to_string(signal)?;
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{}", json)?;
            }
            #[cfg(feature = "tokio")]
            Sink::Channel(tx) => {
                // Best effort send (don't block if the channel is full)
                let _ = tx.try_send(signal.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_types::TallySnapshot;

    fn sample_signal() -> Signal {
        Signal::tally(TallySnapshot::from([("running".to_string(), 2)]))
    }

    #[test]
    fn log_sink_emit_succeeds() {
        assert!(Sink::log().emit(&sample_signal()).is_ok());
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn channel_sink_forwards_signals() {
        let (sink, mut rx) = Sink::channel(4);

        sink.emit(&sample_signal()).unwrap();

        let received = rx.try_recv().unwrap();
        assert!(matches!(received.kind, plantwatch_types::SignalKind::Tally(_)));
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (sink, mut rx) = Sink::channel(1);

        sink.emit(&sample_signal()).unwrap();
        sink.emit(&sample_signal()).unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn file_sink_appends_one_json_line_per_signal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signals.ndjson");
        let sink = Sink::file(&path);

        sink.emit(&sample_signal()).unwrap();
        sink.emit(&sample_signal()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: Signal = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, sample_signal());
    }
}
