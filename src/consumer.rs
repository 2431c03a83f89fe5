//! The consumer run loop: polls a payload source and feeds the dispatcher.

use std::time::Duration;

use plantwatch_analytics::Dispatcher;
use tracing::{debug, warn};

use crate::source::PayloadSource;

/// Drives a [`PayloadSource`] into a [`Dispatcher`].
///
/// Records are consumed and dispatched one at a time, in arrival order;
/// a single consumer per stream preserves the window and counting
/// invariants. The loop sleeps for the poll interval whenever the source
/// has nothing available.
pub struct Consumer {
    source: Box<dyn PayloadSource>,
    dispatcher: Dispatcher,
    poll_interval: Duration,
    processed: u64,
    failed: u64,
    /// Last source error already logged, to avoid repeating it every idle poll.
    reported_error: Option<String>,
}

impl Consumer {
    /// Create a consumer over the given source and dispatcher.
    pub fn new(
        source: Box<dyn PayloadSource>,
        dispatcher: Dispatcher,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            dispatcher,
            poll_interval,
            processed: 0,
            failed: 0,
            reported_error: None,
        }
    }

    /// The dispatcher driven by this consumer.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Description of the underlying source, for status logging.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Payloads successfully decoded and dispatched.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Payloads dropped because they could not be decoded.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Drain everything the source currently has available.
    ///
    /// Returns the number of payloads handled (including undecodable
    /// ones). No payload is ever partially applied: each dispatch
    /// completes before the next poll.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Some(payload) = self.source.poll() {
            debug!("received payload: {}", payload);
            if self.dispatcher.dispatch_payload(&payload).is_ok() {
                self.processed += 1;
            } else {
                self.failed += 1;
            }
            handled += 1;
        }
        handled
    }

    /// Run until cancelled.
    ///
    /// Polls the source, dispatching everything available, and sleeps for
    /// the poll interval when idle. Source errors are logged once per
    /// occurrence; the loop keeps running so a recovering source (a log
    /// file that reappears, say) resumes processing. Cancellation is
    /// cooperative: drop the future (e.g. via `tokio::select!`) to stop
    /// between records.
    pub async fn run(&mut self) {
        loop {
            if self.drain() == 0 {
                if let Some(err) = self.source.error() {
                    if self.reported_error.as_deref() != Some(err.as_str()) {
                        warn!("source {}: {}", self.source.description(), err);
                        self.reported_error = Some(err);
                    }
                } else {
                    self.reported_error = None;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        }
    }
}
