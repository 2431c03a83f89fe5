//! Channel-based payload source.
//!
//! Receives payloads via a tokio mpsc channel. This is useful for
//! in-process integration where another component pushes payloads
//! directly, and for tests.

use tokio::sync::mpsc;

use super::PayloadSource;

/// A payload source that receives payloads via a channel.
///
/// The producer side (e.g. a broker client task) sends raw payload
/// strings through the channel; this source delivers them to the
/// consumer loop.
///
/// # Example
///
/// ```
/// use plantwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create(16, "in-process");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<String>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a channel.
    pub fn new(receiver: mpsc::Receiver<String>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair for sending payloads to a ChannelSource.
    ///
    /// Returns (sender, source).
    pub fn create(buffer: usize, source_description: &str) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx, source_description))
    }
}

impl PayloadSource for ChannelSource {
    fn poll(&mut self) -> Option<String> {
        match self.receiver.try_recv() {
            Ok(payload) => Some(payload),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.disconnected = true;
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        if self.disconnected {
            Some("channel closed".to_string())
        } else {
            None
        }
    }
}
