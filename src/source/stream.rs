//! Stream-based payload source.
//!
//! Receives newline-delimited payloads from an async byte stream. This is
//! useful for network transports like TCP connections or for bridging from
//! a message broker client.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use super::PayloadSource;

/// A payload source that reads newline-delimited payloads from an async
/// stream.
///
/// A background task reads lines from the provided reader and makes them
/// available via `poll()`.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use plantwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"machine_id\": \"M001\", \"temperature\": 76.4}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<String>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each non-empty line is delivered as one payload. The task stops at
    /// EOF or on a read error, which `error()` then reports.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(64);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let desc = description.to_string();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF
                        *error_handle.lock().unwrap() = Some("connection closed".to_string());
                        break;
                    }
                    Ok(_) => {
                        let payload = line.trim();
                        if payload.is_empty() {
                            continue;
                        }
                        if tx.send(payload.to_string()).await.is_err() {
                            // Receiver dropped
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() = Some(format!("read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", desc),
            last_error,
        }
    }

    /// Create a StreamSource from a raw bytes channel.
    ///
    /// This is useful when a broker client hands over message bodies as
    /// byte buffers rather than an `AsyncRead`. Each buffer is one payload;
    /// non-UTF-8 buffers are dropped and reported via `error()`.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, payload_rx) = mpsc::channel(64);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                match String::from_utf8(bytes) {
                    Ok(payload) => {
                        let payload = payload.trim().to_string();
                        if payload.is_empty() {
                            continue;
                        }
                        *error_handle.lock().unwrap() = None;
                        if tx.send(payload).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        *error_handle.lock().unwrap() =
                            Some(format!("payload is not UTF-8: {}", e));
                    }
                }
            }
        });

        Self {
            receiver: payload_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl PayloadSource for StreamSource {
    fn poll(&mut self) -> Option<String> {
        match self.receiver.try_recv() {
            Ok(payload) => Some(payload),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_payload() -> &'static str {
        r#"{"machine_id": "M001", "temperature": 76.4}"#
    }

    #[tokio::test]
    async fn delivers_lines_from_a_reader() {
        let data = format!("{}\n{}\n", sample_payload(), sample_payload());
        let cursor = Cursor::new(data);

        let mut source = StreamSource::spawn(cursor, "test");

        // Give the background task time to process
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().as_deref(), Some(sample_payload()));
        assert_eq!(source.poll().as_deref(), Some(sample_payload()));
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn eof_is_reported_as_an_error() {
        let cursor = Cursor::new("");
        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_none());
        assert_eq!(source.error().as_deref(), Some("connection closed"));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let data = format!("\n\n{}\n\n", sample_payload());
        let cursor = Cursor::new(data);

        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().as_deref(), Some(sample_payload()));
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn description_names_the_endpoint() {
        let cursor = Cursor::new("");
        let source = StreamSource::spawn(cursor, "tcp://localhost:9092");
        assert_eq!(source.description(), "stream: tcp://localhost:9092");
    }

    #[tokio::test]
    async fn from_bytes_channel_delivers_payloads() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "broker");

        tx.send(sample_payload().as_bytes().to_vec()).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().as_deref(), Some(sample_payload()));
    }

    #[tokio::test]
    async fn from_bytes_channel_reports_non_utf8() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "broker");

        tx.send(vec![0xff, 0xfe]).await.unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }
}
