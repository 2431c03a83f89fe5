//! File-based payload source.
//!
//! Tails a newline-delimited payload log, returning only lines appended
//! since the last poll.

use std::collections::VecDeque;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::PayloadSource;

/// A payload source that tails a newline-delimited log file.
///
/// Producers append one JSON payload per line; this source tracks a byte
/// offset and delivers each complete line exactly once. If the file is
/// truncated or rotated, reading restarts from the beginning.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    /// Byte offset of the first line not yet consumed.
    offset: u64,
    /// Complete lines read from the file but not yet polled.
    pending: VecDeque<String>,
    last_error: Option<String>,
}

impl FileSource {
    /// Create a new file source for the given path.
    ///
    /// The file does not need to exist yet; polling reports an error until
    /// it does.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            offset: 0,
            pending: VecDeque::new(),
            last_error: None,
        }
    }

    /// Returns the path being tailed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read newly appended complete lines into the pending queue.
    fn refill(&mut self) {
        let mut file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                self.last_error = Some(format!("open error: {}", e));
                return;
            }
        };

        let len = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.last_error = Some(format!("metadata error: {}", e));
                return;
            }
        };

        // Truncated or rotated: start over from the beginning.
        if len < self.offset {
            self.offset = 0;
        }
        if len == self.offset {
            return;
        }

        if let Err(e) = file.seek(SeekFrom::Start(self.offset)) {
            self.last_error = Some(format!("seek error: {}", e));
            return;
        }

        let mut buf = String::new();
        if let Err(e) = file.read_to_string(&mut buf) {
            self.last_error = Some(format!("read error: {}", e));
            return;
        }
        self.last_error = None;

        let mut consumed = 0usize;
        for chunk in buf.split_inclusive('\n') {
            if !chunk.ends_with('\n') {
                // Partial trailing line; wait for the producer to finish it.
                break;
            }
            consumed += chunk.len();
            let line = chunk.trim();
            if !line.is_empty() {
                self.pending.push_back(line.to_string());
            }
        }
        self.offset += consumed as u64;
    }
}

impl PayloadSource for FileSource {
    fn poll(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            self.refill();
        }
        self.pending.pop_front()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn delivers_each_appended_line_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payloads.ndjson");
        fs::write(&path, "{\"a\":1}\n{\"b\":2}\n").unwrap();

        let mut source = FileSource::new(&path);
        assert_eq!(source.poll().as_deref(), Some("{\"a\":1}"));
        assert_eq!(source.poll().as_deref(), Some("{\"b\":2}"));
        assert!(source.poll().is_none());

        // Append more and poll again.
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{\"c\":3}}").unwrap();
        assert_eq!(source.poll().as_deref(), Some("{\"c\":3}"));
        assert!(source.poll().is_none());
    }

    #[test]
    fn partial_trailing_line_waits_for_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payloads.ndjson");
        fs::write(&path, "{\"a\":1}\n{\"half").unwrap();

        let mut source = FileSource::new(&path);
        assert_eq!(source.poll().as_deref(), Some("{\"a\":1}"));
        assert!(source.poll().is_none());

        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "\":2}}").unwrap();
        assert_eq!(source.poll().as_deref(), Some("{\"half\":2}"));
    }

    #[test]
    fn truncation_restarts_from_the_beginning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payloads.ndjson");
        fs::write(&path, "{\"a\":1}\n{\"b\":2}\n").unwrap();

        let mut source = FileSource::new(&path);
        assert!(source.poll().is_some());
        assert!(source.poll().is_some());

        // Rotate: shorter file, new content.
        fs::write(&path, "{\"c\":3}\n").unwrap();
        assert_eq!(source.poll().as_deref(), Some("{\"c\":3}"));
    }

    #[test]
    fn missing_file_reports_error_until_it_appears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-yet.ndjson");

        let mut source = FileSource::new(&path);
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        fs::write(&path, "{\"a\":1}\n").unwrap();
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payloads.ndjson");
        fs::write(&path, "{\"a\":1}\n\n\n{\"b\":2}\n").unwrap();

        let mut source = FileSource::new(&path);
        assert_eq!(source.poll().as_deref(), Some("{\"a\":1}"));
        assert_eq!(source.poll().as_deref(), Some("{\"b\":2}"));
        assert!(source.poll().is_none());
    }

    #[test]
    fn description_names_the_path() {
        let source = FileSource::new("payloads.ndjson");
        assert_eq!(source.description(), "file: payloads.ndjson");
    }
}
