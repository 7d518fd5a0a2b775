//! Buffer Store
//!
//! Appends one undelivered record per call. No deduplication and no size
//! cap: repeated failures accumulate until a replay pass drains them.

use std::io;

use embedded_hal::delay::DelayNs;

use crate::constants::files::BUFFER_FILE;
use crate::errors::SinkResult;
use crate::records::BufferRecord;
use crate::sink::LogSink;
use crate::storage::Storage;

/// Appender for the buffer file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferStore {
    path: String,
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::new(BUFFER_FILE)
    }
}

impl BufferStore {
    /// Store targeting `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Buffer file path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append `record` to the buffer through `sink`
    pub fn store<S, D>(&self, sink: &mut LogSink<S, D>, record: &BufferRecord) -> SinkResult<()>
    where
        S: Storage,
        D: DelayNs,
    {
        sink.append(&self.path, record.as_str())?;
        log::info!("SD | JSON stored in buffer.");
        Ok(())
    }

    /// Number of non-blank records currently buffered
    ///
    /// A missing buffer file counts as empty.
    pub fn pending<S: Storage>(&self, storage: &mut S) -> io::Result<usize> {
        if !storage.exists(&self.path) {
            return Ok(0);
        }
        let mut count = 0;
        for line in storage.read_lines(&self.path)? {
            if !String::from_utf8_lossy(&line?).trim().is_empty() {
                count += 1;
            }
        }
        Ok(count)
    }
}
