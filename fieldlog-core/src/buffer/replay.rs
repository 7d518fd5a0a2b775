//! Buffer Replay Engine
//!
//! One replay pass:
//!
//! 1. Promote a leftover temp file if a previous swap was cut short
//! 2. Open the buffer for reading; if there is none, there is nothing to do
//! 3. Create the temp file; if that fails, abort with the buffer untouched
//! 4. For every line: trim, drop blanks, try to deliver, copy failures to temp.
//!    A line that is not UTF-8 cannot be sent; it is copied byte-for-byte
//! 5. Swap the temp file in place of the buffer
//!
//! The pass runs to completion over every line present when it starts; there
//! is no mid-record cancellation point. Taking the storage and transport by
//! `&mut` keeps passes single-flight.

use std::io::{self, Write};

use log::{debug, error, info, warn};

use crate::constants::files::{BUFFER_FILE, TEMP_FILE};
use crate::errors::{ReplayError, ReplayResult};
use crate::storage::{write_line, write_raw_line, Storage};
use crate::traits::Transport;

/// Line counts for one completed pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    /// Records the endpoint accepted
    pub delivered: usize,
    /// Records carried forward into the rewritten buffer
    pub retained: usize,
    /// Blank lines dropped
    pub dropped_blank: usize,
    /// Retained lines that are not valid UTF-8, included in `retained`
    pub undecodable: usize,
}

/// Outcome of a replay pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayReport {
    /// No buffer file existed; nothing was created or changed
    NothingToRetry,
    /// The buffer was replayed and rewritten
    Completed(ReplayStats),
}

impl ReplayReport {
    /// Records still waiting after this pass
    pub fn remaining(&self) -> usize {
        match self {
            Self::NothingToRetry => 0,
            Self::Completed(stats) => stats.retained,
        }
    }
}

/// Replays the buffer file against one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayEngine {
    endpoint: String,
    buffer_path: String,
    temp_path: String,
}

impl ReplayEngine {
    /// Engine for `endpoint` using the default card paths
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            buffer_path: BUFFER_FILE.to_owned(),
            temp_path: TEMP_FILE.to_owned(),
        }
    }

    /// Use custom buffer and staging paths
    pub fn with_paths(mut self, buffer: impl Into<String>, temp: impl Into<String>) -> Self {
        self.buffer_path = buffer.into();
        self.temp_path = temp.into();
        self
    }

    /// Endpoint every buffered record is redelivered to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Buffer file path
    pub fn buffer_path(&self) -> &str {
        &self.buffer_path
    }

    /// Staging file path
    pub fn temp_path(&self) -> &str {
        &self.temp_path
    }

    /// Run one replay pass
    ///
    /// Individual delivery failures are not errors: those records stay
    /// buffered. `Err` means the pass aborted and the buffer file is exactly
    /// as it was before the call.
    pub fn retry_buffered_sends<S, T>(
        &self,
        storage: &mut S,
        transport: &mut T,
    ) -> ReplayResult<ReplayReport>
    where
        S: Storage,
        T: Transport + ?Sized,
    {
        self.recover_interrupted_swap(storage);

        let lines = match storage.read_lines(&self.buffer_path) {
            Ok(lines) => lines,
            Err(e) => {
                info!("BUFFER | No buffer to retry ({}: {}).", self.buffer_path, e);
                return Ok(ReplayReport::NothingToRetry);
            }
        };

        let mut temp = match storage.create(&self.temp_path) {
            Ok(writer) => writer,
            Err(source) => {
                error!("BUFFER | Error creating temporary file {}: {}", self.temp_path, source);
                return Err(ReplayError::TempFile {
                    path: self.temp_path.clone(),
                    source,
                });
            }
        };

        let mut stats = ReplayStats::default();
        let drained = self
            .drain(lines, &mut temp, transport, &mut stats)
            .and_then(|()| temp.flush());
        drop(temp);

        if let Err(source) = drained {
            error!("BUFFER | Replay of {} aborted: {}", self.buffer_path, source);
            if let Err(e) = storage.remove(&self.temp_path) {
                debug!("BUFFER | Could not discard {}: {}", self.temp_path, e);
            }
            return Err(ReplayError::Io {
                path: self.buffer_path.clone(),
                source,
            });
        }

        if let Err(source) = storage.replace(&self.temp_path, &self.buffer_path) {
            error!(
                "BUFFER | Could not replace {} with {}: {}",
                self.buffer_path, self.temp_path, source
            );
            return Err(ReplayError::Swap {
                staged: self.temp_path.clone(),
                target: self.buffer_path.clone(),
                source,
            });
        }

        if stats.retained == 0 {
            if let Err(e) = storage.remove(&self.buffer_path) {
                warn!("BUFFER | Could not remove drained buffer {}: {}", self.buffer_path, e);
            }
        }

        info!(
            "BUFFER | Replay done: {} delivered, {} retained ({} undecodable), {} blank dropped.",
            stats.delivered, stats.retained, stats.undecodable, stats.dropped_blank
        );
        Ok(ReplayReport::Completed(stats))
    }

    fn drain<L, W, T>(
        &self,
        lines: L,
        temp: &mut W,
        transport: &mut T,
        stats: &mut ReplayStats,
    ) -> io::Result<()>
    where
        L: Iterator<Item = io::Result<Vec<u8>>>,
        W: Write,
        T: Transport + ?Sized,
    {
        for line in lines {
            let line = line?;
            let record = match std::str::from_utf8(&line) {
                Ok(text) => text.trim(),
                Err(e) => {
                    warn!("BUFFER | Keeping undecodable line ({}), not sending it.", e);
                    write_raw_line(temp, &line)?;
                    stats.retained += 1;
                    stats.undecodable += 1;
                    continue;
                }
            };
            if record.is_empty() {
                stats.dropped_blank += 1;
                continue;
            }

            if transport.send(&self.endpoint, record) {
                stats.delivered += 1;
            } else {
                write_line(temp, record)?;
                stats.retained += 1;
            }
        }
        Ok(())
    }

    /// A temp file without a buffer means the last swap removed the old
    /// buffer but never renamed the new one in.
    fn recover_interrupted_swap<S: Storage>(&self, storage: &mut S) {
        if storage.exists(&self.buffer_path) || !storage.exists(&self.temp_path) {
            return;
        }
        warn!(
            "BUFFER | Found {} without {}, restoring interrupted swap.",
            self.temp_path, self.buffer_path
        );
        if let Err(e) = storage.rename(&self.temp_path, &self.buffer_path) {
            error!("BUFFER | Could not restore {}: {}", self.buffer_path, e);
        }
    }
}
