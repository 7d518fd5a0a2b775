//! Durable Log Sink
//!
//! Appends one line to a named file. Used for the human-readable event log
//! and for the JSON-lines buffer file.
//!
//! SD cards on a shared SPI bus are occasionally busy, so opening is retried
//! a bounded number of times with a fixed blocking delay. The file handle is
//! scoped to the call and released on every exit path.
//!
//! ```rust
//! use fieldlog_core::sink::{LogSink, RetryPolicy};
//! use fieldlog_core::storage::MemoryStorage;
//! use fieldlog_core::time::StdDelay;
//!
//! let mut sink = LogSink::new(MemoryStorage::new(), StdDelay)
//!     .with_policy(RetryPolicy::new(3, 0));
//!
//! sink.append("/log.txt", "SD | card ready").unwrap();
//! assert_eq!(sink.storage().lines("/log.txt"), vec!["SD | card ready"]);
//! ```

use std::io::Write;

use embedded_hal::delay::DelayNs;
use log::{error, warn};

use crate::constants::time::{SD_OPEN_ATTEMPTS, SD_OPEN_BACKOFF_MS};
use crate::errors::{SinkError, SinkResult};
use crate::storage::{write_line, Storage};

/// How hard to try opening a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total open attempts, at least one
    pub attempts: u32,
    /// Blocking delay between attempts in milliseconds
    pub backoff_ms: u32,
}

impl RetryPolicy {
    /// Custom policy; `attempts` is clamped to at least one
    pub const fn new(attempts: u32, backoff_ms: u32) -> Self {
        Self {
            attempts: if attempts == 0 { 1 } else { attempts },
            backoff_ms,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(SD_OPEN_ATTEMPTS, SD_OPEN_BACKOFF_MS)
    }
}

/// Line-oriented append sink over a [`Storage`]
pub struct LogSink<S, D> {
    storage: S,
    delay: D,
    policy: RetryPolicy,
}

impl<S, D> LogSink<S, D>
where
    S: Storage,
    D: DelayNs,
{
    /// Sink with the default retry policy
    pub fn new(storage: S, delay: D) -> Self {
        Self {
            storage,
            delay,
            policy: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current retry policy
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Append `line` plus a newline to `path`
    ///
    /// On failure nothing is written and the error is logged before it is
    /// returned, so callers that ignore the result still leave a trace.
    pub fn append(&mut self, path: &str, line: &str) -> SinkResult<()> {
        if line.contains(|c: char| c == '\n' || c == '\r') {
            error!("SD | Refusing to write multi-line record to {}", path);
            return Err(SinkError::EmbeddedNewline);
        }

        let mut writer = self.open_with_retry(path)?;
        write_line(&mut writer, line)
            .and_then(|()| writer.flush())
            .map_err(|source| {
                error!("SD | Write to {} failed: {}", path, source);
                SinkError::Write {
                    path: path.to_owned(),
                    source,
                }
            })
    }

    fn open_with_retry(&mut self, path: &str) -> SinkResult<S::Writer> {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.storage.open_append(path) {
                Ok(writer) => return Ok(writer),
                Err(e) if attempt < attempts => {
                    warn!(
                        "SD | Error opening {} ({}), retrying [{}/{}]...",
                        path, e, attempt, attempts
                    );
                    self.delay.delay_ms(self.policy.backoff_ms);
                    attempt += 1;
                }
                Err(source) => {
                    error!("SD | Could not open {} after {} attempts.", path, attempts);
                    return Err(SinkError::OpenFailed {
                        path: path.to_owned(),
                        attempts,
                        source,
                    });
                }
            }
        }
    }

    /// Underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Underlying storage, mutably (the replay engine works on it directly)
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// The blocking delay, shared with other waits on the main loop
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Give back the storage and delay
    pub fn into_parts(self) -> (S, D) {
        (self.storage, self.delay)
    }
}
