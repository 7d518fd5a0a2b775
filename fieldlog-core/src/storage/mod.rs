//! Filesystem Capability
//!
//! The store-and-forward core needs a handful of primitives from the SD card:
//! append, create, read line-by-line, delete, rename. This module defines
//! them as the [`Storage`] trait and ships two implementations:
//!
//! - [`file`] - std filesystem rooted at a directory (host builds, tests)
//! - [`memory`] - in-memory files with fault injection (tests)
//!
//! ## Text Model
//!
//! Files hold one logical record per line, `\n` terminated. Records are
//! written as UTF-8, but a card can hand back anything: `read_lines` yields
//! raw bytes without the terminator and leaves decoding to the caller, so
//! one corrupted line never hides the lines after it.
//!
//! ## Durable Swap
//!
//! [`Storage::replace`] is the commit point of a replay pass. The default
//! removes the target and then renames the staged file over it, which leaves
//! a window where only the staged file exists. Backends with an atomic
//! rename override it so that a crash leaves either the old or the new
//! target, never neither.

use std::io::{self, BufRead, Write};

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Minimal filesystem used by the sink and the replay engine
pub trait Storage {
    /// Handle for appending or writing; dropping it closes the file
    type Writer: Write;

    /// Raw line iterator over an open file
    type Lines: Iterator<Item = io::Result<Vec<u8>>>;

    /// Open `path` for append, creating it if missing
    fn open_append(&mut self, path: &str) -> io::Result<Self::Writer>;

    /// Create `path`, truncating any previous content
    fn create(&mut self, path: &str) -> io::Result<Self::Writer>;

    /// Open `path` for reading, one line at a time
    fn read_lines(&mut self, path: &str) -> io::Result<Self::Lines>;

    /// Whether `path` names an existing file
    fn exists(&self, path: &str) -> bool;

    /// Delete `path`
    fn remove(&mut self, path: &str) -> io::Result<()>;

    /// Move `from` to `to`
    fn rename(&mut self, from: &str, to: &str) -> io::Result<()>;

    /// Replace `target` with `staged`
    ///
    /// Not atomic: a failure between the two steps leaves only `staged`.
    fn replace(&mut self, staged: &str, target: &str) -> io::Result<()> {
        if self.exists(target) {
            self.remove(target)?;
        }
        self.rename(staged, target)
    }
}

/// Write one record line and its terminator
pub(crate) fn write_line<W: Write>(writer: &mut W, line: &str) -> io::Result<()> {
    write_raw_line(writer, line.as_bytes())
}

/// Write one undecoded line and its terminator
pub(crate) fn write_raw_line<W: Write>(writer: &mut W, line: &[u8]) -> io::Result<()> {
    writer.write_all(line)?;
    writer.write_all(b"\n")
}

/// Lines of a reader as bytes, `\n` or `\r\n` stripped
#[derive(Debug)]
pub struct RawLines<R> {
    reader: R,
}

impl<R: BufRead> RawLines<R> {
    /// Split `reader` on `\n`
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        match self.reader.read_until(b'\n', &mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.last() == Some(&b'\n') {
                    line.pop();
                    if line.last() == Some(&b'\r') {
                        line.pop();
                    }
                }
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
