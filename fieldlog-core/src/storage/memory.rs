//! In-Memory Storage for Testing and Fault Injection
//!
//! Keeps every file as a byte vector in a shared map. Writers hold a handle
//! to the map and write straight through, so dropping a writer is the same as
//! closing a file on the card.
//!
//! ## Fault Injection
//!
//! SD cards fail in a few characteristic ways, each of which can be
//! simulated:
//!
//! - **Busy card**: [`MemoryStorage::fail_next_opens`] makes the next N
//!   append opens fail
//! - **Full card / bad sector**: [`MemoryStorage::fail_create`] makes
//!   creating one path fail
//! - **Power loss during swap**: [`MemoryStorage::fail_rename`] makes the
//!   rename step of a replace fail after the target was already removed
//! - **Unreadable sector**: [`MemoryStorage::fail_read_at`] makes reading
//!   one line of a file fail partway through
//!
//! ## Example
//!
//! ```rust
//! use fieldlog_core::storage::{MemoryStorage, Storage};
//!
//! let mut storage = MemoryStorage::new().with_file("/buffer.jsonl", "{\"a\":1}\n");
//! storage.fail_next_opens(2);
//!
//! assert!(storage.open_append("/log.txt").is_err());
//! assert!(storage.open_append("/log.txt").is_err());
//! assert!(storage.open_append("/log.txt").is_ok());
//! assert_eq!(storage.lines("/buffer.jsonl"), vec!["{\"a\":1}"]);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Cursor, Write};
use std::rc::Rc;

use super::{RawLines, Storage};

type Files = Rc<RefCell<BTreeMap<String, Vec<u8>>>>;

/// In-memory [`Storage`]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Files,
    failing_opens: u32,
    open_attempts: u32,
    failing_creates: BTreeSet<String>,
    failing_rename: bool,
    failing_reads: BTreeMap<String, usize>,
}

impl MemoryStorage {
    /// Empty card
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file with `contents`
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(path.to_owned(), contents.as_bytes().to_vec());
        self
    }

    /// Seed a file with raw `bytes`
    pub fn with_bytes(self, path: &str, bytes: &[u8]) -> Self {
        self.files.borrow_mut().insert(path.to_owned(), bytes.to_vec());
        self
    }

    /// Make the next `count` calls to `open_append` fail
    pub fn fail_next_opens(&mut self, count: u32) {
        self.failing_opens = count;
    }

    /// Make every `create` of `path` fail
    pub fn fail_create(&mut self, path: &str) {
        self.failing_creates.insert(path.to_owned());
    }

    /// Make `rename` fail, simulating power loss mid-swap
    pub fn fail_rename(&mut self, fail: bool) {
        self.failing_rename = fail;
    }

    /// Make reading `path` fail when line `index` (0-based) is reached
    pub fn fail_read_at(&mut self, path: &str, index: usize) {
        self.failing_reads.insert(path.to_owned(), index);
    }

    /// Number of `open_append` calls so far, failed ones included
    pub fn open_attempts(&self) -> u32 {
        self.open_attempts
    }

    /// Raw bytes of `path`
    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    /// Full text of `path`, invalid UTF-8 replaced
    pub fn contents(&self, path: &str) -> Option<String> {
        self.bytes(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Lines of `path`, empty if the file is missing
    pub fn lines(&self, path: &str) -> Vec<String> {
        self.contents(path)
            .map(|text| text.lines().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn writer(&self, path: &str) -> MemoryWriter {
        MemoryWriter {
            files: Rc::clone(&self.files),
            path: path.to_owned(),
        }
    }
}

fn injected(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("injected {} failure", what))
}

impl Storage for MemoryStorage {
    type Writer = MemoryWriter;
    type Lines = MemoryLines;

    fn open_append(&mut self, path: &str) -> io::Result<Self::Writer> {
        self.open_attempts += 1;
        if self.failing_opens > 0 {
            self.failing_opens -= 1;
            return Err(injected("open"));
        }
        self.files.borrow_mut().entry(path.to_owned()).or_default();
        Ok(self.writer(path))
    }

    fn create(&mut self, path: &str) -> io::Result<Self::Writer> {
        if self.failing_creates.contains(path) {
            return Err(injected("create"));
        }
        self.files.borrow_mut().insert(path.to_owned(), Vec::new());
        Ok(self.writer(path))
    }

    fn read_lines(&mut self, path: &str) -> io::Result<Self::Lines> {
        let bytes = self
            .bytes(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))?;
        Ok(MemoryLines {
            lines: RawLines::new(Cursor::new(bytes)),
            next_index: 0,
            fail_at: self.failing_reads.get(path).copied(),
            failed: false,
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_owned()))
    }

    fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        if self.failing_rename {
            return Err(injected("rename"));
        }
        let mut files = self.files.borrow_mut();
        let bytes = files
            .remove(from)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, from.to_owned()))?;
        files.insert(to.to_owned(), bytes);
        Ok(())
    }
}

/// Write-through handle into a [`MemoryStorage`] file
#[derive(Debug)]
pub struct MemoryWriter {
    files: Files,
    path: String,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.files
            .borrow_mut()
            .entry(self.path.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Snapshot of a file's lines taken when it was opened
#[derive(Debug)]
pub struct MemoryLines {
    lines: RawLines<Cursor<Vec<u8>>>,
    next_index: usize,
    fail_at: Option<usize>,
    failed: bool,
}

impl Iterator for MemoryLines {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.fail_at == Some(self.next_index) {
            self.failed = true;
            return Some(Err(injected("read")));
        }
        self.next_index += 1;
        self.lines.next()
    }
}
