//! std Filesystem Storage
//!
//! Maps card paths (`/buffer.jsonl`) onto a root directory. On a host this is
//! any directory; on an ESP-IDF target it is the VFS mount point of the SD
//! card (e.g. `/sdcard`).

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::{RawLines, Storage};

/// Filesystem-backed [`Storage`]
///
/// ## Example
///
/// ```rust,no_run
/// use fieldlog_core::storage::{FileStorage, Storage};
///
/// let mut storage = FileStorage::mount("/sdcard")?;
/// assert!(!storage.exists("/buffer.jsonl"));
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the card root without checking it
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root` as the card root, failing if it is not a directory
    pub fn mount(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        match fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => {
                log::info!("SD | Card mounted at {}", root.display());
                Ok(Self { root })
            }
            Ok(_) => {
                log::error!("SD | Failed to mount card: {} is not a directory", root.display());
                Err(io::Error::new(io::ErrorKind::InvalidInput, "card root is not a directory"))
            }
            Err(e) => {
                log::error!("SD | Failed to mount card at {}: {}", root.display(), e);
                Err(e)
            }
        }
    }

    /// Directory that card paths resolve under
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a card path
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Storage for FileStorage {
    type Writer = BufWriter<File>;
    type Lines = RawLines<BufReader<File>>;

    fn open_append(&mut self, path: &str) -> io::Result<Self::Writer> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.resolve(path))?;
        Ok(BufWriter::new(file))
    }

    fn create(&mut self, path: &str) -> io::Result<Self::Writer> {
        Ok(BufWriter::new(File::create(self.resolve(path))?))
    }

    fn read_lines(&mut self, path: &str) -> io::Result<Self::Lines> {
        Ok(RawLines::new(BufReader::new(File::open(self.resolve(path))?)))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(path))
    }

    fn rename(&mut self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))
    }

    /// fsync the staged file, rename it over the target, fsync the directory
    ///
    /// `rename` replaces the target atomically, so the old buffer stays
    /// authoritative until the new one is complete on disk.
    fn replace(&mut self, staged: &str, target: &str) -> io::Result<()> {
        let staged_path = self.resolve(staged);
        File::open(&staged_path)?.sync_all()?;
        fs::rename(&staged_path, self.resolve(target))?;

        // Directory fsync is unsupported on some platforms; the rename itself
        // already happened.
        let dir = self.resolve(target);
        if let Some(parent) = dir.parent() {
            if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
                log::debug!("SD | directory sync skipped for {}: {}", parent.display(), e);
            }
        }
        Ok(())
    }
}
