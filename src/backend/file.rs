//! FileShowBackend - one JSON file per show under a data directory.
//!
//! Each file holds the record and its document together, written to a
//! temporary file and renamed into place, so a reader never observes a
//! record without the matching document.
//!
//! Writers take `.write.lock` in the data directory, created with
//! `create_new` so the filesystem admits one holder at a time. The lock
//! covers the uniqueness scan and the write for every process and every
//! backend instance opened on the same directory.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::{check_unique, sort_records, ShowBackend};
use crate::error::StorageError;
use crate::show::{ShowDocument, ShowRecord, StoredShow};

const EXTENSION: &str = "show.json";
const LOCK_FILE: &str = ".write.lock";
const LOCK_RETRY: Duration = Duration::from_millis(2);
const LOCK_TIMEOUT: Duration = Duration::from_secs(10);

pub struct FileShowBackend {
    dir: PathBuf,
}

/// Held while writing; removes the lock file on drop.
struct WriteLock {
    path: PathBuf,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Result of reading every show file in the directory.
struct Scan {
    shows: Vec<StoredShow>,
    unreadable: Vec<(PathBuf, StorageError)>,
}

impl FileShowBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open a backend, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let backend = Self::new(dir);
        std::fs::create_dir_all(&backend.dir)?;
        Ok(backend)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, EXTENSION))
    }

    fn read_file(path: &Path) -> Result<Option<StoredShow>, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_file(&self, show: &StoredShow) -> Result<(), StorageError> {
        let path = self.file_path(&show.record.id);
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(show)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn scan(&self) -> Result<Scan, StorageError> {
        let mut scan = Scan {
            shows: Vec::new(),
            unreadable: Vec::new(),
        };
        if !self.dir.exists() {
            return Ok(scan);
        }

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_show = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(EXTENSION));
            if !is_show {
                continue;
            }
            match Self::read_file(&path) {
                Ok(Some(show)) => scan.shows.push(show),
                // Deleted between read_dir and the read.
                Ok(None) => {}
                Err(e) => scan.unreadable.push((path, e)),
            }
        }
        Ok(scan)
    }

    /// Every readable show. Unreadable files are logged and left out.
    fn load_all(&self) -> Result<Vec<StoredShow>, StorageError> {
        let scan = self.scan()?;
        for (path, e) in &scan.unreadable {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable show file");
        }
        Ok(scan.shows)
    }

    /// Every show, failing on the first file that cannot be decoded.
    /// Uniqueness checks use this, since a skipped file may hold the name
    /// or slug being claimed.
    fn load_all_strict(&self) -> Result<Vec<StoredShow>, StorageError> {
        let scan = self.scan()?;
        match scan.unreadable.into_iter().next() {
            Some((path, e)) => Err(StorageError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            None => Ok(scan.shows),
        }
    }

    fn lock_writer(&self, operation: &'static str) -> Result<WriteLock, StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(LOCK_FILE);
        let started = Instant::now();

        loop {
            match OpenOptions::new().create_new(true).write(true).open(&path) {
                Ok(_) => return Ok(WriteLock { path }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if started.elapsed() >= LOCK_TIMEOUT {
                        tracing::warn!(path = %path.display(), operation, "storage lock still held; giving up");
                        return Err(StorageError::LockTimeout {
                            operation,
                            path: path.display().to_string(),
                        });
                    }
                    std::thread::sleep(LOCK_RETRY);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl ShowBackend for FileShowBackend {
    fn insert(&self, show: StoredShow) -> Result<(), StorageError> {
        let _lock = self.lock_writer("insert")?;
        let existing = self.load_all_strict()?;
        check_unique(existing.iter().map(|s| &s.record), &show.record)?;
        self.write_file(&show)
    }

    fn replace(&self, show: StoredShow) -> Result<(), StorageError> {
        let _lock = self.lock_writer("replace")?;
        if !self.file_path(&show.record.id).exists() {
            return Err(StorageError::Missing(show.record.id));
        }
        let existing = self.load_all_strict()?;
        check_unique(existing.iter().map(|s| &s.record), &show.record)?;
        self.write_file(&show)
    }

    fn replace_document(&self, id: &str, document: ShowDocument) -> Result<(), StorageError> {
        let _lock = self.lock_writer("replace_document")?;
        let mut stored =
            Self::read_file(&self.file_path(id))?.ok_or_else(|| StorageError::Missing(id.to_string()))?;
        stored.document = Some(document);
        self.write_file(&stored)
    }

    fn get(&self, id: &str) -> Result<Option<StoredShow>, StorageError> {
        Self::read_file(&self.file_path(id))
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<StoredShow>, StorageError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|s| s.record.slug == slug))
    }

    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        Ok(self.load_all_strict()?.iter().any(|s| s.record.slug == slug))
    }

    fn name_exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.load_all_strict()?.iter().any(|s| s.record.name == name))
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let _lock = self.lock_writer("delete")?;
        match std::fs::remove_file(self.file_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<ShowRecord>, StorageError> {
        let mut records: Vec<ShowRecord> =
            self.load_all()?.into_iter().map(|s| s.record).collect();
        sort_records(&mut records);
        Ok(records)
    }

    fn unreadable(&self) -> Result<Vec<String>, StorageError> {
        Ok(self
            .scan()?
            .unreadable
            .into_iter()
            .map(|(path, _)| path.display().to_string())
            .collect())
    }
}
