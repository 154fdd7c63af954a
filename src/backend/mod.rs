//! Backends - where show records and documents actually live.
//!
//! A backend stores [`StoredShow`] units (record plus optional document)
//! and enforces uniqueness of `name` and `slug` inside the same critical
//! section as the write, so two racing creates cannot both succeed. For the
//! file backend that section spans every instance opened on the directory.

mod file;
mod in_memory;

use crate::error::{StorageError, UniqueField};
use crate::show::{ShowDocument, ShowRecord, StoredShow};

pub use file::FileShowBackend;
pub use in_memory::InMemoryShowBackend;

/// Atomic CRUD over `(ShowRecord, Option<ShowDocument>)` pairs.
pub trait ShowBackend: Send + Sync {
    /// Insert a new show. Fails with [`StorageError::Conflict`] if another
    /// record already holds the name or slug.
    fn insert(&self, show: StoredShow) -> Result<(), StorageError>;

    /// Overwrite the show with the same record id, record and document
    /// together. Uniqueness is checked against every other record.
    fn replace(&self, show: StoredShow) -> Result<(), StorageError>;

    /// Overwrite only the document of an existing show. The record, and
    /// with it the unique columns, stays as stored.
    fn replace_document(&self, id: &str, document: ShowDocument) -> Result<(), StorageError>;

    fn get(&self, id: &str) -> Result<Option<StoredShow>, StorageError>;

    fn get_by_slug(&self, slug: &str) -> Result<Option<StoredShow>, StorageError>;

    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError>;

    fn name_exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete the record and its document. Returns true if it existed.
    fn delete(&self, id: &str) -> Result<bool, StorageError>;

    /// All records, oldest first.
    fn list(&self) -> Result<Vec<ShowRecord>, StorageError>;

    /// Locations of stored shows that could not be decoded and are
    /// therefore missing from [`list`](Self::list).
    fn unreadable(&self) -> Result<Vec<String>, StorageError> {
        Ok(Vec::new())
    }
}

/// Reject `candidate` if any other record shares its name or slug.
fn check_unique<'a>(
    existing: impl IntoIterator<Item = &'a ShowRecord>,
    candidate: &ShowRecord,
) -> Result<(), StorageError> {
    for other in existing {
        if other.id == candidate.id {
            continue;
        }
        if other.name == candidate.name {
            return Err(StorageError::Conflict {
                field: UniqueField::Name,
                value: candidate.name.clone(),
            });
        }
        if other.slug == candidate.slug {
            return Err(StorageError::Conflict {
                field: UniqueField::Slug,
                value: candidate.slug.clone(),
            });
        }
    }
    Ok(())
}

fn sort_records(records: &mut [ShowRecord]) {
    records.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}
