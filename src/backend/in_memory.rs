//! InMemoryShowBackend - HashMap-backed storage for tests and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{check_unique, sort_records, ShowBackend};
use crate::error::StorageError;
use crate::show::{ShowDocument, ShowRecord, StoredShow};

/// In-memory backend keyed by record id. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryShowBackend {
    shows: Arc<RwLock<HashMap<String, StoredShow>>>,
}

impl InMemoryShowBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("len"))?;
        Ok(shows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl ShowBackend for InMemoryShowBackend {
    fn insert(&self, show: StoredShow) -> Result<(), StorageError> {
        let mut shows = self
            .shows
            .write()
            .map_err(|_| StorageError::LockPoisoned("insert"))?;

        check_unique(shows.values().map(|s| &s.record), &show.record)?;
        shows.insert(show.record.id.clone(), show);
        Ok(())
    }

    fn replace(&self, show: StoredShow) -> Result<(), StorageError> {
        let mut shows = self
            .shows
            .write()
            .map_err(|_| StorageError::LockPoisoned("replace"))?;

        if !shows.contains_key(&show.record.id) {
            return Err(StorageError::Missing(show.record.id));
        }
        check_unique(shows.values().map(|s| &s.record), &show.record)?;
        shows.insert(show.record.id.clone(), show);
        Ok(())
    }

    fn replace_document(&self, id: &str, document: ShowDocument) -> Result<(), StorageError> {
        let mut shows = self
            .shows
            .write()
            .map_err(|_| StorageError::LockPoisoned("replace_document"))?;

        let stored = shows
            .get_mut(id)
            .ok_or_else(|| StorageError::Missing(id.to_string()))?;
        stored.document = Some(document);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<StoredShow>, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("get"))?;
        Ok(shows.get(id).cloned())
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<StoredShow>, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("get_by_slug"))?;
        Ok(shows.values().find(|s| s.record.slug == slug).cloned())
    }

    fn slug_exists(&self, slug: &str) -> Result<bool, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("slug_exists"))?;
        Ok(shows.values().any(|s| s.record.slug == slug))
    }

    fn name_exists(&self, name: &str) -> Result<bool, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("name_exists"))?;
        Ok(shows.values().any(|s| s.record.name == name))
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut shows = self
            .shows
            .write()
            .map_err(|_| StorageError::LockPoisoned("delete"))?;
        Ok(shows.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<ShowRecord>, StorageError> {
        let shows = self
            .shows
            .read()
            .map_err(|_| StorageError::LockPoisoned("list"))?;
        let mut records: Vec<ShowRecord> = shows.values().map(|s| s.record.clone()).collect();
        sort_records(&mut records);
        Ok(records)
    }
}
