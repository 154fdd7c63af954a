use serde::Serialize;

use super::{MigrationError, SchemaMigrator};
use crate::backend::ShowBackend;
use crate::error::StorageError;

/// Outcome of a bulk pass over every stored show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Record ids whose documents were upgraded and written back.
    pub upgraded: Vec<String>,
    /// Documents already at (or above) the current version.
    pub up_to_date: usize,
    /// Records without a document.
    pub uninitialized: usize,
    /// Documents left unchanged because a step failed.
    pub failures: Vec<MigrationError>,
    /// Stored shows the backend could not decode; none of them were visited.
    pub unreadable: Vec<String>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.unreadable.is_empty()
    }
}

impl SchemaMigrator {
    /// Upgrade and persist every stored document behind the current version.
    ///
    /// A failing document is recorded in the report and left as stored;
    /// the pass moves on to the next one. Only storage errors abort.
    pub fn migrate_backend<B: ShowBackend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<MigrationReport, StorageError> {
        let mut report = MigrationReport {
            unreadable: backend.unreadable()?,
            ..MigrationReport::default()
        };
        for location in &report.unreadable {
            tracing::warn!(%location, "show left out of migration: unreadable");
        }

        for record in backend.list()? {
            // Re-read so a write that landed after `list` is the one upgraded.
            let Some(stored) = backend.get(&record.id)? else {
                continue;
            };
            let Some(document) = stored.document else {
                report.uninitialized += 1;
                continue;
            };
            if !self.needs_upgrade(&document) {
                if document.version > self.current_version() {
                    tracing::warn!(
                        record_id = %record.id,
                        stored_version = document.version,
                        "show document is newer than the current schema"
                    );
                }
                report.up_to_date += 1;
                continue;
            }

            match self.upgrade(&stored.record.id, document) {
                Ok(upgraded) => {
                    backend.replace_document(&record.id, upgraded)?;
                    report.upgraded.push(record.id);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "show document migration failed");
                    report.failures.push(e);
                }
            }
        }

        tracing::info!(
            upgraded = report.upgraded.len(),
            up_to_date = report.up_to_date,
            uninitialized = report.uninitialized,
            failed = report.failures.len(),
            unreadable = report.unreadable.len(),
            "bulk show migration finished"
        );
        Ok(report)
    }
}
