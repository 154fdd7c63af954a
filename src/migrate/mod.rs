//! Schema migration for show documents.
//!
//! Steps are plain structs holding a function pointer, registered once in
//! ascending `target_version` order through [`SchemaMigratorBuilder`].
//! Documents are upgraded lazily on read or in a bulk pass over a backend.
//!
//! ## Example
//!
//! ```ignore
//! let migrator = SchemaMigrator::builder()
//!     .step(7, "add beats", |payload| {
//!         payload.insert("beats".into(), serde_json::json!([]));
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let upgraded = migrator.upgrade(&record.id, document)?;
//! assert_eq!(upgraded.version, 7);
//! ```

mod bulk;
mod calchart;

use serde::Serialize;

use crate::show::{Payload, ShowDocument};

pub use bulk::MigrationReport;
pub use calchart::{calchart_migrator, CURRENT_VERSION};

/// The version a brand-new, never-migrated schema starts at.
pub const INITIAL_VERSION: u64 = 1;

/// A payload transformation producing the shape of `target_version`.
pub type Transform = fn(&mut Payload) -> Result<(), String>;

/// One registered upgrade step.
#[derive(Clone)]
pub struct MigrationStep {
    pub target_version: u64,
    pub description: &'static str,
    pub transform: Transform,
}

impl std::fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationStep")
            .field("target_version", &self.target_version)
            .field("description", &self.description)
            .finish()
    }
}

/// A transform failed while upgrading one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("migration of show {record_id} from version {from_version} to {target_version} failed: {message}")]
pub struct MigrationError {
    pub record_id: String,
    pub from_version: u64,
    pub target_version: u64,
    pub message: String,
}

/// Steps were registered out of order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationConfigError {
    #[error("migration step for version {target_version} registered after version {previous}")]
    OutOfOrder { previous: u64, target_version: u64 },
    #[error("migration step for version {0} registered twice")]
    Duplicate(u64),
    #[error("migration step must target a version above {floor}, got {target_version}")]
    BelowBaseline { floor: u64, target_version: u64 },
}

/// Collects steps; validation happens in [`build`](Self::build).
#[derive(Debug)]
pub struct SchemaMigratorBuilder {
    baseline: u64,
    steps: Vec<MigrationStep>,
}

impl SchemaMigratorBuilder {
    /// The version documents start at. Every step must target a version
    /// above it, and it is the current version when no steps are registered.
    pub fn baseline(mut self, version: u64) -> Self {
        self.baseline = version;
        self
    }

    pub fn step(mut self, target_version: u64, description: &'static str, transform: Transform) -> Self {
        self.steps.push(MigrationStep {
            target_version,
            description,
            transform,
        });
        self
    }

    pub fn build(self) -> Result<SchemaMigrator, MigrationConfigError> {
        let mut previous: Option<u64> = None;
        for step in &self.steps {
            if step.target_version <= self.baseline {
                return Err(MigrationConfigError::BelowBaseline {
                    floor: self.baseline,
                    target_version: step.target_version,
                });
            }
            if let Some(previous) = previous {
                if step.target_version == previous {
                    return Err(MigrationConfigError::Duplicate(previous));
                }
                if step.target_version < previous {
                    return Err(MigrationConfigError::OutOfOrder {
                        previous,
                        target_version: step.target_version,
                    });
                }
            }
            previous = Some(step.target_version);
        }

        let current_version = previous.unwrap_or(self.baseline);
        Ok(SchemaMigrator {
            steps: self.steps,
            current_version,
        })
    }
}

/// Brings documents from their stored version up to `current_version`.
#[derive(Debug, Clone)]
pub struct SchemaMigrator {
    steps: Vec<MigrationStep>,
    current_version: u64,
}

impl Default for SchemaMigrator {
    /// No steps; every document is already current at [`INITIAL_VERSION`].
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            current_version: INITIAL_VERSION,
        }
    }
}

impl SchemaMigrator {
    pub fn builder() -> SchemaMigratorBuilder {
        SchemaMigratorBuilder {
            baseline: INITIAL_VERSION,
            steps: Vec::new(),
        }
    }

    pub fn current_version(&self) -> u64 {
        self.current_version
    }

    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    pub fn needs_upgrade(&self, document: &ShowDocument) -> bool {
        document.version < self.current_version
    }

    /// Apply every step above the document's version, in order.
    ///
    /// Steps run against a working copy, so on failure the caller still
    /// holds nothing but the untouched original. Documents newer than the
    /// current version are returned as-is; they are never downgraded.
    pub fn upgrade(
        &self,
        record_id: &str,
        document: ShowDocument,
    ) -> Result<ShowDocument, MigrationError> {
        if document.version > self.current_version {
            tracing::warn!(
                record_id,
                stored_version = document.version,
                current_version = self.current_version,
                "show document is newer than the current schema"
            );
            return Ok(document);
        }
        if !self.needs_upgrade(&document) {
            return Ok(document);
        }

        let from_version = document.version;
        let mut upgraded = document;
        for step in self.steps.iter().filter(|s| s.target_version > from_version) {
            (step.transform)(&mut upgraded.payload).map_err(|message| MigrationError {
                record_id: record_id.to_string(),
                from_version,
                target_version: step.target_version,
                message,
            })?;
            upgraded.version = step.target_version;
        }
        // Documents below a stepless baseline are tagged current as-is.
        upgraded.version = self.current_version;

        tracing::debug!(
            record_id,
            from_version,
            to_version = upgraded.version,
            "upgraded show document"
        );
        Ok(upgraded)
    }
}
