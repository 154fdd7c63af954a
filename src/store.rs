//! ShowDocumentStore - the facade callers use to create, read and save shows.
//!
//! Every operation resolves the principal's membership once, checks it
//! against the [`AccessPolicy`], and then reads or writes through the
//! backend. Documents are upgraded to the current schema on the way out.

use std::str::FromStr;

use chrono::Utc;

use crate::access::{AccessPolicy, IdentityProvider, MemberStatus, Principal};
use crate::backend::ShowBackend;
use crate::error::StoreError;
use crate::migrate::{MigrationReport, SchemaMigrator};
use crate::show::{
    MirroredFields, Payload, ShowDocument, ShowRecord, ShowSummary, ShowView, StoredShow,
};
use crate::slug::allocate_slug;

/// The two listings on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Organization shows from a given year.
    Band,
    /// The principal's personal shows.
    Owned,
}

impl FromStr for Tab {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "band" => Ok(Tab::Band),
            "owned" => Ok(Tab::Owned),
            other => Err(StoreError::InvalidTab(other.to_string())),
        }
    }
}

pub struct ShowDocumentStore<B, I> {
    backend: B,
    identity: I,
    migrator: SchemaMigrator,
    policy: AccessPolicy,
}

impl<B: ShowBackend, I: IdentityProvider> ShowDocumentStore<B, I> {
    pub fn new(backend: B, identity: I, migrator: SchemaMigrator) -> Self {
        Self {
            backend,
            identity,
            migrator,
            policy: AccessPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn migrator(&self) -> &SchemaMigrator {
        &self.migrator
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    fn status(&self, principal: &Principal) -> MemberStatus {
        MemberStatus::resolve(&self.identity, principal)
    }

    fn load(&self, slug: &str) -> Result<StoredShow, StoreError> {
        self.backend
            .get_by_slug(slug)?
            .ok_or_else(|| StoreError::NotFound {
                slug: slug.to_string(),
            })
    }

    /// Create an uninitialized show owned by `owner`.
    ///
    /// A band show requested by a non-privileged principal is created as a
    /// personal show instead.
    pub fn create(
        &self,
        name: &str,
        owner: &Principal,
        requested_is_band: bool,
    ) -> Result<ShowRecord, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidPayload("show name must not be empty".into()));
        }
        if self.backend.name_exists(name)? {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            });
        }

        let is_band = self
            .policy
            .effective_is_band(self.status(owner), requested_is_band);
        if requested_is_band && !is_band {
            tracing::info!(owner = %owner.id, name, "band show requested without privilege; creating personal show");
        }

        let slug = allocate_slug(name, |candidate| self.backend.slug_exists(candidate))?;
        let record = ShowRecord::new(name, slug, owner.id.clone(), is_band, Utc::now());
        // The backend re-checks name and slug atomically; a racing create
        // surfaces here as DuplicateName or SlugTaken.
        self.backend.insert(StoredShow::new(record.clone()))?;

        tracing::info!(id = %record.id, slug = %record.slug, owner = %owner.id, is_band, "created show");
        Ok(record)
    }

    pub fn get_record(&self, slug: &str) -> Result<ShowRecord, StoreError> {
        Ok(self.load(slug)?.record)
    }

    /// The show's document, upgraded to the current schema version.
    pub fn get_document(&self, slug: &str, principal: &Principal) -> Result<ShowDocument, StoreError> {
        let stored = self.load(slug)?;
        self.policy
            .check_read(principal, self.status(principal), &stored.record)?;

        let document = stored.document.ok_or_else(|| StoreError::NotInitialized {
            slug: slug.to_string(),
        })?;
        Ok(self.migrator.upgrade(&stored.record.id, document)?)
    }

    /// Like [`get_document`](Self::get_document), but an uninitialized show
    /// yields its metadata instead of an error.
    pub fn view_show(&self, slug: &str, principal: &Principal) -> Result<ShowView, StoreError> {
        let stored = self.load(slug)?;
        self.policy
            .check_read(principal, self.status(principal), &stored.record)?;

        match stored.document {
            Some(document) => Ok(ShowView::Initialized {
                show: self.migrator.upgrade(&stored.record.id, document)?,
            }),
            None => Ok(ShowView::Uninitialized {
                name: stored.record.name,
                slug: stored.record.slug,
                is_band: stored.record.is_band,
            }),
        }
    }

    /// Overwrite the show's document and re-derive the record's mirrored
    /// columns from it. Record and document are replaced together.
    ///
    /// Returns the record as stored afterwards.
    pub fn save_document(
        &self,
        slug: &str,
        principal: &Principal,
        payload: Payload,
    ) -> Result<ShowRecord, StoreError> {
        let stored = self.load(slug)?;
        let status = self.status(principal);
        self.policy.check_write(principal, status, &stored.record)?;

        let mut document = ShowDocument::from_payload(payload);
        let mut fields = MirroredFields::read(&document.payload, &stored.record)?;
        let requested_is_band = fields.is_band;
        fields.is_band = self.policy.effective_is_band(status, requested_is_band);
        if requested_is_band && !fields.is_band {
            tracing::info!(slug, user = %principal.id, "band flag dropped for non-privileged save");
        }

        fields.write(&mut document.payload);
        document.version = self.migrator.current_version();

        let record = stored.record.with_mirrored(&fields);
        self.backend.replace(StoredShow {
            record: record.clone(),
            document: Some(document),
        })?;

        tracing::info!(id = %record.id, slug = %record.slug, user = %principal.id, "saved show document");
        Ok(record)
    }

    /// Publish or unpublish a show that already has a document.
    pub fn set_published(
        &self,
        slug: &str,
        principal: &Principal,
        published: bool,
    ) -> Result<ShowRecord, StoreError> {
        let stored = self.load(slug)?;
        // Checked before permissions: an unset show cannot be published by anyone.
        let Some(mut document) = stored.document else {
            return Err(StoreError::NotInitialized {
                slug: slug.to_string(),
            });
        };
        self.policy
            .check_write(principal, self.status(principal), &stored.record)?;

        let mut fields = MirroredFields::of(&stored.record);
        fields.published = published;
        fields.write(&mut document.payload);

        let record = stored.record.with_mirrored(&fields);
        self.backend.replace(StoredShow {
            record: record.clone(),
            document: Some(document),
        })?;

        tracing::info!(slug, user = %principal.id, published, "changed show publication");
        Ok(record)
    }

    /// Delete a show together with its document.
    pub fn delete(&self, slug: &str, principal: &Principal) -> Result<(), StoreError> {
        let stored = self.load(slug)?;
        self.policy
            .check_write(principal, self.status(principal), &stored.record)?;

        if !self.backend.delete(&stored.record.id)? {
            return Err(StoreError::NotFound {
                slug: slug.to_string(),
            });
        }
        tracing::info!(slug, user = %principal.id, "deleted show");
        Ok(())
    }

    /// The shows listed under `tab`. `year` selects band shows by creation
    /// year and is ignored for [`Tab::Owned`].
    pub fn list_tab(
        &self,
        principal: &Principal,
        tab: Tab,
        year: i32,
    ) -> Result<Vec<ShowSummary>, StoreError> {
        let records = self.backend.list()?;
        let summaries = match tab {
            Tab::Band => {
                let status = self.status(principal);
                records
                    .iter()
                    .filter(|r| r.is_band && r.year() == year)
                    .filter(|r| self.policy.can_read(principal, status, r))
                    .map(ShowRecord::summary)
                    .collect()
            }
            Tab::Owned => records
                .iter()
                .filter(|r| !r.is_band && r.owner == principal.id)
                .map(ShowRecord::summary)
                .collect(),
        };
        Ok(summaries)
    }

    /// Upgrade and persist every stored document behind the current version.
    pub fn migrate_all(&self) -> Result<MigrationReport, StoreError> {
        Ok(self.migrator.migrate_backend(&self.backend)?)
    }
}
