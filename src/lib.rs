pub mod access;
pub mod actions;
mod backend;
pub mod config;
mod error;
pub mod migrate;
mod show;
mod slug;
mod store;

pub use access::{
    AccessPolicy, IdentityProvider, MemberStatus, Membership, MembershipDirectory,
    PersonalShowAccess, Principal,
};
pub use backend::{FileShowBackend, InMemoryShowBackend, ShowBackend};
pub use config::StoreConfig;
pub use error::{StorageError, StoreError, UniqueField};
pub use migrate::{
    calchart_migrator, MigrationConfigError, MigrationError, MigrationReport, SchemaMigrator,
    CURRENT_VERSION,
};
pub use show::{
    MirroredFields, Payload, ShowDocument, ShowRecord, ShowSummary, ShowView, StoredShow,
};
pub use slug::{allocate_slug, slugify};
pub use store::{ShowDocumentStore, Tab};
