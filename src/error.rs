use crate::migrate::MigrationError;

/// Errors raised by a [`ShowBackend`](crate::ShowBackend) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying lock was poisoned (a thread panicked while holding it).
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// A uniqueness constraint on `name` or `slug` rejected the write.
    #[error("uniqueness conflict on {field} `{value}`")]
    Conflict { field: UniqueField, value: String },
    /// The row being updated disappeared between read and write.
    #[error("record {0} no longer exists")]
    Missing(String),
    /// A stored show could not be decoded, so uniqueness cannot be checked.
    #[error("unreadable show file {path}: {message}")]
    Unreadable { path: String, message: String },
    /// Another writer held the data directory lock for too long.
    #[error("timed out waiting for storage lock {path} during {operation}")]
    LockTimeout { operation: &'static str, path: String },
}

/// The unique columns of a show record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Name,
    Slug,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UniqueField::Name => f.write_str("name"),
            UniqueField::Slug => f.write_str("slug"),
        }
    }
}

/// Errors surfaced by [`ShowDocumentStore`](crate::ShowDocumentStore).
///
/// `NotFound` and `PermissionDenied` are kept distinct; the transport
/// layer decides how much of the difference to disclose.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Show with the name `{name}` already exists.")]
    DuplicateName { name: String },
    #[error("slug `{slug}` is already in use")]
    SlugTaken { slug: String },
    #[error("show not found: {slug}")]
    NotFound { slug: String },
    #[error("permission denied for show {slug}")]
    PermissionDenied { slug: String },
    #[error("show {slug} has not been set up yet")]
    NotInitialized { slug: String },
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error("invalid show payload: {0}")]
    InvalidPayload(String),
    #[error("Invalid tab: {0}")]
    InvalidTab(String),
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict {
                field: UniqueField::Name,
                value,
            } => StoreError::DuplicateName { name: value },
            StorageError::Conflict {
                field: UniqueField::Slug,
                value,
            } => StoreError::SlugTaken { slug: value },
            other => StoreError::Storage(other),
        }
    }
}
