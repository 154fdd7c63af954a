//! Error type for action handlers.

use crate::error::{StorageError, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The name is not one of the known actions.
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// The guard found required input fields missing.
    #[error("missing input for action: {0}")]
    GuardRejected(String),
    /// No user in the session.
    #[error("authentication required")]
    Unauthenticated,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::DecodeFailed(err.to_string())
    }
}

impl ActionError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            ActionError::UnknownAction(_) => 404,
            ActionError::DecodeFailed(_) => 400,
            ActionError::GuardRejected(_) => 400,
            ActionError::Unauthenticated => 401,
            ActionError::Store(e) => match e {
                StoreError::NotFound { .. } => 404,
                StoreError::PermissionDenied { .. } => 403,
                StoreError::DuplicateName { .. } => 409,
                StoreError::SlugTaken { .. } => 409,
                StoreError::NotInitialized { .. } => 409,
                StoreError::InvalidPayload(_) => 422,
                StoreError::InvalidTab(_) => 422,
                StoreError::Migration(_) => 500,
                StoreError::Storage(StorageError::Conflict { .. }) => 409,
                StoreError::Storage(_) => 500,
            },
        }
    }
}
