use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// The acting user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Organization membership facts, supplied by an external membership service.
pub trait IdentityProvider: Send + Sync {
    /// Holds an elevated committee role.
    fn is_privileged_member(&self, principal: &Principal) -> bool;

    /// Belongs to the organization at all.
    fn is_band_member(&self, principal: &Principal) -> bool;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn is_privileged_member(&self, principal: &Principal) -> bool {
        (**self).is_privileged_member(principal)
    }

    fn is_band_member(&self, principal: &Principal) -> bool {
        (**self).is_band_member(principal)
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn is_privileged_member(&self, principal: &Principal) -> bool {
        (**self).is_privileged_member(principal)
    }

    fn is_band_member(&self, principal: &Principal) -> bool {
        (**self).is_band_member(principal)
    }
}

/// Both membership facts for one principal, resolved once per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberStatus {
    pub band_member: bool,
    pub privileged: bool,
}

impl MemberStatus {
    pub fn resolve<I: IdentityProvider + ?Sized>(identity: &I, principal: &Principal) -> Self {
        Self {
            band_member: identity.is_band_member(principal),
            privileged: identity.is_privileged_member(principal),
        }
    }
}

/// Membership tier as written in a members file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    #[default]
    None,
    Member,
    Privileged,
}

/// A fixed user-to-tier map. Privileged users count as band members.
///
/// ```ignore
/// let directory = MembershipDirectory::new()
///     .with("alice", Membership::Privileged)
///     .with("bob", Membership::Member);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MembershipDirectory {
    members: HashMap<String, Membership>,
}

impl MembershipDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user_id: impl Into<String>, membership: Membership) -> Self {
        self.members.insert(user_id.into(), membership);
        self
    }

    pub fn insert(&mut self, user_id: impl Into<String>, membership: Membership) {
        self.members.insert(user_id.into(), membership);
    }

    pub fn membership(&self, user_id: &str) -> Membership {
        self.members.get(user_id).copied().unwrap_or_default()
    }

    /// Load a JSON object of `{ "user-id": "member" | "privileged" | "none" }`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let contents = std::fs::read_to_string(path)?;
        let members: HashMap<String, Membership> = serde_json::from_str(&contents)?;
        Ok(Self { members })
    }
}

impl IdentityProvider for MembershipDirectory {
    fn is_privileged_member(&self, principal: &Principal) -> bool {
        self.membership(&principal.id) == Membership::Privileged
    }

    fn is_band_member(&self, principal: &Principal) -> bool {
        matches!(
            self.membership(&principal.id),
            Membership::Member | Membership::Privileged
        )
    }
}
