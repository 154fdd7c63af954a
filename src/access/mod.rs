//! Access control for shows.
//!
//! Band shows belong to the organization: members read them once
//! published, and only privileged members read drafts or write. Personal
//! shows belong to their owner.

mod identity;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::show::ShowRecord;

pub use identity::{IdentityProvider, MemberStatus, Membership, MembershipDirectory, Principal};

/// Whether privileged members may reach into other users' personal shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalShowAccess {
    #[default]
    OwnerOnly,
    OwnerOrPrivileged,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    personal: PersonalShowAccess,
}

impl AccessPolicy {
    pub fn new(personal: PersonalShowAccess) -> Self {
        Self { personal }
    }

    pub fn personal_access(&self) -> PersonalShowAccess {
        self.personal
    }

    pub fn can_read(&self, principal: &Principal, status: MemberStatus, record: &ShowRecord) -> bool {
        if record.is_band {
            status.band_member && (record.published || status.privileged)
        } else {
            self.owns_or_overrides(principal, status, record)
        }
    }

    pub fn can_write(&self, principal: &Principal, status: MemberStatus, record: &ShowRecord) -> bool {
        if record.is_band {
            status.privileged
        } else {
            self.owns_or_overrides(principal, status, record)
        }
    }

    /// The band flag a principal actually gets when asking for `requested`.
    /// Non-privileged requests for a band show quietly become personal.
    pub fn effective_is_band(&self, status: MemberStatus, requested: bool) -> bool {
        requested && status.privileged
    }

    pub fn check_read(
        &self,
        principal: &Principal,
        status: MemberStatus,
        record: &ShowRecord,
    ) -> Result<(), StoreError> {
        if self.can_read(principal, status, record) {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied {
                slug: record.slug.clone(),
            })
        }
    }

    pub fn check_write(
        &self,
        principal: &Principal,
        status: MemberStatus,
        record: &ShowRecord,
    ) -> Result<(), StoreError> {
        if self.can_write(principal, status, record) {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied {
                slug: record.slug.clone(),
            })
        }
    }

    fn owns_or_overrides(&self, principal: &Principal, status: MemberStatus, record: &ShowRecord) -> bool {
        record.owner == principal.id
            || (self.personal == PersonalShowAccess::OwnerOrPrivileged && status.privileged)
    }
}
