//! Runtime configuration, read from the environment.

use std::path::PathBuf;

use crate::access::{AccessPolicy, MembershipDirectory, PersonalShowAccess};
use crate::error::StorageError;

pub const DATA_DIR_VAR: &str = "CALCHART_DATA_DIR";
pub const BIND_ADDR_VAR: &str = "CALCHART_BIND_ADDR";
pub const MEMBERS_FILE_VAR: &str = "CALCHART_MEMBERS_FILE";
pub const PRIVILEGED_PERSONAL_ACCESS_VAR: &str = "CALCHART_PRIVILEGED_PERSONAL_ACCESS";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub members_file: Option<PathBuf>,
    pub personal_access: PersonalShowAccess,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_data_dir(lookup("HOME")));

        let personal_access = match lookup(PRIVILEGED_PERSONAL_ACCESS_VAR).as_deref() {
            Some("1") | Some("true") | Some("yes") => PersonalShowAccess::OwnerOrPrivileged,
            _ => PersonalShowAccess::OwnerOnly,
        };

        Self {
            data_dir,
            bind_addr: lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            members_file: lookup(MEMBERS_FILE_VAR).map(PathBuf::from),
            personal_access,
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.personal_access)
    }

    /// The configured membership directory, or an empty one.
    pub fn membership_directory(&self) -> Result<MembershipDirectory, StorageError> {
        match &self.members_file {
            Some(path) => MembershipDirectory::from_json_file(path),
            None => Ok(MembershipDirectory::new()),
        }
    }
}

fn default_data_dir(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(".local/share/calchart"),
        None => PathBuf::from("./calchart-data"),
    }
}
