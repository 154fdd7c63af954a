//! The Calchart show schema history.

use serde_json::Value;

use super::{MigrationConfigError, SchemaMigrator};
use crate::show::Payload;

/// Version written by every save.
pub const CURRENT_VERSION: u64 = 7;

/// The migrator for the Calchart show schema.
pub fn calchart_migrator() -> Result<SchemaMigrator, MigrationConfigError> {
    SchemaMigrator::builder()
        .step(7, "reset beats to an empty list", reset_beats)
        .build()
}

// Beats moved out of a separate file and into the document at version 7.
fn reset_beats(payload: &mut Payload) -> Result<(), String> {
    payload.insert("beats".to_string(), Value::Array(Vec::new()));
    Ok(())
}
