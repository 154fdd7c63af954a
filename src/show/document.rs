use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

use super::ShowRecord;

/// The opaque show content: dots, stuntsheets, songs, continuities and so on.
pub type Payload = Map<String, Value>;

pub const VERSION_KEY: &str = "version";
pub const SLUG_KEY: &str = "slug";
pub const NAME_KEY: &str = "name";
pub const IS_BAND_KEY: &str = "isBand";
pub const PUBLISHED_KEY: &str = "published";

/// The versioned JSON document attached to a [`ShowRecord`].
///
/// Persisted as a single flat object: `version` sits next to the content
/// keys, exactly as the editor sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowDocument {
    #[serde(default)]
    pub version: u64,
    #[serde(flatten)]
    pub payload: Payload,
}

impl ShowDocument {
    pub fn new(version: u64, mut payload: Payload) -> Self {
        payload.remove(VERSION_KEY);
        Self { version, payload }
    }

    /// Split a raw editor object into its version tag and content.
    /// A missing or non-integer `version` reads as 0.
    pub fn from_payload(mut payload: Payload) -> Self {
        let version = payload
            .remove(VERSION_KEY)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Self { version, payload }
    }

    /// The flat object handed back to callers, `version` included.
    pub fn to_payload(&self) -> Payload {
        let mut payload = self.payload.clone();
        payload.insert(VERSION_KEY.to_string(), Value::from(self.version));
        payload
    }

    pub fn slug(&self) -> Option<&str> {
        self.payload.get(SLUG_KEY).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.payload.get(NAME_KEY).and_then(Value::as_str)
    }

    pub fn is_band(&self) -> Option<bool> {
        self.payload.get(IS_BAND_KEY).and_then(Value::as_bool)
    }

    pub fn published(&self) -> Option<bool> {
        self.payload.get(PUBLISHED_KEY).and_then(Value::as_bool)
    }
}

/// The record columns that are mirrored inside the document payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredFields {
    pub slug: String,
    pub name: String,
    pub is_band: bool,
    pub published: bool,
}

impl MirroredFields {
    pub fn of(record: &ShowRecord) -> Self {
        Self {
            slug: record.slug.clone(),
            name: record.name.clone(),
            is_band: record.is_band,
            published: record.published,
        }
    }

    /// Read the mirrored fields out of a submitted payload.
    ///
    /// `name` must be a non-empty string. An absent or empty `slug` and
    /// absent flags keep the current record's values. Present values of the
    /// wrong type are rejected.
    pub fn read(payload: &Payload, current: &ShowRecord) -> Result<Self, StoreError> {
        let name = match payload.get(NAME_KEY) {
            Some(Value::String(name)) if !name.trim().is_empty() => name.clone(),
            Some(Value::String(_)) => {
                return Err(StoreError::InvalidPayload("`name` must not be empty".into()))
            }
            Some(_) => return Err(StoreError::InvalidPayload("`name` must be a string".into())),
            None => return Err(StoreError::InvalidPayload("`name` is required".into())),
        };

        let slug = match payload.get(SLUG_KEY) {
            None | Some(Value::Null) => current.slug.clone(),
            Some(Value::String(slug)) if slug.is_empty() => current.slug.clone(),
            Some(Value::String(slug)) => slug.clone(),
            Some(_) => return Err(StoreError::InvalidPayload("`slug` must be a string".into())),
        };

        Ok(Self {
            slug,
            name,
            is_band: read_flag(payload, IS_BAND_KEY, current.is_band)?,
            published: read_flag(payload, PUBLISHED_KEY, current.published)?,
        })
    }

    /// Overwrite the mirrored keys of `payload` with these values.
    pub fn write(&self, payload: &mut Payload) {
        payload.insert(SLUG_KEY.to_string(), Value::from(self.slug.clone()));
        payload.insert(NAME_KEY.to_string(), Value::from(self.name.clone()));
        payload.insert(IS_BAND_KEY.to_string(), Value::from(self.is_band));
        payload.insert(PUBLISHED_KEY.to_string(), Value::from(self.published));
    }
}

fn read_flag(payload: &Payload, key: &str, fallback: bool) -> Result<bool, StoreError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(fallback),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(StoreError::InvalidPayload(format!("`{}` must be a boolean", key))),
    }
}
