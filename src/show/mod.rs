//! Shows - the record/document pair the store persists.
//!
//! A [`ShowRecord`] carries identity and metadata. Its [`ShowDocument`] is
//! the versioned drill payload, and may not exist yet for a freshly
//! created show.

mod document;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

pub use document::{
    MirroredFields, Payload, ShowDocument, IS_BAND_KEY, NAME_KEY, PUBLISHED_KEY, SLUG_KEY,
    VERSION_KEY,
};

/// Identity and metadata for a show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub owner: String,
    pub is_band: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

impl ShowRecord {
    /// A new, unpublished record with a fresh id.
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        owner: impl Into<String>,
        is_band: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            slug: slug.into(),
            owner: owner.into(),
            is_band,
            published: false,
            created_at,
        }
    }

    /// A copy of this record with the mirrored columns replaced.
    /// `id`, `owner` and `created_at` never change.
    pub fn with_mirrored(&self, fields: &MirroredFields) -> Self {
        Self {
            name: fields.name.clone(),
            slug: fields.slug.clone(),
            is_band: fields.is_band,
            published: fields.published,
            ..self.clone()
        }
    }

    pub fn year(&self) -> i32 {
        self.created_at.year()
    }

    pub fn summary(&self) -> ShowSummary {
        ShowSummary {
            slug: self.slug.clone(),
            name: self.name.clone(),
            published: self.published,
        }
    }
}

/// A record together with its optional document, the unit of storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShow {
    pub record: ShowRecord,
    #[serde(default)]
    pub document: Option<ShowDocument>,
}

impl StoredShow {
    pub fn new(record: ShowRecord) -> Self {
        Self {
            record,
            document: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.document.is_some()
    }
}

/// One entry in a listing tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub slug: String,
    pub name: String,
    pub published: bool,
}

/// What a reader sees when opening a show, set up or not.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowView {
    Initialized {
        show: ShowDocument,
    },
    Uninitialized {
        name: String,
        slug: String,
        is_band: bool,
    },
}

impl ShowView {
    pub fn to_json(&self) -> Value {
        match self {
            ShowView::Initialized { show } => json!({
                "isInitialized": true,
                "show": Value::Object(show.to_payload()),
            }),
            ShowView::Uninitialized {
                name,
                slug,
                is_band,
            } => json!({
                "isInitialized": false,
                "name": name,
                "slug": slug,
                "isBand": is_band,
            }),
        }
    }
}
