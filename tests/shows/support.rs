//! Shared fixtures: a store over the in-memory backend with three users.
//!
//! - `stunt` is a privileged band member
//! - `member` is a regular band member
//! - `outsider` and `u1`/`u2` are not band members

use calchart_store::{
    calchart_migrator, InMemoryShowBackend, Membership, MembershipDirectory, Payload, Principal,
    ShowDocumentStore,
};
use serde_json::Value;

pub type Store = ShowDocumentStore<InMemoryShowBackend, MembershipDirectory>;

pub fn directory() -> MembershipDirectory {
    MembershipDirectory::new()
        .with("stunt", Membership::Privileged)
        .with("member", Membership::Member)
}

pub fn store() -> Store {
    ShowDocumentStore::new(InMemoryShowBackend::new(), directory(), calchart_migrator().unwrap())
}

pub fn user(id: &str) -> Principal {
    Principal::new(id)
}

pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A full editor document for a show.
pub fn show_data(slug: &str, name: &str, is_band: bool, published: bool, version: u64) -> Payload {
    payload(serde_json::json!({
        "slug": slug,
        "name": name,
        "isBand": is_band,
        "published": published,
        "version": version,
        "numDots": 10,
        "dotGroups": {},
        "labelFormat": "combo",
        "audioUrl": null,
        "songs": [],
        "fieldType": "college",
        "beatsPerStep": [1, 1],
        "stepType": "high_step",
        "orientation": "east",
    }))
}
