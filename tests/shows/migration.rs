//! Lazy and bulk schema migration through the store.

use calchart_store::{
    calchart_migrator, FileShowBackend, InMemoryShowBackend, MembershipDirectory, Payload,
    SchemaMigrator, ShowBackend, ShowDocument, ShowDocumentStore, StorageError, StoreError,
    StoredShow, CURRENT_VERSION,
};
use serde_json::json;

use crate::support::{show_data, store, user, Store};

/// Write a document at an old version straight into the backend, the way
/// shows saved by an older release sit on disk.
fn plant_old_document(store: &Store, slug: &str, version: u64) {
    let mut stored = store.backend().get_by_slug(slug).unwrap().unwrap();
    let mut data = show_data(slug, &stored.record.name, false, false, version);
    data.insert("beats".into(), json!([[0, 1], [1, 2]]));
    stored.document = Some(ShowDocument::from_payload(data));
    store.backend().replace(stored).unwrap();
}

#[test]
fn reads_upgrade_lazily_without_writing() {
    let store = store();
    store.create("Old", &user("u1"), false).unwrap();
    plant_old_document(&store, "old", 6);

    let document = store.get_document("old", &user("u1")).unwrap();
    assert_eq!(document.version, CURRENT_VERSION);
    assert_eq!(document.payload["beats"], json!([]));

    let on_disk = store.backend().get_by_slug("old").unwrap().unwrap();
    assert_eq!(on_disk.document.unwrap().version, 6);
}

#[test]
fn bulk_pass_persists_and_second_pass_is_noop() {
    let store = store();
    store.create("Old", &user("u1"), false).unwrap();
    store.create("Empty", &user("u1"), false).unwrap();
    store.create("New", &user("u1"), false).unwrap();
    plant_old_document(&store, "old", 6);
    store
        .save_document("new", &user("u1"), show_data("new", "New", false, false, 7))
        .unwrap();

    let first = store.migrate_all().unwrap();
    assert_eq!(first.upgraded.len(), 1);
    assert_eq!(first.up_to_date, 1);
    assert_eq!(first.uninitialized, 1);
    assert!(first.is_clean());

    let on_disk = store.backend().get_by_slug("old").unwrap().unwrap();
    let document = on_disk.document.unwrap();
    assert_eq!(document.version, CURRENT_VERSION);
    assert_eq!(document.payload["beats"], json!([]));

    let second = store.migrate_all().unwrap();
    assert!(second.upgraded.is_empty());
    assert_eq!(second.up_to_date, 2);
    assert!(second.failures.is_empty());
}

fn fail_on_marker(payload: &mut Payload) -> Result<(), String> {
    if payload.contains_key("corrupt") {
        return Err("corrupt dot data".into());
    }
    payload.insert("upgraded".into(), json!(true));
    Ok(())
}

#[test]
fn failing_document_surfaces_on_read_and_is_reported_in_bulk() {
    let migrator = SchemaMigrator::builder()
        .step(2, "fail on corrupt", fail_on_marker)
        .build()
        .unwrap();
    let store = ShowDocumentStore::new(
        InMemoryShowBackend::new(),
        MembershipDirectory::new(),
        migrator,
    );

    let bad = store.create("Bad", &user("u1"), false).unwrap();
    let good = store.create("Good", &user("u1"), false).unwrap();
    for (record, corrupt) in [(&bad, true), (&good, false)] {
        let mut data = show_data(&record.slug, &record.name, false, false, 1);
        if corrupt {
            data.insert("corrupt".into(), json!(true));
        }
        store
            .backend()
            .replace(StoredShow {
                record: record.clone(),
                document: Some(ShowDocument::from_payload(data)),
            })
            .unwrap();
    }

    let err = store.get_document("bad", &user("u1")).unwrap_err();
    match err {
        StoreError::Migration(e) => {
            assert_eq!(e.record_id, bad.id);
            assert_eq!(e.from_version, 1);
            assert_eq!(e.target_version, 2);
        }
        other => panic!("expected migration error, got {other:?}"),
    }

    let report = store.migrate_all().unwrap();
    assert_eq!(report.upgraded, vec![good.id.clone()]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].record_id, bad.id);

    let bad_doc = store.backend().get(&bad.id).unwrap().unwrap().document.unwrap();
    assert_eq!(bad_doc.version, 1);
    let good_doc = store.get_document("good", &user("u1")).unwrap();
    assert_eq!(good_doc.version, 2);
    assert_eq!(good_doc.payload["upgraded"], json!(true));
}

#[test]
fn unreadable_files_are_reported_and_the_rest_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let store = ShowDocumentStore::new(
        FileShowBackend::open(dir.path()).unwrap(),
        MembershipDirectory::new(),
        calchart_migrator().unwrap(),
    );
    let record = store.create("Old", &user("u1"), false).unwrap();
    let mut stored = store.backend().get(&record.id).unwrap().unwrap();
    stored.document = Some(ShowDocument::from_payload(show_data("old", "Old", false, false, 6)));
    store.backend().replace(stored).unwrap();

    let broken = dir.path().join("broken.show.json");
    std::fs::write(&broken, "not json").unwrap();

    let report = store.migrate_all().unwrap();
    assert_eq!(report.upgraded, vec![record.id.clone()]);
    assert_eq!(report.unreadable, vec![broken.display().to_string()]);
    assert!(!report.is_clean());

    let document = store.backend().get(&record.id).unwrap().unwrap().document.unwrap();
    assert_eq!(document.version, CURRENT_VERSION);

    // A name held by an unreadable file cannot be verified as free.
    let err = store.create("New", &user("u1"), false).unwrap_err();
    assert!(matches!(err, StoreError::Storage(StorageError::Unreadable { .. })));
}
