//! Racing creates never both claim a name or slug.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use calchart_store::{
    calchart_migrator, FileShowBackend, InMemoryShowBackend, ShowBackend, ShowDocumentStore,
    ShowRecord, StoreError,
};

use crate::support::{directory, user};

const THREADS: usize = 8;

fn file_store(dir: &Path) -> ShowDocumentStore<FileShowBackend, calchart_store::MembershipDirectory> {
    ShowDocumentStore::new(
        FileShowBackend::open(dir).unwrap(),
        directory(),
        calchart_migrator().unwrap(),
    )
}

/// Run `create(name_for(i))` on `THREADS` threads released together, each
/// through the store returned by `store_for(i)`.
fn race<B, F>(store_for: F, name_for: fn(usize) -> String) -> Vec<Result<ShowRecord, StoreError>>
where
    B: ShowBackend + 'static,
    F: Fn(usize) -> Arc<ShowDocumentStore<B, calchart_store::MembershipDirectory>>,
{
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let store = store_for(i);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.create(&name_for(i), &user(&format!("u{i}")), false)
            })
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

fn same_name(_: usize) -> String {
    "Spring Show".to_string()
}

fn same_slug(i: usize) -> String {
    // "Spring Show", "Spring Show!", "Spring Show!!", ...
    format!("Spring Show{}", "!".repeat(i))
}

fn assert_single_winner(results: &[Result<ShowRecord, StoreError>]) {
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "{results:?}");
    for result in results {
        if let Err(e) = result {
            assert!(matches!(e, StoreError::DuplicateName { .. }), "{e:?}");
        }
    }
}

fn assert_distinct_slugs(results: &[Result<ShowRecord, StoreError>]) {
    let mut slugs: Vec<&str> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|r| r.slug.as_str())
        .collect();
    assert!(!slugs.is_empty());
    let total = slugs.len();
    slugs.sort();
    slugs.dedup();
    assert_eq!(slugs.len(), total, "{results:?}");
    for result in results {
        if let Err(e) = result {
            assert!(matches!(e, StoreError::SlugTaken { .. }), "{e:?}");
        }
    }
}

#[test]
fn in_memory_same_name_has_one_winner() {
    let store = Arc::new(ShowDocumentStore::new(
        InMemoryShowBackend::new(),
        directory(),
        calchart_migrator().unwrap(),
    ));
    let results = race(|_| Arc::clone(&store), same_name);
    assert_single_winner(&results);
    assert_eq!(store.backend().list().unwrap().len(), 1);
}

#[test]
fn in_memory_same_slug_never_doubles() {
    let store = Arc::new(ShowDocumentStore::new(
        InMemoryShowBackend::new(),
        directory(),
        calchart_migrator().unwrap(),
    ));
    let results = race(|_| Arc::clone(&store), same_slug);
    assert_distinct_slugs(&results);
}

#[test]
fn shared_file_store_same_name_has_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(file_store(dir.path()));
    let results = race(|_| Arc::clone(&store), same_name);
    assert_single_winner(&results);
    assert_eq!(store.backend().list().unwrap().len(), 1);
}

#[test]
fn separate_file_stores_same_name_has_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    let results = race(|_| Arc::new(file_store(&path)), same_name);
    assert_single_winner(&results);
    assert_eq!(file_store(&path).backend().list().unwrap().len(), 1);
}

#[test]
fn separate_file_stores_same_slug_never_doubles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    let results = race(|_| Arc::new(file_store(&path)), same_slug);
    assert_distinct_slugs(&results);

    let records = file_store(&path).backend().list().unwrap();
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(records.len(), wins);
}
