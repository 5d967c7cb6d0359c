use std::fs;
use std::path::PathBuf;

use coursepath::models::OfferingCache;
use coursepath::offerings::{FileStore, OfferingStore};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("coursepath_{}_{}", std::process::id(), name))
}

#[test]
fn test_write_creates_directory_and_roundtrips() {
    let dir = temp_path("store_roundtrip");
    let _ = fs::remove_dir_all(&dir);
    let path = dir.join("nested").join("offering_cache.json");

    let mut cache = OfferingCache::empty();
    cache.last_updated = "2024-09-01T00:00:00Z".to_string();
    cache.semesters.insert("2024-fall".to_string(), vec!["CMPT 225".to_string()]);

    let store = FileStore::new(&path);
    assert!(store.write(&cache), "write must create missing directories");

    let back = store.read().expect("document written must read back");
    assert_eq!(back.last_updated, "2024-09-01T00:00:00Z");
    assert_eq!(back.semesters["2024-fall"], vec!["CMPT 225"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_malformed_document_reads_as_absent() {
    let path = temp_path("store_malformed.json");
    fs::write(&path, "this is not json {{{").unwrap();

    let store = FileStore::new(&path);
    assert!(store.read().is_none(), "malformed content must be treated as no cache");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_semesters_field_reads_as_absent() {
    let path = temp_path("store_wrong_shape.json");
    fs::write(&path, r#"{"lastUpdated": "2024-09-01T00:00:00Z"}"#).unwrap();

    let store = FileStore::new(&path);
    assert!(store.read().is_none(), "document without 'semesters' must be treated as no cache");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_timestamp_is_tolerated() {
    // Only the semesters mapping is load-bearing; an absent lastUpdated
    // defaults to empty instead of invalidating the document.
    let path = temp_path("store_no_timestamp.json");
    fs::write(&path, r#"{"semesters": {"2024-fall": ["CMPT 120"]}}"#).unwrap();

    let store = FileStore::new(&path);
    let cache = store.read().expect("semesters-only document must parse");
    assert_eq!(cache.semesters["2024-fall"], vec!["CMPT 120"]);
    assert!(cache.last_updated.is_empty());

    let _ = fs::remove_file(&path);
}
