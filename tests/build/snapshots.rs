//! Snapshot files and the `index` build run.

use super::common::{base_time, write_sample_posts};
use lectern::build::{build_index, corpus_fingerprint, load_snapshot, run_build, DirectorySource};

#[test]
fn test_run_build_writes_loadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let posts = dir.path().join("posts");
    let output = dir.path().join("public").join("search-index.json");
    write_sample_posts(&posts);

    let summary = run_build(&posts, &output, base_time()).unwrap();
    assert_eq!(summary.documents, 3);
    assert_eq!(summary.tags, 5);

    let loaded = load_snapshot(&output).expect("snapshot should load");
    assert_eq!(loaded.len(), 3);
    assert_eq!(corpus_fingerprint(&loaded), summary.fingerprint);
}

#[test]
fn test_snapshot_uses_front_end_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let posts = dir.path().join("posts");
    let output = dir.path().join("index.json");
    write_sample_posts(&posts);
    run_build(&posts, &output, base_time()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(raw["version"], "1.0.0");
    assert!(raw["lastUpdated"].is_string());
    let first = &raw["posts"][0];
    assert_eq!(first["slug"], "intro-to-react-hooks");
    assert!(first["content"].is_string());
    assert!(first["readingTime"].is_u64());
}

#[test]
fn test_fingerprint_tracks_content_changes() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_posts(dir.path());
    let source = DirectorySource::new(dir.path());

    let a = build_index(&source, base_time()).unwrap();
    let b = build_index(&source, base_time()).unwrap();
    assert_eq!(corpus_fingerprint(&a), corpus_fingerprint(&b));

    std::fs::remove_file(dir.path().join("rust-ownership-basics.md")).unwrap();
    let c = build_index(&source, base_time()).unwrap();
    assert_ne!(corpus_fingerprint(&a), corpus_fingerprint(&c));
}

#[test]
fn test_corrupt_snapshot_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.json");
    std::fs::write(&path, "{\"posts\": [").unwrap();
    assert!(load_snapshot(&path).is_none());
}
