//! Building an index from a posts directory.

use super::common::{base_time, raw_post, write_posts, write_sample_posts};
use lectern::build::{build_index, DirectorySource};

#[test]
fn test_builds_every_post_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_posts(dir.path());

    let index = build_index(&DirectorySource::new(dir.path()), base_time()).unwrap();
    let ids: Vec<&str> = index.documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "intro-to-react-hooks",
            "rust-ownership-basics",
            "typescript-generics-deep-dive"
        ],
        "notes.txt is not a post and posts are ordered by creation date"
    );
    assert_eq!(index.built_at, base_time());
    assert_eq!(index.schema_version, "1.0.0");
}

#[test]
fn test_markup_is_stripped_from_body() {
    let dir = tempfile::tempdir().unwrap();
    write_sample_posts(dir.path());

    let index = build_index(&DirectorySource::new(dir.path()), base_time()).unwrap();
    let react = index.get("intro-to-react-hooks").unwrap();
    assert_eq!(
        react.body_text,
        "Hooks Hooks let you use state in function components."
    );
    assert_eq!(react.url, "/blog/intro-to-react-hooks");
    assert_eq!(react.reading_time_minutes, 1);
    assert_eq!(react.tags, vec!["react", "js"]);
}

#[test]
fn test_broken_posts_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_posts(
        dir.path(),
        &[
            ("good.md", raw_post("Good", &["ok"], "2024-01-02", "Fine.")),
            ("unterminated.md", "---\ntitle: Oops\nno closing fence".to_string()),
            ("bad-date.md", raw_post("Bad", &[], "not a date", "Body.")),
        ],
    );

    let index = build_index(&DirectorySource::new(dir.path()), base_time()).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.documents[0].id, "good");
}

#[test]
fn test_post_without_front_matter_uses_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    write_posts(dir.path(), &[("bare-notes.mdx", "Just some words.".to_string())]);

    let index = build_index(&DirectorySource::new(dir.path()), base_time()).unwrap();
    let doc = &index.documents[0];
    assert_eq!(doc.title, "bare-notes");
    assert_eq!(doc.created_at, base_time());
    assert_eq!(doc.updated_at, doc.created_at);
    assert!(doc.tags.is_empty());
}

#[test]
fn test_missing_directory_builds_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = build_index(&DirectorySource::new(dir.path().join("nope")), base_time()).unwrap();
    assert!(index.is_empty());
}
