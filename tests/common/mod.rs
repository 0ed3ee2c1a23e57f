//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use lectern::build::{ContentSource, MemorySource};
use lectern::clock::ManualClock;
use lectern::config::Config;
use lectern::error::{ExtractError, SourceError};
use lectern::service::SearchService;

// Re-export canonical test utilities from lectern::testing
pub use lectern::testing::{base_time, make_doc, make_index, manual_clock, raw_post, sample_source};

/// Write `(file name, contents)` pairs into `dir`.
pub fn write_posts(dir: &Path, posts: &[(&str, String)]) {
    fs::create_dir_all(dir).expect("create posts dir");
    for (name, raw) in posts {
        fs::write(dir.join(name), raw).expect("write post");
    }
}

/// The sample corpus as `.mdx` files, plus one file that is not a post.
pub fn write_sample_posts(dir: &Path) {
    write_posts(
        dir,
        &[
            (
                "intro-to-react-hooks.mdx",
                raw_post(
                    "Intro to React Hooks",
                    &["react", "js"],
                    "2024-03-01",
                    "# Hooks\n\nHooks let you use **state** in function components.",
                ),
            ),
            (
                "rust-ownership-basics.md",
                raw_post(
                    "Rust Ownership Basics",
                    &["rust"],
                    "2024-02-01",
                    "Every value has a single *owner*.",
                ),
            ),
            (
                "typescript-generics-deep-dive.mdx",
                raw_post(
                    "TypeScript Generics Deep Dive",
                    &["typescript", "ts"],
                    "2024-01-15",
                    "Generics let a function work over many types.",
                ),
            ),
        ],
    );
    fs::write(dir.join("notes.txt"), "not a post").expect("write stray file");
}

/// A content source whose posts and failure mode can change mid-test.
#[derive(Default)]
pub struct SwitchableSource {
    inner: Mutex<MemorySource>,
    failing: AtomicBool,
}

impl SwitchableSource {
    pub fn new(inner: MemorySource) -> Self {
        Self {
            inner: Mutex::new(inner),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn insert(&self, id: &str, raw: String) {
        self.inner.lock().insert(id, raw);
    }
}

impl ContentSource for SwitchableSource {
    fn list_document_ids(&self) -> Result<Vec<String>, SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("content store offline".into()));
        }
        self.inner.lock().list_document_ids()
    }

    fn read_document(&self, id: &str) -> Result<String, ExtractError> {
        self.inner.lock().read_document(id)
    }
}

/// Config with snapshots disabled, or pointed at `snapshot`.
pub fn test_config(snapshot: Option<PathBuf>) -> Config {
    let mut config = Config::default();
    config.index.snapshot_path = snapshot;
    config
}

/// A service over the sample corpus on a manual clock.
pub fn sample_service() -> (Arc<SearchService>, Arc<ManualClock>) {
    let clock = manual_clock();
    let service = SearchService::new(Arc::new(sample_source()), test_config(None), clock.clone());
    (Arc::new(service), clock)
}
