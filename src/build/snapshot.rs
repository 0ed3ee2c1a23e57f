// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! JSON snapshot of a built index, for fast cold starts.
//!
//! Loading never fails: a missing or corrupt snapshot is `None`, and the
//! caller rebuilds from source. Saving writes a sibling temp file and renames
//! it over the target, so readers see the old snapshot or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::PersistError;
use crate::types::SearchIndex;

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents` in one rename, creating parent directories.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| PersistError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let temp = temp_sibling(path);
    let written = fs::write(&temp, contents).and_then(|()| fs::rename(&temp, path));
    written.map_err(|source| {
        let _ = fs::remove_file(&temp);
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write `index` as pretty JSON.
pub fn save_snapshot(index: &SearchIndex, path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(index)?;
    write_atomically(path, json.as_bytes())?;

    info!(path = %path.display(), documents = index.len(), "search index saved");
    Ok(())
}

/// CRC32 over every document's id and timestamps, in index order.
///
/// Two indexes built from the same posts have the same fingerprint, so it
/// doubles as an ETag seed and a cheap "did anything change" check.
pub fn corpus_fingerprint(index: &SearchIndex) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for doc in &index.documents {
        hasher.update(doc.id.as_bytes());
        hasher.update(&doc.created_at.timestamp_millis().to_le_bytes());
        hasher.update(&doc.updated_at.timestamp_millis().to_le_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Read a snapshot. `None` if it is missing or cannot be parsed.
pub fn load_snapshot(path: &Path) -> Option<SearchIndex> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "search index not found");
            return None;
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read search index");
            return None;
        }
    };

    match serde_json::from_str::<SearchIndex>(&raw) {
        Ok(index) => Some(index),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse search index");
            None
        }
    }
}
