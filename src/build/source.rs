// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Where raw posts come from.
//!
//! The index builder only needs two things from the content side: the list
//! of post ids and the raw text of one post. [`DirectorySource`] reads a
//! folder of `.mdx`/`.md` files; [`MemorySource`] holds posts in memory for
//! tests and embedding.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{ExtractError, SourceError};

/// Recognized post extensions, in lookup order.
pub const POST_EXTENSIONS: [&str; 2] = ["mdx", "md"];

pub trait ContentSource: Send + Sync {
    /// All document ids, in a stable order.
    fn list_document_ids(&self) -> Result<Vec<String>, SourceError>;

    /// Raw text (front matter + body) of one document.
    fn read_document(&self, id: &str) -> Result<String, ExtractError>;
}

/// A directory of posts named `{slug}.mdx` or `{slug}.md`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for DirectorySource {
    fn list_document_ids(&self) -> Result<Vec<String>, SourceError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.root.display(), "posts directory not found");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(SourceError::List {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let ext = path.extension()?.to_str()?.to_ascii_lowercase();
                if !POST_EXTENSIONS.contains(&ext.as_str()) {
                    return None;
                }
                path.file_stem()?.to_str().map(str::to_string)
            })
            .collect();

        // read_dir order is filesystem-dependent
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn read_document(&self, id: &str) -> Result<String, ExtractError> {
        for ext in POST_EXTENSIONS {
            let path = self.root.join(format!("{}.{}", id, ext));
            match fs::read_to_string(&path) {
                Ok(raw) => return Ok(raw),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(ExtractError::Io {
                        id: id.to_string(),
                        source,
                    })
                }
            }
        }
        Err(ExtractError::NotFound(id.to_string()))
    }
}

/// Posts held in memory, enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<(String, String)>,
}

impl MemorySource {
    pub fn new<I, K, V>(documents: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            documents: documents
                .into_iter()
                .map(|(id, raw)| (id.into(), raw.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, raw: impl Into<String>) {
        let id = id.into();
        let raw = raw.into();
        match self.documents.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = raw,
            None => self.documents.push((id, raw)),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.documents.retain(|(existing, _)| existing != id);
    }
}

impl ContentSource for MemorySource {
    fn list_document_ids(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.documents.iter().map(|(id, _)| id.clone()).collect())
    }

    fn read_document(&self, id: &str) -> Result<String, ExtractError> {
        self.documents
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| ExtractError::NotFound(id.to_string()))
    }
}
