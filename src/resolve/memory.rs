//! In-memory content store for tests
//!
//! Entries keep insertion order so listings are deterministic.

use super::key::{ContentKey, DOCUMENT_SUFFIX};
use super::store::{ContentStore, NodeKind, StoreError};

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    /// (relative path, template body); directories have no body
    entries: Vec<(String, Option<String>)>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document; `key` is given without the `.html` suffix
    pub fn with_document(self, key: &str, body: &str) -> Self {
        self.with_file(&format!("{key}{DOCUMENT_SUFFIX}"), body)
    }

    /// Add a raw file (e.g. `.DS_Store`), parents are created
    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.add_parents(path);
        self.entries.push((path.to_string(), Some(body.to_string())));
        self
    }

    pub fn with_directory(mut self, path: &str) -> Self {
        self.add_parents(path);
        if !self.has_directory(path) {
            self.entries.push((path.to_string(), None));
        }
        self
    }

    fn add_parents(&mut self, path: &str) {
        let mut parent = String::new();
        let segments: Vec<&str> = path.split('/').collect();
        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !parent.is_empty() {
                parent.push('/');
            }
            parent.push_str(segment);
            if !self.has_directory(&parent) {
                self.entries.push((parent.clone(), None));
            }
        }
    }

    fn has_directory(&self, path: &str) -> bool {
        path.is_empty()
            || self
                .entries
                .iter()
                .any(|(p, body)| body.is_none() && p == path)
    }

    fn file(&self, path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, body)| body.is_some() && p == path)
            .and_then(|(_, body)| body.as_deref())
    }
}

impl ContentStore for MemoryContentStore {
    fn exists(&self, key: &ContentKey) -> Result<NodeKind, StoreError> {
        let path = key.as_str();
        if key.has_trailing_slash() {
            return Ok(if self.has_directory(path) {
                NodeKind::Directory
            } else {
                NodeKind::Missing
            });
        }
        if self.file(&format!("{path}{DOCUMENT_SUFFIX}")).is_some() {
            Ok(NodeKind::Document)
        } else if self.has_directory(path) {
            Ok(NodeKind::Directory)
        } else {
            Ok(NodeKind::Missing)
        }
    }

    fn list_entries(&self, key: &ContentKey) -> Result<Vec<String>, StoreError> {
        let dir = key.as_str();
        if !self.has_directory(dir) {
            return Err(StoreError::NotFound(key.to_string()));
        }
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        Ok(self
            .entries
            .iter()
            .filter_map(|(p, _)| p.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(ToString::to_string)
            .collect())
    }

    fn read_template(&self, key: &ContentKey) -> Result<String, StoreError> {
        self.file(&format!("{}{DOCUMENT_SUFFIX}", key.as_str()))
            .map(ToString::to_string)
            .ok_or_else(|| StoreError::NotFound(key.as_str().to_string()))
    }
}
