//! Content store
//!
//! The resolver only ever asks three questions of the page templates:
//! what a key is, what a directory contains, and what a template says.
//! Every call is a fresh read; nothing is cached between requests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::key::{ContentKey, DOCUMENT_SUFFIX};

/// Kind of a content node, decided from the store snapshot at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Directory,
    Missing,
}

/// Content store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content not found: {0}")]
    NotFound(String),
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read access to the page templates
pub trait ContentStore: Send + Sync {
    /// Classify a key
    ///
    /// A key in directory form (trailing separator) only ever matches a directory.
    /// Otherwise a document wins over a directory of the same name.
    fn exists(&self, key: &ContentKey) -> Result<NodeKind, StoreError>;

    /// Entry names of a directory, in enumeration order
    fn list_entries(&self, key: &ContentKey) -> Result<Vec<String>, StoreError>;

    /// Raw template text of a document
    fn read_template(&self, key: &ContentKey) -> Result<String, StoreError>;
}

/// Content store backed by a views directory on disk
///
/// Document `tests/datagrid` lives at `<root>/tests/datagrid.html`.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn directory_path(&self, key: &ContentKey) -> PathBuf {
        if key.is_root() {
            self.root.clone()
        } else {
            self.root.join(key.as_str())
        }
    }

    fn document_path(&self, key: &ContentKey) -> PathBuf {
        self.root.join(format!("{}{DOCUMENT_SUFFIX}", key.as_str()))
    }
}

/// `stat` that treats a missing path as `None` instead of an error
fn stat(path: &Path) -> Result<Option<fs::Metadata>, StoreError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl ContentStore for FsContentStore {
    fn exists(&self, key: &ContentKey) -> Result<NodeKind, StoreError> {
        let is_dir = |key: &ContentKey| -> Result<bool, StoreError> {
            Ok(stat(&self.directory_path(key))?.is_some_and(|m| m.is_dir()))
        };

        if key.has_trailing_slash() {
            return Ok(if is_dir(key)? {
                NodeKind::Directory
            } else {
                NodeKind::Missing
            });
        }

        if stat(&self.document_path(key))?.is_some_and(|m| m.is_file()) {
            return Ok(NodeKind::Document);
        }
        if is_dir(key)? {
            return Ok(NodeKind::Directory);
        }
        Ok(NodeKind::Missing)
    }

    fn list_entries(&self, key: &ContentKey) -> Result<Vec<String>, StoreError> {
        let path = self.directory_path(key);
        let read_dir = fs::read_dir(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let mut names = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn read_template(&self, key: &ContentKey) -> Result<String, StoreError> {
        let path = self.document_path(key);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => {
                StoreError::NotFound(key.as_str().to_string())
            }
            _ => StoreError::Io { path, source },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn key(raw: &str) -> ContentKey {
        ContentKey::parse(raw).unwrap()
    }

    fn views() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("tests/datagrid")).unwrap();
        fs::create_dir_all(root.join("controls")).unwrap();
        fs::write(root.join("index.html"), "<h1>{{title}}</h1>").unwrap();
        fs::write(root.join("controls/dropdown.html"), "dropdown").unwrap();
        fs::write(root.join("tests/datagrid/example-index.html"), "grid").unwrap();
        fs::write(root.join("tests/datagrid.html"), "shadowed").unwrap();
        dir
    }

    #[test]
    fn test_classify() {
        let dir = views();
        let store = FsContentStore::new(dir.path());

        assert_eq!(store.exists(&key("/controls/dropdown")).unwrap(), NodeKind::Document);
        assert_eq!(store.exists(&key("/controls")).unwrap(), NodeKind::Directory);
        assert_eq!(store.exists(&key("/controls/")).unwrap(), NodeKind::Directory);
        assert_eq!(store.exists(&key("/controls/nope")).unwrap(), NodeKind::Missing);
        assert_eq!(store.exists(&ContentKey::root()).unwrap(), NodeKind::Directory);
    }

    #[test]
    fn test_directory_form_ignores_documents() {
        let dir = views();
        let store = FsContentStore::new(dir.path());

        // Both tests/datagrid.html and tests/datagrid/ exist
        assert_eq!(store.exists(&key("/tests/datagrid")).unwrap(), NodeKind::Document);
        assert_eq!(store.exists(&key("/tests/datagrid/")).unwrap(), NodeKind::Directory);
        assert_eq!(store.exists(&key("/controls/dropdown/")).unwrap(), NodeKind::Missing);
    }

    #[test]
    fn test_list_and_read() {
        let dir = views();
        let store = FsContentStore::new(dir.path());

        let mut names = store.list_entries(&key("/tests/")).unwrap();
        names.sort();
        assert_eq!(names, vec!["datagrid", "datagrid.html"]);

        assert_eq!(store.read_template(&key("/controls/dropdown")).unwrap(), "dropdown");
        assert!(matches!(
            store.read_template(&key("/controls/missing")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.list_entries(&key("/nowhere/")),
            Err(StoreError::NotFound(_))
        ));
    }
}
