//! Content key normalization
//!
//! Turns a raw request path into the relative key used against the content store.
//! Query strings and fragments never survive into a key.

use std::fmt;

use percent_encoding::percent_decode_str;

use super::ResolveError;

/// Suffix stripped from the last path segment (`/controls/dropdown.html` -> `controls/dropdown`)
pub const DOCUMENT_SUFFIX: &str = ".html";

/// Normalized relative content path
///
/// Segments are joined with `/`, never contain `..`, and carry no leading slash.
/// A trailing separator on the request is remembered because it changes how the
/// key is resolved (directory-only lookup).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    path: String,
    trailing_slash: bool,
}

impl ContentKey {
    /// Normalize a raw request path (may include a query string)
    ///
    /// # Examples
    /// ```text
    /// "/controls/dropdown.html?theme=dark" -> "controls/dropdown"
    /// "/tests/"                            -> "tests/"  (directory form)
    /// "/"                                  -> ""        (root, directory form)
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(path)
            .decode_utf8()
            .map_err(|_| ResolveError::InvalidPath(raw.to_string()))?;

        let mut segments = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(ResolveError::InvalidPath(raw.to_string())),
                s if s.contains(['\\', '\0']) => {
                    return Err(ResolveError::InvalidPath(raw.to_string()));
                }
                s => segments.push(s),
            }
        }

        let mut path = segments.join("/");
        let trailing_slash = path.is_empty() || decoded.ends_with('/');
        if !trailing_slash {
            if let Some(stripped) = path.strip_suffix(DOCUMENT_SUFFIX) {
                if !stripped.is_empty() && !stripped.ends_with('/') {
                    path.truncate(stripped.len());
                }
            }
        }

        Ok(Self {
            path,
            trailing_slash,
        })
    }

    /// The store root
    pub const fn root() -> Self {
        Self {
            path: String::new(),
            trailing_slash: true,
        }
    }

    /// Key without its trailing separator
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub const fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// Last path segment (empty for the root)
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Child key for a single directory entry name
    pub fn join(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.path)
        };
        Self {
            path,
            trailing_slash: false,
        }
    }

    /// Same key, forced to the directory form
    pub fn as_directory(&self) -> Self {
        Self {
            path: self.path.clone(),
            trailing_slash: true,
        }
    }

    /// Same key, forced to the document form
    pub fn as_document(&self) -> Self {
        Self {
            path: self.path.clone(),
            trailing_slash: self.path.is_empty(),
        }
    }

    /// Parent directory (directory form), `None` for the root
    pub fn parent(&self) -> Option<Self> {
        if self.path.is_empty() {
            return None;
        }
        let parent = match self.path.rfind('/') {
            Some(idx) => self.path[..idx].to_string(),
            None => String::new(),
        };
        Some(Self {
            path: parent,
            trailing_slash: true,
        })
    }

    /// Whether this key is `dir` itself or lives below it
    pub fn is_within(&self, dir: &str) -> bool {
        dir.is_empty()
            || self.path == dir
            || self
                .path
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.trailing_slash && !self.path.is_empty() {
            write!(f, "{}/", self.path)
        } else {
            f.write_str(&self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_query_and_suffix() {
        let key = ContentKey::parse("/controls/dropdown.html?theme=dark&locale=ar-SA").unwrap();
        assert_eq!(key.as_str(), "controls/dropdown");
        assert!(!key.has_trailing_slash());

        let key = ContentKey::parse("/controls/dropdown?x=/tests/").unwrap();
        assert_eq!(key.as_str(), "controls/dropdown");
        assert!(!key.has_trailing_slash());
    }

    #[test]
    fn test_trailing_slash_is_kept() {
        let key = ContentKey::parse("/tests/").unwrap();
        assert_eq!(key.as_str(), "tests");
        assert!(key.has_trailing_slash());
        assert_eq!(key.to_string(), "tests/");

        let root = ContentKey::parse("/").unwrap();
        assert!(root.is_root());
        assert!(root.has_trailing_slash());
        assert_eq!(root, ContentKey::root());
    }

    #[test]
    fn test_collapses_empty_segments() {
        let key = ContentKey::parse("//tests//./datagrid/").unwrap();
        assert_eq!(key.as_str(), "tests/datagrid");
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(ContentKey::parse("/tests/../../etc/passwd").is_err());
        assert!(ContentKey::parse("/tests/%2e%2e/secret").is_err());
        assert!(ContentKey::parse("/tests/a%5Cb").is_err());
    }

    #[test]
    fn test_percent_decoding() {
        let key = ContentKey::parse("/tests/my%20page").unwrap();
        assert_eq!(key.as_str(), "tests/my page");
    }

    #[test]
    fn test_suffix_only_on_documents() {
        // A directory named like a document keeps its name
        let key = ContentKey::parse("/tests/odd.html/").unwrap();
        assert_eq!(key.as_str(), "tests/odd.html");
        let key = ContentKey::parse("/.html").unwrap();
        assert_eq!(key.as_str(), ".html");
    }

    #[test]
    fn test_join_and_parent() {
        let dir = ContentKey::parse("/tests/").unwrap();
        let child = dir.join("index");
        assert_eq!(child.as_str(), "tests/index");
        assert_eq!(child.name(), "index");
        assert_eq!(child.parent().unwrap(), dir);
        assert_eq!(dir.parent().unwrap(), ContentKey::root());
        assert!(ContentKey::root().parent().is_none());
        assert_eq!(ContentKey::root().join("index").as_str(), "index");
    }

    #[test]
    fn test_is_within() {
        let key = ContentKey::parse("/tests/applicationmenu/site").unwrap();
        assert!(key.is_within("tests"));
        assert!(key.is_within(""));
        assert!(!key.is_within("test"));
        assert!(ContentKey::parse("/tests").unwrap().is_within("tests"));
    }
}
