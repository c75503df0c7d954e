//! Section matching
//!
//! Sections are evaluated in table order against the normalized content key and
//! the first one that matches owns the request. Prefixes only match on whole
//! segments, so `tests` never claims `testsuite/page`.

use crate::resolve::ContentKey;

use super::sections::Section;

/// How a section claims a content key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    /// The key must equal this path
    Exact(String),
    /// The key must be this directory or live below it
    Prefix(String),
}

impl PathMatch {
    pub fn matches(&self, key: &ContentKey) -> bool {
        match self {
            Self::Exact(path) => key.as_str() == path,
            Self::Prefix(prefix) => !prefix.is_empty() && key.is_within(prefix),
        }
    }

    /// Part of the key after the matched prefix, without separators
    pub fn remainder<'a>(&self, key: &'a ContentKey) -> &'a str {
        match self {
            Self::Exact(_) => "",
            Self::Prefix(prefix) => key
                .as_str()
                .strip_prefix(prefix.as_str())
                .map_or("", |rest| rest.trim_start_matches('/')),
        }
    }

    /// Directory every key claimed by a prefix lives in
    pub fn base(&self) -> Option<&str> {
        match self {
            Self::Exact(_) => None,
            Self::Prefix(prefix) => Some(prefix),
        }
    }
}

/// Find the first section claiming `key`
pub fn match_section<'a>(key: &ContentKey, sections: &'a [Section]) -> Option<&'a Section> {
    sections.iter().find(|section| section.path_match().matches(key))
}
