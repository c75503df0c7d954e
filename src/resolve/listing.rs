//! Directory listings
//!
//! Enumerates a directory, drops entries matching the exclusion set and turns the
//! rest into link records. Entry order is the store's enumeration order unless
//! sorting is switched on.

use regex::Regex;
use serde::Serialize;

use super::key::ContentKey;
use super::store::{ContentStore, NodeKind, StoreError};

/// Name patterns hidden from listings (layout files, OS metadata, ...)
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<Regex>,
}

impl ExclusionSet {
    /// Compile a set of regex patterns
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Extend with exact file names
    pub fn with_names(&self, names: &[&str]) -> Result<Self, regex::Error> {
        let mut patterns = self.patterns.clone();
        for name in names {
            patterns.push(Regex::new(&format!("^{}$", regex::escape(name)))?);
        }
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
    }

    /// Keep only the names no pattern matches
    pub fn filter(&self, mut names: Vec<String>) -> Vec<String> {
        names.retain(|name| !self.is_excluded(name));
        names
    }
}

/// One line of a listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub href: String,
    #[serde(rename = "isDirectory")]
    pub is_directory: bool,
}

/// Listing of a single directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub directory: ContentKey,
    pub entries: Vec<ListingEntry>,
}

impl Listing {
    /// Page subtitle, e.g. `Listing for tests/`
    pub fn subtitle(&self) -> String {
        format!("Listing for {}", self.directory.as_directory())
    }
}

/// Enumerate `directory` and build its listing
pub fn build_listing(
    store: &dyn ContentStore,
    directory: &ContentKey,
    basepath: &str,
    exclusions: &ExclusionSet,
    sort_entries: bool,
) -> Result<Listing, StoreError> {
    let mut names = exclusions.filter(store.list_entries(directory)?);
    if sort_entries {
        names.sort();
    }

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let child = directory.join(&name).as_directory();
        let is_directory = store.exists(&child)? == NodeKind::Directory;
        entries.push(ListingEntry {
            href: join_href(basepath, directory.as_str(), &name, is_directory),
            name,
            is_directory,
        });
    }

    Ok(Listing {
        directory: directory.as_directory(),
        entries,
    })
}

/// Join base path, directory and entry name into a link
///
/// Backslashes become forward slashes and directories always end with `/`.
pub fn join_href(basepath: &str, directory: &str, name: &str, is_directory: bool) -> String {
    let mut href = String::from("/");
    let parts = [basepath, directory, name];
    let joined = parts
        .iter()
        .flat_map(|part| part.split(['/', '\\']))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    href.push_str(&joined);
    if is_directory && !href.ends_with('/') {
        href.push('/');
    }
    href
}
