//! Path resolution
//!
//! Decides, for an incoming request path, whether to render a document, list a
//! directory or give up with a not-found. Every decision is made from a fresh
//! look at the content store; nothing is remembered between requests.

mod key;
mod layout;
mod listing;
#[cfg(test)]
pub mod memory;
mod options;
mod store;

pub use key::ContentKey;
pub use layout::RuleTable;
pub use listing::{ExclusionSet, Listing, ListingEntry};
pub use options::{RenderOptions, LAYOUT, SUBTITLE, TITLE};
pub use store::{ContentStore, FsContentStore, NodeKind, StoreError};

use thiserror::Error;

use layout::apply_no_frills;
use listing::build_listing;

use crate::routing::{Landing, Section, SectionTable};

/// Resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid request path: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of resolving one request path
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Render a document with the fully merged options
    Render {
        document: ContentKey,
        options: RenderOptions,
    },
    /// Render a directory listing
    Listing {
        listing: Listing,
        options: RenderOptions,
    },
    /// Nothing at this key; the closest listable parent, if any
    NotFound {
        key: ContentKey,
        parent_listing: Option<(Listing, RenderOptions)>,
    },
}

/// Path resolver over a content store
pub struct Resolver<'a> {
    store: &'a dyn ContentStore,
    sections: &'a SectionTable,
    rules: &'a RuleTable,
    basepath: &'a str,
    sort_entries: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        sections: &'a SectionTable,
        rules: &'a RuleTable,
        basepath: &'a str,
    ) -> Self {
        Self {
            store,
            sections,
            rules,
            basepath,
            sort_entries: false,
        }
    }

    /// Sort listing entries by name instead of keeping enumeration order
    #[must_use]
    pub const fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Resolve a raw request path against per-request base options
    ///
    /// `base` is the site defaults already merged with the query overrides.
    pub fn resolve(&self, raw_path: &str, base: &RenderOptions) -> Result<Resolution, ResolveError> {
        let key = ContentKey::parse(raw_path)?;
        let Some(section) = self.sections.find(&key) else {
            return Ok(Resolution::NotFound {
                key,
                parent_listing: None,
            });
        };
        let options = base.merge(section.defaults());

        if section.is_landing(&key) {
            return self.resolve_landing(section, key, &options, base);
        }

        let options = match section.subtitle_for(&key) {
            Some(subtitle) => options.with(SUBTITLE, subtitle),
            None => options,
        };

        // A trailing separator only ever resolves against a directory
        let key = if key.has_trailing_slash() {
            if self.store.exists(&key)? == NodeKind::Directory {
                return self.resolve_directory(section, &key, &options, base);
            }
            key.as_document()
        } else {
            key
        };

        match self.store.exists(&key)? {
            NodeKind::Document => Ok(self.render(key, &options)),
            NodeKind::Directory => self.resolve_directory(section, &key, &options, base),
            NodeKind::Missing => {
                let parent_listing = self.parent_listing(section, &key, base)?;
                Ok(Resolution::NotFound {
                    key,
                    parent_listing,
                })
            }
        }
    }

    fn resolve_landing(
        &self,
        section: &Section,
        key: ContentKey,
        options: &RenderOptions,
        base: &RenderOptions,
    ) -> Result<Resolution, ResolveError> {
        match section.landing() {
            Landing::Render {
                document,
                overrides,
            } => {
                if self.store.exists(document)? != NodeKind::Document {
                    return Ok(Resolution::NotFound {
                        key,
                        parent_listing: None,
                    });
                }
                Ok(self.render(document.clone(), &options.merge(overrides)))
            }
            Landing::Listing => {
                let directory = key.as_directory();
                if self.store.exists(&directory)? != NodeKind::Directory {
                    return Ok(Resolution::NotFound {
                        key,
                        parent_listing: None,
                    });
                }
                let (listing, options) =
                    self.listing(section.landing_exclusions(), &directory, base)?;
                Ok(Resolution::Listing { listing, options })
            }
            Landing::NotFound => Ok(Resolution::NotFound {
                key,
                parent_listing: None,
            }),
        }
    }

    /// Directory inside a section: its `index` document, else a listing
    fn resolve_directory(
        &self,
        section: &Section,
        directory: &ContentKey,
        options: &RenderOptions,
        base: &RenderOptions,
    ) -> Result<Resolution, ResolveError> {
        let index = directory.join("index");
        if self.store.exists(&index)? == NodeKind::Document {
            return Ok(self.render(index, options));
        }
        let (listing, options) =
            self.listing(section.exclusions(), &directory.as_directory(), base)?;
        Ok(Resolution::Listing { listing, options })
    }

    fn render(&self, document: ContentKey, options: &RenderOptions) -> Resolution {
        let options = self.rules.apply(document.as_str(), options);
        Resolution::Render { document, options }
    }

    fn listing(
        &self,
        exclusions: &ExclusionSet,
        directory: &ContentKey,
        base: &RenderOptions,
    ) -> Result<(Listing, RenderOptions), ResolveError> {
        let listing = build_listing(
            self.store,
            directory,
            self.basepath,
            exclusions,
            self.sort_entries,
        )?;
        let options = apply_no_frills(base.clone().with(SUBTITLE, listing.subtitle()));
        Ok((listing, options))
    }

    /// Listing of the parent of a missing key, kept inside the section
    fn parent_listing(
        &self,
        section: &Section,
        key: &ContentKey,
        base: &RenderOptions,
    ) -> Result<Option<(Listing, RenderOptions)>, ResolveError> {
        let Some(section_dir) = section.path_match().base() else {
            return Ok(None);
        };
        let Some(parent) = key.parent() else {
            return Ok(None);
        };
        if !parent.is_within(section_dir) || self.store.exists(&parent)? != NodeKind::Directory {
            return Ok(None);
        }
        self.listing(section.exclusions(), &parent, base).map(Some)
    }
}
