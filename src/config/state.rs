// Application state module
// Everything a request needs, built once at startup and shared read-only

use std::sync::Arc;

use thiserror::Error;

use super::types::Config;
use crate::api::{FixtureProvider, FsFixtures};
use crate::render::{TemplateRenderer, ViewRenderer};
use crate::resolve::{ContentStore, ExclusionSet, FsContentStore, RenderOptions, RuleTable};
use crate::routing::SectionTable;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid listing exclude pattern: {0}")]
    Exclusions(#[source] regex::Error),
    #[error("invalid routing pattern: {0}")]
    Routing(#[source] regex::Error),
}

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ContentStore>,
    pub renderer: Arc<dyn TemplateRenderer>,
    pub fixtures: Arc<dyn FixtureProvider>,
    /// Site defaults every request's options start from
    pub defaults: RenderOptions,
    pub sections: SectionTable,
    pub rules: RuleTable,
}

impl AppState {
    /// State over the configured views and data directories
    pub fn new(config: &Config) -> Result<Self, StateError> {
        let store: Arc<dyn ContentStore> = Arc::new(FsContentStore::new(&config.site.views_dir));
        let fixtures = Arc::new(FsFixtures::new(&config.site.data_dir));
        Self::with_parts(config, store, fixtures)
    }

    /// State over explicit content and fixture sources
    pub fn with_parts(
        config: &Config,
        store: Arc<dyn ContentStore>,
        fixtures: Arc<dyn FixtureProvider>,
    ) -> Result<Self, StateError> {
        let exclusions =
            ExclusionSet::new(&config.listing.excludes).map_err(StateError::Exclusions)?;
        let sections = SectionTable::builtin(&exclusions).map_err(StateError::Routing)?;
        let rules = RuleTable::builtin().map_err(StateError::Routing)?;

        Ok(Self {
            config: config.clone(),
            renderer: Arc::new(ViewRenderer::new(Arc::clone(&store))),
            store,
            fixtures,
            defaults: RenderOptions::from_site(&config.site),
            sections,
            rules,
        })
    }
}
