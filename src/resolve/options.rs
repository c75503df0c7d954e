//! Render options
//!
//! A flat key/value bag handed to the template renderer. Options are never shared
//! mutably: each request builds its own by merging layers left to right, and the
//! last layer to set a key wins.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::SiteConfig;
use crate::http::QueryParams;
use crate::logger;

pub const LAYOUT: &str = "layout";
pub const SUBTITLE: &str = "subtitle";
pub const TITLE: &str = "title";
pub const NO_FRILLS: &str = "nofrillslayout";
pub const DELAY: &str = "delay";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderOptions(BTreeMap<String, Value>);

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Static site defaults every request starts from
    pub fn from_site(site: &SiteConfig) -> Self {
        Self::new()
            .with("enableLiveReload", site.live_reload)
            .with(LAYOUT, "layout")
            .with("locale", site.locale.as_str())
            .with(TITLE, site.title.as_str())
            .with("basepath", site.basepath.as_str())
            .with("version", site.version.as_str())
            .with("commit", site.commit.as_str())
            .with("theme", site.theme.as_str())
    }

    /// Per-request overrides taken from the query string
    ///
    /// Empty values are ignored, and so is a `delay` that is not a number.
    pub fn from_query(query: &QueryParams) -> Self {
        let mut options = Self::new().with("inlineSVG", true);

        if let Some(locale) = query.get_non_empty("locale") {
            logger::log_debug(&format!("Changing route parameter \"locale\" to \"{locale}\""));
            options.set("locale", locale);
        }
        if query.get_non_empty("nofrills").is_some() {
            logger::log_debug("\"No-frills\" layout active");
            options.set(NO_FRILLS, true);
        }
        if let Some(theme) = query.get_non_empty("theme") {
            logger::log_debug(&format!("Setting theme to {theme}"));
            options.set("theme", theme);
        }
        if let Some(colors) = query.get_non_empty("colors") {
            logger::log_debug(&format!("Setting colors to {colors}"));
            options.set("colors", colors);
        }
        if let Some(delay) = query.get_parsed::<u64>(DELAY) {
            options.set(DELAY, delay);
        }
        options
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// New bag with `other` layered over `self`
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &other.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// True only for an explicit boolean `true`
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// Layout template to wrap the page in; `None` renders the page bare
    pub fn layout(&self) -> Option<&str> {
        self.get_str(LAYOUT).filter(|l| !l.is_empty())
    }

    /// Injected response delay
    pub fn delay(&self) -> Option<Duration> {
        self.0
            .get(DELAY)
            .and_then(Value::as_u64)
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
