//! Layout override rules
//!
//! An ordered table of (pattern -> overrides). Every rule whose pattern matches the
//! content key is applied in table order, so a later rule beats an earlier one.
//! The no-frills flag is applied after the whole table and always wins.

use regex::Regex;
use serde_json::Value;

use super::options::{RenderOptions, LAYOUT, NO_FRILLS, SUBTITLE};

/// Minimal layout used when `nofrills` is requested
pub const NO_FRILLS_LAYOUT: &str = "tests/layout-noheader";

/// Pattern and the options it forces
#[derive(Debug, Clone)]
pub struct RouteRule {
    pattern: Regex,
    overrides: RenderOptions,
}

impl RouteRule {
    /// Rule that only swaps the layout
    pub fn layout(pattern: &str, layout: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            overrides: RenderOptions::new().with(LAYOUT, layout),
        })
    }

    /// Rule that renders matching pages without any layout
    pub fn no_layout(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            overrides: RenderOptions::new().with(LAYOUT, Value::Null),
        })
    }

    /// Rule that leaves the layout alone
    pub fn options(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            overrides: RenderOptions::new(),
        })
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.overrides.set(key, value);
        self
    }

    pub fn matches(&self, key: &str) -> bool {
        self.pattern.is_match(key)
    }
}

/// Read-only rule table, built once at startup
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<RouteRule>,
}

impl RuleTable {
    pub const fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Layout rules for the demo pages
    pub fn builtin() -> Result<Self, regex::Error> {
        const MENU: &str = "tests/applicationmenu";

        Ok(Self::new(vec![
            RouteRule::layout(r"^controls/.*masthead", "controls/masthead-layout")?,
            // The application menu markup sits above the page content, so each
            // flavour carries its own layout. Most specific flavour last.
            RouteRule::layout(&format!("^{MENU}"), &format!("{MENU}/six-levels/layout"))?,
            RouteRule::layout(
                &format!("^{MENU}.*/six-levels-with-icons"),
                &format!("{MENU}/six-levels-with-icons/layout"),
            )?,
            RouteRule::layout(&format!("^{MENU}.*/lms"), &format!("{MENU}/lms/layout"))?,
            RouteRule::layout(
                &format!("^{MENU}.*/different-header-types"),
                &format!("{MENU}/different-header-types/layout"),
            )?,
            RouteRule::layout(
                &format!("^{MENU}.*/container"),
                &format!("{MENU}/container/layout"),
            )?,
            RouteRule::layout(&format!("^{MENU}.*/site"), &format!("{MENU}/site/layout"))?,
            RouteRule::options(r"^tests/base-tag")?.with("usebasehref", true),
            RouteRule::no_layout(r"^tests/distribution")?
                .with("amd", true)
                .with(SUBTITLE, "AMD Tests"),
            RouteRule::layout(r"^tests/header", "tests/header/layout")?,
            RouteRule::layout(r"^tests/datagrid-fixed-header", "tests/layout-noscroll")?,
            RouteRule::layout(r"^tests/masthead", "tests/masthead/layout")?,
            RouteRule::layout(
                r"^tests/place/scrolling/container-is-body",
                "tests/place/scrolling/layout-body",
            )?,
            RouteRule::layout(
                r"^tests/place/scrolling/container-is-nested",
                "tests/place/scrolling/layout-nested",
            )?,
            RouteRule::layout(r"^tests/signin", NO_FRILLS_LAYOUT)?,
            RouteRule::layout(r"^tests/tabs-module", "tests/tabs-module/layout")?,
            RouteRule::layout(r"^tests/tabs-header", "tests/tabs-header/layout")?,
            RouteRule::layout(r"^tests/tabs-vertical", "tests/tabs-vertical/layout")?,
            RouteRule::layout(r"^tests/patterns", NO_FRILLS_LAYOUT)?,
        ]))
    }

    /// Layer every matching rule over `options`, then the no-frills override
    pub fn apply(&self, key: &str, options: &RenderOptions) -> RenderOptions {
        let applied = self
            .rules
            .iter()
            .filter(|rule| rule.matches(key))
            .fold(options.clone(), |acc, rule| acc.merge(&rule.overrides));
        apply_no_frills(applied)
    }
}

/// Force the minimal layout when the request asked for it
pub fn apply_no_frills(options: RenderOptions) -> RenderOptions {
    if options.flag(NO_FRILLS) {
        options.with(LAYOUT, NO_FRILLS_LAYOUT)
    } else {
        options
    }
}
