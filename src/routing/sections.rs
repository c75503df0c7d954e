//! Site sections
//!
//! Each top-level area of the demo site (controls, tests, docs, ...) carries its
//! own default layout and subtitle, and decides what a bare request for the
//! section itself (`/tests`, `/docs/`) turns into.

use serde_json::Value;

use crate::resolve::{ContentKey, ExclusionSet, RenderOptions, LAYOUT, SUBTITLE, TITLE};

use super::matcher::{match_section, PathMatch};

/// What a request for the section itself resolves to
#[derive(Debug, Clone)]
pub enum Landing {
    /// Render a fixed document, with extra options on top of the section defaults
    Render {
        document: ContentKey,
        overrides: RenderOptions,
    },
    /// List the section directory
    Listing,
    NotFound,
}

impl Landing {
    fn render(document: &str) -> Self {
        Self::Render {
            document: ContentKey::root().join(document),
            overrides: RenderOptions::new(),
        }
    }

    fn render_with(document: &str, overrides: RenderOptions) -> Self {
        Self::Render {
            document: ContentKey::root().join(document),
            overrides,
        }
    }
}

/// One entry of the section table
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    path_match: PathMatch,
    defaults: RenderOptions,
    landing: Landing,
    subtitle_from_name: bool,
    exclusions: ExclusionSet,
    /// Replaces `exclusions` for the listing of the section itself
    landing_exclusions: Option<ExclusionSet>,
}

impl Section {
    pub fn new(name: &str, path_match: PathMatch, exclusions: &ExclusionSet) -> Self {
        Self {
            name: name.to_string(),
            path_match,
            defaults: RenderOptions::new(),
            landing: Landing::Listing,
            subtitle_from_name: false,
            exclusions: exclusions.clone(),
            landing_exclusions: None,
        }
    }

    /// Section rooted at the directory of the same name
    fn directory(name: &str, exclusions: &ExclusionSet) -> Self {
        Self::new(name, PathMatch::Prefix(name.to_string()), exclusions)
    }

    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.set(key, value);
        self
    }

    /// Shorthand for the usual layout + subtitle pair
    #[must_use]
    pub fn with_layout(self, layout: &str, subtitle: &str) -> Self {
        self.with_option(LAYOUT, layout).with_option(SUBTITLE, subtitle)
    }

    #[must_use]
    pub fn with_landing(mut self, landing: Landing) -> Self {
        self.landing = landing;
        self
    }

    #[must_use]
    pub const fn with_subtitle_from_name(mut self) -> Self {
        self.subtitle_from_name = true;
        self
    }

    #[must_use]
    pub fn with_landing_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.landing_exclusions = Some(exclusions);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn path_match(&self) -> &PathMatch {
        &self.path_match
    }

    pub const fn defaults(&self) -> &RenderOptions {
        &self.defaults
    }

    pub const fn landing(&self) -> &Landing {
        &self.landing
    }

    pub const fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn landing_exclusions(&self) -> &ExclusionSet {
        self.landing_exclusions.as_ref().unwrap_or(&self.exclusions)
    }

    /// Whether `key` names the section itself rather than something inside it
    pub fn is_landing(&self, key: &ContentKey) -> bool {
        self.path_match.remainder(key).is_empty()
    }

    /// Subtitle derived from the page name, when this section does that
    pub fn subtitle_for(&self, key: &ContentKey) -> Option<String> {
        self.subtitle_from_name.then(|| control_subtitle(key.name()))
    }
}

/// Page subtitle for a control name
///
/// ```text
/// "dropdown"              -> "Dropdown"
/// "date-picker"           -> "Date picker"
/// "contextualactionpanel" -> "Contextual Action Panel"
/// ```
pub fn control_subtitle(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let subtitle = format!("{}{}", first.to_uppercase(), chars.as_str().replacen('-', " ", 1));
    subtitle.replace("Contextualactionpanel", "Contextual Action Panel")
}

/// Ordered section table, read-only after startup
#[derive(Debug, Clone, Default)]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    pub const fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Sections of the demo site; `exclusions` applies to every listing
    pub fn builtin(exclusions: &ExclusionSet) -> Result<Self, regex::Error> {
        let dir = |name: &str| Section::directory(name, exclusions);

        Ok(Self::new(vec![
            Section::new("index", PathMatch::Exact(String::new()), exclusions)
                .with_landing(Landing::render("index")),
            dir("partials")
                .with_option(LAYOUT, "")
                .with_option(TITLE, "")
                .with_option("enableLiveReload", false)
                .with_landing(Landing::NotFound),
            dir("controls")
                .with_layout("controls/layout", "Style")
                .with_subtitle_from_name()
                .with_landing(Landing::render_with(
                    "controls/index",
                    RenderOptions::new().with(SUBTITLE, "Full Index"),
                )),
            dir("patterns")
                .with_layout("patterns/layout", "Patterns")
                .with_landing_exclusions(
                    exclusions.with_names(&["step-process.html", "step-process-markup.html"])?,
                ),
            dir("tests").with_layout("tests/layout", "Tests"),
            dir("docs")
                .with_layout("includes/docs-layout", "SoHo Xi Docs")
                .with_landing(Landing::render("docs/index")),
            dir("soho-site")
                .with_layout("soho-site/layout", "Soho Site")
                .with_landing(Landing::render("soho-site/index")),
            dir("layouts")
                .with_layout("layouts/layout", "Layouts")
                .with_landing(Landing::render("layouts/index")),
            dir("examples").with_layout("examples/layout", "Examples"),
            dir("performance-tests")
                .with_option(SUBTITLE, "Performance Tests")
                .with_landing(Landing::render("performance-tests/index")),
            dir("angular").with_layout("angular/layout", "Angular"),
            dir("react").with_layout("react/layout", "React"),
            dir("knockout").with_layout("knockout/layout", "Knockout"),
        ]))
    }

    /// First section claiming `key`
    pub fn find(&self, key: &ContentKey) -> Option<&Section> {
        match_section(key, &self.sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SectionTable {
        let exclusions = ExclusionSet::new([r"^layout.*\.html$", r"^footer\.html$"]).unwrap();
        SectionTable::builtin(&exclusions).unwrap()
    }

    fn key(raw: &str) -> ContentKey {
        ContentKey::parse(raw).unwrap()
    }

    #[test]
    fn test_control_subtitle() {
        assert_eq!(control_subtitle("dropdown"), "Dropdown");
        assert_eq!(control_subtitle("date-picker-range"), "Date picker-range");
        assert_eq!(control_subtitle("contextualactionpanel"), "Contextual Action Panel");
        assert_eq!(control_subtitle(""), "");
    }

    #[test]
    fn test_find_section() {
        let table = table();
        assert_eq!(table.find(&key("/")).map(Section::name), Some("index"));
        assert_eq!(table.find(&key("/controls/dropdown")).map(Section::name), Some("controls"));
        assert_eq!(table.find(&key("/tests/")).map(Section::name), Some("tests"));
        assert_eq!(
            table.find(&key("/performance-tests")).map(Section::name),
            Some("performance-tests")
        );
        assert!(table.find(&key("/nowhere/page")).is_none());
        assert!(table.find(&key("/index")).is_none());
    }

    #[test]
    fn test_landing() {
        let table = table();
        let tests = table.find(&key("/tests")).unwrap();
        assert!(tests.is_landing(&key("/tests")));
        assert!(tests.is_landing(&key("/tests/")));
        assert!(!tests.is_landing(&key("/tests/datagrid")));
        assert!(matches!(tests.landing(), Landing::Listing));

        let controls = table.find(&key("/controls/")).unwrap();
        match controls.landing() {
            Landing::Render { document, overrides } => {
                assert_eq!(document.as_str(), "controls/index");
                assert_eq!(overrides.get_str(SUBTITLE), Some("Full Index"));
            }
            other => panic!("unexpected landing {other:?}"),
        }
    }

    #[test]
    fn test_pattern_landing_excludes_step_process() {
        let table = table();
        let patterns = table.find(&key("/patterns/")).unwrap();
        assert!(patterns.landing_exclusions().is_excluded("step-process.html"));
        assert!(patterns.landing_exclusions().is_excluded("layout.html"));
        assert!(!patterns.exclusions().is_excluded("step-process.html"));
        assert!(patterns.exclusions().is_excluded("layout.html"));

        let tests = table.find(&key("/tests/")).unwrap();
        assert!(!tests.landing_exclusions().is_excluded("step-process.html"));
    }

    #[test]
    fn test_subtitle_only_for_controls() {
        let table = table();
        let controls = table.find(&key("/controls/dropdown")).unwrap();
        assert_eq!(controls.subtitle_for(&key("/controls/dropdown")).as_deref(), Some("Dropdown"));

        let tests = table.find(&key("/tests/dropdown")).unwrap();
        assert_eq!(tests.subtitle_for(&key("/tests/dropdown")), None);
    }
}
