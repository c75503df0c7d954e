//! Template rendering
//!
//! A deliberately small mustache subset, enough for the demo pages:
//! - `{{name}}` inserts the option value, HTML-escaped
//! - `{{{name}}}` inserts it raw
//! - `{{> path}}` includes another template from the views tree
//!
//! Options that are not set render as nothing. When the `layout` option names a
//! template, the page is rendered first and inserted at the layout's `{{{yield}}}`.

use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use serde_json::Value;
use thiserror::Error;

use crate::resolve::{ContentKey, ContentStore, Listing, RenderOptions, StoreError};

/// Name of the optional listing page template
pub const LISTING_TEMPLATE: &str = "listing";

const YIELD: &str = "yield";
const MAX_PARTIAL_DEPTH: usize = 8;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{\s*([\w.\-]+)\s*\}\}\}|\{\{>\s*([\w./\-]+)\s*\}\}|\{\{\s*([\w.\-]+)\s*\}\}")
        .unwrap_or_else(|e| unreachable!("template tag pattern is valid: {e}"))
});

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {0}")]
    MissingTemplate(String),
    #[error("partials nested too deeply in {0}")]
    PartialDepth(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RenderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => Self::MissingTemplate(key),
            other => Self::Store(other),
        }
    }
}

/// Turns resolved content into HTML
pub trait TemplateRenderer: Send + Sync {
    /// Render a document, wrapped in its layout
    fn render(&self, document: &ContentKey, options: &RenderOptions) -> Result<String, RenderError>;

    /// Render a directory listing page
    fn render_listing(
        &self,
        listing: &Listing,
        options: &RenderOptions,
    ) -> Result<String, RenderError>;
}

/// Renderer reading templates from a content store
pub struct ViewRenderer {
    store: Arc<dyn ContentStore>,
}

impl ViewRenderer {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    fn template(&self, name: &str) -> Result<String, RenderError> {
        let key = ContentKey::parse(name)
            .map_err(|_| RenderError::MissingTemplate(name.to_string()))?;
        Ok(self.store.read_template(&key)?)
    }

    fn expand(
        &self,
        source: &str,
        options: &RenderOptions,
        origin: &str,
        depth: usize,
    ) -> Result<String, RenderError> {
        if depth > MAX_PARTIAL_DEPTH {
            return Err(RenderError::PartialDepth(origin.to_string()));
        }

        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for caps in TAG.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&source[last..whole.start()]);
            out.push_str(&self.tag(&caps, options, origin, depth)?);
            last = whole.end();
        }
        out.push_str(&source[last..]);
        Ok(out)
    }

    fn tag(
        &self,
        caps: &Captures<'_>,
        options: &RenderOptions,
        origin: &str,
        depth: usize,
    ) -> Result<String, RenderError> {
        if let Some(name) = caps.get(1) {
            return Ok(value_text(options.get(name.as_str())));
        }
        if let Some(partial) = caps.get(2) {
            let source = self.template(partial.as_str())?;
            return self.expand(&source, options, origin, depth + 1);
        }
        Ok(caps
            .get(3)
            .map(|name| escape_html(&value_text(options.get(name.as_str()))))
            .unwrap_or_default())
    }

    fn wrap_in_layout(
        &self,
        body: String,
        options: &RenderOptions,
        origin: &str,
    ) -> Result<String, RenderError> {
        let Some(layout) = options.layout() else {
            return Ok(body);
        };
        let source = self.template(layout)?;
        let options = options.clone().with(YIELD, body);
        self.expand(&source, &options, origin, 0)
    }
}

impl TemplateRenderer for ViewRenderer {
    fn render(&self, document: &ContentKey, options: &RenderOptions) -> Result<String, RenderError> {
        let source = self.store.read_template(document)?;
        let body = self.expand(&source, options, document.as_str(), 0)?;
        self.wrap_in_layout(body, options, document.as_str())
    }

    fn render_listing(
        &self,
        listing: &Listing,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let options = options.clone().with(LISTING_TEMPLATE, listing_html(listing));
        let origin = listing.directory.to_string();

        let body = match self.template(LISTING_TEMPLATE) {
            Ok(source) => self.expand(&source, &options, &origin, 0)?,
            Err(RenderError::MissingTemplate(_)) => self.expand(BUILTIN_LISTING, &options, &origin, 0)?,
            Err(e) => return Err(e),
        };
        self.wrap_in_layout(body, &options, &origin)
    }
}

const BUILTIN_LISTING: &str = r#"<div class="listing">
  <h2>{{subtitle}}</h2>
  {{{listing}}}
</div>
"#;

/// `<ul>` of links for a listing
pub fn listing_html(listing: &Listing) -> String {
    let mut html = String::from("<ul>\n");
    for entry in &listing.entries {
        let class = if entry.is_directory { " class=\"directory\"" } else { "" };
        html.push_str(&format!(
            "  <li{class}><a href=\"{}\">{}</a></li>\n",
            escape_html(&entry.href),
            escape_html(&entry.name)
        ));
    }
    html.push_str("</ul>\n");
    html
}

/// Text form of an option value
fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
