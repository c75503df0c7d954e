//! Page serving
//!
//! Resolves a request path against the views tree and renders the outcome.
//! Runs synchronously; the router calls it on the blocking pool.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::render::RenderError;
use crate::resolve::{RenderOptions, Resolution, ResolveError, Resolver};

/// Resolve and render one page
pub fn serve_page(
    state: &AppState,
    path: &str,
    options: &RenderOptions,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let resolver = Resolver::new(
        state.store.as_ref(),
        &state.sections,
        &state.rules,
        &state.config.site.basepath,
    )
    .sort_entries(state.config.listing.sort_entries);

    let resolution = match resolver.resolve(path, options) {
        Ok(resolution) => resolution,
        Err(ResolveError::InvalidPath(raw)) => {
            logger::log_warning(&format!("Rejected request path: {raw}"));
            return http::build_404_response();
        }
        Err(e) => {
            logger::log_error(&format!("Failed to resolve {path}: {e}"));
            return http::build_500_response(is_head);
        }
    };

    match render(state, &resolution) {
        Ok(Some((status, html))) => http::build_html_response(status, html, is_head),
        Ok(None) => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to render {path}: {e}"));
            http::build_500_response(is_head)
        }
    }
}

/// Status and page body, `None` when there is nothing to show
fn render(
    state: &AppState,
    resolution: &Resolution,
) -> Result<Option<(StatusCode, String)>, RenderError> {
    let renderer = state.renderer.as_ref();
    let page = match resolution {
        Resolution::Render { document, options } => {
            (StatusCode::OK, renderer.render(document, options)?)
        }
        Resolution::Listing { listing, options } => {
            (StatusCode::OK, renderer.render_listing(listing, options)?)
        }
        Resolution::NotFound {
            parent_listing: Some((listing, options)),
            ..
        } => (StatusCode::NOT_FOUND, renderer.render_listing(listing, options)?),
        Resolution::NotFound {
            key,
            parent_listing: None,
        } => {
            logger::log_debug(&format!("Nothing to serve for '{key}'"));
            return Ok(None);
        }
    };
    Ok(Some(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::memory::MemoryFixtures;
    use crate::config::Config;
    use crate::resolve::memory::MemoryContentStore;
    use crate::resolve::{ContentKey, ContentStore, NodeKind, StoreError};
    use http_body_util::BodyExt;
    use std::io;
    use std::sync::Arc;

    /// Store whose disk has gone away
    struct BrokenStore;

    impl BrokenStore {
        fn fail(key: &ContentKey) -> StoreError {
            StoreError::Io {
                path: format!("views/{key}").into(),
                source: io::Error::other("disk gone"),
            }
        }
    }

    impl ContentStore for BrokenStore {
        fn exists(&self, key: &ContentKey) -> Result<NodeKind, StoreError> {
            Err(Self::fail(key))
        }

        fn list_entries(&self, key: &ContentKey) -> Result<Vec<String>, StoreError> {
            Err(Self::fail(key))
        }

        fn read_template(&self, key: &ContentKey) -> Result<String, StoreError> {
            Err(Self::fail(key))
        }
    }

    fn state() -> AppState {
        let store = MemoryContentStore::new()
            .with_document("layout", "<main>{{{yield}}}</main>")
            .with_document("index", "<h1>{{title}}</h1>")
            .with_document("controls/layout", "<div class=\"controls\">{{subtitle}}|{{{yield}}}</div>")
            .with_document("controls/index", "all")
            .with_document("controls/dropdown", "dropdown in {{locale}}")
            .with_document("tests/layout", "{{{yield}}}")
            .with_document("tests/layout-noheader", "{{{yield}}}")
            .with_document("tests/datagrid", "grid")
            .with_document("patterns/cards", "cards");
        let config = Config::load_from("does-not-exist/demo-config").unwrap();
        AppState::with_parts(&config, Arc::new(store), Arc::new(MemoryFixtures::default()))
            .unwrap()
    }

    async fn page(state: &AppState, path: &str) -> (StatusCode, String) {
        let resp = serve_page(state, path, &state.defaults, false);
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_in_layout() {
        let state = state();
        let (status, html) = page(&state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html, "<main><h1>SoHo XI</h1></main>");
    }

    #[tokio::test]
    async fn test_control_page() {
        let state = state();
        let (status, html) = page(&state, "/controls/dropdown.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html, "<div class=\"controls\">Dropdown|dropdown in en-US</div>");
    }

    #[tokio::test]
    async fn test_missing_page_lists_parent_with_404() {
        let state = state();
        let (status, html) = page(&state, "/tests/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Listing for tests/"));
        assert!(html.contains("datagrid"));
    }

    #[tokio::test]
    async fn test_outside_sections_is_plain_404() {
        let state = state();
        let (status, html) = page(&state, "/nowhere/at/all").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(html, "404 Not Found");
    }

    #[tokio::test]
    async fn test_traversal_is_404() {
        let state = state();
        let (status, _) = page(&state, "/tests/../../etc/passwd").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_layout_is_500() {
        let state = state();
        let (status, html) = page(&state, "/patterns/cards").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(html, "<h2>Internal Server Error</h2>");
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let config = Config::load_from("does-not-exist/demo-config").unwrap();
        let state = AppState::with_parts(
            &config,
            Arc::new(BrokenStore),
            Arc::new(MemoryFixtures::default()),
        )
        .unwrap();

        let (status, html) = page(&state, "/tests/x").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(html, "<h2>Internal Server Error</h2>");

        let resp = serve_page(&state, "/controls/dropdown", &state.defaults, true);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
