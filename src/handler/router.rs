//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. Stages run in a fixed order:
//! method check, body size check, static assets, render options and injected
//! delay, then the mock API or the page routes. One access log line is written
//! per request once the response is known.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, CONTENT_LENGTH, IF_NONE_MATCH, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};

use crate::api::{self, API_PREFIX};
use crate::config::AppState;
use crate::handler::{pages, static_files};
use crate::http::{self, QueryParams, ALLOW_API, ALLOW_PAGES};
use crate::logger::{self, AccessLogEntry};
use crate::resolve::RenderOptions;

/// Option holding the dropdown demo data
const DROPDOWN_DATA: &str = "dropdownListData";

/// Request context for the static file stage
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// The parts of a request the pipeline reads, detached from the body
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub content_length: Option<HeaderValue>,
    pub if_none_match: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

fn header_string<B>(req: &Request<B>, name: hyper::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

impl RequestInfo {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            content_length: req.headers().get(CONTENT_LENGTH).cloned(),
            if_none_match: header_string(req, IF_NONE_MATCH),
            referer: header_string(req, REFERER),
            user_agent: header_string(req, USER_AGENT),
        }
    }

    fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }

    fn is_api(&self) -> bool {
        self.path.starts_with(API_PREFIX)
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let info = RequestInfo::from_request(&req);
    drop(req);

    let mut response = dispatch(&info, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let entry = access_entry(&info, peer_addr, &response, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    Ok(response)
}

fn access_entry(
    info: &RequestInfo,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        info.method.to_string(),
        info.path.clone(),
    );
    entry.query.clone_from(&info.query);
    entry.http_version = match info.version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer.clone_from(&info.referer);
    entry.user_agent.clone_from(&info.user_agent);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

/// Run the pipeline for one request
pub async fn dispatch(info: &RequestInfo, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(info, state.config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(info.content_length.as_ref(), state.config.http.max_body_size) {
        return resp;
    }

    // 3. Static assets, never delayed
    if !info.is_api() {
        let ctx = RequestContext {
            path: &info.path,
            is_head: info.is_head(),
            if_none_match: info.if_none_match.clone(),
        };
        if let Some(resp) = static_files::serve_static(&ctx, &state.config.site).await {
            return resp;
        }
    }

    // 4. Per-request options
    let query = QueryParams::parse(info.query.as_deref());
    let options = request_options(state, info, &query);

    // 5. Injected delay
    if let Some(delay) = options.delay() {
        logger::log_info(&format!(
            "Delaying the response time of this request by {}ms...",
            delay.as_millis()
        ));
        tokio::time::sleep(delay).await;
    }

    // 6./7. Mock API or pages, both touch the disk synchronously
    let blocking_state = Arc::clone(state);
    let method = info.method.clone();
    let path = info.path.clone();
    let is_api = info.is_api();
    let is_head = info.is_head();
    let handler = tokio::task::spawn_blocking(move || {
        if is_api {
            api::handle_api(&blocking_state, &method, &path, &query, &options)
        } else {
            pages::serve_page(&blocking_state, &path, &options, is_head)
        }
    });

    // The write timeout starts after the injected delay
    let write_timeout = state.config.performance.write_timeout;
    let result = if write_timeout == 0 {
        handler.await
    } else {
        match tokio::time::timeout(Duration::from_secs(write_timeout), handler).await {
            Ok(result) => result,
            Err(_) => {
                logger::log_error(&format!(
                    "Response for {} not ready within {write_timeout}s",
                    info.path
                ));
                return http::build_500_response(is_head);
            }
        }
    };

    result.unwrap_or_else(|e| {
        logger::log_error(&format!("Request task for {} failed: {e}", info.path));
        http::build_500_response(is_head)
    })
}

/// Site defaults, then query overrides, then page-specific data
fn request_options(state: &AppState, info: &RequestInfo, query: &QueryParams) -> RenderOptions {
    let mut options = state.defaults.merge(&RenderOptions::from_query(query));

    let in_url = |needle: &str| {
        info.path.contains(needle) || info.query.as_deref().is_some_and(|q| q.contains(needle))
    };
    if !info.is_api() && in_url("dropdown") {
        match state.fixtures.load("dropdown-data") {
            Ok(data) => options.set(DROPDOWN_DATA, data),
            Err(e) => logger::log_error(&format!("Dropdown demo data unavailable: {e}")),
        }
    }
    options
}

/// GET and HEAD everywhere, POST only under the API prefix
fn check_http_method(info: &RequestInfo, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    let allow = if info.is_api() { ALLOW_API } else { ALLOW_PAGES };
    match info.method {
        Method::GET | Method::HEAD => None,
        Method::POST if info.is_api() => None,
        Method::OPTIONS => Some(http::build_options_response(allow, enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {} {}", info.method, info.path));
            Some(http::build_405_response(allow))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    content_length: Option<&HeaderValue>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = content_length?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fixtures::memory::MemoryFixtures;
    use crate::config::Config;
    use crate::resolve::memory::MemoryContentStore;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use serde_json::{json, Value};

    fn state() -> Arc<AppState> {
        let store = MemoryContentStore::new()
            .with_document("layout", "{{{yield}}}")
            .with_document("index", "home of {{title}} in {{theme}}")
            .with_document("controls/layout", "{{{yield}}}")
            .with_document("controls/dropdown", "{{{dropdownListData}}}")
            .with_document("tests/accordion/_ajax-results", "<li>{{locale}}</li>");
        let fixtures = MemoryFixtures::default()
            .with("states", json!([{"label": "Alabama"}, {"label": "Texas"}]))
            .with("dropdown-data", json!([{"value": "AL"}]))
            .with("site-search", json!({"results": []}));
        let mut config = Config::load_from("does-not-exist/demo-config").unwrap();
        // Nothing on disk should ever match as a static asset
        config.site.public_dir = "does-not-exist/public".to_string();
        config.site.views_dir = "does-not-exist/views".to_string();
        Arc::new(AppState::with_parts(&config, Arc::new(store), Arc::new(fixtures)).unwrap())
    }

    fn request(method: Method, uri: &str) -> RequestInfo {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        RequestInfo::from_request(&req)
    }

    async fn body_text(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_page_with_query_options() {
        let state = state();
        let resp = dispatch(&request(Method::GET, "/?theme=dark"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "home of SoHo XI in dark");
    }

    #[tokio::test]
    async fn test_delay_does_not_count_against_write_timeout() {
        let base = state();
        let mut config = base.config.clone();
        config.performance.write_timeout = 1;
        let state = Arc::new(
            AppState::with_parts(&config, Arc::clone(&base.store), Arc::clone(&base.fixtures))
                .unwrap(),
        );

        let started = Instant::now();
        let resp = dispatch(&request(Method::GET, "/?delay=1200"), &state).await;
        assert!(started.elapsed() >= Duration::from_millis(1200));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "home of SoHo XI in light");
    }

    #[tokio::test]
    async fn test_method_rules() {
        let state = state();
        let resp = dispatch(&request(Method::DELETE, "/"), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], ALLOW_PAGES);

        let resp = dispatch(&request(Method::POST, "/controls"), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = dispatch(&request(Method::OPTIONS, "/api/states"), &state).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["Allow"], ALLOW_API);
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let state = state();
        let mut info = request(Method::POST, "/api/site-search");
        info.content_length = Some(HeaderValue::from_static("99999999999"));
        let resp = dispatch(&info, &state).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        info.content_length = Some(HeaderValue::from_static("not-a-number"));
        let resp = dispatch(&info, &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_dispatch() {
        let state = state();
        let resp = dispatch(&request(Method::GET, "/api/states?term=tex"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(body, json!([{"label": "Texas"}]));

        let resp = dispatch(&request(Method::POST, "/api/site-search"), &state).await;
        assert_eq!(body_text(resp).await, r#"{"results":[]}"#);

        let resp = dispatch(&request(Method::GET, "/api/site-search"), &state).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = dispatch(&request(Method::GET, "/api/nothing-here"), &state).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert!(body["available_endpoints"].as_array().unwrap().len() > 20);
    }

    #[tokio::test]
    async fn test_nav_items_fragment() {
        let state = state();
        let resp = dispatch(&request(Method::GET, "/api/nav-items?locale=de-DE"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "<li>de-DE</li>");
    }

    #[tokio::test]
    async fn test_dropdown_pages_get_demo_data() {
        let state = state();
        let resp = dispatch(&request(Method::GET, "/controls/dropdown"), &state).await;
        assert_eq!(body_text(resp).await, r#"[{"value":"AL"}]"#);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let state = state();
        let resp = dispatch(&request(Method::HEAD, "/"), &state).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Length"], "24");
        assert_eq!(body_text(resp).await, "");
    }
}
