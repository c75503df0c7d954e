//! HTTP response building module
//!
//! Every builder falls back to a bare response (and logs) if the builder rejects
//! a header, so the request path never panics.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Methods answered outside `/api/`
pub const ALLOW_PAGES: &str = "GET, HEAD, OPTIONS";
/// Methods answered under `/api/`
pub const ALLOW_API: &str = "GET, HEAD, POST, OPTIONS";

fn body_for(content: Bytes, is_head: bool) -> Full<Bytes> {
    if is_head {
        Full::new(Bytes::new())
    } else {
        Full::new(content)
    }
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 500 Internal Server Error page
pub fn build_500_response(is_head: bool) -> Response<Full<Bytes>> {
    build_html_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "<h2>Internal Server Error</h2>".to_string(),
        is_head,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

fn build_text_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Build HTML page response
pub fn build_html_response(
    status: StatusCode,
    content: String,
    is_head: bool,
) -> Response<Full<Bytes>> {
    build_body_response(status, "text/html; charset=utf-8", Bytes::from(content), is_head)
}

/// Build response with an arbitrary body and content type
pub fn build_body_response(
    status: StatusCode,
    content_type: &str,
    content: Bytes,
    is_head: bool,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content.len())
        .body(body_for(content, is_head))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build success response with cache control
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(body_for(data, is_head))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
