// API response helpers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http::build_body_response;
use crate::logger;

const JSON: &str = "application/json";

/// Serialize `body` as a JSON response
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(json) => build_body_response(status, JSON, Bytes::from(json), is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize API response: {e}"));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", is_head)
        }
    }
}

/// JSON error body: `{"error": message}`
pub fn error_response(status: StatusCode, message: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    build_body_response(status, JSON, Bytes::from(body.to_string()), is_head)
}

/// 404 for an unknown endpoint, naming the ones that exist
pub fn not_found(endpoints: &[&str], is_head: bool) -> Response<Full<Bytes>> {
    let available: Vec<String> = endpoints.iter().map(|e| format!("/api/{e}")).collect();
    let body = serde_json::json!({
        "error": "Not Found",
        "available_endpoints": available,
    });
    build_body_response(
        StatusCode::NOT_FOUND,
        JSON,
        Bytes::from(body.to_string()),
        is_head,
    )
}
