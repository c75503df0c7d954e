// Mock endpoint handlers

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde_json::Value;

use super::compressors::{query_compressors, CompressorQuery};
use super::fixtures::{FixtureError, FixtureProvider};
use super::garbage::{self, Garbage, GarbageRequest};
use super::response::{error_response, json_response};
use crate::http::{build_body_response, build_html_response, QueryParams};
use crate::logger;
use crate::render::TemplateRenderer;
use crate::resolve::{ContentKey, RenderOptions, LAYOUT};

const NAV_ITEMS_TEMPLATE: &str = "tests/accordion/_ajax-results";
const FRUITS_NOT_FOUND: &str = r#"<div class="accordion-content" style="color: red;"><p>Error: Couldn't find any fruits...</p></div>"#;

/// Map a fixture failure to a JSON error: missing is 404, anything else 500
fn fixture_failure(error: &FixtureError, is_head: bool) -> Response<Full<Bytes>> {
    match error {
        FixtureError::NotFound(_) | FixtureError::InvalidName(_) => {
            logger::log_warning(&error.to_string());
            error_response(StatusCode::NOT_FOUND, &error.to_string(), is_head)
        }
        FixtureError::Io { .. } | FixtureError::Parse { .. } => {
            logger::log_error(&error.to_string());
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &error.to_string(), is_head)
        }
    }
}

fn with_fixture(
    fixtures: &dyn FixtureProvider,
    name: &str,
    is_head: bool,
    shape: impl FnOnce(Value) -> Value,
) -> Response<Full<Bytes>> {
    match fixtures.load(name) {
        Ok(value) => json_response(StatusCode::OK, &shape(value), is_head),
        Err(e) => fixture_failure(&e, is_head),
    }
}

/// Fixture served as stored
pub fn handle_fixture(
    fixtures: &dyn FixtureProvider,
    name: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    with_fixture(fixtures, name, is_head, |value| value)
}

/// `states`: case-insensitive `term` match on each entry's `label`
pub fn handle_states(
    fixtures: &dyn FixtureProvider,
    query: &QueryParams,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let term = query.get_non_empty("term").map(str::to_lowercase);
    with_fixture(fixtures, "states", is_head, |value| match (term, value) {
        (Some(term), Value::Array(states)) => Value::Array(
            states
                .into_iter()
                .filter(|state| {
                    state["label"]
                        .as_str()
                        .is_some_and(|label| label.to_lowercase().contains(&term))
                })
                .collect(),
        ),
        (_, value) => value,
    })
}

/// `product`: the first `limit` products
pub fn handle_product(
    fixtures: &dyn FixtureProvider,
    query: &QueryParams,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let limit = query.get_parsed::<usize>("limit");
    with_fixture(fixtures, "products", is_head, |value| match (limit, value) {
        (Some(limit), Value::Array(mut products)) => {
            products.truncate(limit);
            Value::Array(products)
        }
        (_, value) => value,
    })
}

/// `fruits`: one category of the fixture by `categoryId`
pub fn handle_fruits(
    fixtures: &dyn FixtureProvider,
    query: &QueryParams,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let category = query.get_non_empty("categoryId").unwrap_or("main");
    with_fixture(fixtures, "fruits", is_head, |mut value| {
        value
            .get_mut(category)
            .map(Value::take)
            .unwrap_or_else(|| Value::from(FRUITS_NOT_FOUND))
    })
}

pub fn handle_compressors(query: &QueryParams, is_head: bool) -> Response<Full<Bytes>> {
    let page = query_compressors(&CompressorQuery::from_query(query));
    json_response(StatusCode::OK, &page, is_head)
}

pub fn handle_garbage(
    query: &QueryParams,
    rng: &mut fastrand::Rng,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match garbage::generate(&GarbageRequest::from_query(query), rng) {
        Garbage::Items(items) => json_response(StatusCode::OK, &items, is_head),
        Garbage::Html(html) => build_html_response(StatusCode::OK, html, is_head),
        Garbage::Text(text) => {
            let body = Value::from(text).to_string();
            build_body_response(StatusCode::OK, "text/plain", Bytes::from(body), is_head)
        }
    }
}

/// `nav-items`: the accordion fragment, without any layout
pub fn handle_nav_items(
    renderer: &dyn TemplateRenderer,
    options: &RenderOptions,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let options = options.clone().with(LAYOUT, Value::Null);
    let rendered = ContentKey::parse(NAV_ITEMS_TEMPLATE)
        .map_err(|e| e.to_string())
        .and_then(|key| renderer.render(&key, &options).map_err(|e| e.to_string()));
    match rendered {
        Ok(html) => build_html_response(StatusCode::OK, html, is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to render {NAV_ITEMS_TEMPLATE}: {e}"));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e, is_head)
        }
    }
}
