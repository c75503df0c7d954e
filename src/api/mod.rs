//! Mock JSON API under `/api/`
//!
//! Canned fixtures and a few generated data sets backing the interactive demos.
//! Handlers are synchronous (fixture reads hit the disk); callers run them on
//! the blocking pool.

mod compressors;
pub mod fixtures;
mod garbage;
mod handlers;
mod response;

pub use fixtures::{FixtureProvider, FsFixtures};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::config::AppState;
use crate::http::{build_405_response, QueryParams, ALLOW_PAGES};
use crate::resolve::RenderOptions;

/// URL prefix of the mock API
pub const API_PREFIX: &str = "/api/";

const ALLOW_POST: &str = "POST, OPTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    /// Fixture served as stored
    Fixture(&'static str),
    States,
    Product,
    Fruits,
    Compressors,
    Garbage,
    NavItems,
    /// POST only
    SiteSearch,
}

const ROUTES: &[(&str, Endpoint)] = &[
    ("states", Endpoint::States),
    ("people", Endpoint::Fixture("people")),
    ("product", Endpoint::Product),
    ("supplies", Endpoint::Fixture("supplies")),
    ("towns", Endpoint::Fixture("towns")),
    ("tasks", Endpoint::Fixture("tasks")),
    ("periods", Endpoint::Fixture("periods")),
    ("tree-tasks", Endpoint::Fixture("tree-tasks")),
    ("lookupInfo", Endpoint::Fixture("lookupInfo")),
    ("construction-orders", Endpoint::Fixture("construction-orders")),
    ("construction-cart-items", Endpoint::Fixture("construction-cart-items")),
    ("orgstructure", Endpoint::Fixture("orgstructure")),
    ("servicerequests", Endpoint::Fixture("servicerequests")),
    ("deployments", Endpoint::Fixture("deployments")),
    ("general/status-codes", Endpoint::Fixture("status-codes")),
    ("my-projects", Endpoint::Fixture("projects")),
    ("companies", Endpoint::Fixture("companies")),
    ("accounts", Endpoint::Fixture("accounts")),
    ("assets", Endpoint::Fixture("assets")),
    ("accounts-sm", Endpoint::Fixture("accounts-sm")),
    ("incidents", Endpoint::Fixture("incidents")),
    ("fires", Endpoint::Fixture("fires")),
    ("autocomplete/turkish", Endpoint::Fixture("autocomplete-turkish")),
    ("dummy-dropdown-data", Endpoint::Fixture("dropdown-data")),
    ("fruits", Endpoint::Fruits),
    ("compressors", Endpoint::Compressors),
    ("garbage", Endpoint::Garbage),
    ("nav-items", Endpoint::NavItems),
    ("site-search", Endpoint::SiteSearch),
];

fn find_endpoint(path: &str) -> Option<Endpoint> {
    let name = path.trim_end_matches('/');
    ROUTES
        .iter()
        .find(|(route, _)| *route == name)
        .map(|(_, endpoint)| *endpoint)
}

/// Answer a request whose path starts with [`API_PREFIX`]
///
/// `options` are the per-request render options, used by endpoints that render
/// view fragments.
pub fn handle_api(
    state: &AppState,
    method: &Method,
    path: &str,
    query: &QueryParams,
    options: &RenderOptions,
) -> Response<Full<Bytes>> {
    let is_head = method == Method::HEAD;
    let name = path.strip_prefix(API_PREFIX).unwrap_or(path);

    let Some(endpoint) = find_endpoint(name) else {
        let names: Vec<&str> = ROUTES.iter().map(|(route, _)| *route).collect();
        return response::not_found(&names, is_head);
    };

    let method_ok = match endpoint {
        Endpoint::SiteSearch => method == Method::POST,
        _ => method == Method::GET || is_head,
    };
    if !method_ok {
        return build_405_response(if endpoint == Endpoint::SiteSearch {
            ALLOW_POST
        } else {
            ALLOW_PAGES
        });
    }

    let fixtures = state.fixtures.as_ref();
    match endpoint {
        Endpoint::Fixture(fixture) => handlers::handle_fixture(fixtures, fixture, is_head),
        Endpoint::States => handlers::handle_states(fixtures, query, is_head),
        Endpoint::Product => handlers::handle_product(fixtures, query, is_head),
        Endpoint::Fruits => handlers::handle_fruits(fixtures, query, is_head),
        Endpoint::Compressors => handlers::handle_compressors(query, is_head),
        Endpoint::Garbage => handlers::handle_garbage(query, &mut fastrand::Rng::new(), is_head),
        Endpoint::NavItems => handlers::handle_nav_items(state.renderer.as_ref(), options, is_head),
        Endpoint::SiteSearch => handlers::handle_fixture(fixtures, "site-search", false),
    }
}
