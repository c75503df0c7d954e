//! HTTP protocol layer module
//!
//! Response builders, caching headers, MIME detection and query parsing, kept
//! free of any page or API logic.

pub mod cache;
pub mod mime;
pub mod query;
pub mod response;

pub use query::QueryParams;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_body_response, build_cached_response, build_html_response,
    build_options_response, ALLOW_API, ALLOW_PAGES,
};
