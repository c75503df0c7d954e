//! Query string parsing
//!
//! Malformed numeric values read as absent so callers fall back to their defaults.

use std::str::FromStr;

use url::form_urlencoded;

/// Decoded query parameters, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse the raw query component (without the leading `?`)
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `name`, treating an empty value as absent
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// First value for `name` parsed as `T`; unparsable values read as absent
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
