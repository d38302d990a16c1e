//! Link URL rebuilding
//!
//! A [`UrlContext`] holds the parsed inbound request URL. Every link is built
//! from a fresh copy of the original query: cursor keys are stripped, the
//! overrides are applied in order, and the result is serialized back into an
//! absolute URL. Nothing carries over from one link to the next.

use super::types::params;
use crate::error::Result;
use url::Url;

/// Parsed inbound request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlContext {
    /// Scheme, host and path; the query is kept separately
    base: Url,
    /// Decoded query pairs in their original order
    query: Vec<(String, String)>,
}

impl UrlContext {
    /// Parse an absolute URL
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::from_url(Url::parse(url)?))
    }

    /// Build from the pieces of an HTTP request: protocol, host header and
    /// the original path with its query string
    pub fn from_parts(scheme: &str, host: &str, path_and_query: &str) -> Result<Self> {
        let path_and_query = if path_and_query.starts_with('/') {
            path_and_query.to_string()
        } else {
            format!("/{path_and_query}")
        };
        Self::parse(&format!("{scheme}://{host}{path_and_query}"))
    }

    /// Take ownership of an already parsed URL
    pub fn from_url(mut url: Url) -> Self {
        let query = url.query_pairs().into_owned().collect();
        url.set_query(None);
        url.set_fragment(None);
        Self { base: url, query }
    }

    /// Decoded query pairs of the inbound request
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Build a link.
    ///
    /// Starts from the inbound query, removes `since`, `before` and `until`,
    /// then sets each override (replacing an existing key in place or
    /// appending a new one).
    pub fn link<K, V>(&self, overrides: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: ToString,
    {
        let mut query: Vec<(String, String)> = self
            .query
            .iter()
            .filter(|(key, _)| !params::CURSOR_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();

        for (key, value) in overrides {
            set_param(&mut query, key.as_ref(), value.to_string());
        }

        let mut url = self.base.clone();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        url.to_string()
    }
}

/// Replace the first occurrence of `key` (dropping any duplicates) or append
fn set_param(query: &mut Vec<(String, String)>, key: &str, value: String) {
    match query.iter().position(|(k, _)| k == key) {
        Some(index) => {
            query[index].1 = value;
            let mut seen = 0usize;
            query.retain(|(k, _)| {
                if k == key {
                    seen += 1;
                    seen == 1
                } else {
                    true
                }
            });
        }
        None => query.push((key.to_string(), value)),
    }
}
