//! Request context extraction
//!
//! Captures what the renderer needs from an inbound request: the absolute
//! URL the client used (for rebuilding links) and its raw query parameters.

use crate::error::{Error, Result};
use crate::pagination::{RawQuery, UrlContext};
use async_trait::async_trait;
use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::header::HOST;
use axum::http::request::Parts;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Inbound request as seen by the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Absolute request URL, used as the base of every generated link
    pub url: UrlContext,
    /// Untyped pagination parameters from the query string
    pub query: RawQuery,
}

impl RequestContext {
    /// Wrap a parsed URL, reading the query parameters from it
    pub fn new(url: UrlContext) -> Self {
        let query = RawQuery::from_pairs(
            url.query_pairs()
                .iter()
                .map(|(key, value)| (key.as_str(), value.clone())),
        );
        Self { url, query }
    }

    /// Parse an absolute request URL
    pub fn parse(url: &str) -> Result<Self> {
        Ok(Self::new(UrlContext::parse(url)?))
    }

    /// Build from protocol, host and the original path with query
    pub fn from_parts(scheme: &str, host: &str, path_and_query: &str) -> Result<Self> {
        Ok(Self::new(UrlContext::from_parts(scheme, host, path_and_query)?))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.clone(), |original| original.0.clone());

        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
            .or_else(|| uri.scheme_str().map(str::to_string))
            .unwrap_or_else(|| "http".to_string());

        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
            .unwrap_or_else(|| "localhost".to_string());

        let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

        tracing::trace!(%scheme, %host, %path_and_query, "Extracted request context");
        Self::from_parts(&scheme, &host, path_and_query)
    }
}
