//! Item timestamp extraction
//!
//! Cursor strategies need the timestamp of the first and last item of a page.
//! A [`DateExtractor`] is a single typed function from an item to its
//! timestamp; naming a field is sugar resolved when the extractor is built.

use super::types::PageView;
use crate::types::Timestamp;
use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type ExtractFn<T> = dyn Fn(&T) -> Option<Timestamp> + Send + Sync;

/// Function from an item to its timestamp (milliseconds since the epoch)
pub struct DateExtractor<T> {
    extract: Arc<ExtractFn<T>>,
    label: String,
}

impl<T> Clone for DateExtractor<T> {
    fn clone(&self) -> Self {
        Self {
            extract: Arc::clone(&self.extract),
            label: self.label.clone(),
        }
    }
}

impl<T> fmt::Debug for DateExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateExtractor")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<T> DateExtractor<T> {
    /// Wrap an arbitrary extraction function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<Timestamp> + Send + Sync + 'static,
    {
        Self {
            extract: Arc::new(f),
            label: "fn".to_string(),
        }
    }

    /// Extract the timestamp of one item
    pub fn extract(&self, item: &T) -> Option<Timestamp> {
        (self.extract)(item)
    }

    /// Human-readable description (the field name, or `fn`)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Summarize a newest-first page for the strategies
    pub fn page_view(&self, items: &[T], fetched_at: Timestamp) -> PageView {
        let newest = items.first().and_then(|item| self.extract(item));
        let oldest = items.last().and_then(|item| self.extract(item));

        if !items.is_empty() && (newest.is_none() || oldest.is_none()) {
            tracing::warn!(
                extractor = %self.label,
                "Could not extract a timestamp from an edge item; dependent links are omitted"
            );
        }

        PageView {
            len: items.len(),
            newest,
            oldest,
            fetched_at,
        }
    }
}

impl<T: Serialize + 'static> DateExtractor<T> {
    /// Read the timestamp from a named field of the serialized item.
    ///
    /// Integer fields are taken as-is (floats are truncated); string fields
    /// must be integers or RFC 3339 datetimes, which become epoch millis.
    pub fn field(name: impl Into<String>) -> Self {
        let name = name.into();
        let field = name.clone();
        Self {
            extract: Arc::new(move |item: &T| {
                let value = serde_json::to_value(item).ok()?;
                timestamp_from_value(value.get(&field)?)
            }),
            label: name,
        }
    }
}

/// Interpret a JSON value as a timestamp
pub fn timestamp_from_value(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| {
            DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.timestamp_millis())
        }),
        _ => None,
    }
}
