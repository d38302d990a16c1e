//! Common types used throughout collection-links

use chrono::Utc;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Cursor and item timestamp, milliseconds since the Unix epoch
pub type Timestamp = i64;

// ============================================================================
// Clock
// ============================================================================

/// Current wall-clock time as a [`Timestamp`]
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}
