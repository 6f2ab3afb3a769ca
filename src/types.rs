//! Common types used throughout tweetgraph
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters for a single request.
///
/// Ordered so that request URLs are stable across runs.
pub type QueryParams = BTreeMap<String, String>;

// ============================================================================
// Cursor
// ============================================================================

/// Opaque pagination token handed out by the server.
///
/// `-1` asks for the first page; `0` means there is no page in that
/// direction. Any other value must be sent back exactly as received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(i64);

impl Cursor {
    /// Cursor requesting the first page of a collection
    pub const START: Cursor = Cursor(-1);

    /// Cursor marking the end of a collection
    pub const END: Cursor = Cursor(0);

    /// Wrap a raw server value
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw value to send back to the server
    pub const fn value(self) -> i64 {
        self.0
    }

    /// True when no further page exists in this direction
    pub const fn is_end(self) -> bool {
        self.0 == 0
    }

    /// True for the start-of-collection sentinel
    pub const fn is_start(self) -> bool {
        self.0 == -1
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::START
    }
}

impl From<i64> for Cursor {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Cursor> for i64 {
    fn from(cursor: Cursor) -> Self {
        cursor.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Render a boolean the way the API expects it in a query string
pub(crate) fn query_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
