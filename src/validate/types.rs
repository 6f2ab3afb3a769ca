//! Validated parameter types
//!
//! Raw caller input comes in as [`ParamValue`]; validated identifiers come
//! out as [`UserRef`] and [`ListRef`].

use crate::types::QueryParams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric parameter as supplied by the caller.
///
/// Values forwarded from CLI flags or config files arrive as text, so both
/// forms are accepted and checked by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer value
    Int(i64),
    /// Unparsed text
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Int)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A validated user identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// Lookup by handle (without leading `@`)
    ScreenName(String),
    /// Lookup by numeric id
    UserId(u64),
}

impl UserRef {
    /// Add this identifier to a query using the standard key names
    pub fn apply(&self, query: &mut QueryParams) {
        self.apply_with(query, "screen_name", "user_id");
    }

    /// Add this identifier to a query using custom key names
    pub(crate) fn apply_with(&self, query: &mut QueryParams, name_key: &str, id_key: &str) {
        match self {
            Self::ScreenName(name) => {
                query.insert(name_key.to_string(), name.clone());
            }
            Self::UserId(id) => {
                query.insert(id_key.to_string(), id.to_string());
            }
        }
    }
}

/// A validated list identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRef {
    /// Lookup by numeric list id
    Id(u64),
    /// Lookup by slug within an owner's lists
    Slug {
        /// List slug
        slug: String,
        /// Owner of the list
        owner: UserRef,
    },
}

impl ListRef {
    /// Add this identifier to a query
    pub fn apply(&self, query: &mut QueryParams) {
        match self {
            Self::Id(id) => {
                query.insert("list_id".to_string(), id.to_string());
            }
            Self::Slug { slug, owner } => {
                query.insert("slug".to_string(), slug.clone());
                owner.apply_with(query, "owner_screen_name", "owner_id");
            }
        }
    }
}
