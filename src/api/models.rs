//! Entity models
//!
//! Only the fields the crate itself relies on are typed. Everything else
//! the API returns is kept in `extra`.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric account id
    pub id: u64,
    /// Handle without the leading `@`
    #[serde(default)]
    pub screen_name: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Remaining fields as returned by the API
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A status (tweet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Numeric status id
    pub id: u64,
    /// Status text (`full_text` in extended mode)
    #[serde(default, alias = "full_text")]
    pub text: String,
    /// Author, absent when `trim_user` strips it to an id
    #[serde(default)]
    pub user: Option<User>,
    /// Remaining fields as returned by the API
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A trending topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Topic as displayed
    pub name: String,
    /// Search page for the topic
    #[serde(default)]
    pub url: Option<String>,
    /// Search query for the topic
    #[serde(default)]
    pub query: Option<String>,
    /// Statuses in the last 24 hours, when known
    #[serde(default)]
    pub tweet_volume: Option<u64>,
    /// Remaining fields as returned by the API
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// An entry of an id list.
///
/// Ids are numeric unless `stringify_ids` was requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    /// Numeric id
    Numeric(u64),
    /// String id
    Text(String),
}

impl UserId {
    /// Numeric value, parsing the string form if needed
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Numeric(id) => Some(*id),
            Self::Text(id) => id.parse().ok(),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}
