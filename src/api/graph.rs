//! Follow-graph collection endpoints
//!
//! [`GraphEndpoint`] is the HTTP [`PageFetcher`] behind every cursored
//! family. One call, one request.

use crate::error::{FetchError, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageFetcher};
use crate::types::{query_bool, Cursor, JsonObject, JsonValue, QueryParams};
use crate::validate::UserRef;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::debug;

/// A cursored collection endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphFamily {
    /// Accounts the user follows
    Friends,
    /// Accounts following the user
    Followers,
    /// Ids of accounts the user follows
    FriendIds,
    /// Ids of accounts following the user
    FollowerIds,
    /// Accounts blocked by the authenticating user
    Blocks,
    /// Ids of accounts blocked by the authenticating user
    BlockIds,
    /// Ids of accounts that retweeted a status
    RetweeterIds,
}

impl GraphFamily {
    /// Endpoint path relative to the base URL
    pub const fn path(self) -> &'static str {
        match self {
            Self::Friends => "friends/list.json",
            Self::Followers => "followers/list.json",
            Self::FriendIds => "friends/ids.json",
            Self::FollowerIds => "followers/ids.json",
            Self::Blocks => "blocks/list.json",
            Self::BlockIds => "blocks/ids.json",
            Self::RetweeterIds => "statuses/retweeters/ids.json",
        }
    }

    /// Key of the item array in the response object
    pub const fn items_key(self) -> &'static str {
        if self.is_id_list() {
            "ids"
        } else {
            "users"
        }
    }

    /// True for families returning bare ids
    pub const fn is_id_list(self) -> bool {
        matches!(
            self,
            Self::FriendIds | Self::FollowerIds | Self::BlockIds | Self::RetweeterIds
        )
    }
}

/// Validated parameters for one cursored family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphParams {
    /// Target account; `None` targets the authenticating user
    pub user: Option<UserRef>,
    /// Target status for status-scoped families, sent as `id`
    pub status_id: Option<u64>,
    /// Page size hint
    pub count: u32,
    /// Endpoint flags, always sent
    pub flags: BTreeMap<&'static str, bool>,
}

impl GraphParams {
    /// Create parameters without flags
    pub fn new(user: Option<UserRef>, count: u32) -> Self {
        Self {
            user,
            status_id: None,
            count,
            flags: BTreeMap::new(),
        }
    }

    /// Scope the collection to a status
    #[must_use]
    pub fn status(mut self, status_id: u64) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Add an endpoint flag
    #[must_use]
    pub fn flag(mut self, name: &'static str, value: bool) -> Self {
        self.flags.insert(name, value);
        self
    }

    /// Query string for the page at `cursor`
    pub fn to_query(&self, cursor: Cursor) -> QueryParams {
        let mut query = QueryParams::new();
        if let Some(user) = &self.user {
            user.apply(&mut query);
        }
        if let Some(id) = self.status_id {
            query.insert("id".to_string(), id.to_string());
        }
        query.insert("count".to_string(), self.count.to_string());
        query.insert("cursor".to_string(), cursor.to_string());
        for (name, value) in &self.flags {
            query.insert((*name).to_string(), query_bool(*value));
        }
        query
    }
}

/// HTTP page fetcher for a [`GraphFamily`]
pub struct GraphEndpoint<'a, T> {
    client: &'a HttpClient,
    family: GraphFamily,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T> GraphEndpoint<'a, T> {
    /// Create a fetcher over the given client
    pub fn new(client: &'a HttpClient, family: GraphFamily) -> Self {
        Self {
            client,
            family,
            _item: PhantomData,
        }
    }

    /// The family this fetcher targets
    pub fn family(&self) -> GraphFamily {
        self.family
    }
}

impl<T> std::fmt::Debug for GraphEndpoint<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEndpoint")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<'a, T> PageFetcher for GraphEndpoint<'a, T>
where
    T: DeserializeOwned + Send,
{
    type Params = GraphParams;
    type Item = T;

    async fn fetch_page(&self, params: &GraphParams, cursor: Cursor) -> Result<Page<T>> {
        let path = self.family.path();
        debug!(path, cursor = %cursor, "Requesting page");

        let body: JsonValue = self
            .client
            .get_json(path, RequestConfig::with_query(params.to_query(cursor)))
            .await?;
        decode_page(body, self.family.items_key())
    }
}

/// Decode a cursored response object.
///
/// Missing cursor fields decode as `0`.
pub(crate) fn decode_page<T: DeserializeOwned>(body: JsonValue, items_key: &str) -> Result<Page<T>> {
    let JsonValue::Object(mut object) = body else {
        return Err(FetchError::decode("expected a JSON object").into());
    };

    let raw_items = object
        .remove(items_key)
        .ok_or_else(|| FetchError::decode(format!("response has no '{items_key}' field")))?;
    let items: Vec<T> = serde_json::from_value(raw_items)
        .map_err(|e| FetchError::decode(format!("invalid '{items_key}' entries: {e}")))?;

    Ok(Page::new(
        items,
        cursor_field(&object, "next_cursor"),
        cursor_field(&object, "previous_cursor"),
    ))
}

fn cursor_field(object: &JsonObject, key: &str) -> Cursor {
    let numeric = object.get(key).and_then(JsonValue::as_i64);
    let textual = || {
        object
            .get(&format!("{key}_str"))
            .and_then(JsonValue::as_str)
            .and_then(|s| s.parse().ok())
    };
    Cursor::new(numeric.or_else(textual).unwrap_or(0))
}
