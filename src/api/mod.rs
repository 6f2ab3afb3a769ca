//! REST API operations
//!
//! The [`Api`] session exposes two access modes for every cursored family
//! (friends, followers, friend ids, follower ids, blocks, block ids):
//!
//! - `get_x(options)` walks pages from cursor `-1` and returns the items
//! - `get_x_paged(options)` performs one request at `options.cursor` and
//!   returns the page with its cursors
//!
//! Retweeter ids of a status are cursored the same way.
//!
//! Timelines, search, profile lookups, retweets, favorites, trends, help
//! configuration and credential verification are single requests.
//!
//! # Example
//!
//! ```rust,ignore
//! use tweetgraph::api::{Api, IdListOptions};
//!
//! let api = Api::builder().bearer_token("AAAA...").build()?;
//! let ids = api
//!     .get_follower_ids(&IdListOptions::for_screen_name("codebear").total_count(6000))
//!     .await?;
//! ```

mod graph;
mod models;
mod options;
mod session;

pub use graph::{GraphEndpoint, GraphFamily, GraphParams};
pub use models::{Status, Trend, User, UserId};
pub use options::{
    FavoritesOptions, GraphRequest, IdListOptions, ListTimelineOptions, ResultType,
    RetweetersOptions, RetweetsOptions, SearchOptions, TimelineOptions, TrendsOptions,
    UserListOptions, UserShowOptions, UserTimelineOptions, UsersLookupOptions,
    UsersSearchOptions, WORLDWIDE_WOEID,
};
pub use session::{Api, ApiBuilder, PagedResult};

#[cfg(test)]
mod tests;
