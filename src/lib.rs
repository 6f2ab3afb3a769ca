// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tweetgraph
//!
//! An async client for the Twitter v1.1 REST API built around cursor-based
//! pagination of the follow graph.
//!
//! ## Features
//!
//! - **Cursor Pagination**: Walk friends, followers, blocks and their id lists
//!   page by page or aggregated, with an exact `total_count` cap
//! - **Fail-fast Validation**: Counts, ids and identifier combinations are
//!   checked before any request is sent
//! - **Auth**: Bearer tokens or app-only auth from consumer credentials
//! - **Resilient HTTP**: Retries with backoff, optional client-side rate
//!   limiting, API error payloads surfaced as typed errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tweetgraph::api::{Api, IdListOptions, UserListOptions};
//!
//! #[tokio::main]
//! async fn main() -> tweetgraph::Result<()> {
//!     let api = Api::builder().bearer_token("AAAA...").build()?;
//!
//!     // Every follower id, across as many pages as needed
//!     let ids = api
//!         .get_follower_ids(&IdListOptions::for_screen_name("codebear"))
//!         .await?;
//!
//!     // One page of friends, resumable from its cursor
//!     let page = api
//!         .get_friends_paged(&UserListOptions::for_user_id(12))
//!         .await?;
//!     println!("{} ids, next page at {}", ids.len(), page.next_cursor);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         Api session                        │
//! │   get_x(options) → Vec<Item>    get_x_paged → PagedResult  │
//! └────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┴──────┬──────────────────────┐
//! │  Validate  │       Paginate         │        HTTP          │
//! ├────────────┼────────────────────────┼──────────────────────┤
//! │ counts     │ CursorPaginator        │ Retry / Backoff      │
//! │ ids        │ PageFetcher            │ Rate Limit           │
//! │ user/list  │ total_count cap        │ Bearer / App-only    │
//! └────────────┴────────────────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Parameter validation
pub mod validate;

/// REST API session and operations
pub mod api;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{Api, IdListOptions, PagedResult, User, UserId, UserListOptions};
pub use config::ClientConfig;
pub use pagination::{CursorPaginator, Page, PageFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
