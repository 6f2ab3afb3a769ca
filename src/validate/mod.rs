//! Parameter validation module
//!
//! Checks caller-supplied parameters before any request is built.
//!
//! # Overview
//!
//! - numeric parameters must be non-negative integers
//! - page sizes must not exceed the endpoint ceiling (see [`limits`])
//! - identifier fields must form an accepted combination

mod rules;
mod types;

pub use rules::{
    parse_unsigned, resolve_list, resolve_user, validate_count, validate_id,
    validate_screen_name, validate_total_count,
};
pub use types::{ListRef, ParamValue, UserRef};

/// Per-endpoint ceilings for the `count` parameter
pub mod limits {
    /// Rich user objects per page (friends/followers/blocks lists)
    pub const USER_PAGE: u32 = 200;
    /// Bare ids per page
    pub const ID_PAGE: u32 = 5000;
    /// Statuses per timeline request
    pub const TIMELINE: u32 = 200;
    /// Statuses per search request
    pub const SEARCH: u32 = 100;
    /// Users per user-search request
    pub const USER_SEARCH: u32 = 20;
    /// Retweeter ids per page, and retweets per request
    pub const RETWEETS: u32 = 100;
    /// Users per lookup request
    pub const USER_LOOKUP: usize = 100;
}
